//! Async implementation of the DS3231 driver.
//!
//! This module provides the register access, field codec and alarm
//! operations of [`crate::DS3231`] over `embedded-hal-async` traits. It is
//! only available when the `async` feature is enabled. Encoding, clamping
//! and alarm matching are shared with the blocking driver; only the bus
//! calls differ.
//!
//! # Example
//!
//! ```rust,ignore
//! use ds3231_clock::asynch::DS3231;
//!
//! let mut rtc = DS3231::new(i2c, 0x68);
//! rtc.init().await?;
//! rtc.set_alarm_time(7, 30).await?;
//! rtc.toggle_alarm(true).await?;
//!
//! let raw = rtc.raw_datetime().await?;
//! ```

use embedded_hal_async::i2c::I2c;
use paste::paste;

use crate::alarm::{self, AlarmRegisters};
use crate::bcd::{bcd_to_binary, binary_to_bcd};
use crate::datetime::{DateTimeRegisters, WallClockTime};
use crate::fields::ClockHour;
use crate::{
    check_transfer, write_frame, AlarmDayDate, CommError, Control, Date, Day, Hours, Minutes,
    Month, RegAddr, Seconds, Status, TimeRepresentation, Year,
};

/// DS3231 Real-Time Clock async driver.
///
/// Behaves exactly like the blocking [`crate::DS3231`]. `&mut self` keeps at
/// most one transaction in flight per driver.
pub struct DS3231<I2C: I2c> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> DS3231<I2C> {
    /// Creates a new DS3231 async driver instance.
    ///
    /// # Arguments
    /// * `i2c` - The async I2C bus implementation
    /// * `address` - The I2C address of the device (typically 0x68)
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Gives the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Selects alarm 2 "hours and minutes, any day" mode.
    pub async fn init(&mut self) -> Result<(), CommError<I2C::Error>> {
        self.set_alarm2_day_date(alarm::ANY_DAY).await
    }

    /// Writes `bytes` to consecutive registers starting at `addr`.
    pub async fn write_registers(
        &mut self,
        addr: RegAddr,
        bytes: &[u8],
    ) -> Result<(), CommError<I2C::Error>> {
        let (frame, len) = write_frame::<I2C::Error>(addr, bytes)?;
        self.i2c.write(self.address, &frame[..len]).await?;
        Ok(())
    }

    /// Reads consecutive registers starting at `addr` into `buf`.
    pub async fn read_registers(
        &mut self,
        addr: RegAddr,
        buf: &mut [u8],
    ) -> Result<(), CommError<I2C::Error>> {
        check_transfer::<I2C::Error>(addr, buf.len())?;
        self.i2c
            .write_read(self.address, &[addr as u8], buf)
            .await?;
        trace!("DS3231: read {:?} {:?}", addr, &*buf);
        Ok(())
    }

    async fn read_register(&mut self, addr: RegAddr) -> Result<u8, CommError<I2C::Error>> {
        let mut data = [0];
        self.read_registers(addr, &mut data).await?;
        Ok(data[0])
    }

    /// Reads the seconds (0-59).
    pub async fn second(&mut self) -> Result<u8, CommError<I2C::Error>> {
        let reg = Seconds::from(self.read_register(RegAddr::Seconds).await?);
        Ok(bcd_to_binary(reg.bcd()))
    }

    /// Writes the seconds, clamped to 59.
    pub async fn set_second(&mut self, value: u8) -> Result<(), CommError<I2C::Error>> {
        let mut reg = Seconds::default();
        reg.set_bcd(binary_to_bcd(value.min(59)));
        self.write_registers(RegAddr::Seconds, &[reg.into()]).await
    }

    /// Reads the minutes (0-59).
    pub async fn minute(&mut self) -> Result<u8, CommError<I2C::Error>> {
        let reg = Minutes::from(self.read_register(RegAddr::Minutes).await?);
        Ok(bcd_to_binary(reg.bcd()))
    }

    /// Writes the minutes, clamped to 59.
    pub async fn set_minute(&mut self, value: u8) -> Result<(), CommError<I2C::Error>> {
        let mut reg = Minutes::default();
        reg.set_bcd(binary_to_bcd(value.min(59)));
        self.write_registers(RegAddr::Minutes, &[reg.into()]).await
    }

    /// Reads the hour together with the format it is stored in.
    pub async fn hour(&mut self) -> Result<ClockHour, CommError<I2C::Error>> {
        Ok(ClockHour::from(self.hours_register().await?))
    }

    /// Writes a canonical 0-23 hour in the clock's current format.
    pub async fn set_hour(&mut self, hours24: u8) -> Result<(), CommError<I2C::Error>> {
        let representation = self.hours_register().await?.time_representation();
        let hour = ClockHour::from_twenty_four_hour(hours24, representation);
        self.set_hours_register(Hours::from(hour)).await
    }

    /// Reads the hour format the clock runs in.
    pub async fn time_representation(
        &mut self,
    ) -> Result<TimeRepresentation, CommError<I2C::Error>> {
        Ok(self.hours_register().await?.time_representation())
    }

    /// Switches hour format by flipping bit 6 only; the hour digits are
    /// written back unchanged.
    pub async fn set_time_representation(
        &mut self,
        representation: TimeRepresentation,
    ) -> Result<(), CommError<I2C::Error>> {
        let mut reg = self.hours_register().await?;
        reg.set_time_representation(representation);
        self.set_hours_register(reg).await
    }

    /// Switches hour format, rewriting the current hour in the new format.
    pub async fn convert_time_representation(
        &mut self,
        representation: TimeRepresentation,
    ) -> Result<(), CommError<I2C::Error>> {
        let hour = ClockHour::from(self.hours_register().await?);
        debug!("DS3231: converting {:?} to {:?}", hour, representation);
        self.set_hours_register(Hours::from(hour.with_representation(representation)))
            .await
    }

    /// Reads the PM bit. Only meaningful in 12-hour format.
    pub async fn is_pm(&mut self) -> Result<bool, CommError<I2C::Error>> {
        Ok(self.hours_register().await?.pm())
    }

    /// Reads the day of the week (1-7).
    pub async fn day_of_week(&mut self) -> Result<u8, CommError<I2C::Error>> {
        Ok(Day::from(self.read_register(RegAddr::Day).await?).day())
    }

    /// Writes the day of the week, clamped to 1-7.
    pub async fn set_day_of_week(&mut self, value: u8) -> Result<(), CommError<I2C::Error>> {
        let mut reg = Day::default();
        reg.set_day(value.clamp(1, 7));
        self.write_registers(RegAddr::Day, &[reg.into()]).await
    }

    /// Reads the day of the month (1-31).
    pub async fn day_of_month(&mut self) -> Result<u8, CommError<I2C::Error>> {
        let reg = Date::from(self.read_register(RegAddr::Date).await?);
        Ok(bcd_to_binary(reg.bcd()))
    }

    /// Writes the day of the month, clamped to 1-31.
    pub async fn set_day_of_month(&mut self, value: u8) -> Result<(), CommError<I2C::Error>> {
        let mut reg = Date::default();
        reg.set_bcd(binary_to_bcd(value.clamp(1, 31)));
        self.write_registers(RegAddr::Date, &[reg.into()]).await
    }

    /// Reads the month (1-12).
    pub async fn month(&mut self) -> Result<u8, CommError<I2C::Error>> {
        Ok(bcd_to_binary(self.month_register().await?.bcd()))
    }

    /// Writes the month, clamped to 1-12, keeping the century bit.
    pub async fn set_month(&mut self, value: u8) -> Result<(), CommError<I2C::Error>> {
        let mut reg = self.month_register().await?;
        reg.set_bcd(binary_to_bcd(value.clamp(1, 12)));
        self.set_month_register(reg).await
    }

    /// Reads the century overflow bit.
    pub async fn century_bit(&mut self) -> Result<bool, CommError<I2C::Error>> {
        Ok(self.month_register().await?.century())
    }

    /// Sets or clears the century bit, keeping the month.
    pub async fn set_century_bit(&mut self, value: bool) -> Result<(), CommError<I2C::Error>> {
        let mut reg = self.month_register().await?;
        reg.set_century(value);
        self.set_month_register(reg).await
    }

    /// Reads the two-digit year (0-99).
    pub async fn year(&mut self) -> Result<u8, CommError<I2C::Error>> {
        let reg = Year::from(self.read_register(RegAddr::Year).await?);
        Ok(bcd_to_binary(reg.bcd()))
    }

    /// Writes the two-digit year, clamped to 99.
    pub async fn set_year(&mut self, value: u8) -> Result<(), CommError<I2C::Error>> {
        let mut reg = Year::default();
        reg.set_bcd(binary_to_bcd(value));
        self.write_registers(RegAddr::Year, &[reg.into()]).await
    }

    /// Reads all seven time-keeping registers in one transfer.
    pub async fn raw_datetime(&mut self) -> Result<DateTimeRegisters, CommError<I2C::Error>> {
        let mut data = [0; 7];
        self.read_registers(RegAddr::Seconds, &mut data).await?;
        Ok(data.into())
    }

    /// Writes all seven time-keeping registers in one transfer, keeping the
    /// century bit.
    pub async fn set_datetime(
        &mut self,
        time: &WallClockTime,
    ) -> Result<(), CommError<I2C::Error>> {
        let century = self.month_register().await?.century();
        let raw = DateTimeRegisters::encode(time, century);
        let data: [u8; 7] = (&raw).into();
        self.write_registers(RegAddr::Seconds, &data).await
    }

    /// Sets the alarm time in the clock's current format.
    pub async fn set_alarm_time(
        &mut self,
        hours24: u8,
        minutes: u8,
    ) -> Result<(), CommError<I2C::Error>> {
        let clock_format = self.time_representation().await?;
        let regs = AlarmRegisters::encode(hours24, minutes, clock_format);
        let data: [u8; 2] = (&regs).into();
        self.write_registers(RegAddr::Alarm2Minutes, &data).await
    }

    /// Reads the alarm hour (in the alarm register's own format) and minutes.
    pub async fn alarm_time(&mut self) -> Result<(ClockHour, u8), CommError<I2C::Error>> {
        let regs = self.alarm_registers().await?;
        Ok((regs.hour(), regs.minutes()))
    }

    async fn alarm_registers(&mut self) -> Result<AlarmRegisters, CommError<I2C::Error>> {
        let mut data = [0; 2];
        self.read_registers(RegAddr::Alarm2Minutes, &mut data)
            .await?;
        Ok(data.into())
    }

    /// Enables or disables the alarm 2 interrupt, keeping all other control
    /// bits.
    pub async fn toggle_alarm(&mut self, enable: bool) -> Result<(), CommError<I2C::Error>> {
        let mut control = self.control().await?;
        control.set_alarm2_interrupt_enable(enable);
        self.set_control(control).await
    }

    /// Reads whether the alarm 2 interrupt is enabled.
    pub async fn is_alarm_enabled(&mut self) -> Result<bool, CommError<I2C::Error>> {
        Ok(self.control().await?.alarm2_interrupt_enable())
    }

    /// Whether the clock's hour and minute equal the alarm's, across formats.
    pub async fn is_alarm_time(&mut self) -> Result<bool, CommError<I2C::Error>> {
        let mut clock = [0; 2];
        self.read_registers(RegAddr::Minutes, &mut clock).await?;
        let clock_minutes = bcd_to_binary(Minutes::from(clock[0]).bcd());
        let clock_hour = ClockHour::from(Hours::from(clock[1]));
        let alarm = self.alarm_registers().await?;
        Ok(alarm::matches(
            clock_hour,
            clock_minutes,
            alarm.hour(),
            alarm.minutes(),
        ))
    }

    /// Clears the alarm 2 triggered flag, keeping the other status bits.
    pub async fn signal_alarm_time_passed(&mut self) -> Result<(), CommError<I2C::Error>> {
        let mut status = self.status().await?;
        status.set_alarm2_flag(false);
        self.set_status(status).await
    }

    /// Reads the raw temperature registers as `MSB << 8 | LSB`.
    pub async fn temperature_raw(&mut self) -> Result<u16, CommError<I2C::Error>> {
        let mut data = [0; 2];
        self.read_registers(RegAddr::MSBTemp, &mut data).await?;
        Ok(u16::from_be_bytes(data))
    }

    /// Reads the temperature in degrees Celsius.
    #[cfg(feature = "temperature_f32")]
    pub async fn temperature_celsius(&mut self) -> Result<f32, CommError<I2C::Error>> {
        Ok(crate::temperature_to_celsius(self.temperature_raw().await?))
    }
}

// Register access implementations
macro_rules! impl_register_access {
    ($(($name:ident, $regaddr:expr, $typ:ty)),+) => {
        impl<I2C: I2c> DS3231<I2C> {
            $(
                paste! {
                    #[doc = concat!("Reads the ", stringify!($name), " register.")]
                    pub async fn $name(&mut self) -> Result<$typ, CommError<I2C::Error>> {
                        let mut data = [0];
                        self.read_registers($regaddr, &mut data).await?;
                        Ok(<$typ>::from(data[0]))
                    }

                    #[doc = concat!("Writes the ", stringify!($name), " register.")]
                    pub async fn [<set_ $name>](&mut self, value: $typ) -> Result<(), CommError<I2C::Error>> {
                        self.write_registers($regaddr, &[value.into()]).await
                    }
                }
            )+
        }
    }
}

impl_register_access!(
    (hours_register, RegAddr::Hours, Hours),
    (month_register, RegAddr::Month, Month),
    (alarm2_day_date, RegAddr::Alarm2DayDate, AlarmDayDate),
    (control, RegAddr::Control, Control),
    (status, RegAddr::ControlStatus, Status)
);
