//! A `no_std` codec and alarm-clock core for the DS3231 real-time clock.
//!
//! The crate talks to the chip over any [`embedded_hal::i2c::I2c`] bus and
//! hides the register-level details:
//!
//! - BCD encoding of every time field ([`bcd`])
//! - the 12/24-hour layout of the hours registers ([`fields`])
//! - alarm 2 in "hours and minutes, every day" mode, matched correctly even
//!   when the clock and alarm are stored in different hour formats ([`alarm`])
//! - the missing century digits, tracked in software ([`century`])
//!
//! [`DS3231`] exposes the register and field operations one by one.
//! [`Clock`] is the application-facing facade that combines them with the
//! century counter.
//!
//! Nothing is cached: every call is a fresh bus transaction. All writes
//! saturate out-of-range input to the nearest valid value instead of
//! returning an error. The only error is [`CommError`].
//!
//! # Features
//!
//! - `async`: an `embedded-hal-async` driver in [`asynch`]
//! - `log` / `defmt`: debug logging through either backend
//! - `temperature_f32`: temperature decoded to degrees Celsius
//!
//! # Example
//!
//! ```rust,ignore
//! use ds3231_clock::{Clock, Config};
//!
//! let mut clock = Clock::new(i2c, &Config::default());
//! clock.init()?;
//! clock.set_alarm_time(7, 30)?;
//! clock.toggle_alarm(true)?;
//!
//! loop {
//!     let now = clock.time()?;
//!     if clock.poll_alarm()? {
//!         // sound the buzzer
//!     }
//! }
//! ```
#![no_std]

#[macro_use]
mod fmt;

pub mod alarm;
#[cfg(feature = "async")]
pub mod asynch;
pub mod bcd;
pub mod century;
pub mod clock;
pub mod datetime;
pub mod fields;
mod registers;

use core::fmt::{Debug, Display, Formatter};

use embedded_hal::i2c::I2c;

use crate::bcd::{bcd_to_binary, binary_to_bcd};

pub use crate::alarm::{AlarmRegisters, AlarmTime};
pub use crate::century::CenturyCounter;
pub use crate::clock::Clock;
pub use crate::datetime::{DateTimeRegisters, WallClockTime};
pub use crate::fields::ClockHour;
pub use crate::registers::*;

/// Fixed I2C address of the DS3231.
pub const DEFAULT_ADDRESS: u8 = 0x68;

/// Default century baseline: the years 2000-2099.
pub const DEFAULT_CENTURY: u16 = 21;

/// Configuration for [`Clock`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// 7-bit I2C address of the chip
    pub address: u8,
    /// Century the counter starts in after every boot
    pub century_baseline: u16,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            address: DEFAULT_ADDRESS,
            century_baseline: DEFAULT_CENTURY,
        }
    }
}

/// Communication failure.
///
/// The bus cannot tell a missing device from a busy bus or a NACK, so
/// neither does this type: it either carries the bus error unchanged or
/// reports a transfer that was rejected before reaching the bus.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommError<I2CE> {
    /// The bus transaction failed
    I2c(I2CE),
    /// Empty buffer, or a transfer running past the last register
    InvalidTransfer,
}

impl<I2CE> From<I2CE> for CommError<I2CE> {
    fn from(e: I2CE) -> Self {
        CommError::I2c(e)
    }
}

impl<I2CE: Debug> Display for CommError<I2CE> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            CommError::I2c(e) => write!(f, "I2C communication failed: {:?}", e),
            CommError::InvalidTransfer => write!(f, "invalid register transfer"),
        }
    }
}

/// Checks that a transfer of `len` bytes starting at `addr` stays inside
/// the register file.
pub(crate) fn check_transfer<I2CE>(addr: RegAddr, len: usize) -> Result<(), CommError<I2CE>> {
    if len == 0 || len > addr.remaining() {
        warn!("DS3231: rejected transfer of {} bytes at {:?}", len, addr);
        return Err(CommError::InvalidTransfer);
    }
    Ok(())
}

/// Builds the bus frame for a register write: the start address followed
/// by the data. Returns the frame and its used length.
pub(crate) fn write_frame<I2CE>(
    addr: RegAddr,
    bytes: &[u8],
) -> Result<([u8; REGISTER_COUNT + 1], usize), CommError<I2CE>> {
    check_transfer::<I2CE>(addr, bytes.len())?;
    let mut frame = [0u8; REGISTER_COUNT + 1];
    frame[0] = addr as u8;
    frame[1..=bytes.len()].copy_from_slice(bytes);
    debug!("DS3231: write {:?} {:?}", addr, bytes);
    Ok((frame, bytes.len() + 1))
}

/// Decodes the raw temperature word into degrees Celsius.
///
/// The MSB is the signed integer part; bits 7-6 of the LSB count quarter
/// degrees.
#[cfg(feature = "temperature_f32")]
#[must_use]
pub fn temperature_to_celsius(raw: u16) -> f32 {
    let [msb, lsb] = raw.to_be_bytes();
    f32::from(Temperature::from(msb).temperature())
        + f32::from(TemperatureFraction::from(lsb).quarters()) * 0.25
}

/// DS3231 Real-Time Clock driver.
///
/// Owns the bus handle. Every method performs at least one bus transaction
/// and returns the first [`CommError`] it meets without retrying.
pub struct DS3231<I2C: I2c> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> DS3231<I2C> {
    /// Creates a new driver instance.
    ///
    /// # Arguments
    /// * `i2c` - The I2C bus implementation
    /// * `address` - The I2C address of the device (typically 0x68)
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Gives the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Selects the only alarm mode this crate uses: alarm 2 matching hours
    /// and minutes on any day.
    ///
    /// Writes the alarm 2 day/date register once; nothing else touches it.
    pub fn init(&mut self) -> Result<(), CommError<I2C::Error>> {
        self.set_alarm2_day_date(alarm::ANY_DAY)
    }

    /// Writes `bytes` to consecutive registers starting at `addr`.
    ///
    /// # Errors
    /// * `CommError::InvalidTransfer` if `bytes` is empty or runs past 0x12
    /// * `CommError::I2c` if the bus transaction fails
    pub fn write_registers(
        &mut self,
        addr: RegAddr,
        bytes: &[u8],
    ) -> Result<(), CommError<I2C::Error>> {
        let (frame, len) = write_frame::<I2C::Error>(addr, bytes)?;
        self.i2c.write(self.address, &frame[..len])?;
        Ok(())
    }

    /// Reads consecutive registers starting at `addr` into `buf`.
    ///
    /// # Errors
    /// * `CommError::InvalidTransfer` if `buf` is empty or runs past 0x12
    /// * `CommError::I2c` if the bus transaction fails
    pub fn read_registers(
        &mut self,
        addr: RegAddr,
        buf: &mut [u8],
    ) -> Result<(), CommError<I2C::Error>> {
        check_transfer::<I2C::Error>(addr, buf.len())?;
        self.i2c.write_read(self.address, &[addr as u8], buf)?;
        trace!("DS3231: read {:?} {:?}", addr, &*buf);
        Ok(())
    }

    fn read_register(&mut self, addr: RegAddr) -> Result<u8, CommError<I2C::Error>> {
        let mut data = [0];
        self.read_registers(addr, &mut data)?;
        Ok(data[0])
    }

    /// Reads the seconds (0-59).
    pub fn second(&mut self) -> Result<u8, CommError<I2C::Error>> {
        let reg = Seconds::from(self.read_register(RegAddr::Seconds)?);
        Ok(bcd_to_binary(reg.bcd()))
    }

    /// Writes the seconds, clamped to 59.
    pub fn set_second(&mut self, value: u8) -> Result<(), CommError<I2C::Error>> {
        let mut reg = Seconds::default();
        reg.set_bcd(binary_to_bcd(value.min(59)));
        self.write_registers(RegAddr::Seconds, &[reg.into()])
    }

    /// Reads the minutes (0-59).
    pub fn minute(&mut self) -> Result<u8, CommError<I2C::Error>> {
        let reg = Minutes::from(self.read_register(RegAddr::Minutes)?);
        Ok(bcd_to_binary(reg.bcd()))
    }

    /// Writes the minutes, clamped to 59.
    pub fn set_minute(&mut self, value: u8) -> Result<(), CommError<I2C::Error>> {
        let mut reg = Minutes::default();
        reg.set_bcd(binary_to_bcd(value.min(59)));
        self.write_registers(RegAddr::Minutes, &[reg.into()])
    }

    /// Reads the hour together with the format it is stored in.
    pub fn hour(&mut self) -> Result<ClockHour, CommError<I2C::Error>> {
        Ok(ClockHour::from(self.hours_register()?))
    }

    /// Writes a canonical 0-23 hour (clamped) in the clock's current format.
    ///
    /// The format bit, AM/PM bit and BCD hour go out in a single register
    /// write.
    pub fn set_hour(&mut self, hours24: u8) -> Result<(), CommError<I2C::Error>> {
        let representation = self.hours_register()?.time_representation();
        let hour = ClockHour::from_twenty_four_hour(hours24, representation);
        self.set_hours_register(Hours::from(hour))
    }

    /// Reads the hour format the clock runs in.
    pub fn time_representation(&mut self) -> Result<TimeRepresentation, CommError<I2C::Error>> {
        Ok(self.hours_register()?.time_representation())
    }

    /// Switches the clock between 12 and 24-hour format.
    ///
    /// Only the format bit changes: the rest of the hours register is read
    /// first and written back unchanged, so the stored digits are not
    /// reinterpreted. Use [`DS3231::convert_time_representation`] to keep the
    /// time of day instead.
    pub fn set_time_representation(
        &mut self,
        representation: TimeRepresentation,
    ) -> Result<(), CommError<I2C::Error>> {
        let mut reg = self.hours_register()?;
        reg.set_time_representation(representation);
        self.set_hours_register(reg)
    }

    /// Switches hour format while keeping the time of day.
    ///
    /// Reads the hours register and writes the same hour back encoded in the
    /// new format, in one write.
    pub fn convert_time_representation(
        &mut self,
        representation: TimeRepresentation,
    ) -> Result<(), CommError<I2C::Error>> {
        let hour = ClockHour::from(self.hours_register()?);
        debug!("DS3231: converting {:?} to {:?}", hour, representation);
        self.set_hours_register(Hours::from(hour.with_representation(representation)))
    }

    /// Reads the PM bit. Only meaningful in 12-hour format.
    pub fn is_pm(&mut self) -> Result<bool, CommError<I2C::Error>> {
        Ok(self.hours_register()?.pm())
    }

    /// Reads the day of the week (1-7).
    pub fn day_of_week(&mut self) -> Result<u8, CommError<I2C::Error>> {
        Ok(Day::from(self.read_register(RegAddr::Day)?).day())
    }

    /// Writes the day of the week, clamped to 1-7.
    pub fn set_day_of_week(&mut self, value: u8) -> Result<(), CommError<I2C::Error>> {
        let mut reg = Day::default();
        reg.set_day(value.clamp(1, 7));
        self.write_registers(RegAddr::Day, &[reg.into()])
    }

    /// Reads the day of the month (1-31).
    pub fn day_of_month(&mut self) -> Result<u8, CommError<I2C::Error>> {
        let reg = Date::from(self.read_register(RegAddr::Date)?);
        Ok(bcd_to_binary(reg.bcd()))
    }

    /// Writes the day of the month, clamped to 1-31.
    pub fn set_day_of_month(&mut self, value: u8) -> Result<(), CommError<I2C::Error>> {
        let mut reg = Date::default();
        reg.set_bcd(binary_to_bcd(value.clamp(1, 31)));
        self.write_registers(RegAddr::Date, &[reg.into()])
    }

    /// Reads the month (1-12).
    pub fn month(&mut self) -> Result<u8, CommError<I2C::Error>> {
        Ok(bcd_to_binary(self.month_register()?.bcd()))
    }

    /// Writes the month, clamped to 1-12, keeping the century bit.
    pub fn set_month(&mut self, value: u8) -> Result<(), CommError<I2C::Error>> {
        let mut reg = self.month_register()?;
        reg.set_bcd(binary_to_bcd(value.clamp(1, 12)));
        self.set_month_register(reg)
    }

    /// Reads the century overflow bit.
    pub fn century_bit(&mut self) -> Result<bool, CommError<I2C::Error>> {
        Ok(self.month_register()?.century())
    }

    /// Sets or clears the century overflow bit, keeping the month.
    pub fn set_century_bit(&mut self, value: bool) -> Result<(), CommError<I2C::Error>> {
        let mut reg = self.month_register()?;
        reg.set_century(value);
        self.set_month_register(reg)
    }

    /// Reads the two-digit year (0-99).
    pub fn year(&mut self) -> Result<u8, CommError<I2C::Error>> {
        let reg = Year::from(self.read_register(RegAddr::Year)?);
        Ok(bcd_to_binary(reg.bcd()))
    }

    /// Writes the two-digit year, clamped to 99.
    pub fn set_year(&mut self, value: u8) -> Result<(), CommError<I2C::Error>> {
        let mut reg = Year::default();
        reg.set_bcd(binary_to_bcd(value));
        self.write_registers(RegAddr::Year, &[reg.into()])
    }

    /// Reads all seven time-keeping registers in one transfer.
    pub fn raw_datetime(&mut self) -> Result<DateTimeRegisters, CommError<I2C::Error>> {
        let mut data = [0; 7];
        self.read_registers(RegAddr::Seconds, &mut data)?;
        Ok(data.into())
    }

    /// Writes all seven time-keeping registers in one transfer.
    ///
    /// The hour is written in `time.time_representation`, and only the last
    /// two digits of the year are stored. The century bit is read first and
    /// written back unchanged.
    pub fn set_datetime(&mut self, time: &WallClockTime) -> Result<(), CommError<I2C::Error>> {
        let century = self.month_register()?.century();
        let raw = DateTimeRegisters::encode(time, century);
        let data: [u8; 7] = (&raw).into();
        self.write_registers(RegAddr::Seconds, &data)
    }

    /// Sets the alarm time from a canonical hour (clamped to 0-23) and
    /// minutes (clamped to 0-59). Enablement is left as it is.
    ///
    /// The hour is encoded in the clock's current format. Minutes and hours
    /// are written in one transfer.
    pub fn set_alarm_time(&mut self, hours24: u8, minutes: u8) -> Result<(), CommError<I2C::Error>> {
        let clock_format = self.time_representation()?;
        let regs = AlarmRegisters::encode(hours24, minutes, clock_format);
        let data: [u8; 2] = (&regs).into();
        self.write_registers(RegAddr::Alarm2Minutes, &data)
    }

    /// Reads the alarm hour (in the alarm register's own format) and minutes.
    pub fn alarm_time(&mut self) -> Result<(ClockHour, u8), CommError<I2C::Error>> {
        let regs = self.alarm_registers()?;
        Ok((regs.hour(), regs.minutes()))
    }

    fn alarm_registers(&mut self) -> Result<AlarmRegisters, CommError<I2C::Error>> {
        let mut data = [0; 2];
        self.read_registers(RegAddr::Alarm2Minutes, &mut data)?;
        Ok(data.into())
    }

    /// Enables or disables the alarm 2 interrupt, keeping all other control
    /// bits.
    pub fn toggle_alarm(&mut self, enable: bool) -> Result<(), CommError<I2C::Error>> {
        let mut control = self.control()?;
        control.set_alarm2_interrupt_enable(enable);
        self.set_control(control)
    }

    /// Reads whether the alarm 2 interrupt is enabled.
    pub fn is_alarm_enabled(&mut self) -> Result<bool, CommError<I2C::Error>> {
        Ok(self.control()?.alarm2_interrupt_enable())
    }

    /// Reads the clock and alarm and reports whether their hour, minute and
    /// AM/PM agree. Seconds are not compared.
    pub fn is_alarm_time(&mut self) -> Result<bool, CommError<I2C::Error>> {
        let mut clock = [0; 2];
        self.read_registers(RegAddr::Minutes, &mut clock)?;
        let clock_minutes = bcd_to_binary(Minutes::from(clock[0]).bcd());
        let clock_hour = ClockHour::from(Hours::from(clock[1]));
        let alarm = self.alarm_registers()?;
        Ok(alarm::matches(
            clock_hour,
            clock_minutes,
            alarm.hour(),
            alarm.minutes(),
        ))
    }

    /// Clears the alarm 2 triggered flag so a later match can set it again.
    ///
    /// The flag does not clear itself; call this once the alarm is no longer
    /// wanted.
    pub fn signal_alarm_time_passed(&mut self) -> Result<(), CommError<I2C::Error>> {
        let mut status = self.status()?;
        status.set_alarm2_flag(false);
        self.set_status(status)
    }

    /// Reads the raw temperature registers as `MSB << 8 | LSB`.
    pub fn temperature_raw(&mut self) -> Result<u16, CommError<I2C::Error>> {
        let mut data = [0; 2];
        self.read_registers(RegAddr::MSBTemp, &mut data)?;
        Ok(u16::from_be_bytes(data))
    }

    /// Reads the temperature in degrees Celsius.
    #[cfg(feature = "temperature_f32")]
    pub fn temperature_celsius(&mut self) -> Result<f32, CommError<I2C::Error>> {
        Ok(temperature_to_celsius(self.temperature_raw()?))
    }
}

// Single-register accessors
macro_rules! impl_register_access {
    ($(($name:ident, $regaddr:expr, $typ:ty)),+) => {
        impl<I2C: I2c> DS3231<I2C> {
            $(
                paste::paste! {
                    #[doc = concat!("Reads the ", stringify!($name), " register.")]
                    pub fn $name(&mut self) -> Result<$typ, CommError<I2C::Error>> {
                        let mut data = [0];
                        self.read_registers($regaddr, &mut data)?;
                        Ok(<$typ>::from(data[0]))
                    }

                    #[doc = concat!("Writes the ", stringify!($name), " register.")]
                    pub fn [<set_ $name>](&mut self, value: $typ) -> Result<(), CommError<I2C::Error>> {
                        self.write_registers($regaddr, &[value.into()])
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

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};

    const DEVICE_ADDRESS: u8 = 0x68;

    fn setup(expectations: &[I2cTrans]) -> DS3231<I2cMock> {
        DS3231::new(I2cMock::new(expectations), DEVICE_ADDRESS)
    }

    fn finish(dev: DS3231<I2cMock>) {
        let mut i2c = dev.release();
        i2c.done();
    }

    fn read(reg: RegAddr, response: &[u8]) -> I2cTrans {
        I2cTrans::write_read(DEVICE_ADDRESS, vec![reg as u8], response.to_vec())
    }

    fn write(reg: RegAddr, data: &[u8]) -> I2cTrans {
        let mut frame = vec![reg as u8];
        frame.extend_from_slice(data);
        I2cTrans::write(DEVICE_ADDRESS, frame)
    }

    fn failing_read(reg: RegAddr, len: usize) -> I2cTrans {
        read(reg, &vec![0; len]).with_error(ErrorKind::Other)
    }

    fn bus_error<T>() -> Result<T, CommError<ErrorKind>> {
        Err(CommError::I2c(ErrorKind::Other))
    }

    #[test]
    fn test_multi_byte_transfers() {
        let mut dev = setup(&[
            write(RegAddr::Alarm2Minutes, &[0x30, 0x13]),
            read(RegAddr::Seconds, &[0x01, 0x02, 0x03]),
        ]);
        dev.write_registers(RegAddr::Alarm2Minutes, &[0x30, 0x13])
            .unwrap();
        let mut buf = [0; 3];
        dev.read_registers(RegAddr::Seconds, &mut buf).unwrap();
        assert_eq!(buf, [0x01, 0x02, 0x03]);
        finish(dev);
    }

    #[test]
    fn test_whole_register_file_fits() {
        let data = [0u8; REGISTER_COUNT];
        let mut dev = setup(&[read(RegAddr::Seconds, &data)]);
        let mut buf = [0xFF; REGISTER_COUNT];
        dev.read_registers(RegAddr::Seconds, &mut buf).unwrap();
        assert_eq!(buf, data);
        finish(dev);
    }

    #[test]
    fn test_invalid_transfers_never_reach_the_bus() {
        let mut dev = setup(&[]);
        assert_eq!(
            dev.write_registers(RegAddr::Seconds, &[]),
            Err(CommError::InvalidTransfer)
        );
        let mut empty: [u8; 0] = [];
        assert_eq!(
            dev.read_registers(RegAddr::Seconds, &mut empty),
            Err(CommError::InvalidTransfer)
        );
        let mut buf = [0; 2];
        assert_eq!(
            dev.read_registers(RegAddr::LSBTemp, &mut buf),
            Err(CommError::InvalidTransfer)
        );
        assert_eq!(
            dev.write_registers(RegAddr::MSBTemp, &[0, 0, 0]),
            Err(CommError::InvalidTransfer)
        );
        finish(dev);
    }

    #[test]
    fn test_init_selects_any_day_alarm() {
        let mut dev = setup(&[write(RegAddr::Alarm2DayDate, &[0x80])]);
        dev.init().unwrap();
        finish(dev);
    }

    #[test]
    fn test_seconds_and_minutes() {
        let mut dev = setup(&[
            read(RegAddr::Seconds, &[0x45]),
            write(RegAddr::Seconds, &[0x59]),
            read(RegAddr::Minutes, &[0x07]),
            write(RegAddr::Minutes, &[0x30]),
        ]);
        assert_eq!(dev.second().unwrap(), 45);
        dev.set_second(70).unwrap();
        assert_eq!(dev.minute().unwrap(), 7);
        dev.set_minute(30).unwrap();
        finish(dev);
    }

    #[test]
    fn test_date_field_clamping() {
        let mut dev = setup(&[
            write(RegAddr::Date, &[0x01]),
            write(RegAddr::Date, &[0x31]),
            read(RegAddr::Month, &[0x05]),
            write(RegAddr::Month, &[0x12]),
            write(RegAddr::Day, &[0x01]),
            write(RegAddr::Day, &[0x07]),
            write(RegAddr::Year, &[0x99]),
        ]);
        dev.set_day_of_month(0).unwrap();
        dev.set_day_of_month(40).unwrap();
        dev.set_month(13).unwrap();
        dev.set_day_of_week(0).unwrap();
        dev.set_day_of_week(9).unwrap();
        dev.set_year(120).unwrap();
        finish(dev);
    }

    #[test]
    fn test_date_field_reads_mask_flag_bits() {
        let mut dev = setup(&[
            read(RegAddr::Date, &[0xD5]),
            read(RegAddr::Month, &[0x91]),
            read(RegAddr::Day, &[0x03]),
            read(RegAddr::Year, &[0x26]),
        ]);
        assert_eq!(dev.day_of_month().unwrap(), 15);
        assert_eq!(dev.month().unwrap(), 11);
        assert_eq!(dev.day_of_week().unwrap(), 3);
        assert_eq!(dev.year().unwrap(), 26);
        finish(dev);
    }

    #[test]
    fn test_century_bit_isolation() {
        let mut dev = setup(&[
            read(RegAddr::Month, &[0x00]),
            write(RegAddr::Month, &[0x07]),
            // 0 -> 1 -> 0, twice, month must survive
            read(RegAddr::Month, &[0x07]),
            write(RegAddr::Month, &[0x87]),
            read(RegAddr::Month, &[0x87]),
            read(RegAddr::Month, &[0x87]),
            write(RegAddr::Month, &[0x07]),
            read(RegAddr::Month, &[0x07]),
            read(RegAddr::Month, &[0x07]),
            write(RegAddr::Month, &[0x87]),
            read(RegAddr::Month, &[0x87]),
            read(RegAddr::Month, &[0x87]),
            write(RegAddr::Month, &[0x07]),
            read(RegAddr::Month, &[0x07]),
        ]);
        dev.set_month(7).unwrap();
        for _ in 0..2 {
            dev.set_century_bit(true).unwrap();
            assert_eq!(dev.month().unwrap(), 7);
            dev.set_century_bit(false).unwrap();
            assert_eq!(dev.month().unwrap(), 7);
        }
        finish(dev);
    }

    #[test]
    fn test_set_month_keeps_century_bit() {
        let mut dev = setup(&[
            read(RegAddr::Month, &[0x81]),
            write(RegAddr::Month, &[0x89]),
            read(RegAddr::Month, &[0x89]),
        ]);
        dev.set_month(9).unwrap();
        assert!(dev.century_bit().unwrap());
        finish(dev);
    }

    #[test]
    fn test_hour_reads_format_first() {
        let mut dev = setup(&[
            read(RegAddr::Hours, &[0x23]),
            read(RegAddr::Hours, &[0x72]),
            read(RegAddr::Hours, &[0x72]),
            read(RegAddr::Hours, &[0x72]),
        ]);
        assert_eq!(dev.hour().unwrap(), ClockHour::TwentyFourHour(23));
        assert_eq!(
            dev.hour().unwrap(),
            ClockHour::TwelveHour {
                hours: 12,
                is_pm: true
            }
        );
        assert_eq!(
            dev.time_representation().unwrap(),
            TimeRepresentation::TwelveHour
        );
        assert!(dev.is_pm().unwrap());
        finish(dev);
    }

    #[test]
    fn test_set_hour_in_each_format() {
        let mut dev = setup(&[
            // 24h clock: 13 stays 13
            read(RegAddr::Hours, &[0x10]),
            write(RegAddr::Hours, &[0x13]),
            // 12h clock: 13 -> 1 PM, 0 -> 12 AM, 12 -> 12 PM
            read(RegAddr::Hours, &[0x45]),
            write(RegAddr::Hours, &[0x61]),
            read(RegAddr::Hours, &[0x61]),
            write(RegAddr::Hours, &[0x52]),
            read(RegAddr::Hours, &[0x52]),
            write(RegAddr::Hours, &[0x72]),
            // Clamped to 23
            read(RegAddr::Hours, &[0x00]),
            write(RegAddr::Hours, &[0x23]),
        ]);
        dev.set_hour(13).unwrap();
        dev.set_hour(13).unwrap();
        dev.set_hour(0).unwrap();
        dev.set_hour(12).unwrap();
        dev.set_hour(24).unwrap();
        finish(dev);
    }

    #[test]
    fn test_set_time_representation_flips_only_bit6() {
        let mut dev = setup(&[
            // 24h 15 -> bit6 set, digits untouched
            read(RegAddr::Hours, &[0x15]),
            write(RegAddr::Hours, &[0x55]),
            // 12h 12 PM -> bit6 cleared, PM bit kept
            read(RegAddr::Hours, &[0x72]),
            write(RegAddr::Hours, &[0x32]),
            // Already 12h: same byte goes back
            read(RegAddr::Hours, &[0x61]),
            write(RegAddr::Hours, &[0x61]),
        ]);
        dev.set_time_representation(TimeRepresentation::TwelveHour)
            .unwrap();
        dev.set_time_representation(TimeRepresentation::TwentyFourHour)
            .unwrap();
        dev.set_time_representation(TimeRepresentation::TwelveHour)
            .unwrap();
        finish(dev);
    }

    #[test]
    fn test_convert_time_representation_keeps_time_of_day() {
        let mut dev = setup(&[
            // 15h in 24h mode becomes 3 PM
            read(RegAddr::Hours, &[0x15]),
            write(RegAddr::Hours, &[0x63]),
            // 12 AM becomes 00
            read(RegAddr::Hours, &[0x52]),
            write(RegAddr::Hours, &[0x00]),
        ]);
        dev.convert_time_representation(TimeRepresentation::TwelveHour)
            .unwrap();
        dev.convert_time_representation(TimeRepresentation::TwentyFourHour)
            .unwrap();
        finish(dev);
    }

    #[test]
    fn test_raw_datetime_burst() {
        let mut dev = setup(&[
            read(
                RegAddr::Seconds,
                &[0x00, 0x30, 0x15, 0x05, 0x14, 0x83, 0x24],
            ),
            read(RegAddr::Month, &[0x83]),
            write(
                RegAddr::Seconds,
                &[0x00, 0x30, 0x15, 0x05, 0x14, 0x83, 0x24],
            ),
        ]);
        let raw = dev.raw_datetime().unwrap();
        assert!(raw.century());
        let mut time = raw.decode();
        assert_eq!(time.hours, 15);
        assert_eq!(time.year, 24);
        time.year = 2024;
        dev.set_datetime(&time).unwrap();
        finish(dev);
    }

    #[test]
    fn test_set_alarm_time_uses_clock_format() {
        let mut dev = setup(&[
            read(RegAddr::Hours, &[0x10]),
            write(RegAddr::Alarm2Minutes, &[0x30, 0x13]),
            read(RegAddr::Hours, &[0x45]),
            write(RegAddr::Alarm2Minutes, &[0x30, 0x61]),
            // Clamped
            read(RegAddr::Hours, &[0x10]),
            write(RegAddr::Alarm2Minutes, &[0x59, 0x23]),
        ]);
        dev.set_alarm_time(13, 30).unwrap();
        dev.set_alarm_time(13, 30).unwrap();
        dev.set_alarm_time(30, 75).unwrap();
        finish(dev);
    }

    #[test]
    fn test_alarm_time_keeps_its_own_format() {
        let mut dev = setup(&[read(RegAddr::Alarm2Minutes, &[0x15, 0x47])]);
        let (hour, minutes) = dev.alarm_time().unwrap();
        assert_eq!(
            hour,
            ClockHour::TwelveHour {
                hours: 7,
                is_pm: false
            }
        );
        assert_eq!(minutes, 15);
        finish(dev);
    }

    #[test]
    fn test_toggle_alarm_preserves_control_bits() {
        let mut dev = setup(&[
            read(RegAddr::Control, &[0x1C]),
            write(RegAddr::Control, &[0x1E]),
            read(RegAddr::Control, &[0x1E]),
            read(RegAddr::Control, &[0x1E]),
            write(RegAddr::Control, &[0x1C]),
        ]);
        dev.toggle_alarm(true).unwrap();
        assert!(dev.is_alarm_enabled().unwrap());
        dev.toggle_alarm(false).unwrap();
        finish(dev);
    }

    #[test]
    fn test_is_alarm_time_across_formats() {
        let mut dev = setup(&[
            // Clock 13:30 in 24h mode, alarm 1:30 PM in 12h mode
            read(RegAddr::Minutes, &[0x30, 0x13]),
            read(RegAddr::Alarm2Minutes, &[0x30, 0x61]),
            // Same, alarm minute 31
            read(RegAddr::Minutes, &[0x30, 0x13]),
            read(RegAddr::Alarm2Minutes, &[0x31, 0x61]),
        ]);
        assert!(dev.is_alarm_time().unwrap());
        assert!(!dev.is_alarm_time().unwrap());
        finish(dev);
    }

    #[test]
    fn test_signal_alarm_time_passed_clears_only_a2f() {
        let mut dev = setup(&[
            read(RegAddr::ControlStatus, &[0x8B]),
            write(RegAddr::ControlStatus, &[0x89]),
        ]);
        dev.signal_alarm_time_passed().unwrap();
        finish(dev);
    }

    #[test]
    fn test_temperature_raw() {
        let mut dev = setup(&[read(RegAddr::MSBTemp, &[0x19, 0x40])]);
        assert_eq!(dev.temperature_raw().unwrap(), 0x1940);
        finish(dev);
    }

    #[cfg(feature = "temperature_f32")]
    #[test]
    fn test_temperature_to_celsius() {
        assert_eq!(temperature_to_celsius(0x1940), 25.25);
        assert_eq!(temperature_to_celsius(0xFFC0), -0.25);
        assert_eq!(temperature_to_celsius(0xE700), -25.0);
    }

    #[test]
    fn test_read_errors_propagate() {
        let mut dev = setup(&[
            failing_read(RegAddr::Seconds, 1),
            failing_read(RegAddr::Minutes, 1),
            failing_read(RegAddr::Hours, 1),
            failing_read(RegAddr::Day, 1),
            failing_read(RegAddr::Date, 1),
            failing_read(RegAddr::Month, 1),
            failing_read(RegAddr::Year, 1),
            failing_read(RegAddr::Seconds, 7),
            failing_read(RegAddr::Alarm2Minutes, 2),
            failing_read(RegAddr::Control, 1),
            failing_read(RegAddr::Minutes, 2),
            failing_read(RegAddr::MSBTemp, 2),
        ]);
        assert_eq!(dev.second(), bus_error());
        assert_eq!(dev.minute(), bus_error());
        assert_eq!(dev.hour(), bus_error());
        assert_eq!(dev.day_of_week(), bus_error());
        assert_eq!(dev.day_of_month(), bus_error());
        assert_eq!(dev.century_bit(), bus_error());
        assert_eq!(dev.year(), bus_error());
        assert_eq!(dev.raw_datetime(), bus_error());
        assert_eq!(dev.alarm_time(), bus_error());
        assert_eq!(dev.is_alarm_enabled(), bus_error());
        assert_eq!(dev.is_alarm_time(), bus_error());
        assert_eq!(dev.temperature_raw(), bus_error());
        finish(dev);
    }

    #[test]
    fn test_read_modify_write_stops_on_read_error() {
        // No write may follow a failed read
        let mut dev = setup(&[
            failing_read(RegAddr::Hours, 1),
            failing_read(RegAddr::Hours, 1),
            failing_read(RegAddr::Month, 1),
            failing_read(RegAddr::Month, 1),
            failing_read(RegAddr::Hours, 1),
            failing_read(RegAddr::Control, 1),
            failing_read(RegAddr::ControlStatus, 1),
            failing_read(RegAddr::Month, 1),
        ]);
        assert_eq!(dev.set_hour(10), bus_error());
        assert_eq!(
            dev.set_time_representation(TimeRepresentation::TwelveHour),
            bus_error()
        );
        assert_eq!(dev.set_month(3), bus_error());
        assert_eq!(dev.set_century_bit(false), bus_error());
        assert_eq!(dev.set_alarm_time(7, 0), bus_error());
        assert_eq!(dev.toggle_alarm(true), bus_error());
        assert_eq!(dev.signal_alarm_time_passed(), bus_error());
        let time = DateTimeRegisters::from([0; 7]).decode();
        assert_eq!(dev.set_datetime(&time), bus_error());
        finish(dev);
    }

    #[test]
    fn test_write_errors_propagate() {
        let mut dev = setup(&[
            write(RegAddr::Seconds, &[0x10]).with_error(ErrorKind::Other),
            write(RegAddr::Year, &[0x26]).with_error(ErrorKind::Other),
            write(RegAddr::Alarm2DayDate, &[0x80]).with_error(ErrorKind::Other),
        ]);
        assert_eq!(dev.set_second(10), bus_error());
        assert_eq!(dev.set_year(26), bus_error());
        assert_eq!(dev.init(), bus_error());
        finish(dev);
    }

    #[test]
    fn test_single_register_write_errors_propagate() {
        let mut dev = setup(&[
            write(RegAddr::Minutes, &[0x30]).with_error(ErrorKind::Other),
            write(RegAddr::Day, &[0x03]).with_error(ErrorKind::Other),
            write(RegAddr::Date, &[0x15]).with_error(ErrorKind::Other),
        ]);
        assert_eq!(dev.set_minute(30), bus_error());
        assert_eq!(dev.set_day_of_week(3), bus_error());
        assert_eq!(dev.set_day_of_month(15), bus_error());
        finish(dev);
    }

    #[test]
    fn test_burst_write_errors_propagate() {
        let mut dev = setup(&[
            read(RegAddr::Month, &[0x03]),
            write(
                RegAddr::Seconds,
                &[0x00, 0x30, 0x15, 0x05, 0x14, 0x03, 0x24],
            )
            .with_error(ErrorKind::Other),
            read(RegAddr::Hours, &[0x10]),
            write(RegAddr::Alarm2Minutes, &[0x30, 0x13]).with_error(ErrorKind::Other),
        ]);
        let time = DateTimeRegisters::from([0x00, 0x30, 0x15, 0x05, 0x14, 0x03, 0x24]).decode();
        assert_eq!(dev.set_datetime(&time), bus_error());
        assert_eq!(dev.set_alarm_time(13, 30), bus_error());
        finish(dev);
    }

    #[test]
    fn test_read_modify_write_errors_in_write_phase() {
        let mut dev = setup(&[
            read(RegAddr::Month, &[0x85]),
            write(RegAddr::Month, &[0x86]).with_error(ErrorKind::Other),
            read(RegAddr::Month, &[0x85]),
            write(RegAddr::Month, &[0x05]).with_error(ErrorKind::Other),
            read(RegAddr::Control, &[0x1C]),
            write(RegAddr::Control, &[0x1E]).with_error(ErrorKind::Other),
            read(RegAddr::ControlStatus, &[0x8B]),
            write(RegAddr::ControlStatus, &[0x89]).with_error(ErrorKind::Other),
        ]);
        assert_eq!(dev.set_month(6), bus_error());
        assert_eq!(dev.set_century_bit(false), bus_error());
        assert_eq!(dev.toggle_alarm(true), bus_error());
        assert_eq!(dev.signal_alarm_time_passed(), bus_error());
        finish(dev);
    }

    #[test]
    fn test_month_read_error_propagates() {
        let mut dev = setup(&[failing_read(RegAddr::Month, 1)]);
        assert_eq!(dev.month(), bus_error());
        finish(dev);
    }

    #[test]
    fn test_comm_error_display() {
        let err: CommError<ErrorKind> = CommError::InvalidTransfer;
        assert_eq!(err.to_string(), "invalid register transfer");
    }
}
