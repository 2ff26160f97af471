//! Application-facing clock.
//!
//! [`Clock`] pairs a [`DS3231`] driver with a [`CenturyCounter`] and offers
//! the handful of operations an alarm-clock front end needs: read and set
//! the time, read and set the alarm, and poll whether the alarm should
//! sound.

use embedded_hal::i2c::I2c;

use crate::alarm::AlarmTime;
use crate::century::CenturyCounter;
use crate::datetime::WallClockTime;
use crate::{CommError, Config, DS3231};

/// DS3231 clock with software century tracking.
pub struct Clock<I2C: I2c> {
    rtc: DS3231<I2C>,
    century: CenturyCounter,
}

impl<I2C: I2c> Clock<I2C> {
    /// Creates a clock on `i2c` using the address and century baseline in
    /// `config`. No bus traffic happens until [`Clock::init`].
    pub fn new(i2c: I2C, config: &Config) -> Self {
        Self {
            rtc: DS3231::new(i2c, config.address),
            century: CenturyCounter::new(config.century_baseline),
        }
    }

    /// Puts alarm 2 into "hours and minutes, any day" mode.
    pub fn init(&mut self) -> Result<(), CommError<I2C::Error>> {
        self.rtc.init()
    }

    /// Reads the current time with a full four-digit year.
    ///
    /// All seven time registers are read in one transfer. If the century bit
    /// is set, the counter is advanced and the bit is cleared on the chip
    /// before the year is composed.
    pub fn time(&mut self) -> Result<WallClockTime, CommError<I2C::Error>> {
        let raw = self.rtc.raw_datetime()?;
        if self.century.observe(raw.century()) {
            self.rtc.set_century_bit(false)?;
        }
        let mut time = raw.decode();
        // decode() yields the two-digit year
        time.year = self.century.year(time.year as u8);
        Ok(time)
    }

    /// Writes the time in one transfer.
    ///
    /// The hour is stored in `time.time_representation`. Only the last two
    /// digits of the year reach the chip; moving to another century is done
    /// with [`Clock::track_year_edit`] or [`Clock::bump_century`].
    pub fn set_time(&mut self, time: &WallClockTime) -> Result<(), CommError<I2C::Error>> {
        self.rtc.set_datetime(time)
    }

    /// The current full year.
    pub fn year(&mut self) -> Result<u16, CommError<I2C::Error>> {
        Ok(self.time()?.year)
    }

    /// Reads the alarm time and whether it is enabled.
    pub fn alarm(&mut self) -> Result<AlarmTime, CommError<I2C::Error>> {
        let (hour, minutes) = self.rtc.alarm_time()?;
        let enabled = self.rtc.is_alarm_enabled()?;
        Ok(AlarmTime {
            hour,
            minutes,
            enabled,
        })
    }

    /// Writes the alarm time in the clock's current format, then its
    /// enablement.
    pub fn set_alarm(&mut self, alarm: &AlarmTime) -> Result<(), CommError<I2C::Error>> {
        self.rtc
            .set_alarm_time(alarm.hour.to_twenty_four_hour(), alarm.minutes)?;
        self.rtc.toggle_alarm(alarm.enabled)
    }

    /// Sets the alarm time from a canonical hour and minutes, leaving the
    /// enablement alone.
    pub fn set_alarm_time(&mut self, hours24: u8, minutes: u8) -> Result<(), CommError<I2C::Error>> {
        self.rtc.set_alarm_time(hours24, minutes)
    }

    /// Enables or disables the alarm, leaving its time alone.
    pub fn toggle_alarm(&mut self, enable: bool) -> Result<(), CommError<I2C::Error>> {
        self.rtc.toggle_alarm(enable)
    }

    /// Flips alarm enablement. Returns the new state.
    pub fn toggle_alarm_enabled(&mut self) -> Result<bool, CommError<I2C::Error>> {
        let enable = !self.rtc.is_alarm_enabled()?;
        self.rtc.toggle_alarm(enable)?;
        Ok(enable)
    }

    /// Flips the clock between 12 and 24-hour format.
    ///
    /// Only the format bit changes; the stored hour digits are kept as they
    /// are. The alarm register keeps the format it was set in.
    pub fn toggle_time_representation(&mut self) -> Result<(), CommError<I2C::Error>> {
        let representation = self.rtc.time_representation()?;
        self.rtc.set_time_representation(representation.toggled())
    }

    /// Reports whether the alarm should be sounding right now.
    ///
    /// While the clock's hour and minute equal the alarm's, this returns the
    /// alarm enablement, so disabling the alarm silences it mid-minute. Once
    /// they differ, the triggered flag is acknowledged and `false` is
    /// returned. Call it at least once a minute or a match can be missed.
    pub fn poll_alarm(&mut self) -> Result<bool, CommError<I2C::Error>> {
        if self.rtc.is_alarm_time()? {
            self.rtc.is_alarm_enabled()
        } else {
            self.rtc.signal_alarm_time_passed()?;
            Ok(false)
        }
    }

    /// Raw temperature word, `MSB << 8 | LSB`.
    pub fn temperature_raw(&mut self) -> Result<u16, CommError<I2C::Error>> {
        self.rtc.temperature_raw()
    }

    /// Temperature in degrees Celsius.
    #[cfg(feature = "temperature_f32")]
    pub fn temperature_celsius(&mut self) -> Result<f32, CommError<I2C::Error>> {
        self.rtc.temperature_celsius()
    }

    /// Advances the century counter by one.
    pub fn bump_century(&mut self) {
        self.century.bump();
    }

    /// Advances the century counter when a manual edit moved the full year
    /// from `year_before` into another century. Returns whether it did.
    pub fn track_year_edit(&mut self, year_before: u16, year_after: u16) -> bool {
        self.century.track_edit(year_before, year_after)
    }

    /// The current century number, 21 for 2000-2099.
    pub fn century(&self) -> u16 {
        self.century.century()
    }

    /// Access to the underlying driver for single-field operations.
    pub fn rtc(&mut self) -> &mut DS3231<I2C> {
        &mut self.rtc
    }

    /// Gives the bus back.
    pub fn release(self) -> I2C {
        self.rtc.release()
    }
}
