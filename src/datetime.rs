//! Wall-clock time and the seven time-keeping registers.
//!
//! [`WallClockTime`] is the caller-facing model. [`DateTimeRegisters`] is the
//! raw image of registers 0x00-0x06, transferred in one auto-increment burst
//! so that a read never straddles a seconds rollover.
//!
//! Encoding saturates every field into its valid range instead of rejecting
//! it, matching the single-field writes of the driver.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::bcd::{bcd_to_binary, binary_to_bcd};
use crate::fields::ClockHour;
use crate::{Date, Day, Hours, Minutes, Month, Seconds, TimeRepresentation, Year};

/// Calendar date and time of day as kept by the clock.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallClockTime {
    /// Hour of day, canonical 0-23
    pub hours: u8,
    /// Minutes (0-59)
    pub minutes: u8,
    /// Seconds (0-59)
    pub seconds: u8,
    /// Day of week (1-7, 1 = Sunday)
    pub day_of_week: u8,
    /// Day of month (1-31)
    pub day_of_month: u8,
    /// Month (1-12)
    pub month: u8,
    /// Full year. Only the last two digits are stored on the chip.
    pub year: u16,
    /// Hour format the clock runs in
    pub time_representation: TimeRepresentation,
}

impl WallClockTime {
    /// The hour as it should be displayed in the clock's own format.
    #[must_use]
    pub const fn display_hour(&self) -> ClockHour {
        ClockHour::from_twenty_four_hour(self.hours, self.time_representation)
    }

    /// Builds a wall-clock time from a chrono timestamp.
    #[must_use]
    pub fn from_naive_datetime(
        datetime: &NaiveDateTime,
        time_representation: TimeRepresentation,
    ) -> Self {
        WallClockTime {
            hours: datetime.hour() as u8,
            minutes: datetime.minute() as u8,
            seconds: datetime.second() as u8,
            day_of_week: datetime.weekday().number_from_sunday() as u8,
            day_of_month: datetime.day() as u8,
            month: datetime.month() as u8,
            year: u16::try_from(datetime.year()).unwrap_or(0),
            time_representation,
        }
    }

    /// Converts to a chrono timestamp.
    ///
    /// Returns `None` when the fields do not form a real date, for example
    /// 31 February. The day of week is not checked.
    #[must_use]
    pub fn to_naive_datetime(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(
            i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day_of_month),
        )
        .and_then(|d| {
            d.and_hms_opt(
                u32::from(self.hours),
                u32::from(self.minutes),
                u32::from(self.seconds),
            )
        })
    }
}

/// Raw image of the seven time-keeping registers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateTimeRegisters {
    seconds: Seconds,
    minutes: Minutes,
    hours: Hours,
    day: Day,
    date: Date,
    month: Month,
    year: Year,
}

impl DateTimeRegisters {
    /// Encodes a wall-clock time, clamping each field and keeping the given
    /// century bit. Only the last two digits of the year are stored.
    #[must_use]
    pub fn encode(time: &WallClockTime, century: bool) -> Self {
        let mut seconds = Seconds::default();
        seconds.set_bcd(binary_to_bcd(time.seconds.min(59)));

        let mut minutes = Minutes::default();
        minutes.set_bcd(binary_to_bcd(time.minutes.min(59)));

        let hours = Hours::from(time.display_hour());

        let mut day = Day::default();
        day.set_day(time.day_of_week.clamp(1, 7));

        let mut date = Date::default();
        date.set_bcd(binary_to_bcd(time.day_of_month.clamp(1, 31)));

        let mut month = Month::default();
        month.set_bcd(binary_to_bcd(time.month.clamp(1, 12)));
        month.set_century(century);

        let mut year = Year::default();
        // (year % 100) always fits in a u8
        year.set_bcd(binary_to_bcd((time.year % 100) as u8));

        DateTimeRegisters {
            seconds,
            minutes,
            hours,
            day,
            date,
            month,
            year,
        }
    }

    /// Decodes the registers. The returned year is the chip's two-digit year
    /// (0-99); extending it to a full year is up to the caller.
    #[must_use]
    pub fn decode(&self) -> WallClockTime {
        let hour = ClockHour::from(self.hours);
        WallClockTime {
            hours: hour.to_twenty_four_hour(),
            minutes: bcd_to_binary(self.minutes.bcd()),
            seconds: bcd_to_binary(self.seconds.bcd()),
            day_of_week: self.day.day(),
            day_of_month: bcd_to_binary(self.date.bcd()),
            month: bcd_to_binary(self.month.bcd()),
            year: u16::from(bcd_to_binary(self.year.bcd())),
            time_representation: hour.time_representation(),
        }
    }

    /// The century overflow bit from the month register.
    #[must_use]
    pub fn century(&self) -> bool {
        self.month.century()
    }
}

impl From<[u8; 7]> for DateTimeRegisters {
    fn from(data: [u8; 7]) -> Self {
        DateTimeRegisters {
            seconds: Seconds::from(data[0]),
            minutes: Minutes::from(data[1]),
            hours: Hours::from(data[2]),
            day: Day::from(data[3]),
            date: Date::from(data[4]),
            month: Month::from(data[5]),
            year: Year::from(data[6]),
        }
    }
}

impl From<&DateTimeRegisters> for [u8; 7] {
    fn from(dt: &DateTimeRegisters) -> [u8; 7] {
        [
            dt.seconds.into(),
            dt.minutes.into(),
            dt.hours.into(),
            dt.day.into(),
            dt.date.into(),
            dt.month.into(),
            dt.year.into(),
        ]
    }
}
