//! Register map and bitfield register types for the DS3231.
//!
//! Every register is modelled as a `bitfield!` newtype over `u8`. Where a
//! register packs a BCD value next to flag bits, the BCD part is exposed as
//! one field so it can be fed straight into [`crate::bcd`].

use bitfield::bitfield;

#[cfg(feature = "defmt")]
use crate::bcd::bcd_to_binary;

/// Number of addressable registers (0x00 through 0x12).
pub const REGISTER_COUNT: usize = 0x13;

/// Register addresses for the DS3231 RTC.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegAddr {
    /// Seconds register (0-59)
    Seconds = 0x00,
    /// Minutes register (0-59)
    Minutes = 0x01,
    /// Hours register (1-12 + AM/PM or 0-23)
    Hours = 0x02,
    /// Day register (1-7)
    Day = 0x03,
    /// Date register (1-31)
    Date = 0x04,
    /// Month register (1-12) and century flag
    Month = 0x05,
    /// Year register (0-99)
    Year = 0x06,
    /// Alarm 1 seconds register
    Alarm1Seconds = 0x07,
    /// Alarm 1 minutes register
    Alarm1Minutes = 0x08,
    /// Alarm 1 hours register
    Alarm1Hours = 0x09,
    /// Alarm 1 day/date register
    Alarm1DayDate = 0x0A,
    /// Alarm 2 minutes register
    Alarm2Minutes = 0x0B,
    /// Alarm 2 hours register
    Alarm2Hours = 0x0C,
    /// Alarm 2 day/date register
    Alarm2DayDate = 0x0D,
    /// Control register
    Control = 0x0E,
    /// Control/Status register
    ControlStatus = 0x0F,
    /// Aging offset register
    AgingOffset = 0x10,
    /// Temperature MSB register
    MSBTemp = 0x11,
    /// Temperature LSB register
    LSBTemp = 0x12,
}

impl RegAddr {
    /// Number of registers from this address to the end of the register file.
    #[must_use]
    pub const fn remaining(self) -> usize {
        REGISTER_COUNT - self as usize
    }
}

/// Hour format selected by bit 6 of an hours register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeRepresentation {
    /// 24-hour format (0-23)
    TwentyFourHour = 0,
    /// 12-hour format (1-12 + AM/PM)
    TwelveHour = 1,
}
impl From<u8> for TimeRepresentation {
    /// Creates a `TimeRepresentation` from a raw register value.
    ///
    /// # Panics
    /// Panics if the value is not 0 or 1.
    fn from(v: u8) -> Self {
        match v {
            0 => TimeRepresentation::TwentyFourHour,
            1 => TimeRepresentation::TwelveHour,
            _ => panic!("Invalid value for TimeRepresentation: {}", v),
        }
    }
}
impl From<TimeRepresentation> for u8 {
    /// Converts a `TimeRepresentation` to its raw register value.
    fn from(v: TimeRepresentation) -> Self {
        v as u8
    }
}

impl TimeRepresentation {
    /// The other hour format.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            TimeRepresentation::TwentyFourHour => TimeRepresentation::TwelveHour,
            TimeRepresentation::TwelveHour => TimeRepresentation::TwentyFourHour,
        }
    }
}

// This macro generates the From<u8> and Into<u8> implementations for the
// register type
macro_rules! from_register_u8 {
    ($typ:ty) => {
        impl From<u8> for $typ {
            fn from(v: u8) -> Self {
                paste::paste!([< $typ >](v))
            }
        }
        impl From<$typ> for u8 {
            fn from(v: $typ) -> Self {
                v.0
            }
        }
    };
}

bitfield! {
    /// Seconds register (0-59), BCD.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct Seconds(u8);
    impl Debug;
    /// Both BCD digits
    pub bcd, set_bcd: 6, 0;
}
from_register_u8!(Seconds);

#[cfg(feature = "defmt")]
impl defmt::Format for Seconds {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Seconds({}s)", bcd_to_binary(self.bcd()));
    }
}

bitfield! {
    /// Minutes register (0-59), BCD.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct Minutes(u8);
    impl Debug;
    /// Both BCD digits
    pub bcd, set_bcd: 6, 0;
}
from_register_u8!(Minutes);

#[cfg(feature = "defmt")]
impl defmt::Format for Minutes {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Minutes({}m)", bcd_to_binary(self.bcd()));
    }
}

bitfield! {
    /// Hours register with format selection and BCD encoding.
    ///
    /// In 12-hour mode bit 5 is the PM flag and bits 4-0 hold the hour. In
    /// 24-hour mode bits 5-0 hold the hour.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct Hours(u8);
    impl Debug;
    /// Time representation format (12/24 hour)
    pub from into TimeRepresentation, time_representation, set_time_representation: 6, 6;
    /// PM flag (12-hour) or 20-hour bit (24-hour)
    pub pm, set_pm: 5;
    /// BCD hour in 12-hour mode
    pub twelve_hour_bcd, set_twelve_hour_bcd: 4, 0;
    /// BCD hour in 24-hour mode
    pub twenty_four_hour_bcd, set_twenty_four_hour_bcd: 5, 0;
}
from_register_u8!(Hours);

#[cfg(feature = "defmt")]
impl defmt::Format for Hours {
    fn format(&self, f: defmt::Formatter) {
        match self.time_representation() {
            TimeRepresentation::TwentyFourHour => {
                defmt::write!(f, "Hours({}h 24h)", bcd_to_binary(self.twenty_four_hour_bcd()));
            }
            TimeRepresentation::TwelveHour => {
                let hours = bcd_to_binary(self.twelve_hour_bcd());
                defmt::write!(f, "Hours({}h {})", hours, if self.pm() { "PM" } else { "AM" });
            }
        }
    }
}

bitfield! {
    /// Day of week register (1-7), not BCD encoded.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct Day(u8);
    impl Debug;
    /// Day of week (1-7)
    pub day, set_day: 2, 0;
}
from_register_u8!(Day);

#[cfg(feature = "defmt")]
impl defmt::Format for Day {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Day({})", self.day());
    }
}

bitfield! {
    /// Date register (1-31), BCD.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct Date(u8);
    impl Debug;
    /// Both BCD digits
    pub bcd, set_bcd: 5, 0;
}
from_register_u8!(Date);

#[cfg(feature = "defmt")]
impl defmt::Format for Date {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Date({})", bcd_to_binary(self.bcd()));
    }
}

bitfield! {
    /// Month register (1-12) with the century overflow flag.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct Month(u8);
    impl Debug;
    /// Set by the chip when the year rolls over from 99 to 00
    pub century, set_century: 7;
    /// Both BCD digits
    pub bcd, set_bcd: 4, 0;
}
from_register_u8!(Month);

#[cfg(feature = "defmt")]
impl defmt::Format for Month {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Month({}", bcd_to_binary(self.bcd()));
        if self.century() {
            defmt::write!(f, ", century");
        }
        defmt::write!(f, ")");
    }
}

bitfield! {
    /// Year register (0-99), BCD.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct Year(u8);
    impl Debug;
    /// Both BCD digits
    pub bcd, set_bcd: 7, 0;
}
from_register_u8!(Year);

#[cfg(feature = "defmt")]
impl defmt::Format for Year {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Year({})", bcd_to_binary(self.bcd()));
    }
}

bitfield! {
    /// Control register.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct Control(u8);
    impl Debug;
    /// Oscillator stopped while on battery (EOSC)
    pub oscillator_disabled, set_oscillator_disabled: 7;
    /// Enable square wave output on battery power
    pub battery_backed_square_wave, set_battery_backed_square_wave: 6;
    /// Force temperature conversion
    pub convert_temperature, set_convert_temperature: 5;
    /// Square wave output frequency selection
    pub square_wave_frequency, set_square_wave_frequency: 4, 3;
    /// INT/SQW pin outputs alarm interrupts instead of a square wave
    pub interrupt_control, set_interrupt_control: 2;
    /// Enable alarm 2 interrupt
    pub alarm2_interrupt_enable, set_alarm2_interrupt_enable: 1;
    /// Enable alarm 1 interrupt
    pub alarm1_interrupt_enable, set_alarm1_interrupt_enable: 0;
}
from_register_u8!(Control);

#[cfg(feature = "defmt")]
impl defmt::Format for Control {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Control({=u8:#x}", self.0);
        if self.alarm2_interrupt_enable() {
            defmt::write!(f, ", A2IE");
        }
        if self.alarm1_interrupt_enable() {
            defmt::write!(f, ", A1IE");
        }
        defmt::write!(f, ")");
    }
}

bitfield! {
    /// Status register for device state and flags.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct Status(u8);
    impl Debug;
    /// Oscillator stop flag
    pub oscillator_stop_flag, set_oscillator_stop_flag: 7;
    /// Enable 32kHz output
    pub enable_32khz_output, set_enable_32khz_output: 3;
    /// Device busy flag
    pub busy, set_busy: 2;
    /// Alarm 2 triggered flag
    pub alarm2_flag, set_alarm2_flag: 1;
    /// Alarm 1 triggered flag
    pub alarm1_flag, set_alarm1_flag: 0;
}
from_register_u8!(Status);

#[cfg(feature = "defmt")]
impl defmt::Format for Status {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Status(");
        let mut first = true;
        for (set, name) in [
            (self.oscillator_stop_flag(), "OSF"),
            (self.enable_32khz_output(), "EN32kHz"),
            (self.busy(), "BSY"),
            (self.alarm2_flag(), "A2F"),
            (self.alarm1_flag(), "A1F"),
        ] {
            if set {
                if !first {
                    defmt::write!(f, ", ");
                }
                defmt::write!(f, "{=str}", name);
                first = false;
            }
        }
        if first {
            defmt::write!(f, "clear");
        }
        defmt::write!(f, ")");
    }
}

bitfield! {
    /// Alarm 2 minutes register with mask bit.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct AlarmMinutes(u8);
    impl Debug;
    /// Alarm mask bit 2 (A2M2), must be 0 to compare minutes
    pub alarm_mask2, set_alarm_mask2: 7;
    /// Both BCD digits
    pub bcd, set_bcd: 6, 0;
}
from_register_u8!(AlarmMinutes);

#[cfg(feature = "defmt")]
impl defmt::Format for AlarmMinutes {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "AlarmMinutes({}m", bcd_to_binary(self.bcd()));
        if self.alarm_mask2() {
            defmt::write!(f, ", masked");
        }
        defmt::write!(f, ")");
    }
}

bitfield! {
    /// Alarm 2 hours register: the clock hours layout plus a mask bit.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct AlarmHours(u8);
    impl Debug;
    /// Alarm mask bit 3 (A2M3), must be 0 to compare hours
    pub alarm_mask3, set_alarm_mask3: 7;
    /// Time representation format (12/24 hour)
    pub from into TimeRepresentation, time_representation, set_time_representation: 6, 6;
    /// PM flag (12-hour) or 20-hour bit (24-hour)
    pub pm, set_pm: 5;
    /// BCD hour in 12-hour mode
    pub twelve_hour_bcd, set_twelve_hour_bcd: 4, 0;
    /// BCD hour in 24-hour mode
    pub twenty_four_hour_bcd, set_twenty_four_hour_bcd: 5, 0;
}
from_register_u8!(AlarmHours);

#[cfg(feature = "defmt")]
impl defmt::Format for AlarmHours {
    fn format(&self, f: defmt::Formatter) {
        match self.time_representation() {
            TimeRepresentation::TwentyFourHour => {
                let hours = bcd_to_binary(self.twenty_four_hour_bcd());
                defmt::write!(f, "AlarmHours({}h", hours);
            }
            TimeRepresentation::TwelveHour => {
                let hours = bcd_to_binary(self.twelve_hour_bcd());
                defmt::write!(
                    f,
                    "AlarmHours({}h {}",
                    hours,
                    if self.pm() { "PM" } else { "AM" }
                );
            }
        }
        if self.alarm_mask3() {
            defmt::write!(f, ", masked");
        }
        defmt::write!(f, ")");
    }
}

bitfield! {
    /// Alarm 2 day/date register.
    ///
    /// Only the mask bit is used: with A2M4 set the alarm ignores the day
    /// and date and fires every day.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct AlarmDayDate(u8);
    impl Debug;
    /// Alarm mask bit 4 (A2M4)
    pub alarm_mask4, set_alarm_mask4: 7;
    /// Day/Date select (1=day of week, 0=date of month)
    pub day_date_select, set_day_date_select: 6;
    /// Day of week or BCD date, depending on DY/DT
    pub day_or_date, set_day_or_date: 5, 0;
}
from_register_u8!(AlarmDayDate);

impl AlarmDayDate {
    /// A2M4 set, everything else clear: match every day.
    pub const ANY_DAY: Self = AlarmDayDate(0x80);
}

#[cfg(feature = "defmt")]
impl defmt::Format for AlarmDayDate {
    fn format(&self, f: defmt::Formatter) {
        if self.alarm_mask4() {
            defmt::write!(f, "AlarmDayDate(any day)");
        } else {
            defmt::write!(f, "AlarmDayDate({=u8:#x})", self.0);
        }
    }
}

bitfield! {
    /// Temperature register (integer part).
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct Temperature(u8);
    impl Debug;
    /// Temperature value (-128 to +127)
    pub i8, temperature, set_temperature: 7, 0;
}
from_register_u8!(Temperature);

#[cfg(feature = "defmt")]
impl defmt::Format for Temperature {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Temperature({}°C)", self.temperature());
    }
}

bitfield! {
    /// Temperature fraction register, quarter degrees in bits 7-6.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct TemperatureFraction(u8);
    impl Debug;
    /// Number of quarter degrees (0-3)
    pub quarters, set_quarters: 7, 6;
}
from_register_u8!(TemperatureFraction);

#[cfg(feature = "defmt")]
impl defmt::Format for TemperatureFraction {
    fn format(&self, f: defmt::Formatter) {
        match self.quarters() {
            0 => defmt::write!(f, "TemperatureFraction(0.00°C)"),
            1 => defmt::write!(f, "TemperatureFraction(0.25°C)"),
            2 => defmt::write!(f, "TemperatureFraction(0.50°C)"),
            _ => defmt::write!(f, "TemperatureFraction(0.75°C)"),
        }
    }
}
