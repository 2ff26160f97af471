//! Hour encoding shared by the clock and alarm hours registers.
//!
//! Both registers use the same layout: bit 6 selects 12/24-hour mode, and
//! the meaning of bit 5 depends on it. The format bit must be inspected
//! before anything else in the byte can be interpreted, and it is always
//! written together with the hour value so the two can never disagree.

use crate::bcd::{bcd_to_binary, binary_to_bcd};
use crate::{AlarmHours, Hours, TimeRepresentation};

/// Largest canonical (24-hour) hour.
pub const MAX_HOUR: u8 = 23;

/// Converts a 24-hour value to its 12-hour form, returning `(hour, is_pm)`.
///
/// Inputs above 23 are clamped to 23.
#[must_use]
pub const fn to_twelve_hour(hours24: u8) -> (u8, bool) {
    let hours24 = if hours24 > MAX_HOUR { MAX_HOUR } else { hours24 };
    match hours24 {
        0 => (12, false),
        1..=11 => (hours24, false),
        12 => (12, true),
        _ => (hours24 - 12, true),
    }
}

/// Converts a 12-hour value plus AM/PM flag to the canonical 24-hour form.
#[must_use]
pub const fn to_twenty_four_hour(hours12: u8, is_pm: bool) -> u8 {
    let hours = match (hours12, is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h.saturating_add(12),
    };
    if hours > MAX_HOUR {
        MAX_HOUR
    } else {
        hours
    }
}

/// The decoded content of an hours register.
///
/// Carries the register's own format bit, so an alarm stored in 12-hour mode
/// stays in 12-hour mode even after the clock is switched to 24-hour mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockHour {
    /// 24-hour mode, 0-23
    TwentyFourHour(u8),
    /// 12-hour mode, 1-12 plus AM/PM
    TwelveHour {
        /// Hour (1-12)
        hours: u8,
        /// PM flag
        is_pm: bool,
    },
}

impl ClockHour {
    /// Builds the representation of a canonical hour in the given format.
    ///
    /// The hour is clamped to 0-23.
    #[must_use]
    pub const fn from_twenty_four_hour(hours24: u8, representation: TimeRepresentation) -> Self {
        let hours24 = if hours24 > MAX_HOUR { MAX_HOUR } else { hours24 };
        match representation {
            TimeRepresentation::TwentyFourHour => ClockHour::TwentyFourHour(hours24),
            TimeRepresentation::TwelveHour => {
                let (hours, is_pm) = to_twelve_hour(hours24);
                ClockHour::TwelveHour { hours, is_pm }
            }
        }
    }

    /// The hour format this value is stored in.
    #[must_use]
    pub const fn time_representation(self) -> TimeRepresentation {
        match self {
            ClockHour::TwentyFourHour(_) => TimeRepresentation::TwentyFourHour,
            ClockHour::TwelveHour { .. } => TimeRepresentation::TwelveHour,
        }
    }

    /// The PM flag as stored. Always `false` in 24-hour mode.
    #[must_use]
    pub const fn is_pm(self) -> bool {
        match self {
            ClockHour::TwentyFourHour(_) => false,
            ClockHour::TwelveHour { is_pm, .. } => is_pm,
        }
    }

    /// The canonical 0-23 hour.
    #[must_use]
    pub const fn to_twenty_four_hour(self) -> u8 {
        match self {
            ClockHour::TwentyFourHour(hours) => {
                if hours > MAX_HOUR {
                    MAX_HOUR
                } else {
                    hours
                }
            }
            ClockHour::TwelveHour { hours, is_pm } => to_twenty_four_hour(hours, is_pm),
        }
    }

    /// The hour in 12-hour form, normalizing from 24-hour mode if needed.
    #[must_use]
    pub const fn to_twelve_hour(self) -> (u8, bool) {
        match self {
            ClockHour::TwentyFourHour(hours) => to_twelve_hour(hours),
            ClockHour::TwelveHour { hours, is_pm } => (hours, is_pm),
        }
    }

    /// The same hour re-expressed in another format.
    #[must_use]
    pub const fn with_representation(self, representation: TimeRepresentation) -> Self {
        Self::from_twenty_four_hour(self.to_twenty_four_hour(), representation)
    }

    fn decode(representation: TimeRepresentation, pm: bool, bcd12: u8, bcd24: u8) -> Self {
        match representation {
            TimeRepresentation::TwelveHour => ClockHour::TwelveHour {
                hours: bcd_to_binary(bcd12),
                is_pm: pm,
            },
            TimeRepresentation::TwentyFourHour => ClockHour::TwentyFourHour(bcd_to_binary(bcd24)),
        }
    }
}

impl From<Hours> for ClockHour {
    fn from(reg: Hours) -> Self {
        Self::decode(
            reg.time_representation(),
            reg.pm(),
            reg.twelve_hour_bcd(),
            reg.twenty_four_hour_bcd(),
        )
    }
}

impl From<AlarmHours> for ClockHour {
    fn from(reg: AlarmHours) -> Self {
        Self::decode(
            reg.time_representation(),
            reg.pm(),
            reg.twelve_hour_bcd(),
            reg.twenty_four_hour_bcd(),
        )
    }
}

impl From<ClockHour> for Hours {
    /// Encodes format, AM/PM and BCD hour into one register value.
    fn from(hour: ClockHour) -> Self {
        let mut reg = Hours::default();
        reg.set_time_representation(hour.time_representation());
        match hour {
            ClockHour::TwentyFourHour(_) => {
                reg.set_twenty_four_hour_bcd(binary_to_bcd(hour.to_twenty_four_hour()));
            }
            ClockHour::TwelveHour { hours, is_pm } => {
                reg.set_twelve_hour_bcd(binary_to_bcd(hours.clamp(1, 12)));
                reg.set_pm(is_pm);
            }
        }
        reg
    }
}

impl From<ClockHour> for AlarmHours {
    /// Encodes the hour with the A2M3 mask bit cleared so hours are compared.
    fn from(hour: ClockHour) -> Self {
        let mut reg = AlarmHours::from(u8::from(Hours::from(hour)));
        reg.set_alarm_mask3(false);
        reg
    }
}
