//! Alarm 2 in its single supported mode: hours and minutes match, any day.
//!
//! The chip's alarm 2 has no seconds register, so matching is minute
//! granular. The day/date register is written once with its mask bit set
//! (see [`ANY_DAY`]) and never touched again; the minutes and hours
//! registers always have their mask bits cleared.
//!
//! The alarm hours register carries its own 12/24-hour bit. It is encoded
//! in the clock's format at the time the alarm is set, and later format
//! changes on the clock do not rewrite it. Matching therefore normalizes
//! both sides to 12-hour form before comparing.

use crate::bcd::{bcd_to_binary, binary_to_bcd};
use crate::fields::ClockHour;
use crate::{AlarmDayDate, AlarmHours, AlarmMinutes, TimeRepresentation};

/// Day/date register value selecting "match every day" (A2M4 = 1).
pub const ANY_DAY: AlarmDayDate = AlarmDayDate::ANY_DAY;

/// Alarm time and enablement as seen by the application.
///
/// Setting the time does not change enablement and toggling enablement
/// does not change the time; the two live in different registers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmTime {
    /// Alarm hour in the format stored in the alarm register
    pub hour: ClockHour,
    /// Alarm minutes (0-59)
    pub minutes: u8,
    /// Whether the alarm interrupt is enabled
    pub enabled: bool,
}

/// Raw image of the alarm 2 minutes and hours registers (0x0B-0x0C).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmRegisters {
    minutes: AlarmMinutes,
    hours: AlarmHours,
}

impl AlarmRegisters {
    /// Encodes an alarm for a canonical hour in the clock's current format.
    ///
    /// Hours are clamped to 0-23 and minutes to 0-59. Both mask bits are
    /// cleared so the chip compares hours and minutes.
    #[must_use]
    pub fn encode(hours24: u8, minutes: u8, clock_format: TimeRepresentation) -> Self {
        let mut minutes_reg = AlarmMinutes::default();
        minutes_reg.set_bcd(binary_to_bcd(minutes.min(59)));
        minutes_reg.set_alarm_mask2(false);
        let hours = AlarmHours::from(ClockHour::from_twenty_four_hour(hours24, clock_format));
        AlarmRegisters {
            minutes: minutes_reg,
            hours,
        }
    }

    /// The stored hour, with the alarm register's own format bit.
    #[must_use]
    pub fn hour(&self) -> ClockHour {
        ClockHour::from(self.hours)
    }

    /// The stored minutes, ignoring the mask bit.
    #[must_use]
    pub fn minutes(&self) -> u8 {
        bcd_to_binary(self.minutes.bcd())
    }
}

impl From<[u8; 2]> for AlarmRegisters {
    fn from(data: [u8; 2]) -> Self {
        AlarmRegisters {
            minutes: AlarmMinutes::from(data[0]),
            hours: AlarmHours::from(data[1]),
        }
    }
}

impl From<&AlarmRegisters> for [u8; 2] {
    fn from(regs: &AlarmRegisters) -> [u8; 2] {
        [regs.minutes.into(), regs.hours.into()]
    }
}

/// Returns true when the clock's hour and minute equal the alarm's.
///
/// Whichever side is in 24-hour mode is first converted to 12-hour form;
/// hour, minute and AM/PM must then all agree.
#[must_use]
pub fn matches(
    clock_hour: ClockHour,
    clock_minutes: u8,
    alarm_hour: ClockHour,
    alarm_minutes: u8,
) -> bool {
    clock_hour.to_twelve_hour() == alarm_hour.to_twelve_hour() && clock_minutes == alarm_minutes
}
