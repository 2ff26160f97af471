//! Software century tracking.
//!
//! The DS3231 keeps a two-digit year and signals a 99 -> 00 rollover by
//! setting the century bit in the month register. [`CenturyCounter`] turns
//! that single bit into a running century number.
//!
//! The counter lives in process memory only. It starts from a configured
//! baseline on every boot and is not written back anywhere, so a restart
//! forgets any rollover that happened since the baseline was chosen. The
//! increment and the clearing of the hardware bit are separate steps; a
//! power loss between them loses or repeats one rollover.

/// Century number, 21 meaning the years 2000-2099.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CenturyCounter {
    century: u16,
}

impl CenturyCounter {
    /// Creates a counter seeded with `baseline`.
    #[must_use]
    pub const fn new(baseline: u16) -> Self {
        Self { century: baseline }
    }

    /// The current century number.
    #[must_use]
    pub const fn century(&self) -> u16 {
        self.century
    }

    /// Advances to the next century.
    pub fn bump(&mut self) {
        self.century = self.century.saturating_add(1);
        debug!("century bumped to {}", self.century);
    }

    /// Feeds the hardware overflow bit into the counter.
    ///
    /// Returns `true` when the bit was set; the caller must then clear it on
    /// the chip so the next rollover can be observed.
    pub fn observe(&mut self, overflow: bool) -> bool {
        if overflow {
            self.bump();
        }
        overflow
    }

    /// Bumps the counter when an edit moved the year into another century.
    ///
    /// Returns whether it bumped.
    pub fn track_edit(&mut self, year_before: u16, year_after: u16) -> bool {
        if year_before / 100 != year_after / 100 {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Extends the chip's two-digit year to a full year.
    #[must_use]
    pub const fn year(&self, hardware_year: u8) -> u16 {
        self.century
            .saturating_sub(1)
            .saturating_mul(100)
            .saturating_add(hardware_year as u16)
    }
}

impl Default for CenturyCounter {
    fn default() -> Self {
        Self::new(crate::DEFAULT_CENTURY)
    }
}
