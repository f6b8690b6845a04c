//! Water-change interval
//!
//! A single duration in whole hours, shown to the operator as days and
//! hours. Only the UI's edit mode mutates it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest value the two-digit day display can show (99 d 23 h)
pub const MAX_TOTAL_HOURS: u16 = 99 * 24 + 23;

/// Interval between water changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduleDuration {
    total_hours: u16,
    max_hours: u16,
}

impl ScheduleDuration {
    /// Create a duration bounded by `max_hours`
    ///
    /// `total_hours` is clamped into range.
    pub fn new(total_hours: u16, max_hours: u16) -> Self {
        Self {
            total_hours: total_hours.min(max_hours),
            max_hours,
        }
    }

    pub fn total_hours(&self) -> u16 {
        self.total_hours
    }

    pub fn max_hours(&self) -> u16 {
        self.max_hours
    }

    /// Whole days
    pub fn days(&self) -> u16 {
        self.total_hours / 24
    }

    /// Remaining hours (0-23)
    pub fn hours(&self) -> u16 {
        self.total_hours % 24
    }

    /// Add one hour, saturating at the upper bound
    ///
    /// Returns `true` if the value changed.
    pub fn increment(&mut self) -> bool {
        if self.total_hours >= self.max_hours {
            return false;
        }
        self.total_hours += 1;
        true
    }

    /// Remove one hour, saturating at zero
    ///
    /// Returns `true` if the value changed.
    pub fn decrement(&mut self) -> bool {
        if self.total_hours == 0 {
            return false;
        }
        self.total_hours -= 1;
        true
    }
}

impl Default for ScheduleDuration {
    fn default() -> Self {
        Self::new(1, MAX_TOTAL_HOURS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_days_hours_split() {
        let d = ScheduleDuration::new(49, MAX_TOTAL_HOURS);
        assert_eq!(d.days(), 2);
        assert_eq!(d.hours(), 1);
    }

    #[test]
    fn test_decrement_saturates_at_zero() {
        let mut d = ScheduleDuration::new(0, MAX_TOTAL_HOURS);
        assert!(!d.decrement());
        assert_eq!(d.total_hours(), 0);
    }

    #[test]
    fn test_increment_saturates_at_max() {
        let mut d = ScheduleDuration::new(MAX_TOTAL_HOURS, MAX_TOTAL_HOURS);
        assert!(!d.increment());
        assert_eq!(d.total_hours(), MAX_TOTAL_HOURS);
        assert_eq!(d.days(), 99);
        assert_eq!(d.hours(), 23);
    }

    #[test]
    fn test_new_clamps() {
        let d = ScheduleDuration::new(500, 100);
        assert_eq!(d.total_hours(), 100);
    }

    #[test]
    fn test_default_is_one_hour() {
        let d = ScheduleDuration::default();
        assert_eq!(d.total_hours(), 1);
        assert_eq!(d.days(), 0);
        assert_eq!(d.hours(), 1);
    }

    proptest! {
        #[test]
        fn prop_split_invariant_holds(start in 0u16..=MAX_TOTAL_HOURS, ops in proptest::collection::vec(any::<bool>(), 0..300)) {
            let mut d = ScheduleDuration::new(start, MAX_TOTAL_HOURS);
            for up in ops {
                let before = d.total_hours();
                if up {
                    d.increment();
                    prop_assert!(d.total_hours() == before + 1 || before == MAX_TOTAL_HOURS);
                } else {
                    d.decrement();
                    prop_assert!(d.total_hours() + 1 == before || before == 0);
                }
                prop_assert_eq!(d.days() * 24 + d.hours(), d.total_hours());
                prop_assert!(d.total_hours() <= MAX_TOTAL_HOURS);
            }
        }
    }
}
