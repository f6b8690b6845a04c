//! Auto-repeat for held buttons

/// Fires at a fixed cadence while a button stays pressed
///
/// The initial press is handled by the caller as a just-pressed edge;
/// [`RepeatTimer::arm`] marks that moment and repeats follow every
/// `interval_ms` after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatTimer {
    interval_ms: u32,
    last_ms: u32,
}

impl RepeatTimer {
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_ms: 0,
        }
    }

    /// Restart the cadence from `now_ms`
    pub fn arm(&mut self, now_ms: u32) {
        self.last_ms = now_ms;
    }

    /// Returns `true` when a repeat is due
    pub fn poll(&mut self, now_ms: u32, held: bool) -> bool {
        if held && now_ms.wrapping_sub(self.last_ms) >= self.interval_ms {
            self.last_ms = now_ms;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeats_at_interval() {
        let mut t = RepeatTimer::new(100);
        t.arm(1_000);
        let fired: usize = (1..=18)
            .map(|i| 1_000 + i * 20)
            .filter(|&now| t.poll(now, true))
            .count();
        // 1100, 1200, 1300 within 360 ms of the press
        assert_eq!(fired, 3);
    }

    #[test]
    fn test_no_repeat_when_released() {
        let mut t = RepeatTimer::new(100);
        t.arm(0);
        assert!(!t.poll(500, false));
        assert!(t.poll(500, true));
    }

    #[test]
    fn test_wraparound() {
        let mut t = RepeatTimer::new(100);
        t.arm(u32::MAX - 10);
        assert!(!t.poll(50, true));
        assert!(t.poll(89, true));
    }
}
