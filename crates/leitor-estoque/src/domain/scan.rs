//! Scan Debouncer
//!
//! A camera decode loop fires the same barcode many times per second
//! while it stays in frame. The debouncer turns that raw stream into
//! discrete "new scan" events: the same code is rate-limited to one
//! acceptance per window, a different code is accepted immediately.
//!
//! Time is abstract (caller-supplied milliseconds) so the rules are
//! testable without a clock.

/// Sliding de-duplication window for repeated reads of the same code.
pub const SCAN_DEBOUNCE_MS: u64 = 400;

#[derive(Debug, Default)]
pub struct ScanDebouncer {
    last_scan_ms: u64,
    last_code: Option<String>,
}

impl ScanDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a fresh scanning session.
    pub fn rearm(&mut self) {
        self.last_scan_ms = 0;
        self.last_code = None;
    }

    /// Decide whether a decode event at `now_ms` counts as a new scan.
    /// Accepts when the window has elapsed OR the code changed; on
    /// accept the window restarts at `now_ms`.
    pub fn accept(&mut self, code: &str, now_ms: u64) -> bool {
        let window_elapsed = now_ms.saturating_sub(self.last_scan_ms) > SCAN_DEBOUNCE_MS;
        let code_changed = self.last_code.as_deref() != Some(code);
        if window_elapsed || code_changed {
            self.last_scan_ms = now_ms;
            self.last_code = Some(code.to_string());
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
    fn test_same_code_rate_limited_within_window() {
        let mut deb = ScanDebouncer::new();
        assert!(deb.accept("A", 0));
        assert!(!deb.accept("A", 100));
        assert!(deb.accept("A", 500));
    }

    #[test]
    fn test_code_switch_accepted_immediately() {
        let mut deb = ScanDebouncer::new();
        assert!(deb.accept("A", 0));
        assert!(deb.accept("B", 50));
    }

    #[test]
    fn test_accept_restarts_window() {
        let mut deb = ScanDebouncer::new();
        assert!(deb.accept("A", 0));
        assert!(deb.accept("B", 50));
        // 350ms after B was accepted, still inside B's window
        assert!(!deb.accept("B", 400));
        assert!(deb.accept("B", 451));
    }

    #[test]
    fn test_rearm_clears_history() {
        let mut deb = ScanDebouncer::new();
        assert!(deb.accept("A", 0));
        deb.rearm();
        assert!(deb.accept("A", 10));
    }
}
