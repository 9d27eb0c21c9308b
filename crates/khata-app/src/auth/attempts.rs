//! Remaining PIN attempts

/// Attempts granted when the lock screen opens
pub const DEFAULT_ATTEMPTS: u8 = 3;

/// Remaining verification tries before lockout
///
/// Lives only as long as the lock screen; reopening the screen starts over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttemptCounter {
    remaining: u8,
}

impl AttemptCounter {
    pub fn new(remaining: u8) -> Self {
        Self { remaining }
    }

    pub fn remaining(self) -> u8 {
        self.remaining
    }

    pub fn is_exhausted(self) -> bool {
        self.remaining == 0
    }

    /// Spend one attempt and return what is left; never goes below zero
    pub fn consume(&mut self) -> u8 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    /// "1 attempt" / "N attempts"
    pub fn describe(self) -> String {
        format!(
            "{} attempt{}",
            self.remaining,
            if self.remaining == 1 { "" } else { "s" }
        )
    }
}

impl Default for AttemptCounter {
    fn default() -> Self {
        Self::new(DEFAULT_ATTEMPTS)
    }
}
