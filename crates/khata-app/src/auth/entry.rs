//! Four-box PIN input with auto-advancing focus

use khata_core::{PinCode, PinDigits, PIN_LENGTH};

/// Result of feeding one keystroke to a [`PinEntry`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keystroke {
    /// Not empty and not a single digit; nothing changed
    Rejected,
    /// The slot was emptied; focus stays
    Cleared,
    /// A digit was stored and focus moved to the next slot
    Advanced,
    /// A digit was stored in the last slot
    Filled,
}

/// PIN input state: four slots plus the focused position
#[derive(Clone, Debug, Default)]
pub struct PinEntry {
    digits: PinDigits,
    focus: usize,
}

impl PinEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the new value of the box at `index`
    pub fn keystroke(&mut self, index: usize, value: &str) -> Keystroke {
        if !self.digits.set(index, value) {
            return Keystroke::Rejected;
        }

        if value.is_empty() {
            Keystroke::Cleared
        } else if index + 1 < PIN_LENGTH {
            self.focus = index + 1;
            Keystroke::Advanced
        } else {
            Keystroke::Filled
        }
    }

    /// Feed a digit into the focused box
    pub fn type_digit(&mut self, digit: char) -> Keystroke {
        let mut buf = [0u8; 4];
        self.keystroke(self.focus, digit.encode_utf8(&mut buf))
    }

    /// Empty all boxes and focus the first
    pub fn reset(&mut self) {
        self.digits.clear();
        self.focus = 0;
    }

    /// Keep the digits, focus the first box
    pub fn reset_focus(&mut self) {
        self.focus = 0;
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn digits(&self) -> &PinDigits {
        &self.digits
    }

    pub fn is_complete(&self) -> bool {
        self.digits.is_complete()
    }

    pub fn code(&self) -> Option<PinCode> {
        self.digits.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_advances_until_last_slot() {
        let mut entry = PinEntry::new();
        assert_eq!(entry.keystroke(0, "4"), Keystroke::Advanced);
        assert_eq!(entry.focus(), 1);
        assert_eq!(entry.keystroke(1, "8"), Keystroke::Advanced);
        assert_eq!(entry.keystroke(2, "2"), Keystroke::Advanced);
        assert_eq!(entry.focus(), 3);
        assert_eq!(entry.keystroke(3, "1"), Keystroke::Filled);
        assert_eq!(entry.focus(), 3);
        assert_eq!(entry.code().unwrap().as_str(), "4821");
    }

    #[test]
    fn test_rejected_input_keeps_slot() {
        let mut entry = PinEntry::new();
        entry.keystroke(0, "5");
        assert_eq!(entry.keystroke(0, "x"), Keystroke::Rejected);
        assert_eq!(entry.keystroke(0, "55"), Keystroke::Rejected);
        assert_eq!(entry.keystroke(0, " "), Keystroke::Rejected);
        assert_eq!(entry.digits().get(0), Some(5));
        assert_eq!(entry.focus(), 1);
    }

    #[test]
    fn test_clearing_does_not_move_focus() {
        let mut entry = PinEntry::new();
        entry.keystroke(0, "1");
        entry.keystroke(1, "2");
        assert_eq!(entry.keystroke(1, ""), Keystroke::Cleared);
        assert_eq!(entry.focus(), 2);
        assert_eq!(entry.digits().filled(), 1);
    }

    #[test]
    fn test_type_digit_uses_focus() {
        let mut entry = PinEntry::new();
        for c in "93".chars() {
            entry.type_digit(c);
        }
        assert_eq!(entry.digits().get(0), Some(9));
        assert_eq!(entry.digits().get(1), Some(3));

        entry.reset();
        assert_eq!(entry.focus(), 0);
        assert_eq!(entry.digits().filled(), 0);
    }
}
