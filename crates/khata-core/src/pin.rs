//! PIN records and the 4-slot entry buffer
//!
//! A [`PinCode`] is always complete. Partial input lives in [`PinDigits`] and
//! is never written to a store.

use std::fmt;
use std::str::FromStr;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{PinFormatError, Result, StoreError};
use crate::keys;
use crate::store::KeyValueStore;

/// Number of digits in a PIN
pub const PIN_LENGTH: usize = 4;

/// A complete 4-digit PIN
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PinCode(String);

impl PinCode {
    /// Parse a complete PIN
    pub fn parse(value: &str) -> std::result::Result<Self, PinFormatError> {
        if !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(PinFormatError::NonDigit);
        }
        if value.len() != PIN_LENGTH {
            return Err(PinFormatError::Length(PIN_LENGTH));
        }
        Ok(Self(value.to_string()))
    }

    /// The digits as stored
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PinCode {
    type Err = PinFormatError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for PinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PinCode(****)")
    }
}

/// Four digit slots, each empty or holding one decimal digit
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PinDigits {
    slots: [Option<u8>; PIN_LENGTH],
}

impl PinDigits {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a keystroke value to a slot.
    ///
    /// Accepts the empty string (clears the slot) or a single ASCII digit.
    /// Anything else leaves the slot untouched and returns `false`.
    pub fn set(&mut self, index: usize, value: &str) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };

        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (None, _) => {
                *slot = None;
                true
            }
            (Some(c), None) if c.is_ascii_digit() => {
                *slot = Some(c as u8 - b'0');
                true
            }
            _ => false,
        }
    }

    /// Digit at a position, if filled
    pub fn get(&self, index: usize) -> Option<u8> {
        self.slots.get(index).copied().flatten()
    }

    /// Number of filled slots
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Whether every slot holds a digit
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// The complete PIN, or `None` while any slot is empty
    pub fn code(&self) -> Option<PinCode> {
        let mut value = String::with_capacity(PIN_LENGTH);
        for slot in &self.slots {
            value.push(char::from(b'0' + (*slot)?));
        }
        Some(PinCode(value))
    }

    /// Empty every slot
    pub fn clear(&mut self) {
        self.slots.zeroize();
        self.slots = [None; PIN_LENGTH];
    }
}

impl fmt::Debug for PinDigits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinDigits")
            .field("filled", &self.filled())
            .finish()
    }
}

/// The persisted PIN
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredCredential(PinCode);

impl StoredCredential {
    pub fn new(pin: PinCode) -> Self {
        Self(pin)
    }

    /// Compare against entered digits
    pub fn matches(&self, pin: &PinCode) -> bool {
        self.0 == *pin
    }

    pub fn pin(&self) -> &PinCode {
        &self.0
    }

    /// Read the credential; a stored value that is not a valid PIN is corrupt
    pub async fn load(store: &dyn KeyValueStore) -> Result<Option<Self>> {
        match store.get(keys::USER_PIN).await? {
            Some(raw) => PinCode::parse(&raw)
                .map(|pin| Some(Self(pin)))
                .map_err(|e| StoreError::Corrupt {
                    key: keys::USER_PIN.to_string(),
                    reason: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    pub async fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        store.set(keys::USER_PIN, self.0.as_str()).await
    }
}

/// Whether PIN gating is enabled for this install
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PinSetFlag(bool);

impl PinSetFlag {
    pub fn is_set(self) -> bool {
        self.0
    }

    /// Only the exact sentinel counts as set
    pub fn from_raw(raw: Option<&str>) -> Self {
        Self(raw == Some(keys::PIN_SET_SENTINEL))
    }

    pub async fn load(store: &dyn KeyValueStore) -> Result<Self> {
        let raw = store.get(keys::IS_PIN_SET).await?;
        Ok(Self::from_raw(raw.as_deref()))
    }

    pub async fn mark(store: &dyn KeyValueStore) -> Result<()> {
        store.set(keys::IS_PIN_SET, keys::PIN_SET_SENTINEL).await
    }
}
