//! Authentication flows: login and the PIN gate
//!
//! The PIN gate is two flows over the secure store:
//!
//! - [`PinSetupFlow`] records a 4-digit PIN after two matching entries
//! - [`PinLockFlow`] checks it on launch, revoking the session after the
//!   attempt budget runs out

mod attempts;
mod entry;
mod lock;
mod login;
mod setup;

pub use attempts::AttemptCounter;
pub use entry::{Keystroke, PinEntry};
pub use lock::{LockState, MountOutcome, PinLockFlow, VerifyStep};
pub use login::{Authenticator, LoginError, LoginField, LoginFlow};
pub use setup::{ConfirmStep, PendingSave, PinSetupFlow, SetupOutcome, SetupState};

use khata_core::StoreError;

/// PIN gate error types
#[derive(Debug, thiserror::Error)]
pub enum PinError {
    #[error("Please enter all 4 digits.")]
    Incomplete,

    #[error("PIN digits must be 0-9")]
    InvalidKeystroke,

    #[error("PINs do not match. Please try again.")]
    Mismatch,

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}
