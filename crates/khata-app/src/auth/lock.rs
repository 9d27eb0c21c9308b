//! PIN lock screen shown on launch
//!
//! Mounting checks the session and the PIN flag before any input is taken.
//! A wrong PIN spends an attempt; a store failure does not.

use std::sync::Arc;

use khata_core::{AuthToken, KeyValueStore, PinSetFlag, StoredCredential};

use super::{AttemptCounter, Keystroke, PinEntry};
use crate::app::{Navigation, Route};
use crate::notice::{Notice, NoticeEffect};

/// Lock screen state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LockState {
    /// 0-3 digits entered
    AwaitingInput,
    /// Comparing against the stored PIN
    Verifying,
    /// Correct PIN entered; further input is ignored
    Unlocked,
    /// Attempts exhausted; waiting for the lockout acknowledgement
    Locked,
}

/// Result of opening the lock screen
pub enum MountOutcome {
    /// No PIN prompt; go straight to another screen
    Redirect(Navigation),
    /// Show the PIN boxes
    Prompt(PinLockFlow),
}

/// Result of a keystroke or unlock action
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerifyStep {
    /// Keystroke not accepted
    Rejected,
    /// Accepted, PIN not yet complete
    Pending,
    /// Correct PIN
    Unlocked(Navigation),
    /// Wrong PIN, attempts left; boxes cleared
    Retry { remaining: u8, notice: Notice },
    /// Wrong PIN, no attempts left; acknowledge with [`PinLockFlow::end_session`]
    Locked(Notice),
    /// Could not check the PIN; no attempt spent, boxes cleared
    Failed(Notice),
    /// Input after unlock or lockout is ignored
    Ignored,
}

/// PIN verification screen
pub struct PinLockFlow {
    store: Arc<dyn KeyValueStore>,
    entry: PinEntry,
    attempts: AttemptCounter,
    state: LockState,
}

impl PinLockFlow {
    /// Create the prompt directly, skipping the mount checks
    pub fn new(store: Arc<dyn KeyValueStore>, attempts: AttemptCounter) -> Self {
        Self {
            store,
            entry: PinEntry::new(),
            attempts,
            state: LockState::AwaitingInput,
        }
    }

    /// Open the lock screen.
    ///
    /// Without a session token the user goes to login; without a PIN set the
    /// user goes straight home. A store failure here falls back to login.
    pub async fn mount(store: Arc<dyn KeyValueStore>, attempts: AttemptCounter) -> MountOutcome {
        let token = match AuthToken::is_present(store.as_ref()).await {
            Ok(present) => present,
            Err(e) => {
                tracing::warn!("Failed to read session token: {}", e);
                return MountOutcome::Redirect(Navigation::Replace(Route::Login));
            }
        };
        if !token {
            tracing::debug!("No session token, redirecting to login");
            return MountOutcome::Redirect(Navigation::Replace(Route::Login));
        }

        match PinSetFlag::load(store.as_ref()).await {
            Ok(flag) if flag.is_set() => MountOutcome::Prompt(Self::new(store, attempts)),
            Ok(_) => {
                tracing::debug!("PIN not set, skipping lock screen");
                MountOutcome::Redirect(Navigation::Replace(Route::Home))
            }
            Err(e) => {
                tracing::warn!("Failed to read PIN flag: {}", e);
                MountOutcome::Redirect(Navigation::Replace(Route::Login))
            }
        }
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn attempts(&self) -> AttemptCounter {
        self.attempts
    }

    pub fn entry(&self) -> &PinEntry {
        &self.entry
    }

    /// Caption under the title, e.g. "3 attempts remaining"
    pub fn attempts_caption(&self) -> String {
        format!("{} remaining", self.attempts.describe())
    }

    /// Feed the new value of a box; filling the last box submits
    pub async fn keystroke(&mut self, index: usize, value: &str) -> VerifyStep {
        if self.is_finished() {
            return VerifyStep::Ignored;
        }

        match self.entry.keystroke(index, value) {
            Keystroke::Rejected => VerifyStep::Rejected,
            Keystroke::Filled => self.unlock().await,
            Keystroke::Cleared | Keystroke::Advanced => VerifyStep::Pending,
        }
    }

    /// Feed a digit into the focused box
    pub async fn type_digit(&mut self, digit: char) -> VerifyStep {
        let index = self.entry.focus();
        let mut buf = [0u8; 4];
        self.keystroke(index, digit.encode_utf8(&mut buf)).await
    }

    /// The explicit unlock action; does nothing until all 4 digits are in
    pub async fn unlock(&mut self) -> VerifyStep {
        if self.is_finished() {
            return VerifyStep::Ignored;
        }
        let Some(entered) = self.entry.code() else {
            return VerifyStep::Pending;
        };

        self.state = LockState::Verifying;
        let stored = StoredCredential::load(self.store.as_ref()).await;

        match stored {
            Ok(Some(credential)) if credential.matches(&entered) => {
                tracing::info!("PIN accepted");
                self.entry.reset();
                self.state = LockState::Unlocked;
                VerifyStep::Unlocked(Navigation::Replace(Route::Home))
            }
            Ok(_) => self.reject(),
            Err(e) => {
                tracing::warn!("Error verifying PIN: {}", e);
                self.entry.reset();
                self.state = LockState::AwaitingInput;
                VerifyStep::Failed(Notice::error(
                    "Error",
                    "Failed to verify PIN. Please try again.",
                ))
            }
        }
    }

    /// Acknowledge the lockout: revoke the session and go to login.
    ///
    /// Returns `None` and leaves the session alone unless the flow is `Locked`.
    pub async fn end_session(&mut self) -> Option<Navigation> {
        if self.state != LockState::Locked {
            return None;
        }
        if let Err(e) = AuthToken::revoke(self.store.as_ref()).await {
            tracing::warn!("Failed to delete session token: {}", e);
        }
        Some(Navigation::Replace(Route::Login))
    }

    fn is_finished(&self) -> bool {
        matches!(self.state, LockState::Unlocked | LockState::Locked)
    }

    fn reject(&mut self) -> VerifyStep {
        let remaining = self.attempts.consume();
        self.entry.reset();

        if remaining > 0 {
            tracing::debug!("Incorrect PIN, {} remaining", self.attempts.describe());
            self.state = LockState::AwaitingInput;
            VerifyStep::Retry {
                remaining,
                notice: Notice::warning(
                    "Invalid PIN",
                    format!("Incorrect PIN. {} remaining.", self.attempts.describe()),
                ),
            }
        } else {
            tracing::warn!("PIN attempts exhausted, session will be revoked");
            self.state = LockState::Locked;
            VerifyStep::Locked(
                Notice::error(
                    "Too Many Attempts",
                    "You've exceeded the maximum number of attempts. Please login again.",
                )
                .on_ok(NoticeEffect::EndSession),
            )
        }
    }
}
