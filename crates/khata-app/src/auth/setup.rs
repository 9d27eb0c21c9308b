//! PIN setup: enter, confirm, persist
//!
//! The PIN is written only after the confirmation matches. The write runs as
//! its own task ([`PendingSave`]); while it is in flight, and once it has
//! landed, further confirms are answered with [`ConfirmStep::Busy`] instead of
//! issuing a second write.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use khata_core::{keys, KeyValueStore, PinCode, PinSetFlag, StoreError, StoredCredential};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::{Keystroke, PinEntry, PinError};
use crate::app::Navigation;
use crate::notice::{Notice, NoticeEffect};

/// Which PIN the user is typing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetupState {
    Entering,
    Confirming,
    /// PIN and flag persisted; further input is ignored
    Saved,
}

/// Result of the confirm action
#[derive(Debug)]
pub enum ConfirmStep {
    /// First PIN complete, now collecting the confirmation
    Advanced,
    /// Not all 4 digits present
    Incomplete(Notice),
    /// Confirmation differed; back to `Entering` with the confirmation cleared
    Mismatch(Notice),
    /// Entries match and the write has started
    Saving(PendingSave),
    /// Entries match but the write could not be started
    Failed(Notice),
    /// A save is in flight or has already landed; nothing was written
    Busy,
}

/// Final result of a save
#[derive(Debug)]
pub enum SetupOutcome {
    /// PIN and flag persisted; the notice's `OK` goes back
    Saved(Notice),
    /// Nothing persisted; flow state unchanged
    Failed(Notice),
}

/// Handle to an in-flight PIN write
///
/// Await it through [`PinSetupFlow::finish`], or drop it to let the write
/// complete in the background.
#[derive(Debug)]
pub struct PendingSave {
    handle: JoinHandle<Result<(), StoreError>>,
}

impl PendingSave {
    /// Wait for the write to land
    pub async fn wait(self) -> Result<(), StoreError> {
        self.handle
            .await
            .map_err(|e| StoreError::Unavailable(format!("save task failed: {}", e)))?
    }

    /// Stop tracking the write; it still completes
    pub fn detach(self) {
        drop(self.handle);
    }
}

/// Two-step PIN setup screen
pub struct PinSetupFlow {
    store: Arc<dyn KeyValueStore>,
    state: SetupState,
    entry: PinEntry,
    confirmation: PinEntry,
    saving: Arc<AtomicBool>,
    saved: Arc<AtomicBool>,
}

impl PinSetupFlow {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            state: SetupState::Entering,
            entry: PinEntry::new(),
            confirmation: PinEntry::new(),
            saving: Arc::new(AtomicBool::new(false)),
            saved: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Current step; `Saved` as soon as a write has landed, even a detached one
    pub fn state(&self) -> SetupState {
        if self.saved.load(Ordering::SeqCst) {
            SetupState::Saved
        } else {
            self.state
        }
    }

    /// The boxes currently shown
    pub fn active(&self) -> &PinEntry {
        match self.state() {
            SetupState::Entering | SetupState::Saved => &self.entry,
            SetupState::Confirming => &self.confirmation,
        }
    }

    pub fn confirmation(&self) -> &PinEntry {
        &self.confirmation
    }

    /// Whether a write is still in flight
    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::SeqCst)
    }

    /// Feed the new value of a box.
    ///
    /// Filling the last box of a complete first PIN moves to `Confirming`.
    /// Once saved, every keystroke is rejected.
    pub fn keystroke(&mut self, index: usize, value: &str) -> Keystroke {
        let step = match self.state() {
            SetupState::Entering => self.entry.keystroke(index, value),
            SetupState::Confirming => self.confirmation.keystroke(index, value),
            SetupState::Saved => return Keystroke::Rejected,
        };

        if step == Keystroke::Filled
            && self.state == SetupState::Entering
            && self.entry.is_complete()
        {
            self.begin_confirmation();
        }
        step
    }

    /// Feed a digit into the focused box
    pub fn type_digit(&mut self, digit: char) -> Keystroke {
        let index = self.active().focus();
        let mut buf = [0u8; 4];
        self.keystroke(index, digit.encode_utf8(&mut buf))
    }

    /// The explicit confirm action
    pub fn confirm(&mut self) -> ConfirmStep {
        if self.is_saving() || self.state() == SetupState::Saved {
            tracing::debug!("Confirm ignored, PIN save in flight or done");
            return ConfirmStep::Busy;
        }

        match self.state {
            SetupState::Saved => ConfirmStep::Busy,
            SetupState::Entering => {
                if self.entry.is_complete() {
                    self.begin_confirmation();
                    ConfirmStep::Advanced
                } else {
                    ConfirmStep::Incomplete(incomplete_notice())
                }
            }
            SetupState::Confirming => {
                let (Some(first), Some(second)) = (self.entry.code(), self.confirmation.code())
                else {
                    return ConfirmStep::Incomplete(incomplete_notice());
                };

                if first != second {
                    tracing::debug!("PIN confirmation mismatch");
                    self.confirmation.reset();
                    self.entry.reset_focus();
                    self.state = SetupState::Entering;
                    return ConfirmStep::Mismatch(Notice::error(
                        "Error",
                        PinError::Mismatch.to_string(),
                    ));
                }

                match self.spawn_save(first) {
                    Ok(pending) => ConfirmStep::Saving(pending),
                    Err(e) => {
                        tracing::warn!("Failed to save PIN: {}", e);
                        ConfirmStep::Failed(save_failed_notice())
                    }
                }
            }
        }
    }

    /// Await a save started by [`confirm`](Self::confirm)
    pub async fn finish(&mut self, pending: PendingSave) -> SetupOutcome {
        match pending.wait().await {
            Ok(()) => {
                tracing::info!("PIN saved");
                self.entry.reset();
                self.confirmation.reset();
                self.state = SetupState::Saved;
                SetupOutcome::Saved(
                    Notice::success("Success", "PIN saved successfully.")
                        .on_ok(NoticeEffect::Navigate(Navigation::Back)),
                )
            }
            Err(e) => {
                tracing::warn!("Failed to save PIN: {}", e);
                SetupOutcome::Failed(save_failed_notice())
            }
        }
    }

    /// Leave the screen without saving
    pub fn cancel(self) -> Navigation {
        tracing::debug!("PIN setup cancelled");
        Navigation::Back
    }

    fn begin_confirmation(&mut self) {
        tracing::debug!("PIN entered, awaiting confirmation");
        self.confirmation.reset();
        self.state = SetupState::Confirming;
    }

    /// Start the write on the current Tokio runtime
    fn spawn_save(&self, pin: PinCode) -> Result<PendingSave, StoreError> {
        let runtime = Handle::try_current()
            .map_err(|e| StoreError::Unavailable(format!("no async runtime: {}", e)))?;

        self.saving.store(true, Ordering::SeqCst);
        let store = Arc::clone(&self.store);
        let saving = Arc::clone(&self.saving);
        let saved = Arc::clone(&self.saved);

        let handle = runtime.spawn(async move {
            let result = persist_pin(store.as_ref(), pin).await;
            if result.is_ok() {
                saved.store(true, Ordering::SeqCst);
            }
            saving.store(false, Ordering::SeqCst);
            result
        });
        Ok(PendingSave { handle })
    }
}

/// Write the credential, then the flag.
///
/// If the flag write fails the previous credential is put back, so a failed
/// save leaves the store as it was.
async fn persist_pin(store: &dyn KeyValueStore, pin: PinCode) -> Result<(), StoreError> {
    let previous = store.get(keys::USER_PIN).await?;
    StoredCredential::new(pin).save(store).await?;

    if let Err(e) = PinSetFlag::mark(store).await {
        let restored = match previous {
            Some(raw) => store.set(keys::USER_PIN, &raw).await,
            None => store.delete(keys::USER_PIN).await,
        };
        if let Err(restore_err) = restored {
            tracing::warn!("Failed to restore previous PIN: {}", restore_err);
        }
        return Err(e);
    }
    Ok(())
}

fn save_failed_notice() -> Notice {
    Notice::error("Error", "Failed to save PIN.")
}

fn incomplete_notice() -> Notice {
    Notice::warning("Incomplete", PinError::Incomplete.to_string())
}
