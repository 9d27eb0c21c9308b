//! Property-based tests for the PIN gate using proptest
//!
//! Each case drives the flows against a fresh `MemoryStore` on a
//! single-threaded runtime.

use std::future::Future;
use std::sync::Arc;

use proptest::prelude::*;

use khata_app::auth::{
    AttemptCounter, ConfirmStep, Keystroke, LockState, PinEntry, PinLockFlow, PinSetupFlow,
    SetupOutcome, SetupState, VerifyStep,
};
use khata_app::{Navigation, Route};
use khata_core::{keys, MemoryStore, PIN_LENGTH};

// ============================================
// Helpers
// ============================================

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

fn arb_pin() -> impl Strategy<Value = String> {
    "[0-9]{4}"
}

fn arb_distinct_pins() -> impl Strategy<Value = (String, String)> {
    (arb_pin(), arb_pin()).prop_filter("PINs must differ", |(a, b)| a != b)
}

/// Keystroke values that are neither empty nor a single ASCII digit
fn arb_bad_keystroke() -> impl Strategy<Value = String> {
    prop_oneof![
        "[^0-9]",
        "[0-9]{2,4}",
        "[a-zA-Z ]{1,3}",
        Just("١".to_string()),
        Just("-1".to_string()),
    ]
}

fn type_pin(flow: &mut PinSetupFlow, pin: &str) {
    for (i, c) in pin.chars().enumerate() {
        let mut buf = [0u8; 4];
        flow.keystroke(i, c.encode_utf8(&mut buf));
    }
}

async fn enter_pin(flow: &mut PinLockFlow, pin: &str) -> VerifyStep {
    let mut step = VerifyStep::Pending;
    for c in pin.chars() {
        step = flow.type_digit(c).await;
    }
    step
}

fn locked_store(pin: &str) -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_entries([
        (keys::TOKEN, "session-token"),
        (keys::IS_PIN_SET, "true"),
        (keys::USER_PIN, pin),
    ]))
}

// ============================================
// Setup flow
// ============================================

proptest! {
    #[test]
    fn matching_confirmation_stores_credential(pin in arb_pin()) {
        let store = Arc::new(MemoryStore::new());
        let mut flow = PinSetupFlow::new(store.clone());

        type_pin(&mut flow, &pin);
        prop_assert_eq!(flow.state(), SetupState::Confirming);
        type_pin(&mut flow, &pin);

        let outcome = block_on(async {
            match flow.confirm() {
                ConfirmStep::Saving(pending) => Some(flow.finish(pending).await),
                _ => None,
            }
        });

        prop_assert!(matches!(outcome, Some(SetupOutcome::Saved(_))));
        prop_assert_eq!(flow.state(), SetupState::Saved);
        prop_assert_eq!(store.peek(keys::USER_PIN), Some(pin));
        let flag = store.peek(keys::IS_PIN_SET);
        prop_assert_eq!(flag.as_deref(), Some("true"));
    }

    #[test]
    fn mismatched_confirmation_stores_nothing((first, second) in arb_distinct_pins()) {
        let store = Arc::new(MemoryStore::new());
        let mut flow = PinSetupFlow::new(store.clone());

        type_pin(&mut flow, &first);
        type_pin(&mut flow, &second);

        let step = flow.confirm();
        prop_assert!(matches!(step, ConfirmStep::Mismatch(_)));
        prop_assert_eq!(flow.state(), SetupState::Entering);
        prop_assert_eq!(flow.confirmation().digits().filled(), 0);
        prop_assert_eq!(flow.active().focus(), 0);
        prop_assert!(store.peek(keys::USER_PIN).is_none());
        prop_assert!(store.peek(keys::IS_PIN_SET).is_none());
        prop_assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn bad_keystrokes_leave_slot_unchanged(
        pin in arb_pin(),
        index in 0..PIN_LENGTH,
        bad in arb_bad_keystroke(),
    ) {
        let mut entry = PinEntry::new();
        for (i, c) in pin.chars().take(index + 1).enumerate() {
            let mut buf = [0u8; 4];
            entry.keystroke(i, c.encode_utf8(&mut buf));
        }
        let before = entry.digits().get(index);

        prop_assert_eq!(entry.keystroke(index, &bad), Keystroke::Rejected);
        prop_assert_eq!(entry.digits().get(index), before);
    }
}

// ============================================
// Verify flow
// ============================================

proptest! {
    #[test]
    fn mismatch_spends_exactly_one_attempt(
        (stored, wrong) in arb_distinct_pins(),
        budget in 2u8..=5,
    ) {
        let store = locked_store(&stored);
        let mut flow = PinLockFlow::new(store, AttemptCounter::new(budget));

        let step = block_on(enter_pin(&mut flow, &wrong));
        let expected = budget - 1;
        let spent_one =
            matches!(step, VerifyStep::Retry { remaining, .. } if remaining == expected);
        prop_assert!(spent_one);
        prop_assert_eq!(flow.attempts().remaining(), expected);
        prop_assert_eq!(flow.entry().digits().filled(), 0);
        prop_assert_eq!(flow.entry().focus(), 0);
    }

    #[test]
    fn store_errors_never_spend_attempts(pin in arb_pin(), tries in 1usize..6) {
        let store = locked_store(&pin);
        store.fail_reads(true);
        let mut flow = PinLockFlow::new(store.clone(), AttemptCounter::default());

        for _ in 0..tries {
            let step = block_on(enter_pin(&mut flow, &pin));
            prop_assert!(matches!(step, VerifyStep::Failed(_)));
        }
        prop_assert_eq!(flow.attempts().remaining(), 3);
        prop_assert_eq!(flow.state(), LockState::AwaitingInput);
        prop_assert!(store.peek(keys::TOKEN).is_some());
    }

    #[test]
    fn third_mismatch_locks_and_revokes(
        stored in arb_pin(),
        wrong in prop::collection::vec(arb_pin(), 3),
    ) {
        prop_assume!(wrong.iter().all(|w| *w != stored));
        let store = locked_store(&stored);
        let mut flow = PinLockFlow::new(store.clone(), AttemptCounter::default());

        let second = block_on(async {
            enter_pin(&mut flow, &wrong[0]).await;
            enter_pin(&mut flow, &wrong[1]).await
        });
        let still_open = matches!(
            &second,
            VerifyStep::Retry { remaining: 1, notice }
                if notice.message == "Incorrect PIN. 1 attempt remaining."
        );
        prop_assert!(still_open);
        prop_assert_eq!(flow.state(), LockState::AwaitingInput);

        let third = block_on(enter_pin(&mut flow, &wrong[2]));
        prop_assert!(matches!(third, VerifyStep::Locked(_)));
        prop_assert_eq!(flow.state(), LockState::Locked);

        let nav = block_on(flow.end_session());
        prop_assert_eq!(nav, Some(Navigation::Replace(Route::Login)));
        prop_assert!(store.peek(keys::TOKEN).is_none());
    }

    #[test]
    fn correct_pin_unlocks_without_spending(pin in arb_pin()) {
        let mut flow = PinLockFlow::new(locked_store(&pin), AttemptCounter::default());

        let step = block_on(enter_pin(&mut flow, &pin));
        prop_assert_eq!(step, VerifyStep::Unlocked(Navigation::Replace(Route::Home)));
        prop_assert_eq!(flow.attempts().remaining(), 3);
    }
}
