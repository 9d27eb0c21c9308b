//! Khata Core - Records, store keys and persistence seams
//!
//! This crate holds the typed records shared by every Khata screen (PIN
//! credential, session token, bank accounts, user profile) together with the
//! [`KeyValueStore`] abstraction they are persisted through. Values are plain
//! strings at the store boundary and are validated into typed records on read.

pub mod account;
pub mod error;
pub mod keys;
pub mod pin;
pub mod session;
pub mod store;
pub mod user;

pub use account::BankAccount;
pub use error::{PinFormatError, Result, StoreError};
pub use pin::{PinCode, PinDigits, PinSetFlag, StoredCredential, PIN_LENGTH};
pub use session::AuthToken;
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use user::UserRecord;
