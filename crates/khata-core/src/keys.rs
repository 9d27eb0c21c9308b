//! Store keys shared between screens
//!
//! These names are read by existing installs and MUST NOT change.

/// Secure store: the 4-digit PIN, plain text
pub const USER_PIN: &str = "userPIN";

/// Secure store: `"true"` once a PIN has been set up
pub const IS_PIN_SET: &str = "isPinSet";

/// Secure store: session token issued by the login endpoint
pub const TOKEN: &str = "token";

/// Secure store: email of the signed-in user
pub const USER_EMAIL: &str = "userEmail";

/// Local store: JSON user record
pub const USER: &str = "user";

/// Local store: JSON array of bank accounts
pub const BANK_ACCOUNTS: &str = "bankAccounts";

/// Local store: JSON copy of the linked bank account
pub const LINKED_BANK_ACCOUNT: &str = "linkedBankAccount";

/// Sentinel stored under [`IS_PIN_SET`]
pub const PIN_SET_SENTINEL: &str = "true";
