//! Bank account bookkeeping: list, add, remove, link

use std::sync::Arc;

use chrono::Utc;
use khata_core::{BankAccount, KeyValueStore, StoreError};

use crate::app::Navigation;
use crate::notice::{Notice, NoticeEffect};

/// Banks offered by the add-account picker
pub const BANKS: &[&str] = &[
    "Nabil Bank",
    "NIC Asia Bank",
    "Global IME Bank",
    "Nepal Investment Bank",
    "Himalayan Bank",
    "Prabhu Bank",
    "Siddhartha Bank",
    "Kumari Bank",
    "Machhapuchchhre Bank",
    "NMB Bank",
    "Sanima Bank",
    "Citizens Bank",
    "Sunrise Bank",
    "Laxmi Sunrise Bank",
    "Everest Bank",
    "Other",
];

/// Account error types
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Please select a bank")]
    NoBankSelected,

    #[error("Unknown bank: {0}")]
    UnknownBank(String),

    #[error("Please fill in all fields")]
    MissingFields,

    #[error("No bank account at position {0}")]
    NoSuchAccount(usize),

    #[error("Failed to save bank account")]
    Store(#[from] StoreError),
}

/// Inline form on the bank-accounts screen
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountDraft {
    pub bank_name: String,
    pub account_number: String,
    pub account_holder: String,
    pub ifsc: String,
}

/// The dedicated add-account screen
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AddAccountForm {
    /// Picker value; empty until a bank is chosen
    pub selected_bank: String,
    pub account_holder: String,
    pub account_number: String,
}

impl AddAccountForm {
    fn validate(&self) -> Result<BankAccount, AccountError> {
        if self.selected_bank.is_empty() {
            return Err(AccountError::NoBankSelected);
        }
        if !BANKS.contains(&self.selected_bank.as_str()) {
            return Err(AccountError::UnknownBank(self.selected_bank.clone()));
        }

        let holder = self.account_holder.trim();
        let number = self.account_number.trim();
        if holder.is_empty() || number.is_empty() {
            return Err(AccountError::MissingFields);
        }

        Ok(BankAccount {
            bank_name: self.selected_bank.clone(),
            account_number: number.to_string(),
            account_holder: holder.to_string(),
            ifsc: None,
            date_added: Some(Utc::now()),
        })
    }
}

/// Bank accounts kept in the local store
pub struct BankAccounts {
    store: Arc<dyn KeyValueStore>,
}

impl BankAccounts {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<BankAccount>, StoreError> {
        BankAccount::load_all(self.store.as_ref()).await
    }

    pub async fn linked(&self) -> Result<Option<BankAccount>, StoreError> {
        BankAccount::load_linked(self.store.as_ref()).await
    }

    /// Append from the inline form.
    ///
    /// Returns `Ok(None)` and writes nothing when bank name or number is empty.
    pub async fn quick_add(
        &self,
        draft: &AccountDraft,
    ) -> Result<Option<Vec<BankAccount>>, StoreError> {
        if draft.bank_name.is_empty() || draft.account_number.is_empty() {
            return Ok(None);
        }

        let account = BankAccount {
            bank_name: draft.bank_name.clone(),
            account_number: draft.account_number.clone(),
            account_holder: draft.account_holder.clone(),
            ifsc: Some(draft.ifsc.clone()).filter(|s| !s.is_empty()),
            date_added: None,
        };
        self.append(account).await.map(Some)
    }

    /// Validate and append from the add-account screen
    pub async fn add(&self, form: &AddAccountForm) -> Result<BankAccount, AccountError> {
        let account = form.validate()?;
        self.append(account.clone()).await.map_err(|e| {
            tracing::warn!("Error saving bank account: {}", e);
            AccountError::Store(e)
        })?;
        Ok(account)
    }

    /// Question shown before removing
    pub fn removal_prompt(&self, index: usize) -> Notice {
        Notice::confirm(
            "Remove Account",
            "Are you sure you want to remove this account?",
            NoticeEffect::RemoveAccount(index),
        )
    }

    /// Remove the account at `index`, returning the new list
    pub async fn remove(&self, index: usize) -> Result<Vec<BankAccount>, AccountError> {
        let mut accounts = self.list().await?;
        if index >= accounts.len() {
            return Err(AccountError::NoSuchAccount(index));
        }
        let removed = accounts.remove(index);
        BankAccount::save_all(self.store.as_ref(), &accounts).await?;
        tracing::info!("Removed account {}", removed.masked_number());
        Ok(accounts)
    }

    /// Question shown before linking
    pub fn link_prompt(&self, index: usize) -> Notice {
        Notice::confirm(
            "Link Bank Account",
            "Do you want to link this bank account?",
            NoticeEffect::LinkAccount(index),
        )
    }

    /// Make the account at `index` the linked one
    pub async fn link(&self, index: usize) -> Result<BankAccount, AccountError> {
        let accounts = self.list().await?;
        let account = accounts
            .get(index)
            .cloned()
            .ok_or(AccountError::NoSuchAccount(index))?;
        account.save_linked(self.store.as_ref()).await?;
        tracing::info!("Linked account {}", account.masked_number());
        Ok(account)
    }

    async fn append(&self, account: BankAccount) -> Result<Vec<BankAccount>, StoreError> {
        let mut accounts = self.list().await?;
        accounts.push(account);
        BankAccount::save_all(self.store.as_ref(), &accounts).await?;
        tracing::info!("Stored {} bank accounts", accounts.len());
        Ok(accounts)
    }
}

/// Report after a successful add; `OK` returns to the previous screen
pub fn added_notice() -> Notice {
    Notice::success("Success", "Bank account added successfully")
        .on_ok(NoticeEffect::Navigate(Navigation::Back))
}

/// Report after linking
pub fn linked_notice() -> Notice {
    Notice::success("Success", "Bank account linked successfully!")
}

/// Report for a failed add or update
pub fn error_notice(err: &AccountError) -> Notice {
    Notice::error("Error", err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use khata_core::{keys, MemoryStore};
    use rstest::rstest;

    fn service() -> (Arc<MemoryStore>, BankAccounts) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), BankAccounts::new(store))
    }

    fn form(bank: &str, holder: &str, number: &str) -> AddAccountForm {
        AddAccountForm {
            selected_bank: bank.to_string(),
            account_holder: holder.to_string(),
            account_number: number.to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_trims_and_stamps() {
        let (_, accounts) = service();
        let added = accounts
            .add(&form("Nabil Bank", "  Sita Sharma ", " 0012345678 "))
            .await
            .unwrap();

        assert_eq!(added.account_holder, "Sita Sharma");
        assert_eq!(added.account_number, "0012345678");
        assert!(added.date_added.is_some());
        assert_eq!(accounts.list().await.unwrap(), vec![added]);
    }

    #[rstest]
    #[case(form("", "Sita", "1"), "Please select a bank")]
    #[case(form("Nabil Bank", "   ", "1"), "Please fill in all fields")]
    #[case(form("Nabil Bank", "Sita", ""), "Please fill in all fields")]
    #[case(form("Bank of Nowhere", "Sita", "1"), "Unknown bank: Bank of Nowhere")]
    #[tokio::test]
    async fn test_add_validation(#[case] input: AddAccountForm, #[case] message: &str) {
        let (store, accounts) = service();
        let err = accounts.add(&input).await.unwrap_err();
        assert_eq!(err.to_string(), message);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_add_store_failure() {
        let (store, accounts) = service();
        store.fail_writes(true);
        let err = accounts
            .add(&form("Everest Bank", "Hari", "55"))
            .await
            .unwrap_err();
        assert_eq!(error_notice(&err).message, "Failed to save bank account");
    }

    #[tokio::test]
    async fn test_quick_add_requires_bank_and_number() {
        let (store, accounts) = service();
        let draft = AccountDraft {
            bank_name: "Kumari Bank".to_string(),
            ..AccountDraft::default()
        };
        assert!(accounts.quick_add(&draft).await.unwrap().is_none());
        assert_eq!(store.write_count(), 0);

        let draft = AccountDraft {
            account_number: "777".to_string(),
            ifsc: "KMBL0001".to_string(),
            ..draft
        };
        let list = accounts.quick_add(&draft).await.unwrap().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].ifsc.as_deref(), Some("KMBL0001"));
    }

    #[tokio::test]
    async fn test_remove_by_index() {
        let (_, accounts) = service();
        for number in ["1111", "2222", "3333"] {
            accounts.add(&form("NMB Bank", "Gita", number)).await.unwrap();
        }

        let prompt = accounts.removal_prompt(1);
        assert_eq!(prompt.effect_of("Yes"), Some(&NoticeEffect::RemoveAccount(1)));

        let remaining = accounts.remove(1).await.unwrap();
        let numbers: Vec<_> = remaining.iter().map(|a| a.account_number.as_str()).collect();
        assert_eq!(numbers, vec!["1111", "3333"]);

        assert!(matches!(
            accounts.remove(5).await,
            Err(AccountError::NoSuchAccount(5))
        ));
    }

    #[tokio::test]
    async fn test_link_stores_copy() {
        let (store, accounts) = service();
        accounts.add(&form("Sanima Bank", "Hari", "99887766")).await.unwrap();

        let prompt = accounts.link_prompt(0);
        assert_eq!(prompt.message, "Do you want to link this bank account?");

        let linked = accounts.link(0).await.unwrap();
        assert_eq!(linked.masked_number(), "****7766");
        assert_eq!(accounts.linked().await.unwrap(), Some(linked));
        assert!(store.peek(keys::LINKED_BANK_ACCOUNT).is_some());

        // Removing the source keeps the linked copy
        accounts.remove(0).await.unwrap();
        assert!(accounts.linked().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_link_out_of_range() {
        let (_, accounts) = service();
        assert!(matches!(
            accounts.link(0).await,
            Err(AccountError::NoSuchAccount(0))
        ));
    }
}
