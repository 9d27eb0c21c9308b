//! Bank account records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::keys;
use crate::store::{get_json, set_json, KeyValueStore};

/// One bank account as kept in the local store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub bank_name: String,
    pub account_number: String,
    #[serde(default)]
    pub account_holder: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ifsc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<DateTime<Utc>>,
}

impl BankAccount {
    /// Account number with everything but the last 4 characters hidden
    pub fn masked_number(&self) -> String {
        let chars: Vec<char> = self.account_number.chars().collect();
        let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
        format!("****{}", tail)
    }

    /// Load the account list; an absent key is an empty list
    pub async fn load_all(store: &dyn KeyValueStore) -> Result<Vec<Self>> {
        Ok(get_json(store, keys::BANK_ACCOUNTS)
            .await?
            .unwrap_or_default())
    }

    pub async fn save_all(store: &dyn KeyValueStore, accounts: &[Self]) -> Result<()> {
        set_json(store, keys::BANK_ACCOUNTS, &accounts).await
    }

    pub async fn load_linked(store: &dyn KeyValueStore) -> Result<Option<Self>> {
        get_json(store, keys::LINKED_BANK_ACCOUNT).await
    }

    pub async fn save_linked(&self, store: &dyn KeyValueStore) -> Result<()> {
        set_json(store, keys::LINKED_BANK_ACCOUNT, self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    fn account(number: &str) -> BankAccount {
        BankAccount {
            bank_name: "Nabil Bank".to_string(),
            account_number: number.to_string(),
            account_holder: "Sita Sharma".to_string(),
            ifsc: None,
            date_added: None,
        }
    }

    #[test]
    fn test_masked_number() {
        assert_eq!(account("0123456789").masked_number(), "****6789");
        assert_eq!(account("12").masked_number(), "****12");
    }

    #[test]
    fn test_reads_records_without_optional_fields() {
        let raw = r#"[{"bankName":"Everest Bank","accountNumber":"998877"}]"#;
        let accounts: Vec<BankAccount> = serde_json::from_str(raw).unwrap();
        assert_eq!(accounts[0].bank_name, "Everest Bank");
        assert!(accounts[0].account_holder.is_empty());
        assert!(accounts[0].date_added.is_none());
    }

    #[test]
    fn test_writes_camel_case() {
        let json = serde_json::to_string(&account("42")).unwrap();
        assert!(json.contains("\"bankName\""));
        assert!(json.contains("\"accountHolder\""));
        assert!(!json.contains("ifsc"));
    }

    #[tokio::test]
    async fn test_list_defaults_to_empty() {
        let store = MemoryStore::new();
        assert!(BankAccount::load_all(&store).await.unwrap().is_empty());
        assert!(BankAccount::load_linked(&store).await.unwrap().is_none());
    }
}
