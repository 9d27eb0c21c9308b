//! User profile record

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::keys;
use crate::store::{get_json, set_json, KeyValueStore};

/// User record as written by the sign-up flow
///
/// Unknown fields are carried through so rewriting the record (to add an id)
/// never drops data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserRecord {
    pub async fn load(store: &dyn KeyValueStore) -> Result<Option<Self>> {
        get_json(store, keys::USER).await
    }

    pub async fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        set_json(store, keys::USER, self).await
    }
}
