//! Session token kept by the login screen

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::Result;
use crate::keys;
use crate::store::KeyValueStore;

/// Opaque credential proving a prior successful login
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read the token; an empty value counts as no session
    pub async fn load(store: &dyn KeyValueStore) -> Result<Option<Self>> {
        Ok(store
            .get(keys::TOKEN)
            .await?
            .filter(|t| !t.is_empty())
            .map(Self))
    }

    /// Whether a live session exists
    pub async fn is_present(store: &dyn KeyValueStore) -> Result<bool> {
        Ok(Self::load(store).await?.is_some())
    }

    pub async fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        store.set(keys::TOKEN, &self.0).await
    }

    /// Revoke the session, forcing a fresh login
    pub async fn revoke(store: &dyn KeyValueStore) -> Result<()> {
        store.delete(keys::TOKEN).await
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(..)")
    }
}
