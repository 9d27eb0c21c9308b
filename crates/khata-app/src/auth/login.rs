//! Email/password login
//!
//! The credential check itself is delegated to an [`Authenticator`]; this flow
//! validates input, persists the issued token and picks the next screen.

use std::sync::Arc;

use async_trait::async_trait;
use khata_core::{keys, AuthToken, KeyValueStore, StoreError};

use crate::app::{Navigation, Route};

/// Backend that exchanges credentials for a session token
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Return the issued token, or a [`LoginError::Rejected`] /
    /// [`LoginError::Transport`] failure
    async fn login(&self, email: &str, password: &str) -> Result<AuthToken, LoginError>;
}

/// Which part of the form an error belongs under
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
    Form,
}

/// Login error types
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Email is required")]
    MissingEmail,

    #[error("Password is required")]
    MissingPassword,

    /// The server refused the credentials, optionally saying why
    #[error("{}", .0.as_deref().unwrap_or("Invalid credentials"))]
    Rejected(Option<String>),

    #[error("Failed to connect to server")]
    Transport(String),

    #[error("Failed to save session")]
    Store(#[from] StoreError),
}

impl LoginError {
    pub fn field(&self) -> LoginField {
        match self {
            LoginError::MissingEmail => LoginField::Email,
            LoginError::MissingPassword => LoginField::Password,
            _ => LoginField::Form,
        }
    }
}

/// Login screen logic
pub struct LoginFlow {
    secure: Arc<dyn KeyValueStore>,
    authenticator: Arc<dyn Authenticator>,
}

impl LoginFlow {
    pub fn new(secure: Arc<dyn KeyValueStore>, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            secure,
            authenticator,
        }
    }

    /// Validate, authenticate, store the token and email, then go home
    pub async fn submit(&self, email: &str, password: &str) -> Result<Navigation, LoginError> {
        if email.is_empty() {
            return Err(LoginError::MissingEmail);
        }
        if password.is_empty() {
            return Err(LoginError::MissingPassword);
        }

        let token = self.authenticator.login(email, password).await.map_err(|e| {
            tracing::warn!("Login failed: {}", e);
            e
        })?;

        token.save(self.secure.as_ref()).await?;
        self.secure.set(keys::USER_EMAIL, email).await?;
        tracing::info!("Signed in");
        Ok(Navigation::Replace(Route::Home))
    }

    /// Drop the session token
    pub async fn logout(&self) -> Result<Navigation, StoreError> {
        AuthToken::revoke(self.secure.as_ref()).await?;
        tracing::info!("Signed out");
        Ok(Navigation::Replace(Route::Login))
    }
}
