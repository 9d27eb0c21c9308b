//! Profile screen: user details plus the bank-account summary

use std::sync::Arc;

use khata_core::{BankAccount, KeyValueStore, StoreError, UserRecord};
use rand::Rng;

/// Everything the profile screen shows
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileView {
    pub name: String,
    pub email: String,
    pub user_id: String,
    pub accounts: Vec<BankAccount>,
    pub linked: Option<BankAccount>,
}

/// Loads the profile from the local store
pub struct Profile {
    store: Arc<dyn KeyValueStore>,
}

impl Profile {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> Result<ProfileView, StoreError> {
        let candidate = generate_user_id(&mut rand::thread_rng());
        self.load_with_id(candidate).await
    }

    /// Load the profile, assigning `candidate_id` if the user has no id yet
    pub async fn load_with_id(&self, candidate_id: String) -> Result<ProfileView, StoreError> {
        let store = self.store.as_ref();
        let mut view = ProfileView::default();

        if let Some(mut user) = UserRecord::load(store).await? {
            let user_id = match &user.id {
                Some(id) => id.clone(),
                None => {
                    user.id = Some(candidate_id.clone());
                    user.save(store).await?;
                    tracing::info!("Assigned user id");
                    candidate_id
                }
            };
            view.name = user.name;
            view.email = user.email;
            view.user_id = user_id;
        }

        view.accounts = BankAccount::load_all(store).await?;
        view.linked = BankAccount::load_linked(store).await?;
        Ok(view)
    }
}

/// "24" followed by five random digits
pub fn generate_user_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("24{}", rng.gen_range(10000..=99999))
}
