use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::db::models::Account;
use crate::db::store::AccountStore;
use crate::error::DatabaseError;
use crate::Result;

/// In-memory account store. The write lock is held across the uniqueness
/// check and the insert, so concurrent registrations racing on the same
/// username or email resolve to exactly one success.
#[derive(Default)]
pub struct InMemoryStore {
    accounts: RwLock<Vec<Account>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|a| a.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn insert_account(&self, account: Account) -> Result<Account> {
        let mut accounts = self.accounts.write().await;
        let taken = accounts
            .iter()
            .any(|a| a.username == account.username || a.email == account.email);
        if taken {
            return Err(DatabaseError::Duplicate.into());
        }
        accounts.push(account.clone());
        Ok(account)
    }
}
