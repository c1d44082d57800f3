use async_trait::async_trait;

use crate::db::models::Account;
use crate::Result;

/// Persistence contract the auth workflows depend on.
///
/// `insert_account` must be atomic with respect to the uniqueness check:
/// two concurrent inserts sharing a username or email must yield exactly
/// one success and `DatabaseError::Duplicate` for the rest. Implementations
/// back this with a unique constraint (Postgres) or by holding their lock
/// across check-and-insert (in-memory); a separate lookup followed by an
/// insert is not an acceptable implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;

    async fn insert_account(&self, account: Account) -> Result<Account>;
}
