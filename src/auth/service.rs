use std::sync::Arc;
use tracing::info;

use crate::auth::password::PasswordHasher;
use crate::auth::token::{Claims, TokenIssuer};
use crate::db::models::{Account, AccountSummary};
use crate::db::store::AccountStore;
use crate::error::{AppError, DatabaseError};
use crate::Result;

/// Orchestrates the registration and login workflows over the account
/// store, the password hasher and the token issuer.
pub struct AuthService {
    store: Arc<dyn AccountStore>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(store: Arc<dyn AccountStore>, hasher: PasswordHasher, tokens: TokenIssuer) -> Self {
        Self { store, hasher, tokens }
    }

    /// Register a new account: validate, hash, insert atomically.
    ///
    /// The role is always `Role::User`; callers cannot supply one, so a
    /// client has no path to self-escalate. Returns the public summary,
    /// never the digest, and issues no token: login is a separate step.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AccountSummary> {
        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AppError::ValidationError(
                "username, email and password are required".to_string(),
            ));
        }

        let digest = self.hasher.hash(password.to_string()).await?;
        let account = Account::new(username.to_string(), email.to_string(), digest);

        let created = match self.store.insert_account(account).await {
            Ok(created) => created,
            Err(AppError::DatabaseError(DatabaseError::Duplicate)) => {
                return Err(AppError::AlreadyExists);
            }
            Err(e) => return Err(e),
        };

        info!(username = %created.username, id = %created.id, "account created");
        Ok(AccountSummary::from(&created))
    }

    /// Log in and issue an access token.
    ///
    /// Identifier policy: the account is looked up by exactly the field the
    /// client supplied; `username` is the primary identifier and wins when
    /// both are present. An unknown account and a wrong password produce
    /// the same `InvalidCredentials` rejection, so responses reveal nothing
    /// about which accounts exist.
    pub async fn login(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        password: &str,
    ) -> Result<String> {
        let account = match (username, email) {
            (Some(username), _) if !username.is_empty() => {
                self.store.find_by_username(username).await?
            }
            (_, Some(email)) if !email.is_empty() => self.store.find_by_email(email).await?,
            _ => {
                return Err(AppError::ValidationError(
                    "username or email is required".to_string(),
                ));
            }
        };

        let account = match account {
            Some(account) => account,
            None => return Err(AppError::InvalidCredentials),
        };

        let matches = self
            .hasher
            .verify(password.to_string(), account.password_hash.clone())
            .await?;
        if !matches {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.tokens.issue(&account)?;
        info!(username = %account.username, "login successful");
        Ok(token)
    }

    /// Verify a presented access token and return its claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        self.tokens.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::InMemoryStore;
    use crate::db::models::Role;
    use crate::db::store::MockAccountStore;

    fn service_with(store: Arc<dyn AccountStore>) -> AuthService {
        AuthService::new(
            store,
            PasswordHasher::new(),
            TokenIssuer::new("test_secret", 3600).unwrap(),
        )
    }

    fn in_memory_service() -> AuthService {
        service_with(Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let service = in_memory_service();

        let summary = service
            .register("al", "al@x.com", "p@ss1234")
            .await
            .unwrap();
        assert_eq!(summary.username, "al");
        assert_eq!(summary.email, "al@x.com");
        assert_eq!(summary.role, Role::User);

        let token = service
            .login(Some("al"), None, "p@ss1234")
            .await
            .unwrap();
        assert!(!token.is_empty());

        let claims = service.verify_token(&token).unwrap();
        assert_eq!(claims.username, "al");
        assert_eq!(claims.sub, summary.id.to_string());
    }

    #[tokio::test]
    async fn test_login_by_email() {
        let service = in_memory_service();
        service
            .register("al", "al@x.com", "p@ss1234")
            .await
            .unwrap();

        let token = service
            .login(None, Some("al@x.com"), "p@ss1234")
            .await
            .unwrap();
        assert!(!token.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_registration_is_rejected() {
        let service = in_memory_service();
        service
            .register("al", "al@x.com", "p@ss1234")
            .await
            .unwrap();

        let err = service
            .register("al", "al@x.com", "p@ss1234")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists));

        // Same email under a different username is still a conflict
        let err = service
            .register("al2", "al@x.com", "p@ss1234")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists));
    }

    #[tokio::test]
    async fn test_missing_fields_are_rejected() {
        let service = in_memory_service();

        let err = service.register("", "al@x.com", "p@ss1234").await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = service.register("al", "al@x.com", "").await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = service.login(None, None, "p@ss1234").await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_unknown_account_and_wrong_password_look_identical() {
        let service = in_memory_service();
        service
            .register("al", "al@x.com", "p@ss1234")
            .await
            .unwrap();

        let missing = service
            .login(Some("nobody"), None, "p@ss1234")
            .await
            .unwrap_err();
        let wrong = service
            .login(Some("al"), None, "wrong")
            .await
            .unwrap_err();

        assert!(matches!(missing, AppError::InvalidCredentials));
        assert!(matches!(wrong, AppError::InvalidCredentials));
        assert_eq!(missing.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_store_failure_is_not_invalid_credentials() {
        let mut store = MockAccountStore::new();
        store.expect_find_by_username().returning(|_| {
            Err(DatabaseError::ConnectionError("store unreachable".to_string()).into())
        });

        let service = service_with(Arc::new(store));
        let err = service
            .login(Some("al"), None, "p@ss1234")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DatabaseError(_)));
    }
}
