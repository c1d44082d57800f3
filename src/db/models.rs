use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Authorization role attached to an account. Self-service registration
/// always produces `User`; elevation happens outside this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

/// A durable account record. The `password_hash` field holds the salted
/// argon2 digest, never the plaintext, and this type deliberately does not
/// implement `Serialize`: only `AccountSummary` crosses the HTTP boundary.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            role: Role::default(),
            created_at: Utc::now(),
        }
    }
}

/// Public projection of an account, safe to return to clients.
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
            role: account.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_defaults_to_user_role() {
        let account = Account::new(
            "al".to_string(),
            "al@x.com".to_string(),
            "$argon2id$fake".to_string(),
        );
        assert_eq!(account.role, Role::User);
        assert_eq!(account.username, "al");
    }

    #[test]
    fn test_summary_never_carries_the_digest() {
        let account = Account::new(
            "al".to_string(),
            "al@x.com".to_string(),
            "$argon2id$fake".to_string(),
        );
        let summary = AccountSummary::from(&account);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["username"], "al");
        assert_eq!(json["role"], "user");
        assert!(json.get("password_hash").is_none());
    }
}
