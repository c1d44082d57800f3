//! Authentication module for the authgate server
//!
//! This module handles account registration, credential verification,
//! password hashing and access-token issuance.

pub mod handlers;
mod password;
mod service;
mod token;

pub use password::PasswordHasher;
pub use service::AuthService;
pub use token::{Claims, TokenIssuer};
