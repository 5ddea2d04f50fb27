//! Persistence for users and verification records.
//!
//! Handlers talk to [`Store`] through `Arc<dyn Store>` so the Postgres
//! backend can be swapped for [`memory::MemoryStore`] in tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::repo_types::{NewUser, User};
use crate::unemployment::repo_types::{VerificationRecord, VerificationSubmission};

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write (duplicate email).
    #[error("unique constraint violated")]
    UniqueViolation,

    #[error("row not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::UniqueViolation,
            sqlx::Error::RowNotFound => StoreError::NotFound,
            _ => StoreError::Database(e),
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Exact, case-sensitive match on the stored email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// Inserts a user with default status fields and a zero balance.
    /// Fails with [`StoreError::UniqueViolation`] if the email is taken.
    async fn create_user(&self, new: &NewUser) -> Result<User, StoreError>;

    /// Marks the user unemployed with the submitted details and files a
    /// pending verification record. Both writes commit together or not at
    /// all; [`StoreError::NotFound`] if the user no longer exists.
    async fn submit_verification(
        &self,
        user_id: i64,
        submission: &VerificationSubmission,
    ) -> Result<VerificationRecord, StoreError>;
}
