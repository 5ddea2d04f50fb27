use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use super::{Store, StoreError};
use crate::auth::repo_types::{EmploymentStatus, NewUser, User, VerificationStatus};
use crate::unemployment::repo_types::{VerificationRecord, VerificationSubmission};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    verifications: Vec<VerificationRecord>,
}

/// In-process store with the same constraints as the Postgres schema.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_next_verification_insert: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next verification-record insert fail after the user update.
    pub fn fail_next_verification_insert(&self) {
        self.fail_next_verification_insert.store(true, Ordering::SeqCst);
    }

    pub async fn verifications_for(&self, user_id: i64) -> Vec<VerificationRecord> {
        let tables = self.tables.lock().await;
        tables
            .verifications
            .iter()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect()
    }

    pub async fn verification_count(&self) -> usize {
        self.tables.lock().await.verifications.len()
    }

    pub async fn user_count(&self) -> usize {
        self.tables.lock().await.users.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, new: &NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables.users.iter().any(|u| u.email == new.email) {
            return Err(StoreError::UniqueViolation);
        }
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: tables.users.len() as i64 + 1,
            email: new.email.clone(),
            password_hash: new.password_hash.clone(),
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            phone: new.phone.clone(),
            employment_status: EmploymentStatus::PendingVerification,
            unemployment_verification_status: VerificationStatus::Pending,
            unemployment_start_date: None,
            previous_employer: None,
            previous_job_title: None,
            fol_balance: Decimal::new(0, 2),
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn submit_verification(
        &self,
        user_id: i64,
        submission: &VerificationSubmission,
    ) -> Result<VerificationRecord, StoreError> {
        let mut tables = self.tables.lock().await;
        let idx = tables
            .users
            .iter()
            .position(|u| u.id == user_id)
            .ok_or(StoreError::NotFound)?;

        // Stage the user update; it is only written back once the insert succeeds.
        let now = OffsetDateTime::now_utc();
        let mut staged = tables.users[idx].clone();
        staged.employment_status = EmploymentStatus::Unemployed;
        staged.unemployment_start_date = Some(submission.unemployment_start_date);
        staged.previous_employer = Some(submission.previous_employer.clone());
        staged.previous_job_title = Some(submission.previous_job_title.clone());
        staged.updated_at = now;

        if self.fail_next_verification_insert.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Backend(anyhow::anyhow!(
                "injected verification insert failure"
            )));
        }

        let record = VerificationRecord {
            id: tables.verifications.len() as i64 + 1,
            user_id,
            document_type: submission.document_type.clone(),
            document_url: submission.document_url.clone(),
            status: VerificationStatus::Pending,
            submitted_at: now,
        };
        tables.verifications.push(record.clone());
        tables.users[idx] = staged;
        Ok(record)
    }
}
