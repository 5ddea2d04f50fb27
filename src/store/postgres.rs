use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{debug, info};

use super::{Store, StoreError};
use crate::auth::repo_types::{NewUser, User};
use crate::config::AppConfig;
use crate::unemployment::repo_types::{VerificationRecord, VerificationSubmission};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects the pool and brings the schema up to date.
    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("run migrations")?;
        info!("database migrations applied");

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, first_name, last_name, phone,
                   employment_status, unemployment_verification_status,
                   unemployment_start_date, previous_employer, previous_job_title,
                   fol_balance, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, first_name, last_name, phone,
                   employment_status, unemployment_verification_status,
                   unemployment_start_date, previous_employer, previous_job_title,
                   fol_balance, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user(&self, new: &NewUser) -> Result<User, StoreError> {
        // Status columns and fol_balance fall back to their schema defaults.
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, first_name, last_name, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, password_hash, first_name, last_name, phone,
                      employment_status, unemployment_verification_status,
                      unemployment_start_date, previous_employer, previous_job_title,
                      fol_balance, created_at, updated_at
            "#,
        )
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.phone)
        .fetch_one(&self.pool)
        .await?;
        debug!(user_id = user.id, "user row inserted");
        Ok(user)
    }

    async fn submit_verification(
        &self,
        user_id: i64,
        submission: &VerificationSubmission,
    ) -> Result<VerificationRecord, StoreError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE users
               SET employment_status = 'unemployed',
                   unemployment_start_date = $2,
                   previous_employer = $3,
                   previous_job_title = $4,
                   updated_at = now()
             WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(submission.unemployment_start_date)
        .bind(&submission.previous_employer)
        .bind(&submission.previous_job_title)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            // Dropping the transaction rolls it back.
            return Err(StoreError::NotFound);
        }

        let record = sqlx::query_as::<_, VerificationRecord>(
            r#"
            INSERT INTO unemployment_verifications (user_id, document_type, document_url, status)
            VALUES ($1, $2, $3, 'pending')
            RETURNING id, user_id, document_type, document_url, status, submitted_at
            "#,
        )
        .bind(user_id)
        .bind(&submission.document_type)
        .bind(&submission.document_url)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(user_id, verification_id = record.id, "verification committed");
        Ok(record)
    }
}
