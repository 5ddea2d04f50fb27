use sqlx::FromRow;
use time::{Date, OffsetDateTime};

use crate::auth::repo_types::VerificationStatus;

/// Stored in `document_url` until a document is actually uploaded.
pub const PENDING_UPLOAD: &str = "pending_upload";

/// One unemployment-verification attempt. `admin_notes` and `reviewed_at`
/// belong to the review process and are not read here.
#[derive(Debug, Clone, FromRow)]
pub struct VerificationRecord {
    pub id: i64,
    pub user_id: i64,
    pub document_type: String,
    pub document_url: String,
    pub status: VerificationStatus,
    pub submitted_at: OffsetDateTime,
}

/// A validated submission: the user's new employment details plus the record to file.
#[derive(Debug, Clone)]
pub struct VerificationSubmission {
    pub unemployment_start_date: Date,
    pub previous_employer: String,
    pub previous_job_title: String,
    pub document_type: String,
    pub document_url: String,
}
