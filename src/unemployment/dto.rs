use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::repo_types::VerificationStatus;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub unemployment_start_date: Option<String>,
    pub previous_employer: Option<String>,
    pub previous_job_title: Option<String>,
    pub document_type: Option<String>,
    pub document_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub message: &'static str,
    pub verification: VerificationSummary,
}

#[derive(Debug, Serialize)]
pub struct VerificationSummary {
    pub id: i64,
    pub status: VerificationStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
}
