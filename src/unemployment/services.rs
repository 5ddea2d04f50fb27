use tracing::info;

use super::dto::VerifyRequest;
use super::repo_types::{VerificationRecord, VerificationSubmission, PENDING_UPLOAD};
use crate::error::AppError;
use crate::store::Store;
use crate::validation::{non_empty, parse_iso_date};

/// Validates the form and files it: the user becomes `unemployed` and a
/// pending verification record is created, atomically.
pub async fn submit(
    store: &dyn Store,
    user_id: i64,
    req: VerifyRequest,
) -> Result<VerificationRecord, AppError> {
    let (Some(start_date), Some(previous_employer), Some(previous_job_title), Some(document_type)) = (
        non_empty(req.unemployment_start_date),
        non_empty(req.previous_employer),
        non_empty(req.previous_job_title),
        non_empty(req.document_type),
    ) else {
        return Err(AppError::Validation("Missing required fields".into()));
    };

    let unemployment_start_date = parse_iso_date(&start_date).ok_or_else(|| {
        AppError::Validation("unemploymentStartDate must be YYYY-MM-DD".into())
    })?;

    let submission = VerificationSubmission {
        unemployment_start_date,
        previous_employer,
        previous_job_title,
        document_type,
        document_url: non_empty(req.document_url).unwrap_or_else(|| PENDING_UPLOAD.to_string()),
    };

    let record = store.submit_verification(user_id, &submission).await?;
    info!(
        user_id = record.user_id,
        verification_id = record.id,
        document_type = %record.document_type,
        document_url = %record.document_url,
        "verification submitted"
    );
    Ok(record)
}
