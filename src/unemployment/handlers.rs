use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{VerificationSummary, VerifyRequest, VerifyResponse},
    services,
};
use crate::{auth::extractors::AuthUser, error::AppError, state::AppState};

pub fn verification_routes() -> Router<AppState> {
    Router::new().route("/unemployment/verify", post(verify))
}

#[instrument(skip(state, auth, payload), fields(user_id = auth.id, email = %auth.email))]
pub async fn verify(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<VerifyResponse>, AppError> {
    let Json(payload) = payload?;
    let record = services::submit(state.store.as_ref(), auth.id, payload).await?;
    Ok(Json(VerifyResponse {
        message: "Unemployment verification submitted successfully",
        verification: VerificationSummary {
            id: record.id,
            status: record.status,
            submitted_at: record.submitted_at,
        },
    }))
}
