use axum::{extract::State, http::StatusCode, Extension, Json};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    recorder::ScoreRecorder,
    types::{GameRecordResponse, RecordScoreRequest},
};
use crate::auth::AuthClaims;
use crate::shared::{AppError, AppState};

/// HTTP handler for recording a completed game for the caller
///
/// POST /scores/record
/// Returns the stored record with its points
#[instrument(name = "record_score", skip(state, claims, request))]
pub async fn record_score(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Json(request): Json<RecordScoreRequest>,
) -> Result<(StatusCode, Json<GameRecordResponse>), AppError> {
    request.validate()?;

    let recorder = ScoreRecorder::new(
        Arc::clone(&state.score_repository),
        Arc::clone(&state.user_repository),
    );
    let record = recorder
        .record_score(request.into_new_record(claims.user_id))
        .await?;

    info!(record_id = %record.id, "Score recorded via API");
    Ok((StatusCode::CREATED, Json(GameRecordResponse::from(record))))
}
