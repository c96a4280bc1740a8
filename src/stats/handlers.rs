use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::{LeaderboardEntry, LeaderboardStats, UserStatsReport},
    service::StatsService,
    types::{HistoryQuery, HistoryResponse, LeaderboardQuery, RankResponse},
};
use crate::auth::AuthClaims;
use crate::shared::{AppError, AppState};

fn stats_service(state: &AppState) -> StatsService {
    StatsService::new(
        Arc::clone(&state.score_repository),
        Arc::clone(&state.user_repository),
    )
}

/// GET /scores/leaderboard?limit=
#[instrument(name = "get_leaderboard", skip(state))]
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    let limit = query
        .limit
        .filter(|limit| *limit > 0)
        .unwrap_or(state.config.leaderboard_default_limit);

    let entries = stats_service(&state).get_leaderboard(limit).await?;
    Ok(Json(entries))
}

/// GET /scores/leaderboard/stats
#[instrument(name = "get_leaderboard_stats", skip(state))]
pub async fn get_leaderboard_stats(
    State(state): State<AppState>,
) -> Result<Json<LeaderboardStats>, AppError> {
    let stats = stats_service(&state).get_leaderboard_stats().await?;
    Ok(Json(stats))
}

/// GET /scores/my-stats
#[instrument(name = "get_my_stats", skip(state, claims))]
pub async fn get_my_stats(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
) -> Result<Json<UserStatsReport>, AppError> {
    let report = stats_service(&state)
        .get_user_stats_report(&claims.user_id)
        .await?;
    Ok(Json(report))
}

/// GET /scores/my-history?page=&limit=
#[instrument(name = "get_my_history", skip(state, claims))]
pub async fn get_my_history(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    history_for(&state, &claims.user_id, query).await
}

/// GET /scores/my-rank
#[instrument(name = "get_my_rank", skip(state, claims))]
pub async fn get_my_rank(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
) -> Result<Json<RankResponse>, AppError> {
    let entry = stats_service(&state).get_user_rank(&claims.user_id).await?;

    info!(ranked = entry.is_some(), "Rank lookup completed");
    Ok(Json(RankResponse::from(entry)))
}

/// GET /scores/user/:user_id/stats
#[instrument(name = "get_user_stats", skip(state))]
pub async fn get_user_stats(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserStatsReport>, AppError> {
    let report = stats_service(&state).get_user_stats_report(&user_id).await?;
    Ok(Json(report))
}

/// GET /scores/user/:user_id/history?page=&limit=
#[instrument(name = "get_user_history", skip(state))]
pub async fn get_user_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    history_for(&state, &user_id, query).await
}

async fn history_for(
    state: &AppState,
    user_id: &str,
    query: HistoryQuery,
) -> Result<Json<HistoryResponse>, AppError> {
    // Zero falls back to the defaults, like the leaderboard limit
    let page = query.page.filter(|page| *page > 0).unwrap_or(1);
    let page_size = query
        .limit
        .filter(|limit| *limit > 0)
        .unwrap_or(state.config.history_default_page_size);

    let history = stats_service(state)
        .get_user_game_history(user_id, page, page_size)
        .await?;
    Ok(Json(HistoryResponse::from(history)))
}
