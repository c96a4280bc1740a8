// Library crate for the number guessing score server
// This file exposes the public API for the binary and integration tests

pub mod auth;
pub mod config;
pub mod scores;
pub mod shared;
pub mod stats;
pub mod user;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

// Re-export commonly used types for easier access in tests
pub use auth::{AuthClaims, TokenConfig};
pub use config::AppConfig;
pub use scores::{
    models::{Difficulty, GameRecord, GameType, NewGameRecord},
    repository::{GameRecordRepository, InMemoryGameRecordRepository},
    ScoreRecorder,
};
pub use shared::{AppError, AppState};
pub use stats::{LeaderboardBuilder, LeaderboardLimit, StatsService};
pub use user::{models::UserModel, InMemoryUserRepository, UserRepository};

/// Builds every route of the API on top of the given state.
/// Routes under `/scores` that act for a user sit behind `auth::jwt_auth`.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/record", post(scores::record_score))
        .route("/my-stats", get(stats::get_my_stats))
        .route("/my-history", get(stats::get_my_history))
        .route("/my-rank", get(stats::get_my_rank))
        .route("/user/:user_id/stats", get(stats::get_user_stats))
        .route("/user/:user_id/history", get(stats::get_user_history))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::jwt_auth,
        ));

    let scores = Router::new()
        .route("/leaderboard", get(stats::get_leaderboard))
        .route("/leaderboard/stats", get(stats::get_leaderboard_stats))
        .merge(protected);

    Router::new()
        .route("/", get(|| async { "Number guessing score server" }))
        .route("/users", post(user::register_user))
        .route("/users/:user_id", get(user::get_user))
        .nest("/scores", scores)
        .with_state(state)
}
