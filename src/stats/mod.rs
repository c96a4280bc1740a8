// Public API - what other modules can use
pub use handlers::{
    get_leaderboard, get_leaderboard_stats, get_my_history, get_my_rank, get_my_stats,
    get_user_history, get_user_stats,
};
pub use leaderboard::{LeaderboardBuilder, LeaderboardLimit};
pub use service::StatsService;

// Internal modules
pub mod aggregator;
mod handlers;
pub mod leaderboard;
pub mod models;
pub mod service;
pub mod streak;
pub mod types;
