use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, info, instrument};

use super::aggregator::{compute_global_stats, compute_user_stats};
use super::leaderboard::{LeaderboardBuilder, LeaderboardLimit};
use super::models::{
    GameHistory, LeaderboardEntry, LeaderboardStats, Pagination, UserStats, UserStatsReport,
    UserSummary,
};
use super::streak::longest_streak;
use crate::scores::repository::GameRecordRepository;
use crate::shared::AppError;
use crate::user::{models::UserModel, repository::UserRepository};

/// Read-side queries over the game record store. Every result is derived from raw
/// records at call time; nothing is cached between calls.
pub struct StatsService {
    scores: Arc<dyn GameRecordRepository>,
    users: Arc<dyn UserRepository>,
}

impl StatsService {
    pub fn new(scores: Arc<dyn GameRecordRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { scores, users }
    }

    fn leaderboard_builder(&self) -> LeaderboardBuilder {
        LeaderboardBuilder::new(Arc::clone(&self.scores), Arc::clone(&self.users))
    }

    async fn require_user(&self, user_id: &str) -> Result<UserModel, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    #[instrument(skip(self))]
    pub async fn get_user_stats(&self, user_id: &str) -> Result<UserStats, AppError> {
        self.get_user_stats_report(user_id)
            .await
            .map(|report| report.stats)
    }

    /// User stats together with the user's display fields
    #[instrument(skip(self))]
    pub async fn get_user_stats_report(&self, user_id: &str) -> Result<UserStatsReport, AppError> {
        let user = self.require_user(user_id).await?;
        let records = self.scores.find_by_user(user_id).await?;
        let stats = compute_user_stats(&records);

        debug!(
            user_id = %user_id,
            total_games = stats.total_games,
            longest_streak = stats.longest_streak,
            "Computed user stats"
        );

        Ok(UserStatsReport {
            user: UserSummary {
                id: user.id,
                name: user.name,
                email: user.email,
            },
            stats,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_user_game_history(
        &self,
        user_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<GameHistory, AppError> {
        if page < 1 {
            return Err(AppError::Validation("Page must be at least 1".to_string()));
        }
        if page_size < 1 {
            return Err(AppError::Validation(
                "Page size must be at least 1".to_string(),
            ));
        }

        self.require_user(user_id).await?;
        let page_result = self
            .scores
            .find_by_user_paged(user_id, page, page_size)
            .await?;

        Ok(GameHistory {
            pagination: Pagination::new(page, page_size, page_result.total),
            records: page_result.records,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, AppError> {
        let entries = self
            .leaderboard_builder()
            .build(LeaderboardLimit::Top(limit))
            .await?;

        info!(entries = entries.len(), "Leaderboard built");
        Ok(entries)
    }

    /// The user's row in the full leaderboard. `Ok(None)` means the user exists but has
    /// not played yet.
    #[instrument(skip(self))]
    pub async fn get_user_rank(&self, user_id: &str) -> Result<Option<LeaderboardEntry>, AppError> {
        if !self.users.exists(user_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        if self.scores.count_by_user(user_id).await? == 0 {
            debug!(user_id = %user_id, "User has no games, unranked");
            return Ok(None);
        }

        let entry = self
            .leaderboard_builder()
            .build(LeaderboardLimit::Unbounded)
            .await?
            .into_iter()
            .find(|entry| entry.user_id == user_id);

        Ok(entry)
    }

    #[instrument(skip(self))]
    pub async fn get_leaderboard_stats(&self) -> Result<LeaderboardStats, AppError> {
        let records = self.scores.all().await?;
        let user_ids = self.scores.distinct_user_ids().await?;

        let streaks = try_join_all(user_ids.iter().map(|user_id| async move {
            let user_records = self.scores.find_by_user(user_id).await?;
            Ok::<u32, AppError>(longest_streak(&user_records))
        }))
        .await?;
        let longest = streaks.into_iter().max().unwrap_or(0);

        Ok(compute_global_stats(
            &records,
            user_ids.len() as u64,
            longest,
        ))
    }
}
