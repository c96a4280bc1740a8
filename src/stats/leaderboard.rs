use std::cmp::Ordering;
use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, instrument, warn};

use super::aggregator::{round_to_one_decimal, round_to_whole};
use super::models::{LeaderboardEntry, UserScoreSummary};
use super::streak::longest_streak;
use crate::scores::repository::GameRecordRepository;
use crate::shared::AppError;
use crate::user::{models::UserModel, repository::UserRepository};

/// How many entries a leaderboard build keeps after candidate selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardLimit {
    Top(usize),
    /// Every player with at least one record
    Unbounded,
}

impl LeaderboardLimit {
    fn apply<T>(self, items: &mut Vec<T>) {
        if let LeaderboardLimit::Top(limit) = self {
            items.truncate(limit);
        }
    }
}

/// A joined per-user aggregate waiting for its streak
#[derive(Debug, Clone)]
struct Candidate {
    summary: UserScoreSummary,
    user: UserModel,
}

/// Candidate selection order: best score, then wins, then unrounded win rate, all descending
fn candidate_order(a: &UserScoreSummary, b: &UserScoreSummary) -> Ordering {
    b.best_score
        .total_cmp(&a.best_score)
        .then_with(|| b.total_wins.cmp(&a.total_wins))
        .then_with(|| b.win_rate().total_cmp(&a.win_rate()))
}

/// Final ranking order: longest streak, then wins, both descending
fn ranking_order(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.longest_streak
        .cmp(&a.longest_streak)
        .then_with(|| b.total_wins.cmp(&a.total_wins))
}

/// Builds the ranked leaderboard in two stages. The candidate stage sorts the cheap
/// per-user aggregates and truncates, so the per-user streak scan only runs for users
/// that made the cut. The ranking stage then orders those users by streak.
pub struct LeaderboardBuilder {
    scores: Arc<dyn GameRecordRepository>,
    users: Arc<dyn UserRepository>,
}

impl LeaderboardBuilder {
    pub fn new(scores: Arc<dyn GameRecordRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { scores, users }
    }

    #[instrument(skip(self))]
    pub async fn build(&self, limit: LeaderboardLimit) -> Result<Vec<LeaderboardEntry>, AppError> {
        let candidates = self.select_candidates(limit).await?;
        debug!(candidates = candidates.len(), "Selected leaderboard candidates");

        let streaks = try_join_all(
            candidates
                .iter()
                .map(|candidate| self.streak_for(&candidate.summary.user_id)),
        )
        .await?;

        let mut entries: Vec<LeaderboardEntry> = candidates
            .into_iter()
            .zip(streaks)
            .map(|(candidate, streak)| Self::to_entry(candidate, streak))
            .collect();

        entries.sort_by(ranking_order);
        for (index, entry) in entries.iter_mut().enumerate() {
            entry.rank = index as u32 + 1;
        }

        Ok(entries)
    }

    async fn select_candidates(&self, limit: LeaderboardLimit) -> Result<Vec<Candidate>, AppError> {
        let summaries = self.scores.user_summaries().await?;
        if summaries.is_empty() {
            return Ok(Vec::new());
        }

        let user_ids: Vec<String> = summaries.iter().map(|s| s.user_id.clone()).collect();
        let mut users = self.users.find_many(&user_ids).await?;

        let mut candidates: Vec<Candidate> = summaries
            .into_iter()
            .filter_map(|summary| match users.remove(&summary.user_id) {
                Some(user) => Some(Candidate { summary, user }),
                None => {
                    warn!(
                        user_id = %summary.user_id,
                        "Dropping leaderboard group with no matching user"
                    );
                    None
                }
            })
            .collect();

        candidates.sort_by(|a, b| candidate_order(&a.summary, &b.summary));
        limit.apply(&mut candidates);

        Ok(candidates)
    }

    async fn streak_for(&self, user_id: &str) -> Result<u32, AppError> {
        let records = self.scores.find_by_user(user_id).await?;
        Ok(longest_streak(&records))
    }

    fn to_entry(candidate: Candidate, longest_streak: u32) -> LeaderboardEntry {
        let Candidate { summary, user } = candidate;

        LeaderboardEntry {
            rank: 0,
            win_rate: round_to_one_decimal(summary.win_rate()),
            average_attempts: round_to_one_decimal(summary.average_attempts),
            average_time: round_to_whole(summary.average_time),
            user_id: summary.user_id,
            name: user.name,
            email: user.email,
            total_games: summary.total_games,
            total_wins: summary.total_wins,
            total_score: summary.total_score,
            best_score: summary.best_score,
            longest_streak,
            last_played: summary.last_played,
        }
    }
}
