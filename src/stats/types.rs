use serde::{Deserialize, Serialize};

use super::models::{GameHistory, LeaderboardEntry, Pagination};
use crate::scores::types::GameRecordResponse;

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub records: Vec<GameRecordResponse>,
    pub pagination: Pagination,
}

impl From<GameHistory> for HistoryResponse {
    fn from(history: GameHistory) -> Self {
        Self {
            records: history
                .records
                .into_iter()
                .map(GameRecordResponse::from)
                .collect(),
            pagination: history.pagination,
        }
    }
}

/// A caller's leaderboard position. `entry` is absent until the caller has played.
#[derive(Debug, Serialize, Deserialize)]
pub struct RankResponse {
    pub ranked: bool,
    pub entry: Option<LeaderboardEntry>,
}

impl From<Option<LeaderboardEntry>> for RankResponse {
    fn from(entry: Option<LeaderboardEntry>) -> Self {
        Self {
            ranked: entry.is_some(),
            entry,
        }
    }
}
