use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scores::models::GameRecord;

/// Per-user aggregate over every record of that user, before any user join
#[derive(Debug, Clone, PartialEq)]
pub struct UserScoreSummary {
    pub user_id: String,
    pub total_games: u32,
    pub total_wins: u32,
    pub total_score: f64,
    pub best_score: f64,
    pub average_attempts: f64,
    pub average_time: f64,
    pub last_played: DateTime<Utc>,
}

impl UserScoreSummary {
    /// Unrounded win percentage, 0 when there are no games
    pub fn win_rate(&self) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            f64::from(self.total_wins) / f64::from(self.total_games) * 100.0
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_games: u32,
    pub total_wins: u32,
    pub total_score: f64,
    /// Rounded integer percent
    pub win_rate: u32,
    /// One decimal place
    pub average_attempts: f64,
    /// Rounded whole seconds
    pub average_time: u64,
    pub best_score: f64,
    pub longest_streak: u32,
    pub total_points: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub total_games: u32,
    pub total_wins: u32,
    pub total_score: f64,
    pub best_score: f64,
    /// One decimal place
    pub win_rate: f64,
    pub average_attempts: f64,
    pub average_time: u64,
    pub longest_streak: u32,
    pub last_played: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardStats {
    pub total_players: u64,
    pub total_games: u64,
    pub total_wins: u64,
    pub win_rate: u32,
    pub top_score: f64,
    pub average_score: u64,
    pub average_attempts: f64,
    pub average_time: u64,
    pub longest_streak: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u64,
    pub total_records: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(current_page: u32, page_size: u32, total_records: u64) -> Self {
        let total_pages = total_records.div_ceil(u64::from(page_size.max(1)));

        Self {
            current_page,
            total_pages,
            total_records,
            has_next: u64::from(current_page) < total_pages,
            has_prev: current_page > 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameHistory {
    pub records: Vec<GameRecord>,
    pub pagination: Pagination,
}

/// Display fields of a user attached to their stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStatsReport {
    pub user: UserSummary,
    pub stats: UserStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(2, 20, 25, 2, false, true)]
    #[case(1, 20, 25, 2, true, false)]
    #[case(1, 20, 20, 1, false, false)]
    #[case(1, 20, 0, 0, false, false)]
    #[case(3, 10, 21, 3, false, true)]
    fn test_pagination(
        #[case] page: u32,
        #[case] page_size: u32,
        #[case] total: u64,
        #[case] total_pages: u64,
        #[case] has_next: bool,
        #[case] has_prev: bool,
    ) {
        let pagination = Pagination::new(page, page_size, total);

        assert_eq!(pagination.current_page, page);
        assert_eq!(pagination.total_pages, total_pages);
        assert_eq!(pagination.total_records, total);
        assert_eq!(pagination.has_next, has_next);
        assert_eq!(pagination.has_prev, has_prev);
    }

    #[test]
    fn test_summary_win_rate() {
        let summary = UserScoreSummary {
            user_id: "u".into(),
            total_games: 3,
            total_wins: 2,
            total_score: 0.0,
            best_score: 0.0,
            average_attempts: 0.0,
            average_time: 0.0,
            last_played: Utc::now(),
        };

        assert!((summary.win_rate() - 66.666).abs() < 0.01);
        assert_eq!(
            UserScoreSummary {
                total_games: 0,
                total_wins: 0,
                ..summary
            }
            .win_rate(),
            0.0
        );
    }

    #[test]
    fn test_user_stats_serialize_camel_case() {
        let json = serde_json::to_value(UserStats::default()).unwrap();

        assert_eq!(json["winRate"], 0);
        assert_eq!(json["longestStreak"], 0);
        assert_eq!(json["averageAttempts"], 0.0);
    }
}
