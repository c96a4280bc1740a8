use std::collections::BTreeMap;

use super::models::{LeaderboardStats, UserScoreSummary, UserStats};
use super::streak::longest_streak;
use crate::scores::models::GameRecord;

pub(crate) fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn round_to_whole(value: f64) -> u64 {
    value.round().max(0.0) as u64
}

pub(crate) fn percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        0
    } else {
        (part as f64 / whole as f64 * 100.0).round() as u32
    }
}

fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Statistics of one user's complete record set. An empty set yields all-zero stats.
pub fn compute_user_stats(records: &[GameRecord]) -> UserStats {
    if records.is_empty() {
        return UserStats::default();
    }

    let total_games = records.len();
    let total_wins = records.iter().filter(|r| r.is_win).count();
    let total_score: f64 = records.iter().map(|r| r.score).sum();
    let total_attempts: f64 = records.iter().map(|r| f64::from(r.attempts)).sum();
    let total_time: f64 = records.iter().map(|r| r.time_spent).sum();
    let best_score = records.iter().map(|r| r.score).fold(0.0, f64::max);

    UserStats {
        total_games: total_games as u32,
        total_wins: total_wins as u32,
        total_score,
        win_rate: percent(total_wins as u64, total_games as u64),
        average_attempts: round_to_one_decimal(mean(total_attempts, total_games)),
        average_time: round_to_whole(mean(total_time, total_games)),
        best_score,
        longest_streak: longest_streak(records),
        total_points: records.iter().map(GameRecord::points).sum(),
    }
}

/// Groups records by user and folds each group into a summary, sorted by user id
pub fn summarize_by_user(records: &[GameRecord]) -> Vec<UserScoreSummary> {
    let mut groups: BTreeMap<&str, Vec<&GameRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.user_id.as_str()).or_default().push(record);
    }

    groups
        .into_iter()
        .filter_map(|(user_id, group)| {
            let last_played = group.iter().map(|r| r.created_at).max()?;
            let total_games = group.len();

            Some(UserScoreSummary {
                user_id: user_id.to_string(),
                total_games: total_games as u32,
                total_wins: group.iter().filter(|r| r.is_win).count() as u32,
                total_score: group.iter().map(|r| r.score).sum(),
                best_score: group.iter().map(|r| r.score).fold(0.0, f64::max),
                average_attempts: mean(
                    group.iter().map(|r| f64::from(r.attempts)).sum(),
                    total_games,
                ),
                average_time: mean(group.iter().map(|r| r.time_spent).sum(), total_games),
                last_played,
            })
        })
        .collect()
}

/// Global summary over every record. `longest_streak` is supplied by the caller since
/// it needs a per-user scan.
pub fn compute_global_stats(
    records: &[GameRecord],
    total_players: u64,
    longest_streak: u32,
) -> LeaderboardStats {
    if records.is_empty() {
        return LeaderboardStats {
            total_players,
            longest_streak,
            ..LeaderboardStats::default()
        };
    }

    let total_games = records.len();
    let total_wins = records.iter().filter(|r| r.is_win).count();

    LeaderboardStats {
        total_players,
        total_games: total_games as u64,
        total_wins: total_wins as u64,
        win_rate: percent(total_wins as u64, total_games as u64),
        top_score: records.iter().map(|r| r.score).fold(0.0, f64::max),
        average_score: round_to_whole(mean(records.iter().map(|r| r.score).sum(), total_games)),
        average_attempts: round_to_one_decimal(mean(
            records.iter().map(|r| f64::from(r.attempts)).sum(),
            total_games,
        )),
        average_time: round_to_whole(mean(
            records.iter().map(|r| r.time_spent).sum(),
            total_games,
        )),
        longest_streak,
    }
}
