use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameType {
    #[default]
    NumberGuessing,
    WordGuessing,
    General,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Multiplier applied to a winning game's points
    pub fn points_multiplier(self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 1.5,
            Difficulty::Hard => 2.0,
        }
    }
}

/// Attempts at or above this earn no attempt bonus
const BONUS_MAX_ATTEMPTS: u32 = 10;
/// Seconds at or above this earn no speed bonus
const BONUS_MAX_SECONDS: f64 = 300.0;
const WIN_BASE_POINTS: f64 = 100.0;

/// A completed game as submitted, before the store assigns identity
#[derive(Debug, Clone, PartialEq)]
pub struct NewGameRecord {
    pub user_id: String,
    pub game_type: GameType,
    pub score: f64,
    pub attempts: u32,
    pub time_spent: f64,
    pub difficulty: Difficulty,
    pub is_win: bool,
    pub target_number: Option<f64>,
    pub guessed_number: Option<f64>,
    pub hints: Vec<String>,
}

/// One completed game. Never mutated after it is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub id: String,
    pub user_id: String,
    pub game_type: GameType,
    pub score: f64,
    pub attempts: u32,
    pub time_spent: f64,
    pub difficulty: Difficulty,
    pub is_win: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_number: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guessed_number: Option<f64>,
    pub hints: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl GameRecord {
    /// Assigns a fresh id and creation timestamp. The timestamp is cut to microseconds,
    /// the precision a stored `TIMESTAMPTZ` keeps.
    pub fn from_new(new_record: NewGameRecord) -> Self {
        Self::from_new_at(new_record, Utc::now().trunc_subsecs(6))
    }

    pub fn from_new_at(new_record: NewGameRecord, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: new_record.user_id,
            game_type: new_record.game_type,
            score: new_record.score,
            attempts: new_record.attempts,
            time_spent: new_record.time_spent,
            difficulty: new_record.difficulty,
            is_win: new_record.is_win,
            target_number: new_record.target_number,
            guessed_number: new_record.guessed_number,
            hints: new_record.hints,
            created_at,
        }
    }

    /// Performance points for this game. Losses are worth nothing; wins get a base plus
    /// bonuses for few attempts and speed, scaled by difficulty.
    pub fn points(&self) -> u64 {
        if !self.is_win {
            return 0;
        }

        let attempt_bonus = BONUS_MAX_ATTEMPTS.saturating_sub(self.attempts) as f64 * 10.0;
        let time_bonus = ((BONUS_MAX_SECONDS - self.time_spent) / 10.0).max(0.0).round();
        let points = (WIN_BASE_POINTS + attempt_bonus + time_bonus)
            * self.difficulty.points_multiplier();

        points.round() as u64
    }
}
