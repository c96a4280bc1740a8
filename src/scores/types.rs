use serde::{Deserialize, Serialize};

use super::models::{Difficulty, GameRecord, GameType, NewGameRecord};
use crate::shared::AppError;

/// Request payload for recording a completed game. The user comes from the bearer token.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordScoreRequest {
    #[serde(default)]
    pub game_type: GameType,
    pub score: f64,
    pub attempts: u32,
    pub time_spent: f64,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub is_win: bool,
    pub target_number: Option<f64>,
    pub guessed_number: Option<f64>,
    #[serde(default)]
    pub hints: Vec<String>,
}

impl RecordScoreRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.score.is_finite() || self.score < 0.0 {
            return Err(AppError::Validation(
                "Score must be a non-negative number".to_string(),
            ));
        }
        if self.attempts < 1 {
            return Err(AppError::Validation(
                "Attempts must be a positive integer".to_string(),
            ));
        }
        if !self.time_spent.is_finite() || self.time_spent < 0.0 {
            return Err(AppError::Validation(
                "Time spent must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }

    pub fn into_new_record(self, user_id: String) -> NewGameRecord {
        NewGameRecord {
            user_id,
            game_type: self.game_type,
            score: self.score,
            attempts: self.attempts,
            time_spent: self.time_spent,
            difficulty: self.difficulty,
            is_win: self.is_win,
            target_number: self.target_number,
            guessed_number: self.guessed_number,
            hints: self.hints,
        }
    }
}

/// A stored game as returned by the API, with its derived points
#[derive(Debug, Serialize, Deserialize)]
pub struct GameRecordResponse {
    #[serde(flatten)]
    pub record: GameRecord,
    pub points: u64,
}

impl From<GameRecord> for GameRecordResponse {
    fn from(record: GameRecord) -> Self {
        let points = record.points();
        Self { record, points }
    }
}
