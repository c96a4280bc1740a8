use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::models::{GameRecord, NewGameRecord};
use super::repository::GameRecordRepository;
use crate::shared::AppError;
use crate::user::repository::UserRepository;

/// Persists completed games for known users
pub struct ScoreRecorder {
    scores: Arc<dyn GameRecordRepository>,
    users: Arc<dyn UserRepository>,
}

impl ScoreRecorder {
    pub fn new(scores: Arc<dyn GameRecordRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { scores, users }
    }

    /// Appends the game for its user. Fails with `NotFound`, appending nothing, when the
    /// user does not exist. Derived statistics are recomputed on the next read.
    #[instrument(skip(self, new_record), fields(user_id = %new_record.user_id))]
    pub async fn record_score(&self, new_record: NewGameRecord) -> Result<GameRecord, AppError> {
        if !self.users.exists(&new_record.user_id).await? {
            warn!("Refusing to record score for unknown user");
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let record = self.scores.append(new_record).await?;

        info!(
            record_id = %record.id,
            score = record.score,
            is_win = record.is_win,
            "Game score recorded"
        );
        Ok(record)
    }
}
