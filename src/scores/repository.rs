use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::str::FromStr;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::{Difficulty, GameRecord, GameType, NewGameRecord};
use crate::shared::AppError;
use crate::stats::{aggregator::summarize_by_user, models::UserScoreSummary};

/// One page of a user's history plus the user's total record count
#[derive(Debug, Clone)]
pub struct RecordPage {
    pub records: Vec<GameRecord>,
    pub total: u64,
}

/// Append-only store of completed games
#[async_trait]
pub trait GameRecordRepository: Send + Sync {
    /// Stores a new record, assigning its id and creation timestamp
    async fn append(&self, new_record: NewGameRecord) -> Result<GameRecord, AppError>;

    /// All records of a user in store order (append order); callers sort as needed
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<GameRecord>, AppError>;

    /// Records of a user newest first. `page` is 1-based.
    async fn find_by_user_paged(
        &self,
        user_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<RecordPage, AppError>;

    async fn count_by_user(&self, user_id: &str) -> Result<u64, AppError>;
    async fn all(&self) -> Result<Vec<GameRecord>, AppError>;

    /// Ids of users with at least one record, sorted
    async fn distinct_user_ids(&self) -> Result<Vec<String>, AppError>;

    /// Per-user aggregates over the whole store, sorted by user id
    async fn user_summaries(&self) -> Result<Vec<UserScoreSummary>, AppError>;
}

/// In-memory implementation of GameRecordRepository for development and testing
#[derive(Debug, Default)]
pub struct InMemoryGameRecordRepository {
    records: RwLock<Vec<GameRecord>>,
}

impl InMemoryGameRecordRepository {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Creates a repository holding the given records in the given order
    pub fn with_records(records: Vec<GameRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl GameRecordRepository for InMemoryGameRecordRepository {
    #[instrument(skip(self, new_record), fields(user_id = %new_record.user_id))]
    async fn append(&self, new_record: NewGameRecord) -> Result<GameRecord, AppError> {
        let record = GameRecord::from_new(new_record);

        self.records.write().await.push(record.clone());

        debug!(record_id = %record.id, "Game record appended in memory");
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<GameRecord>, AppError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn find_by_user_paged(
        &self,
        user_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<RecordPage, AppError> {
        let mut records = self.find_by_user(user_id).await?;
        let total = records.len() as u64;

        // Newest append first among equal timestamps
        records.reverse();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let skip = (page.saturating_sub(1) as usize).saturating_mul(page_size as usize);
        let records = records
            .into_iter()
            .skip(skip)
            .take(page_size as usize)
            .collect();

        Ok(RecordPage { records, total })
    }

    #[instrument(skip(self))]
    async fn count_by_user(&self, user_id: &str) -> Result<u64, AppError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|record| record.user_id == user_id)
            .count() as u64)
    }

    #[instrument(skip(self))]
    async fn all(&self) -> Result<Vec<GameRecord>, AppError> {
        Ok(self.records.read().await.clone())
    }

    #[instrument(skip(self))]
    async fn distinct_user_ids(&self) -> Result<Vec<String>, AppError> {
        let records = self.records.read().await;
        let mut user_ids: Vec<String> = records.iter().map(|r| r.user_id.clone()).collect();
        user_ids.sort();
        user_ids.dedup();
        Ok(user_ids)
    }

    #[instrument(skip(self))]
    async fn user_summaries(&self) -> Result<Vec<UserScoreSummary>, AppError> {
        let records = self.records.read().await;
        Ok(summarize_by_user(&records))
    }
}

const RECORD_COLUMNS: &str = "id, user_id, game_type, score, attempts, time_spent, difficulty, \
     is_win, target_number, guessed_number, hints, created_at";

/// PostgreSQL implementation of the game record store. `seq` preserves append order
/// for records that share a timestamp.
pub struct PostgresGameRecordRepository {
    pool: PgPool,
}

impl PostgresGameRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_row(row: &PgRow) -> Result<GameRecord, AppError> {
        let game_type: String = row.get("game_type");
        let difficulty: String = row.get("difficulty");
        let attempts: i32 = row.get("attempts");

        Ok(GameRecord {
            id: row.get("id"),
            user_id: row.get("user_id"),
            game_type: GameType::from_str(&game_type)
                .map_err(|_| AppError::DatabaseError(format!("Unknown game type: {}", game_type)))?,
            score: row.get("score"),
            attempts: u32::try_from(attempts)
                .map_err(|_| AppError::DatabaseError(format!("Invalid attempts: {}", attempts)))?,
            time_spent: row.get("time_spent"),
            difficulty: Difficulty::from_str(&difficulty).map_err(|_| {
                AppError::DatabaseError(format!("Unknown difficulty: {}", difficulty))
            })?,
            is_win: row.get("is_win"),
            target_number: row.get("target_number"),
            guessed_number: row.get("guessed_number"),
            hints: row.get("hints"),
            created_at: row.get("created_at"),
        })
    }

    fn map_rows(rows: &[PgRow]) -> Result<Vec<GameRecord>, AppError> {
        rows.iter().map(Self::map_row).collect()
    }

    fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> AppError {
        move |e| {
            warn!(error = %e, "{}", context);
            AppError::DatabaseError(e.to_string())
        }
    }
}

#[async_trait]
impl GameRecordRepository for PostgresGameRecordRepository {
    #[instrument(skip(self, new_record), fields(user_id = %new_record.user_id))]
    async fn append(&self, new_record: NewGameRecord) -> Result<GameRecord, AppError> {
        let record = GameRecord::from_new(new_record);
        let attempts = i32::try_from(record.attempts)
            .map_err(|_| AppError::Validation("Attempts out of range".to_string()))?;

        sqlx::query(
            "INSERT INTO game_records (id, user_id, game_type, score, attempts, time_spent, difficulty, \
             is_win, target_number, guessed_number, hints, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(&record.id)
        .bind(&record.user_id)
        .bind(record.game_type.as_ref())
        .bind(record.score)
        .bind(attempts)
        .bind(record.time_spent)
        .bind(record.difficulty.as_ref())
        .bind(record.is_win)
        .bind(record.target_number)
        .bind(record.guessed_number)
        .bind(&record.hints)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(Self::db_error("Failed to append game record"))?;

        debug!(record_id = %record.id, "Game record appended in database");
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<GameRecord>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM game_records WHERE user_id = $1 ORDER BY seq",
            RECORD_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Self::db_error("Failed to fetch user game records"))?;

        Self::map_rows(&rows)
    }

    #[instrument(skip(self))]
    async fn find_by_user_paged(
        &self,
        user_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<RecordPage, AppError> {
        let offset = i64::from(page.saturating_sub(1)) * i64::from(page_size);

        let rows = sqlx::query(&format!(
            "SELECT {} FROM game_records WHERE user_id = $1 \
             ORDER BY created_at DESC, seq DESC LIMIT $2 OFFSET $3",
            RECORD_COLUMNS
        ))
        .bind(user_id)
        .bind(i64::from(page_size))
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(Self::db_error("Failed to fetch game history page"))?;

        let total = self.count_by_user(user_id).await?;

        Ok(RecordPage {
            records: Self::map_rows(&rows)?,
            total,
        })
    }

    #[instrument(skip(self))]
    async fn count_by_user(&self, user_id: &str) -> Result<u64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM game_records WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(Self::db_error("Failed to count user game records"))?;

        let total: i64 = row.get("total");
        Ok(total.max(0) as u64)
    }

    #[instrument(skip(self))]
    async fn all(&self) -> Result<Vec<GameRecord>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM game_records ORDER BY seq",
            RECORD_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(Self::db_error("Failed to fetch all game records"))?;

        Self::map_rows(&rows)
    }

    #[instrument(skip(self))]
    async fn distinct_user_ids(&self) -> Result<Vec<String>, AppError> {
        let rows = sqlx::query("SELECT DISTINCT user_id FROM game_records ORDER BY user_id")
            .fetch_all(&self.pool)
            .await
            .map_err(Self::db_error("Failed to fetch distinct user ids"))?;

        Ok(rows.iter().map(|row| row.get("user_id")).collect())
    }

    #[instrument(skip(self))]
    async fn user_summaries(&self) -> Result<Vec<UserScoreSummary>, AppError> {
        let rows = sqlx::query(
            "SELECT user_id, \
                    COUNT(*) AS total_games, \
                    COUNT(*) FILTER (WHERE is_win) AS total_wins, \
                    SUM(score) AS total_score, \
                    MAX(score) AS best_score, \
                    AVG(attempts)::DOUBLE PRECISION AS average_attempts, \
                    AVG(time_spent) AS average_time, \
                    MAX(created_at) AS last_played \
             FROM game_records GROUP BY user_id ORDER BY user_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Self::db_error("Failed to aggregate game records per user"))?;

        let summaries = rows
            .iter()
            .map(|row| {
                let total_games: i64 = row.get("total_games");
                let total_wins: i64 = row.get("total_wins");
                UserScoreSummary {
                    user_id: row.get("user_id"),
                    total_games: total_games.max(0) as u32,
                    total_wins: total_wins.max(0) as u32,
                    total_score: row.get("total_score"),
                    best_score: row.get("best_score"),
                    average_attempts: row.get("average_attempts"),
                    average_time: row.get("average_time"),
                    last_played: row.get("last_played"),
                }
            })
            .collect::<Vec<_>>();

        debug!(groups = summaries.len(), "Aggregated game records in database");
        Ok(summaries)
    }
}
