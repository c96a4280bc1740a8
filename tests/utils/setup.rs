use std::sync::Arc;

use numguess::{
    build_router, AppConfig, AppState, InMemoryGameRecordRepository, InMemoryUserRepository,
    ScoreRecorder, StatsService, TokenConfig, UserModel, UserRepository,
};
use numguess::user::models::UserRole;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub state: AppState,
    pub users: Arc<InMemoryUserRepository>,
    pub scores: Arc<InMemoryGameRecordRepository>,
    pub players: Vec<UserModel>,
}

#[allow(dead_code)]
impl TestSetup {
    pub fn recorder(&self) -> ScoreRecorder {
        ScoreRecorder::new(self.scores.clone(), self.users.clone())
    }

    pub fn stats(&self) -> StatsService {
        StatsService::new(self.scores.clone(), self.users.clone())
    }

    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    pub fn player(&self, name: &str) -> &UserModel {
        self.players
            .iter()
            .find(|p| p.name == name)
            .unwrap_or_else(|| panic!("no player named {}", name))
    }

    pub fn token_for(&self, name: &str) -> String {
        let player = self.player(name);
        self.state
            .token_config
            .create_token(&player.id, &player.email)
            .unwrap()
    }
}

pub struct TestSetupBuilder {
    players: Vec<String>,
    config: AppConfig,
}

#[allow(dead_code)]
impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            players: vec![],
            config: AppConfig::default(),
        }
    }

    pub fn with_players(mut self, players: Vec<&str>) -> Self {
        self.players = players.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_two_players(self) -> Self {
        self.with_players(vec!["alice", "bob"])
    }

    pub fn with_leaderboard_default_limit(mut self, limit: usize) -> Self {
        self.config.leaderboard_default_limit = limit;
        self
    }

    pub async fn build(self) -> TestSetup {
        let users = Arc::new(InMemoryUserRepository::new());
        let scores = Arc::new(InMemoryGameRecordRepository::new());

        let mut players = Vec::new();
        for name in &self.players {
            let player = UserModel::new(
                name.clone(),
                format!("{}@example.com", name),
                UserRole::User,
            );
            users.create_user(&player).await.unwrap();
            players.push(player);
        }

        let state = AppState::new(
            users.clone(),
            scores.clone(),
            TokenConfig::with_secret("integration-secret", 1),
            self.config,
        );

        TestSetup {
            state,
            users,
            scores,
            players,
        }
    }
}
