use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use numguess::{Difficulty, GameType, NewGameRecord};
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`

/// A finished number guessing game for `user_id` with fixed attempts and time
#[allow(dead_code)]
pub fn game(user_id: &str, score: f64, is_win: bool) -> NewGameRecord {
    NewGameRecord {
        user_id: user_id.to_string(),
        game_type: GameType::NumberGuessing,
        score,
        attempts: 4,
        time_spent: 30.0,
        difficulty: Difficulty::Medium,
        is_win,
        target_number: Some(42.0),
        guessed_number: Some(42.0),
        hints: vec!["lower".to_string()],
    }
}

/// Sends requests through the full router, one `oneshot` per call
pub struct ApiClient {
    router: Router,
}

#[allow(dead_code)]
impl ApiClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }
}
