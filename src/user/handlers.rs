use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument, warn};

use super::{
    models::{UserModel, UserRole},
    types::{CreateUserRequest, RegisterResponse, UserResponse},
};
use crate::shared::{AppError, AppState};

/// POST /users
/// Registers a user and returns it with a bearer token
#[instrument(name = "register_user", skip(state, payload))]
pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let (name, email) = payload.validate()?;

    if state.user_repository.find_by_email(&email).await?.is_some() {
        warn!("Registration rejected, email already in use");
        return Err(AppError::Conflict("Email is already registered".to_string()));
    }

    let user = UserModel::new(name, email, UserRole::User);
    state.user_repository.create_user(&user).await?;
    let token = state.token_config.create_token(&user.id, &user.email)?;

    info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: UserResponse::from(user),
            token,
        }),
    ))
}

/// GET /users/:user_id
#[instrument(name = "get_user", skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .user_repository
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::Request,
        routing::{get, post},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt; // for `oneshot`

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/users", post(register_user))
            .route("/users/:user_id", get(get_user))
            .with_state(state)
    }

    fn register_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/users")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_register_user_issues_valid_token() {
        let state = AppStateBuilder::new().build();

        let response = app(state.clone())
            .oneshot(register_request(
                json!({ "name": "Alice", "email": "alice@example.com" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let registered: RegisterResponse =
            serde_json::from_value(read_json(response).await).unwrap();
        assert_eq!(registered.user.name, "Alice");

        let claims = state.token_config.validate_token(&registered.token).unwrap();
        assert_eq!(claims.user_id, registered.user.id);
        assert!(state
            .user_repository
            .exists(&registered.user.id)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let state = AppStateBuilder::new().build();
        let body = json!({ "name": "Alice", "email": "alice@example.com" });

        let first = app(state.clone())
            .oneshot(register_request(body.clone()))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = app(state).oneshot(register_request(body)).await.unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_register_email_differing_only_in_case_conflicts() {
        let state = AppStateBuilder::new().build();

        let first = app(state.clone())
            .oneshot(register_request(
                json!({ "name": "Alice", "email": "alice@example.com" }),
            ))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);
        let registered: RegisterResponse =
            serde_json::from_value(read_json(first).await).unwrap();
        assert_eq!(registered.user.email, "alice@example.com");

        let second = app(state)
            .oneshot(register_request(
                json!({ "name": "Alice Two", "email": "ALICE@Example.com" }),
            ))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_register_invalid_name() {
        let state = AppStateBuilder::new().build();

        let response = app(state)
            .oneshot(register_request(json!({ "name": "x", "email": "x@example.com" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_user() {
        let state = AppStateBuilder::new().build();
        let user = UserModel::new("Bob".into(), "bob@example.com".into(), UserRole::Admin);
        state.user_repository.create_user(&user).await.unwrap();

        let found = app(state.clone())
            .oneshot(
                Request::builder()
                    .uri(format!("/users/{}", user.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(found.status(), StatusCode::OK);
        let body = read_json(found).await;
        assert_eq!(body["name"], "Bob");
        assert_eq!(body["role"], "admin");

        let missing = app(state)
            .oneshot(
                Request::builder()
                    .uri("/users/ghost")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
