use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{debug, instrument, warn};

use crate::shared::{AppError, AppState};

/// JWT authentication middleware - validates the Authorization Bearer header and adds AuthClaims to
/// the request.
/// Usage: .layer(middleware::from_fn_with_state(app_state.clone(), auth::jwt_auth))
/// Handlers can then extract Extension(claims): Extension<AuthClaims>.
#[instrument(skip(state, req, next))]
pub async fn jwt_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            warn!("Missing Authorization header in request");
            AppError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("Invalid Authorization header format (expected Bearer token)");
        AppError::Unauthorized("Invalid authorization header format".to_string())
    })?;

    let claims = state.token_config.validate_token(token)?;

    // A token can outlive its user, reject those the same way as a bad token
    if !state.user_repository.exists(&claims.user_id).await? {
        warn!(user_id = %claims.user_id, "Token refers to a user that no longer exists");
        return Err(AppError::Unauthorized(
            "User for this token no longer exists".to_string(),
        ));
    }

    debug!(user_id = %claims.user_id, "Authentication successful, adding claims to request");

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
