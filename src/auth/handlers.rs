use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{CredentialsRequest, MessageResponse, TokenResponse},
        extractors::{AuthUser, Credentials},
        jwt::JwtKeys,
        password,
    },
    error::{AppError, AppResult},
    state::AppState,
};

const CREDENTIALS_REQUIRED: &str = "Email and password are required.";
const EMAIL_TAKEN: &str = "Email already exists.";
const INVALID_CREDENTIALS: &str = "Invalid email or password.";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/validate-token", post(validate_token))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

fn required_credentials(payload: CredentialsRequest) -> AppResult<(String, String)> {
    payload
        .into_parts()
        .ok_or(AppError::BadRequest(CREDENTIALS_REQUIRED))
}

/// Reaching the handler means the gate accepted the token.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn validate_token(user: AuthUser) -> StatusCode {
    StatusCode::OK
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Credentials(payload): Credentials,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let (email, password) = required_credentials(payload)?;

    // Ensure email is not taken
    if state.users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict(EMAIL_TAKEN));
    }

    let hash = password::hash(password).await?;

    // The unique constraint still wins if a concurrent registration got in first.
    let Some(user) = state.users.create(&email, &hash).await? else {
        warn!(email = %email, "email registered concurrently");
        return Err(AppError::Conflict(EMAIL_TAKEN));
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully!",
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Credentials(payload): Credentials,
) -> AppResult<Json<TokenResponse>> {
    let (email, password) = required_credentials(payload)?;

    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS));
    };

    if !password::verify(password, user.password_hash.clone()).await? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS));
    }

    let token = JwtKeys::from_ref(&state).issue(user.id, &user.email)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(TokenResponse { token }))
}

/// Tokens are not revocable, so logging out changes nothing server-side.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn logout(user: AuthUser) -> Json<MessageResponse> {
    info!(email = %user.email, "user logged out");
    Json(MessageResponse {
        message: "Logged out successfully!",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_require_both_fields() {
        let missing = CredentialsRequest {
            email: Some("a@example.com".into()),
            password: None,
        };
        assert!(required_credentials(missing).is_err());

        let empty = CredentialsRequest {
            email: Some(String::new()),
            password: Some("pw".into()),
        };
        assert!(required_credentials(empty).is_err());

        assert!(required_credentials(CredentialsRequest::default()).is_err());

        let ok = CredentialsRequest {
            email: Some("a@example.com".into()),
            password: Some("pw".into()),
        };
        let (email, password) = required_credentials(ok).unwrap();
        assert_eq!(email, "a@example.com");
        assert_eq!(password, "pw");
    }
}
