use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRef, FromRequest, FromRequestParts, Request},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        request::Parts,
        StatusCode,
    },
    Form, Json,
};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{dto::CredentialsRequest, jwt::JwtKeys};

/// Identity of the caller, established from a verified bearer token.
///
/// Rejects with a bare 401 when no `Authorization` header is sent and a bare
/// 403 when one is sent but does not carry a valid token. Handlers taking
/// this extractor never run on rejection.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            debug!("missing Authorization header");
            return Err(StatusCode::UNAUTHORIZED);
        };

        // Expect "Bearer <token>"
        let token = header
            .to_str()
            .ok()
            .and_then(|h| h.strip_prefix("Bearer ").or_else(|| h.strip_prefix("bearer ")))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                warn!("malformed Authorization header");
                StatusCode::FORBIDDEN
            })?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "invalid bearer token");
            StatusCode::FORBIDDEN
        })?;

        Ok(AuthUser {
            id: claims.user_id,
            email: claims.email,
        })
    }
}

/// Login/registration credentials from a JSON or urlencoded form body.
/// An unreadable body yields empty credentials, which handlers reject as
/// missing.
#[derive(Debug, Default)]
pub struct Credentials(pub CredentialsRequest);

#[async_trait]
impl<S> FromRequest<S> for Credentials
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        let parsed = if is_form {
            Form::<CredentialsRequest>::from_request(req, state)
                .await
                .map(|Form(c)| c)
                .map_err(|e| debug!(error = %e, "unreadable form credentials"))
                .ok()
        } else {
            Json::<CredentialsRequest>::from_request(req, state)
                .await
                .map(|Json(c)| c)
                .map_err(|e| debug!(error = %e, "unreadable json credentials"))
                .ok()
        };

        Ok(Credentials(parsed.unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[derive(Clone)]
    struct KeysOnly(JwtKeys);

    impl FromRef<KeysOnly> for JwtKeys {
        fn from_ref(input: &KeysOnly) -> Self {
            input.0.clone()
        }
    }

    async fn extract(header: Option<&str>) -> Result<AuthUser, StatusCode> {
        let state = KeysOnly(JwtKeys::new("secret"));
        let mut req = Request::builder().uri("/");
        if let Some(h) = header {
            req = req.header(AUTHORIZATION, h);
        }
        let (mut parts, _) = req.body(()).unwrap().into_parts();
        AuthUser::from_request_parts(&mut parts, &state).await
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        assert_eq!(extract(None).await.unwrap_err(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn bad_header_shapes_are_forbidden() {
        for h in ["Bearer", "Bearer ", "Basic abc", "Bearer garbage"] {
            assert_eq!(extract(Some(h)).await.unwrap_err(), StatusCode::FORBIDDEN, "{h}");
        }
    }

    #[tokio::test]
    async fn lowercase_scheme_is_accepted() {
        let id = Uuid::new_v4();
        let token = JwtKeys::new("secret").issue(id, "u@example.com").unwrap();
        let user = extract(Some(&format!("bearer {token}"))).await.unwrap();
        assert_eq!(user.id, id);
    }

    async fn credentials(content_type: Option<&str>, body: &str) -> CredentialsRequest {
        let mut req = Request::builder().method("POST").uri("/login");
        if let Some(ct) = content_type {
            req = req.header(CONTENT_TYPE, ct);
        }
        let req = req.body(axum::body::Body::from(body.to_string())).unwrap();
        let Credentials(c) = Credentials::from_request(req, &()).await.unwrap();
        c
    }

    #[tokio::test]
    async fn credentials_from_json_or_form() {
        let json = credentials(
            Some("application/json"),
            r#"{"email":"a@example.com","password":"pw"}"#,
        )
        .await;
        assert_eq!(json.email.as_deref(), Some("a@example.com"));
        assert_eq!(json.password.as_deref(), Some("pw"));

        let form = credentials(
            Some("application/x-www-form-urlencoded"),
            "email=a%40example.com&password=pw",
        )
        .await;
        assert_eq!(form.email.as_deref(), Some("a@example.com"));
        assert_eq!(form.password.as_deref(), Some("pw"));

        let none = credentials(None, "").await;
        assert!(none.email.is_none() && none.password.is_none());
    }

    #[tokio::test]
    async fn valid_token_yields_identity() {
        let id = Uuid::new_v4();
        let token = JwtKeys::new("secret").issue(id, "u@example.com").unwrap();
        let user = extract(Some(&format!("Bearer {token}"))).await.unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.email, "u@example.com");
    }
}
