// src/utils/jwt.rs

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, services::auth::AuthService};

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - the username the token was issued to.
    pub sub: String,
    /// Issued at, Unix timestamp.
    pub iat: usize,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

/// Signs a new access token for `username`, valid for `expiration_seconds`.
pub fn sign_jwt(username: &str, secret: &str, expiration_seconds: u64) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;

    let claims = Claims {
        sub: username.to_owned(),
        iat: now,
        exp: now + expiration_seconds as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a JWT string.
///
/// Returns the `Claims` if the signature and expiry check out,
/// otherwise an `AppError::AuthError`.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::AuthError("Token has expired".to_string()),
        ErrorKind::InvalidSignature => {
            AppError::AuthError("Token signature is invalid".to_string())
        }
        _ => AppError::AuthError("Could not validate credentials".to_string()),
    })
}

/// Pulls the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Axum Middleware: Authentication.
///
/// Validates the bearer token and resolves it to an active user.
/// On success the `User` is injected into the request extensions;
/// otherwise the request is answered with 401 before reaching the handler.
pub async fn auth_middleware(
    State(auth): State<AuthService>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = auth.resolve_current_user(bearer_token(req.headers())).await?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &str = "unit_test_secret";

    #[test]
    fn sign_and_verify_roundtrip() {
        let token = sign_jwt("alice", SECRET, 1800).unwrap();
        let claims = verify_jwt(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.exp - claims.iat, 1800);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sign_jwt("alice", SECRET, 1800).unwrap();
        let err = verify_jwt(&token, "other_secret").unwrap_err();
        assert!(matches!(err, AppError::AuthError(_)));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = sign_jwt("alice", SECRET, 1800).unwrap();
        let forged = sign_jwt("mallory", "attacker_secret", 1800).unwrap();
        // header.payload of the forged token with alice's signature
        let mut parts: Vec<&str> = forged.split('.').collect();
        parts[2] = token.split('.').nth(2).unwrap();
        assert!(verify_jwt(&parts.join("."), SECRET).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: "alice".into(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        match verify_jwt(&token, SECRET) {
            Err(AppError::AuthError(msg)) => assert!(msg.contains("expired")),
            other => panic!("expected expiry error, got {:?}", other),
        }
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(verify_jwt("not.a.token", SECRET).is_err());
    }

    #[test]
    fn bearer_header_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }
}
