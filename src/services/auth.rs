// src/services/auth.rs

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{LoginResponse, MessageResponse, RegisterRequest, User},
    repositories::UserRepository,
    utils::{
        hash::{hash_password, verify_password},
        jwt::{sign_jwt, verify_jwt},
    },
};

const BAD_CREDENTIALS: &str = "Incorrect username or password";
const USERNAME_TAKEN: &str = "Username already registered";
const EMAIL_TAKEN: &str = "Email already registered";

/// Registration, login and bearer-token resolution.
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    jwt_secret: String,
    jwt_expiration: u64,
}

impl AuthService {
    pub fn new(users: UserRepository, jwt_secret: impl Into<String>, jwt_expiration: u64) -> Self {
        Self {
            users,
            jwt_secret: jwt_secret.into(),
            jwt_expiration,
        }
    }

    /// Creates a user after validating the payload and checking uniqueness.
    ///
    /// Username conflicts are reported before email conflicts.
    pub async fn register(&self, payload: RegisterRequest) -> AppResult<User> {
        payload.validate()?;

        let hashed_password = hash_password(payload.password).await?;

        if self.users.username_taken(&payload.username).await? {
            return Err(AppError::Conflict(USERNAME_TAKEN.to_string()));
        }
        if self.users.email_taken(&payload.email).await? {
            return Err(AppError::Conflict(EMAIL_TAKEN.to_string()));
        }

        // A concurrent registration can still win between the checks and the
        // insert; the UNIQUE constraints decide it.
        let user = self
            .users
            .insert(&payload.username, &payload.email, &hashed_password)
            .await
            .map_err(registration_error)?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Verifies credentials and issues an access token.
    ///
    /// Unknown usernames and wrong passwords produce the same error.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<LoginResponse> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::AuthError(BAD_CREDENTIALS.to_string()))?;

        if !verify_password(password.to_owned(), user.password.clone()).await? {
            tracing::info!(username = %username, "Rejected login");
            return Err(AppError::AuthError(BAD_CREDENTIALS.to_string()));
        }

        if !user.is_active {
            return Err(AppError::InactiveAccount("Inactive user account".to_string()));
        }

        let access_token = sign_jwt(&user.username, &self.jwt_secret, self.jwt_expiration)?;

        tracing::info!(user_id = user.id, "User logged in");
        Ok(LoginResponse {
            access_token,
            token_type: "bearer",
            expires_in: self.jwt_expiration,
            user,
        })
    }

    /// Resolves a bearer token to the active user it was issued to.
    pub async fn resolve_current_user(&self, token: Option<&str>) -> AppResult<User> {
        let token = token.ok_or_else(|| AppError::AuthError("Not authenticated".to_string()))?;

        let claims = verify_jwt(token, &self.jwt_secret)?;

        let user = self
            .users
            .find_by_username(&claims.sub)
            .await?
            .ok_or_else(|| AppError::AuthError("Could not validate credentials".to_string()))?;

        if !user.is_active {
            return Err(AppError::AuthError("Inactive user account".to_string()));
        }

        Ok(user)
    }

    /// Tokens are stateless; they stay valid until they expire.
    pub fn logout(&self) -> MessageResponse {
        MessageResponse {
            message: "Successfully logged out".to_string(),
        }
    }
}

/// Maps an insert failure to the conflict it represents, naming the column
/// whose UNIQUE constraint fired.
fn registration_error(err: sqlx::Error) -> AppError {
    let email_clash = err
        .as_database_error()
        .filter(|db| db.is_unique_violation())
        .map(|db| db.message().contains("users.email"));

    match email_clash {
        Some(true) => AppError::Conflict(EMAIL_TAKEN.to_string()),
        Some(false) => AppError::Conflict(USERNAME_TAKEN.to_string()),
        None => {
            tracing::error!("Failed to register user: {:?}", err);
            AppError::from(err)
        }
    }
}
