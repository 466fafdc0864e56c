//! # Account Service
//!
//! Registration and login.
//!
//! Argon2 is deliberately slow, so hashing and verification run on the
//! blocking thread pool instead of the request task.
//!
//! ## Error Handling
//!
//! - `AppError::UserExists` - email already registered
//! - `AppError::LoginFailed` - unknown email, wrong password or unusable hash
//! - `AppError::Hashing` - the password could not be hashed

use lib_auth::{encode_token, hash_password, verify_password};
use lib_core::dto::{InsertResult, LoginRequest, RegisterRequest, TokenResponse};
use lib_core::model::store::UserForCreate;
use lib_core::{AppError, Config, Result, UserStore};
use lib_utils::now_utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Service for user credentials.
pub struct AccountService {
    users: Arc<dyn UserStore>,
    config: Config,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserStore>, config: Config) -> Self {
        Self { users, config }
    }

    /// Register a new user unless the email is already taken.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register(&self, req: RegisterRequest) -> Result<InsertResult> {
        if self.users.find_user_by_email(&req.email).await?.is_some() {
            warn!("[REGISTER] Email already registered: {}", req.email);
            return Err(AppError::UserExists);
        }

        debug!("[REGISTER] Hashing password...");
        let password = req.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::Hashing(e.to_string()))?
            .map_err(|e| AppError::Hashing(e.to_string()))?;

        let result = self
            .users
            .insert_user(UserForCreate {
                name: req.name,
                user_name: req.user_name,
                image: req.image,
                role: req.role,
                email: req.email,
                password_hash,
                created_at: now_utc(),
            })
            .await?;

        info!("[REGISTER] User created with id {}", result.inserted_id);
        Ok(result)
    }

    /// Check credentials and issue a bearer token for the email.
    ///
    /// Every rejection is the same [`AppError::LoginFailed`] to the client;
    /// only the log says why.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> Result<TokenResponse> {
        let user = self
            .users
            .find_user_by_email(&req.email)
            .await?
            .ok_or_else(|| AppError::LoginFailed(format!("no user with email {}", req.email)))?;

        let password = req.password;
        let stored_hash = user.password_hash;
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .map_err(|e| AppError::LoginFailed(e.to_string()))?;

        if !matches {
            return Err(AppError::LoginFailed(format!(
                "password mismatch for {}",
                req.email
            )));
        }

        let token = encode_token(
            &user.email,
            &self.config.token_secret,
            self.config.token_expiration_days,
        )
        .map_err(|e| AppError::Internal(e.to_string()))?;

        info!("[LOGIN] Token issued for {}", user.email);
        Ok(TokenResponse { token })
    }
}
