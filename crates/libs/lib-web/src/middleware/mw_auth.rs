//! # Authentication Middleware
//!
//! Verifies the bearer token on a request and exposes its claims to handlers.
//!
//! No route in [`crate::server::create_router`] is wrapped with it. Routes
//! that should require a token opt in explicitly:
//!
//! ```rust,ignore
//! use axum::{middleware::from_fn_with_state, routing::get, Router};
//! use lib_web::middleware::require_auth;
//!
//! let protected = Router::new()
//!     .route("/me", get(me))
//!     .layer(from_fn_with_state(config.clone(), require_auth));
//! ```
//!
//! Handlers then read the claims with `Extension<Claims>`.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use lib_auth::decode_token;
use lib_core::{AppError, Config};
use tracing::{debug, warn};

/// Reject requests without a valid `Authorization: Bearer <token>` header.
///
/// - **Valid token**: continues with `Claims` in request extensions
/// - **Missing header, wrong scheme, bad signature or expired**: `401`
///   with `{"error": true, "message": "Invalid authorization"}`
pub async fn require_auth(
    State(config): State<Config>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            warn!("[AUTH] Missing Authorization header");
            AppError::InvalidAuthorization("missing header".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("[AUTH] Invalid Authorization header format");
        AppError::InvalidAuthorization("not a bearer token".to_string())
    })?;

    let claims = decode_token(token.trim(), &config.token_secret).map_err(|e| {
        warn!("[AUTH] Token verification failed: {}", e);
        AppError::InvalidAuthorization(e.to_string())
    })?;

    debug!("[AUTH] Authenticated {}", claims.email);

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
