//! # User Handlers

use crate::services::AccountService;
use axum::extract::{Json, Path, Query, State};
use lib_core::dto::{
    DeleteResult, InsertResult, LoginRequest, RegisterRequest, TokenResponse, UserListQuery,
};
use lib_core::model::store::{parse_object_id, User};
use lib_core::{Result, UserStore};
use std::sync::Arc;
use tracing::{debug, info};

/// `POST /users` - register a user.
///
/// `400 {"message": "User already exists"}` when the email is taken.
pub async fn register(
    State(accounts): State<Arc<AccountService>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<InsertResult>> {
    info!("[USERS] Registration request");
    accounts.register(req).await.map(Json)
}

/// `POST /users/login` - exchange credentials for a token.
///
/// `401 {"message": "Login failed"}` for any bad credential.
pub async fn login(
    State(accounts): State<Arc<AccountService>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    info!("[USERS] Login attempt");
    accounts.login(req).await.map(Json)
}

/// `GET /users?name=` - list users, optionally filtered by name.
pub async fn list_users(
    State(users): State<Arc<dyn UserStore>>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Vec<User>>> {
    let found = users.list_users(query.name_filter()).await?;
    debug!("[USERS] Listed {} users", found.len());
    Ok(Json(found))
}

/// `GET /users/{userName}` - user with that exact `userName`, or `null`.
pub async fn get_user(
    State(users): State<Arc<dyn UserStore>>,
    Path(user_name): Path<String>,
) -> Result<Json<Option<User>>> {
    users.find_user_by_user_name(&user_name).await.map(Json)
}

/// `GET /users/login` - the user whose `userName` is `login`, or `null`.
///
/// The static login route takes precedence over `/users/{userName}`, so the
/// GET side of it answers the lookup itself.
pub async fn get_login_user(
    State(users): State<Arc<dyn UserStore>>,
) -> Result<Json<Option<User>>> {
    users.find_user_by_user_name("login").await.map(Json)
}

/// `DELETE /users/{id}`
pub async fn delete_user(
    State(users): State<Arc<dyn UserStore>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>> {
    let id = parse_object_id(&id)?;
    let result = users.delete_user(id).await?;
    info!("[USERS] Deleted {} user(s) with id {}", result.deleted_count, id);
    Ok(Json(result))
}
