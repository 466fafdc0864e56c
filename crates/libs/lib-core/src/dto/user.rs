//! # User DTOs
//!
//! - `POST /users` - [`RegisterRequest`] -> [`InsertResult`](super::InsertResult)
//! - `POST /users/login` - [`LoginRequest`] -> [`TokenResponse`]
//! - `GET /users?name=` - [`UserListQuery`]

use serde::{Deserialize, Serialize};

/// Registration body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListQuery {
    pub name: Option<String>,
}

impl UserListQuery {
    /// Name filter, with an empty value meaning none.
    pub fn name_filter(&self) -> Option<&str> {
        self.name.as_deref().filter(|s| !s.is_empty())
    }
}
