// SPDX-License-Identifier: MIT

//! User creation and listing routes.

use crate::error::{AppError, Result};
use crate::models::User;
use crate::AppState;
use axum::{extract::State, routing::post, Form, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// User routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/users", post(create_user).get(list_users))
}

/// User as exposed through the API (internal fields stripped).
#[derive(Serialize)]
pub struct UserResponse {
    pub username: String,
    pub id: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            id: user.id,
        }
    }
}

#[derive(Deserialize)]
struct CreateUserForm {
    username: Option<String>,
}

/// Create a user, or fetch the existing one with the same username.
///
/// The existence check and the insert are separate store calls, so two
/// concurrent creates for a brand-new username can both insert. Duplicate
/// usernames are tolerated; lookups take the first match.
async fn create_user(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CreateUserForm>,
) -> Result<Json<UserResponse>> {
    let username = form.username.as_deref().map(str::trim).unwrap_or("");
    if username.is_empty() {
        return Err(AppError::BadRequest("username is required".to_string()));
    }

    if let Some(existing) = state.db.find_user_by_username(username).await? {
        tracing::debug!(username, id = %existing.id, "Username exists, returning stored user");
        return Ok(Json(existing.into()));
    }

    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        username: username.to_string(),
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    state.db.insert_user(&user).await?;

    tracing::info!(username, id = %user.id, "User created");

    Ok(Json(user.into()))
}

/// List all users. An empty store yields an empty array.
async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<UserResponse>>> {
    let users = state.db.list_users().await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
