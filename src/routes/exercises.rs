// SPDX-License-Identifier: MIT

//! Exercise log routes: appending entries and querying filtered logs.

use crate::error::{AppError, Result};
use crate::models::{Exercise, User};
use crate::time_utils::{format_day_date, parse_calendar_date};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Form, Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Exercise routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users/{id}/exercises", post(add_exercise))
        .route("/api/users/{id}/logs", get(get_log))
}

// ─── Add Exercise ────────────────────────────────────────────

#[derive(Deserialize)]
struct AddExerciseForm {
    description: Option<String>,
    duration: Option<String>,
    date: Option<String>,
}

/// The single entry just added, echoed with the owning user.
#[derive(Serialize)]
pub struct ExerciseResponse {
    pub id: String,
    pub username: String,
    pub date: String,
    pub duration: i64,
    pub description: String,
}

/// Parse and validate the add-exercise form into an entry.
///
/// An absent date defaults to the current UTC date; a present but
/// malformed date is rejected rather than silently accepted.
fn parse_exercise_form(form: &AddExerciseForm, today: NaiveDate) -> Result<Exercise> {
    let description = form
        .description
        .as_deref()
        .map(str::trim)
        .unwrap_or("")
        .to_string();
    if description.is_empty() {
        return Err(AppError::BadRequest("description is required".to_string()));
    }

    let duration = form
        .duration
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| AppError::BadRequest("duration is required".to_string()))?
        .parse::<i64>()
        .map_err(|_| AppError::BadRequest("duration must be an integer".to_string()))?;

    let date = match form.date.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => parse_calendar_date(raw).ok_or_else(|| {
            AppError::BadRequest("date must be a YYYY-MM-DD calendar date".to_string())
        })?,
        None => today,
    };

    Ok(Exercise {
        description,
        duration,
        date,
    })
}

/// Append an exercise entry to a user's log.
///
/// Creates the log document on first use; responds with the entry just
/// added, not the full log.
async fn add_exercise(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(form): Form<AddExerciseForm>,
) -> Result<Json<ExerciseResponse>> {
    let entry = parse_exercise_form(&form, chrono::Utc::now().date_naive())?;

    let user = resolve_user(&state, &id).await?;

    state.db.append_exercise(&user.id, &entry).await?;

    tracing::info!(
        user_id = %user.id,
        duration = entry.duration,
        date = %entry.date,
        "Exercise added"
    );

    Ok(Json(ExerciseResponse {
        id: user.id,
        username: user.username,
        date: format_day_date(entry.date),
        duration: entry.duration,
        description: entry.description,
    }))
}

// ─── Get Log ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct LogQuery {
    /// Lower date bound, YYYY-MM-DD (inclusive)
    from: Option<String>,
    /// Upper date bound, YYYY-MM-DD (inclusive)
    to: Option<String>,
    /// Hard cap on returned entries, applied after filtering
    limit: Option<String>,
}

#[derive(Serialize)]
pub struct LogEntry {
    pub description: String,
    pub duration: i64,
    pub date: String,
}

#[derive(Serialize)]
pub struct LogResponse {
    pub id: String,
    pub username: String,
    pub count: usize,
    pub log: Vec<LogEntry>,
}

fn parse_date_param(raw: Option<&str>, name: &str) -> Result<Option<NaiveDate>> {
    raw.map(|raw| {
        parse_calendar_date(raw).ok_or_else(|| {
            AppError::BadRequest(format!("'{}' must be a YYYY-MM-DD calendar date", name))
        })
    })
    .transpose()
}

fn parse_limit(raw: Option<&str>) -> Result<Option<usize>> {
    raw.map(|raw| {
        raw.parse::<usize>()
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                AppError::BadRequest("'limit' must be a positive integer".to_string())
            })
    })
    .transpose()
}

/// Apply the date window and the entry cap, in that order.
///
/// When only one bound is given, the other defaults to the epoch date or
/// to `today`. Entries stay in insertion order throughout.
fn filter_log(
    mut entries: Vec<Exercise>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    limit: Option<usize>,
    today: NaiveDate,
) -> Vec<Exercise> {
    if from.is_some() || to.is_some() {
        let lower = from.unwrap_or_default(); // epoch, 1970-01-01
        let upper = to.unwrap_or(today);
        entries.retain(|e| lower <= e.date && e.date <= upper);
    }

    if let Some(limit) = limit {
        entries.truncate(limit);
    }

    entries
}

/// Fetch a user's exercise log with optional date-range filtering and
/// a result cap.
async fn get_log(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<LogQuery>,
) -> Result<Json<LogResponse>> {
    let from = parse_date_param(params.from.as_deref(), "from")?;
    let to = parse_date_param(params.to.as_deref(), "to")?;
    let limit = parse_limit(params.limit.as_deref())?;

    let user = resolve_user(&state, &id).await?;

    tracing::debug!(
        user_id = %user.id,
        from = ?from,
        to = ?to,
        limit = ?limit,
        "Fetching exercise log"
    );

    let entries = match state.db.get_log(&user.id).await? {
        Some(log) => log.entries,
        None => Vec::new(),
    };

    let entries = filter_log(entries, from, to, limit, chrono::Utc::now().date_naive());

    let log: Vec<LogEntry> = entries
        .into_iter()
        .map(|e| LogEntry {
            description: e.description,
            duration: e.duration,
            date: format_day_date(e.date),
        })
        .collect();

    Ok(Json(LogResponse {
        id: user.id,
        username: user.username,
        count: log.len(),
        log,
    }))
}

/// Resolve a path id to a stored user, or fail with 404.
async fn resolve_user(state: &AppState, id: &str) -> Result<User> {
    state
        .db
        .get_user(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {} not found", id)))
}
