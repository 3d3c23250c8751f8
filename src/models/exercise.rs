// SPDX-License-Identifier: MIT

//! Exercise log models for storage and API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One exercise entry in a user's log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    /// What was done
    pub description: String,
    /// Duration in minutes
    pub duration: i64,
    /// Calendar date of the exercise (stored as YYYY-MM-DD)
    pub date: NaiveDate,
}

/// Exercise log document in Firestore, one per user.
///
/// Keyed by the owning user's id. Entries are append-only; insertion
/// order is preserved and is the iteration order for queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseLog {
    /// Owning user's id (also used as document ID)
    pub user_id: String,
    #[serde(default)]
    pub entries: Vec<Exercise>,
}
