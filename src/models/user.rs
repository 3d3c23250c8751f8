//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User record stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Generated UUID (also used as document ID)
    pub id: String,
    /// Username chosen at creation; never mutated
    pub username: String,
    /// When the user was created (RFC3339, internal only)
    pub created_at: String,
}
