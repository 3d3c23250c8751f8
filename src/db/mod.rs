//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Exercise log documents (keyed by user id)
    pub const EXERCISE_LOGS: &str = "exercise_logs";
}
