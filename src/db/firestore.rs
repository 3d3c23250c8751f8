// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (id + username records)
//! - Exercise logs (one append-only document per user)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Exercise, ExerciseLog, User};

// Transactions with registered reads abort on contention; a handful of
// attempts is enough for concurrent appends to the same log.
const MAX_TXN_ATTEMPTS: usize = 5;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // Use ExternalJwtFunctionSource to provide a dummy token without needing async-trait
        // or a custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    /// Whether a string is usable as a Firestore document id.
    ///
    /// Malformed ids must resolve to "not found" rather than a query error.
    fn valid_doc_id(id: &str) -> bool {
        !id.is_empty() && id.len() <= 1500 && !id.contains('/')
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by id. Malformed ids resolve to `None`.
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        if !Self::valid_doc_id(id) {
            return Ok(None);
        }

        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by exact username match.
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let username = username.to_string();
        let mut matches: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.for_all([q.field("username").eq(username.clone())]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(matches.pop())
    }

    /// List all users, in store order.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a new user record, keyed by its freshly generated id.
    pub async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Exercise Log Operations ─────────────────────────────────

    /// Get the exercise log document for a user id, if one exists.
    pub async fn get_log(&self, user_id: &str) -> Result<Option<ExerciseLog>, AppError> {
        if !Self::valid_doc_id(user_id) {
            return Ok(None);
        }

        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::EXERCISE_LOGS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Append an exercise entry to a user's log, creating the log
    /// document with this single entry if it does not exist yet.
    ///
    /// The read-append-write runs inside a Firestore transaction with
    /// the read registered against it, so a concurrent append for the
    /// same user aborts the commit and is retried with fresh data
    /// instead of losing entries.
    ///
    /// Returns the log as written, with the new entry last.
    pub async fn append_exercise(
        &self,
        user_id: &str,
        entry: &Exercise,
    ) -> Result<ExerciseLog, AppError> {
        let mut attempt = 1;
        loop {
            match self.append_exercise_txn(user_id, entry).await {
                Ok(log) => return Ok(log),
                Err(err) if attempt < MAX_TXN_ATTEMPTS => {
                    tracing::warn!(
                        user_id,
                        attempt,
                        error = %err,
                        "Log append transaction failed, retrying"
                    );
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// One transactional append attempt.
    async fn append_exercise_txn(
        &self,
        user_id: &str,
        entry: &Exercise,
    ) -> Result<ExerciseLog, AppError> {
        let mut transaction = self
            .get_client()?
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        // Read the current log with the transaction's consistency selector.
        // This registers the document so the commit detects conflicts.
        let current: Option<ExerciseLog> = self
            .get_client()?
            .clone_with_consistency_selector(firestore::FirestoreConsistencySelector::Transaction(
                transaction.transaction_id().clone(),
            ))
            .fluent()
            .select()
            .by_id_in(collections::EXERCISE_LOGS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to read log in transaction: {}", e)))?;

        let mut log = current.unwrap_or_else(|| ExerciseLog {
            user_id: user_id.to_string(),
            entries: Vec::new(),
        });
        log.entries.push(entry.clone());

        self.get_client()?
            .fluent()
            .update()
            .in_col(collections::EXERCISE_LOGS)
            .document_id(user_id)
            .object(&log)
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(format!("Failed to add log to transaction: {}", e)))?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::debug!(
            user_id,
            entries = log.entries.len(),
            "Exercise appended to log"
        );

        Ok(log)
    }
}
