// SPDX-License-Identifier: MIT

//! Exercise Tracker: record users and their exercise logs.
//!
//! This crate provides the backend API for creating users, appending
//! exercise entries to a per-user log document, and querying that log
//! with date-range filtering and result limiting.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
}
