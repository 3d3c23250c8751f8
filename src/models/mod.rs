// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod exercise;
pub mod user;

pub use exercise::{Exercise, ExerciseLog};
pub use user::User;
