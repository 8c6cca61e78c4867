//! Fitness Tracker - Workout and Meal Logging
//!
//! A Rust library for recording workouts and meals to flat CSV files,
//! summarizing calories per day or week, and estimating calories burned.
//!
//! # Features
//!
//! - Credential store with hashed passwords and an explicit session state machine
//! - Append-only workout and food logs
//! - Daily and weekly calorie summaries with per-meal totals
//! - Random-forest calorie-burn predictor refit on every request

/// Configuration management
pub mod config;
/// Username/password digest store
pub mod credentials;
/// Error types
pub mod error;
/// Food reference table
pub mod food;
/// Append-only CSV logs
pub mod log_store;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Calorie-burn predictor
pub mod predictor;
/// User profile lookup
pub mod profiles;
/// Store context used by the command handlers
pub mod service;
/// Login session state machine
pub mod session;
/// Calorie aggregation
pub mod summary;
/// Predictor training data
pub mod training;
/// Numeric and calendar helpers
pub mod utils;
/// Input validation and sanitization
pub mod validation;

// Re-export key components for easier access
pub use credentials::CredentialStore;
pub use error::{FitnessError, Result};
pub use predictor::{CaloriePredictor, PredictionInput};
pub use service::FitnessTracker;
pub use session::{Session, SessionState};
pub use summary::{CalorieSummary, Period, SummaryAggregator};
