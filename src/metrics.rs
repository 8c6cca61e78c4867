//! Metrics emitted through the `metrics` facade.
//!
//! Nothing is recorded unless the embedding process installs a recorder, so
//! these calls are free for the CLI.

use metrics::{counter, histogram};
use std::time::Duration;

/// Entries appended to a log, labelled by log kind
pub const ENTRIES_LOGGED_TOTAL: &str = "fitness_tracker_entries_logged_total";
/// Login attempts, labelled by outcome
pub const LOGIN_ATTEMPTS_TOTAL: &str = "fitness_tracker_login_attempts_total";
/// Summaries computed, labelled by period
pub const SUMMARIES_TOTAL: &str = "fitness_tracker_summaries_total";
/// Wall time of fit-and-predict
pub const PREDICTION_DURATION: &str = "fitness_tracker_prediction_duration_seconds";

/// Record an appended log entry
pub fn record_entry_logged(kind: &'static str) {
    counter!(ENTRIES_LOGGED_TOTAL, "log" => kind).increment(1);
}

/// Record a login attempt
pub fn record_login(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!(LOGIN_ATTEMPTS_TOTAL, "outcome" => outcome).increment(1);
}

/// Record a computed summary
pub fn record_summary(period: &'static str) {
    counter!(SUMMARIES_TOTAL, "period" => period).increment(1);
}

/// Record how long a prediction (including the refit) took
pub fn record_prediction(duration: Duration) {
    histogram!(PREDICTION_DURATION).record(duration.as_secs_f64());
}
