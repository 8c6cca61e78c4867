use chrono::NaiveDate;
use std::ops::RangeInclusive;

use crate::error::{FitnessError, Result};
use crate::predictor::PredictionInput;

/// Bounds the original entry form offered for each numeric field. Values
/// outside them are accepted; they only produce a warning.
pub mod bounds {
    use std::ops::RangeInclusive;

    /// Workout duration in minutes
    pub const WORKOUT_DURATION: RangeInclusive<f64> = 5.0..=120.0;
    /// Food quantity in grams or servings
    pub const FOOD_QUANTITY: RangeInclusive<f64> = 1.0..=1000.0;
    /// Custom food calories per 100 g
    pub const CUSTOM_CALORIES: RangeInclusive<f64> = 0.0..=1000.0;
    /// Predictor age
    pub const AGE: RangeInclusive<f64> = 18.0..=60.0;
    /// Predictor BMI
    pub const BMI: RangeInclusive<f64> = 18.0..=35.0;
    /// Predictor exercise duration
    pub const EXERCISE_DURATION: RangeInclusive<f64> = 5.0..=60.0;
    /// Predictor heart rate
    pub const HEART_RATE: RangeInclusive<f64> = 60.0..=150.0;
    /// Predictor body temperature
    pub const BODY_TEMP: RangeInclusive<f64> = 36.0..=40.0;
    /// Daily calorie target
    pub const CALORIE_TARGET: RangeInclusive<f64> = 1200.0..=4000.0;
}

/// Validation utilities for input sanitization and edge case handling
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate a username for provisioning
    pub fn validate_username(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(FitnessError::InvalidInput("Username cannot be empty".to_string()));
        }

        if name.len() > 100 {
            return Err(FitnessError::InvalidInput(
                "Username too long (max 100 characters)".to_string(),
            ));
        }

        // Control characters would corrupt the CSV logs
        if name.chars().any(char::is_control) {
            return Err(FitnessError::InvalidInput(
                "Username contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate a password for provisioning
    pub fn validate_password(password: &str) -> Result<()> {
        if password.is_empty() {
            return Err(FitnessError::InvalidInput("Password cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Parse a `YYYY-MM-DD` date
    pub fn parse_date(value: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .map_err(|_| FitnessError::InvalidDate(format!("{value} (expected YYYY-MM-DD)")))
    }

    /// Warn when `value` lies outside `range`. Never rejects.
    ///
    /// Returns whether the value was inside the range.
    pub fn check_range(field: &str, value: f64, range: &RangeInclusive<f64>) -> bool {
        let inside = range.contains(&value);
        if !inside {
            tracing::warn!(
                field,
                value,
                min = range.start(),
                max = range.end(),
                "Value outside the usual range; accepting as-is"
            );
        }
        inside
    }

    /// Range-check every predictor input; true when all are inside.
    pub fn check_prediction_input(input: &PredictionInput) -> bool {
        [
            Self::check_range("age", input.age, &bounds::AGE),
            Self::check_range("bmi", input.bmi, &bounds::BMI),
            Self::check_range("duration", input.duration, &bounds::EXERCISE_DURATION),
            Self::check_range("heart_rate", input.heart_rate, &bounds::HEART_RATE),
            Self::check_range("body_temp", input.body_temp, &bounds::BODY_TEMP),
        ]
        .iter()
        .all(|inside| *inside)
    }

    /// Sanitize free text such as custom food names
    #[must_use]
    pub fn sanitize_text(text: &str) -> String {
        text.chars()
            .filter(|c| !c.is_control())
            .collect::<String>()
            .trim()
            .to_string()
    }
}
