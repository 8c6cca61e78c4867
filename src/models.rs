//! Data models for workout, meal and training records
//!
//! This module contains the records persisted to the CSV logs, the training
//! rows used by the predictor and the read-only user profile.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FitnessError;

/// Kind of workout that can be logged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityType {
    /// Running
    Running,
    /// Cycling
    Cycling,
    /// Swimming
    Swimming,
    /// Gym workout
    #[serde(rename = "Gym Workout")]
    GymWorkout,
}

impl ActivityType {
    /// Every activity, in menu order
    pub const ALL: [Self; 4] = [Self::Running, Self::Cycling, Self::Swimming, Self::GymWorkout];

    /// Label as written to the workout log
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
            Self::Swimming => "Swimming",
            Self::GymWorkout => "Gym Workout",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ActivityType {
    type Err = FitnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_label(s);
        Self::ALL
            .into_iter()
            .find(|activity| normalize_label(activity.label()) == normalized)
            .ok_or_else(|| FitnessError::InvalidInput(format!("Unknown activity type: {s}")))
    }
}

/// Meal a food entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Meal {
    /// Breakfast
    Breakfast,
    /// Lunch
    Lunch,
    /// Dinner
    Dinner,
    /// Snack
    Snack,
}

impl Meal {
    /// Every meal, in the order of a day
    pub const ALL: [Self; 4] = [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snack];

    /// Label as written to the food log
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
            Self::Snack => "Snack",
        }
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Meal {
    type Err = FitnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_label(s);
        Self::ALL
            .into_iter()
            .find(|meal| normalize_label(meal.label()) == normalized)
            .ok_or_else(|| FitnessError::InvalidInput(format!("Unknown meal type: {s}")))
    }
}

fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// One logged workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutEntry {
    /// Owner of the entry
    #[serde(rename = "Username")]
    pub username: String,
    /// Kind of workout
    #[serde(rename = "Activity")]
    pub activity: ActivityType,
    /// Duration in minutes
    #[serde(rename = "Duration")]
    pub duration_minutes: f64,
    /// Calories burned
    #[serde(rename = "Calories")]
    pub calories_burned: f64,
    /// Day of the workout
    #[serde(rename = "Date", with = "log_date")]
    pub date: NaiveDate,
}

/// One logged food item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    /// Owner of the entry
    #[serde(rename = "Username")]
    pub username: String,
    /// Day the food was eaten
    #[serde(rename = "Date", with = "log_date")]
    pub date: NaiveDate,
    /// Meal the food belongs to
    #[serde(rename = "Meal")]
    pub meal: Meal,
    /// Name of the food
    #[serde(rename = "Food")]
    pub food_name: String,
    /// Quantity in grams or servings
    #[serde(rename = "Quantity")]
    pub quantity: f64,
    /// Calories consumed
    #[serde(rename = "Calories")]
    pub calories: f64,
}

/// Row of the predictor's training set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    /// Synthetic user id (not a feature)
    #[serde(rename = "User_ID")]
    pub user_id: u32,
    /// Age in years
    #[serde(rename = "Age")]
    pub age: f64,
    /// Body mass index
    #[serde(rename = "BMI")]
    pub bmi: f64,
    /// Exercise duration in minutes
    #[serde(rename = "Duration")]
    pub duration: f64,
    /// Heart rate in bpm
    #[serde(rename = "Heart_Rate")]
    pub heart_rate: f64,
    /// Body temperature in °C
    #[serde(rename = "Body_Temp")]
    pub body_temp: f64,
    /// Observed calories burned (target)
    #[serde(rename = "Calories")]
    pub calories: f64,
}

impl TrainingSample {
    /// Feature vector in predictor column order
    #[must_use]
    pub const fn features(&self) -> [f64; 5] {
        [self.age, self.bmi, self.duration, self.heart_rate, self.body_temp]
    }
}

/// Externally provisioned user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Account the profile belongs to
    pub username: String,
    /// Age in years; `None` when the provisioned cell is empty or unreadable
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub age: Option<f64>,
    /// Height in centimetres
    pub height: f64,
    /// Weight in kilograms
    pub weight: f64,
    /// Free-form fitness level
    pub fitness_level: String,
    /// Registration date as provisioned
    pub registration_date: String,
}

impl UserProfile {
    /// Body mass index from height and weight
    #[must_use]
    pub fn bmi(&self) -> f64 {
        let metres = self.height / 100.0;
        self.weight / (metres * metres)
    }

    /// WHO category for [`UserProfile::bmi`]
    #[must_use]
    pub fn bmi_category(&self) -> BmiCategory {
        BmiCategory::from_bmi(self.bmi())
    }
}

/// Body mass index band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiCategory {
    /// BMI below 18.5
    Underweight,
    /// BMI from 18.5 up to 25
    Normal,
    /// BMI from 25 up to 30
    Overweight,
    /// BMI of 30 or more
    Obese,
}

impl BmiCategory {
    /// Band containing `bmi`
    #[must_use]
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            Self::Underweight
        } else if bmi < 25.0 {
            Self::Normal
        } else if bmi < 30.0 {
            Self::Overweight
        } else {
            Self::Obese
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Underweight => "Underweight",
            Self::Normal => "Normal weight",
            Self::Overweight => "Overweight",
            Self::Obese => "Obese",
        })
    }
}

/// Serde adapter for log dates: written as `YYYY-MM-DD`, read leniently.
mod log_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        crate::utils::parse_log_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid date: {raw}")))
    }
}
