use chrono::NaiveDate;
use rand::Rng;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::credentials::CredentialStore;
use crate::error::Result;
use crate::food::FoodChoice;
use crate::log_store::{FoodLog, WorkoutLog};
use crate::models::{ActivityType, FoodEntry, Meal, UserProfile, WorkoutEntry};
use crate::predictor::{CaloriePredictor, PredictionInput};
use crate::profiles::ProfileDirectory;
use crate::summary::{CalorieSummary, Period, SummaryAggregator};
use crate::training::TrainingSet;
use crate::utils::round_to;
use crate::validation::{bounds, InputValidator};

/// Workout to record for the logged-in user
#[derive(Debug, Clone)]
pub struct WorkoutRequest {
    pub activity: ActivityType,
    pub duration_minutes: f64,
    /// `None` records a placeholder estimate
    pub calories_burned: Option<f64>,
    pub date: NaiveDate,
}

/// Meal item to record for the logged-in user
#[derive(Debug, Clone)]
pub struct FoodRequest {
    pub meal: Meal,
    pub choice: FoodChoice,
    pub quantity: f64,
    pub date: NaiveDate,
}

/// Every store the handlers need, opened from one configuration.
pub struct FitnessTracker {
    config: AppConfig,
    credentials: CredentialStore,
    workouts: WorkoutLog,
    foods: FoodLog,
    profiles: ProfileDirectory,
    predictor: CaloriePredictor,
}

impl FitnessTracker {
    /// Open the stores under `config.storage`. A corrupt credential file is fatal.
    pub fn open(config: AppConfig) -> Result<Self> {
        let storage = &config.storage;
        let credentials = CredentialStore::load_or_init(config.data_path(&storage.credentials_file))?;
        let workouts = WorkoutLog::new(config.data_path(&storage.workout_log));
        let foods = FoodLog::new(config.data_path(&storage.food_log));
        let profiles = ProfileDirectory::new(config.data_path(&storage.user_profiles));
        let training = TrainingSet::new(
            config.data_path(&storage.training_data),
            config.training.sample_count,
            config.training.seed,
        );
        let predictor = CaloriePredictor::new(training, &config.predictor);
        InputValidator::check_range(
            "daily_calorie_target",
            f64::from(config.goals.daily_calorie_target),
            &bounds::CALORIE_TARGET,
        );

        info!(data_dir = %storage.data_dir, "Opened fitness tracker stores");
        Ok(Self {
            config,
            credentials,
            workouts,
            foods,
            profiles,
            predictor,
        })
    }

    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    pub const fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub const fn workouts(&self) -> &WorkoutLog {
        &self.workouts
    }

    pub const fn foods(&self) -> &FoodLog {
        &self.foods
    }

    /// Provision a new account
    pub fn add_user(&mut self, username: &str, password: &str) -> Result<()> {
        InputValidator::validate_username(username)?;
        InputValidator::validate_password(password)?;
        self.credentials.add_user(username, password)
    }

    /// Append a workout for `username`
    pub fn log_workout(&self, username: &str, request: WorkoutRequest) -> Result<WorkoutEntry> {
        InputValidator::check_range("duration", request.duration_minutes, &bounds::WORKOUT_DURATION);

        let calories_burned = request.calories_burned.unwrap_or_else(|| {
            let estimate = placeholder_calories(&mut rand::thread_rng());
            warn!(estimate, "No calorie figure supplied; recording placeholder estimate");
            estimate
        });

        let entry = WorkoutEntry {
            username: username.to_string(),
            activity: request.activity,
            duration_minutes: request.duration_minutes,
            calories_burned,
            date: request.date,
        };
        self.workouts.append(&entry)?;
        info!(username, activity = %entry.activity, calories = entry.calories_burned, "Workout logged");
        Ok(entry)
    }

    /// Append a food item for `username`
    pub fn log_food(&self, username: &str, request: FoodRequest) -> Result<FoodEntry> {
        InputValidator::check_range("quantity", request.quantity, &bounds::FOOD_QUANTITY);
        if let FoodChoice::Custom { calories, .. } = &request.choice {
            InputValidator::check_range("custom_calories", *calories, &bounds::CUSTOM_CALORIES);
        }

        let (food_name, calories) = request.choice.resolve(request.quantity)?;
        let entry = FoodEntry {
            username: username.to_string(),
            date: request.date,
            meal: request.meal,
            food_name: InputValidator::sanitize_text(&food_name),
            quantity: request.quantity,
            calories,
        };
        self.foods.append(&entry)?;
        info!(username, meal = %entry.meal, food = %entry.food_name, calories, "Food logged");
        Ok(entry)
    }

    /// Calorie summary for `username` over `period` as of `today`
    pub fn summary(&self, username: &str, period: Period, today: NaiveDate) -> Result<CalorieSummary> {
        SummaryAggregator::new(&self.foods, &self.workouts).summarize(username, period, today)
    }

    /// Calorie summary for `username` over `period` as of the local date right now
    pub fn summary_now(&self, username: &str, period: Period) -> Result<CalorieSummary> {
        SummaryAggregator::new(&self.foods, &self.workouts).summarize_now(username, period)
    }

    /// All workouts `username` has logged
    pub fn workout_history(&self, username: &str) -> Result<Vec<WorkoutEntry>> {
        self.workouts.load_for_user(username)
    }

    /// Profile for `username`, if provisioned
    pub fn profile(&self, username: &str) -> Result<Option<UserProfile>> {
        self.profiles.find(username)
    }

    /// Predicted calories burned; refits the model on every call
    pub fn predict(&self, input: &PredictionInput) -> Result<f64> {
        InputValidator::check_prediction_input(input);
        self.predictor.predict(input)
    }

    /// Daily calorie target from configuration
    pub const fn daily_calorie_target(&self) -> u32 {
        self.config.goals.daily_calorie_target
    }
}

/// Stand-in calorie burn used when a workout is logged without a figure:
/// uniform over 100..700 kcal, rounded to 2 places.
pub fn placeholder_calories<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    round_to(rng.gen_range(100.0..700.0), 2)
}
