//! Calorie totals per user over a day or a Monday–Sunday week.

use chrono::{Local, NaiveDate};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::{FitnessError, Result};
use crate::log_store::{FoodLog, LogEntry, WorkoutLog};
use crate::logging::OperationTimer;
use crate::models::{FoodEntry, Meal, WorkoutEntry};
use crate::utils::week_bounds;

/// Aggregation window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// The current calendar day
    Today,
    /// Monday through Sunday of the current week
    ThisWeek,
}

impl Period {
    /// Inclusive date window for the period containing `today`
    #[must_use]
    pub fn window(self, today: NaiveDate) -> DateWindow {
        match self {
            Self::Today => DateWindow { start: today, end: today },
            Self::ThisWeek => {
                let (start, end) = week_bounds(today);
                DateWindow { start, end }
            }
        }
    }

    /// Number of days the period spans
    #[must_use]
    pub const fn days(self) -> u32 {
        match self {
            Self::Today => 1,
            Self::ThisWeek => 7,
        }
    }

    /// Human label, with the date range for weeks
    #[must_use]
    pub fn label(self, today: NaiveDate) -> String {
        match self {
            Self::Today => "Today".to_string(),
            Self::ThisWeek => {
                let window = self.window(today);
                format!("This Week ({} to {})", window.start, window.end)
            }
        }
    }

    const fn metric_label(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::ThisWeek => "this_week",
        }
    }
}

impl FromStr for Period {
    type Err = FitnessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "today" | "day" => Ok(Self::Today),
            "thisweek" | "week" => Ok(Self::ThisWeek),
            _ => Err(FitnessError::InvalidInput(format!("Unknown period: {s}"))),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Today => "Today",
            Self::ThisWeek => "This Week",
        })
    }
}

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    /// First day
    pub start: NaiveDate,
    /// Last day
    pub end: NaiveDate,
}

impl DateWindow {
    /// Whether `date` falls inside the window
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Calories of one meal within a summary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MealTotal {
    /// Meal
    pub meal: Meal,
    /// Summed calories
    pub calories: f64,
}

/// Result of [`SummaryAggregator::summarize`]
#[derive(Debug, Clone, PartialEq)]
pub struct CalorieSummary {
    /// Period summarized
    pub period: Period,
    /// Dates covered
    pub window: DateWindow,
    /// Calories eaten
    pub calories_in: f64,
    /// Calories burned
    pub calories_out: f64,
    /// `calories_in - calories_out`
    pub net: f64,
    /// Calories per meal present, in day order
    pub meal_totals: Vec<MealTotal>,
    /// Food entries in the window
    pub food_entries: Vec<FoodEntry>,
    /// Workout entries in the window
    pub workout_entries: Vec<WorkoutEntry>,
    /// False when a log file does not exist yet
    pub has_data: bool,
}

impl CalorieSummary {
    fn empty(period: Period, window: DateWindow) -> Self {
        Self {
            period,
            window,
            calories_in: 0.0,
            calories_out: 0.0,
            net: 0.0,
            meal_totals: Vec::new(),
            food_entries: Vec::new(),
            workout_entries: Vec::new(),
            has_data: false,
        }
    }

    /// Display label for the summarized window
    #[must_use]
    pub fn label(&self) -> String {
        self.period.label(self.window.start)
    }

    /// Calories left before reaching `daily_target` scaled to the period.
    /// Negative when the target is exceeded.
    #[must_use]
    pub fn remaining_vs_target(&self, daily_target: u32) -> f64 {
        f64::from(daily_target) * f64::from(self.period.days()) - self.net
    }
}

/// Reads both logs and totals them per user and period.
#[derive(Debug, Clone, Copy)]
pub struct SummaryAggregator<'a> {
    foods: &'a FoodLog,
    workouts: &'a WorkoutLog,
}

impl<'a> SummaryAggregator<'a> {
    /// Aggregator over the given logs
    #[must_use]
    pub const fn new(foods: &'a FoodLog, workouts: &'a WorkoutLog) -> Self {
        Self { foods, workouts }
    }

    /// Summary for `username` over `period` as seen from `today`.
    ///
    /// When either log file is absent the empty summary is returned.
    pub fn summarize(&self, username: &str, period: Period, today: NaiveDate) -> Result<CalorieSummary> {
        let timer = OperationTimer::new("summarize");
        let window = period.window(today);
        crate::metrics::record_summary(period.metric_label());

        if !self.foods.exists() || !self.workouts.exists() {
            debug!(username, "Logs incomplete, reporting no data");
            timer.finish();
            return Ok(CalorieSummary::empty(period, window));
        }

        let food_entries = filter_window(self.foods.load_all()?, username, window);
        let workout_entries = filter_window(self.workouts.load_all()?, username, window);

        let calories_in: f64 = food_entries.iter().map(|entry| entry.calories).sum();
        let calories_out: f64 = workout_entries.iter().map(|entry| entry.calories_burned).sum();

        let summary = CalorieSummary {
            period,
            window,
            calories_in,
            calories_out,
            net: calories_in - calories_out,
            meal_totals: meal_totals(&food_entries),
            food_entries,
            workout_entries,
            has_data: true,
        };

        debug!(
            username,
            period = %period,
            calories_in,
            calories_out,
            "Computed calorie summary"
        );
        timer.finish();
        Ok(summary)
    }

    /// [`SummaryAggregator::summarize`] against the local clock.
    pub fn summarize_now(&self, username: &str, period: Period) -> Result<CalorieSummary> {
        self.summarize(username, period, Local::now().date_naive())
    }
}

fn filter_window<T: LogEntry>(entries: Vec<T>, username: &str, window: DateWindow) -> Vec<T> {
    entries
        .into_iter()
        .filter(|entry| entry.username() == username && window.contains(entry.date()))
        .collect()
}

/// One total per distinct meal, ordered Breakfast, Lunch, Dinner, Snack.
#[must_use]
pub fn meal_totals(entries: &[FoodEntry]) -> Vec<MealTotal> {
    let mut totals: BTreeMap<Meal, f64> = BTreeMap::new();
    for entry in entries {
        *totals.entry(entry.meal).or_default() += entry.calories;
    }
    totals
        .into_iter()
        .map(|(meal, calories)| MealTotal { meal, calories })
        .collect()
}
