//! Static food reference table and intake calculation.

use crate::error::{FitnessError, Result};
use crate::utils::round_to;

/// Calories per 100 g (or per standard serving) for the built-in foods.
pub const FOOD_DATABASE: [(&str, f64); 15] = [
    ("Apple", 52.0),
    ("Banana", 89.0),
    ("Chicken Breast", 165.0),
    ("White Rice", 130.0),
    ("Eggs", 155.0),
    ("Oatmeal", 68.0),
    ("Salmon", 208.0),
    ("Broccoli", 34.0),
    ("Sweet Potato", 86.0),
    ("Greek Yogurt", 59.0),
    ("Peanut Butter", 588.0),
    ("Whole Wheat Bread", 265.0),
    ("Avocado", 160.0),
    ("Milk", 42.0),
    ("Protein Shake", 120.0),
];

/// Calories per 100 units of `food`, matched case-insensitively.
#[must_use]
pub fn calories_per_100(food: &str) -> Option<f64> {
    FOOD_DATABASE
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(food.trim()))
        .map(|(_, kcal)| *kcal)
}

/// Canonical spelling of `food` in the reference table.
#[must_use]
pub fn canonical_name(food: &str) -> Option<&'static str> {
    FOOD_DATABASE
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(food.trim()))
        .map(|(name, _)| *name)
}

/// Calories in `quantity` units of a reference food, rounded to 2 places.
pub fn intake_calories(food: &str, quantity: f64) -> Result<f64> {
    let per_100 = calories_per_100(food).ok_or_else(|| FitnessError::UnknownFood(food.to_string()))?;
    Ok(round_to(per_100 * quantity / 100.0, 2))
}

/// What the user chose to eat: a reference food or a custom one.
#[derive(Debug, Clone, PartialEq)]
pub enum FoodChoice {
    /// Entry from [`FOOD_DATABASE`]
    Reference(String),
    /// User-named food with a calorie figure recorded as entered
    Custom {
        /// Name of the food
        name: String,
        /// Calories as typed by the user
        calories: f64,
    },
}

impl FoodChoice {
    /// Resolve to the stored food name and calorie figure for `quantity`.
    ///
    /// Custom foods keep the entered figure unscaled.
    pub fn resolve(&self, quantity: f64) -> Result<(String, f64)> {
        match self {
            Self::Reference(food) => {
                let name = canonical_name(food).ok_or_else(|| FitnessError::UnknownFood(food.clone()))?;
                Ok((name.to_string(), intake_calories(name, quantity)?))
            }
            Self::Custom { name, calories } => Ok((name.clone(), *calories)),
        }
    }
}
