//! Tests for daily and weekly calorie aggregation

use chrono::{Local, NaiveDate};
use fitness_tracker::log_store::{FoodLog, WorkoutLog};
use fitness_tracker::models::{ActivityType, FoodEntry, Meal, WorkoutEntry};
use fitness_tracker::summary::{meal_totals, Period, SummaryAggregator};
use tempfile::{tempdir, TempDir};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn food(user: &str, meal: Meal, calories: f64, day: NaiveDate) -> FoodEntry {
    FoodEntry {
        username: user.to_string(),
        date: day,
        meal,
        food_name: "Banana".to_string(),
        quantity: 100.0,
        calories,
    }
}

fn workout(user: &str, calories: f64, day: NaiveDate) -> WorkoutEntry {
    WorkoutEntry {
        username: user.to_string(),
        activity: ActivityType::Running,
        duration_minutes: 30.0,
        calories_burned: calories,
        date: day,
    }
}

fn stores() -> (TempDir, FoodLog, WorkoutLog) {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let foods = FoodLog::new(temp_dir.path().join("food_log.csv"));
    let workouts = WorkoutLog::new(temp_dir.path().join("workout_log.csv"));
    (temp_dir, foods, workouts)
}

// Wednesday
const TODAY: (i32, u32, u32) = (2024, 5, 15);

fn today() -> NaiveDate {
    date(TODAY.0, TODAY.1, TODAY.2)
}

#[test]
fn test_today_totals() {
    let (_dir, foods, workouts) = stores();
    foods.append(&food("Tejaswini", Meal::Lunch, 300.0, today())).unwrap();
    workouts.append(&workout("Tejaswini", 150.0, today())).unwrap();

    let summary = SummaryAggregator::new(&foods, &workouts)
        .summarize("Tejaswini", Period::Today, today())
        .unwrap();

    assert!(summary.has_data);
    assert_eq!(summary.calories_in, 300.0);
    assert_eq!(summary.calories_out, 150.0);
    assert_eq!(summary.net, 150.0);
}

#[test]
fn test_today_excludes_other_days_and_users() {
    let (_dir, foods, workouts) = stores();
    foods.append(&food("Tejaswini", Meal::Lunch, 300.0, today())).unwrap();
    foods.append(&food("Tejaswini", Meal::Dinner, 999.0, date(2024, 5, 14))).unwrap();
    foods.append(&food("Thanvith", Meal::Lunch, 500.0, today())).unwrap();
    workouts.append(&workout("Thanvith", 150.0, today())).unwrap();

    let summary = SummaryAggregator::new(&foods, &workouts)
        .summarize("Tejaswini", Period::Today, today())
        .unwrap();

    assert_eq!(summary.calories_in, 300.0);
    assert_eq!(summary.calories_out, 0.0);
    assert_eq!(summary.net, 300.0);
    assert!(summary.workout_entries.is_empty());
}

#[test]
fn test_this_week_window() {
    let (_dir, foods, workouts) = stores();
    // Last week: Sunday 2024-05-12
    foods.append(&food("u", Meal::Breakfast, 1000.0, date(2024, 5, 12))).unwrap();
    workouts.append(&workout("u", 1000.0, date(2024, 5, 12))).unwrap();
    // This week: Monday 13th through Sunday 19th
    foods.append(&food("u", Meal::Breakfast, 200.0, date(2024, 5, 13))).unwrap();
    foods.append(&food("u", Meal::Snack, 100.0, date(2024, 5, 19))).unwrap();
    workouts.append(&workout("u", 50.0, date(2024, 5, 17))).unwrap();
    // Next week
    foods.append(&food("u", Meal::Lunch, 1000.0, date(2024, 5, 20))).unwrap();

    let summary = SummaryAggregator::new(&foods, &workouts)
        .summarize("u", Period::ThisWeek, today())
        .unwrap();

    assert_eq!(summary.window.start, date(2024, 5, 13));
    assert_eq!(summary.window.end, date(2024, 5, 19));
    assert_eq!(summary.calories_in, 300.0);
    assert_eq!(summary.calories_out, 50.0);
    assert_eq!(summary.net, 250.0);
    assert_eq!(summary.food_entries.len(), 2);
}

#[test]
fn test_absent_logs_report_no_data() {
    let (_dir, foods, workouts) = stores();

    let summary = SummaryAggregator::new(&foods, &workouts)
        .summarize("Tejaswini", Period::Today, today())
        .unwrap();

    assert!(!summary.has_data);
    assert_eq!(summary.calories_in, 0.0);
    assert_eq!(summary.calories_out, 0.0);
    assert_eq!(summary.net, 0.0);
}

#[test]
fn test_one_absent_log_reports_no_data() {
    let (_dir, foods, workouts) = stores();
    foods.append(&food("Tejaswini", Meal::Lunch, 300.0, today())).unwrap();

    let summary = SummaryAggregator::new(&foods, &workouts)
        .summarize("Tejaswini", Period::Today, today())
        .unwrap();

    assert!(!summary.has_data);
    assert_eq!(summary.net, 0.0);
}

#[test]
fn test_meal_totals_group_by_meal() {
    let day = today();
    let entries = vec![
        food("u", Meal::Snack, 50.0, day),
        food("u", Meal::Breakfast, 200.0, day),
        food("u", Meal::Snack, 25.5, day),
        food("u", Meal::Dinner, 600.0, day),
    ];

    let totals = meal_totals(&entries);
    let meals: Vec<Meal> = totals.iter().map(|t| t.meal).collect();
    assert_eq!(meals, vec![Meal::Breakfast, Meal::Dinner, Meal::Snack]);
    assert_eq!(totals[2].calories, 75.5);
}

#[test]
fn test_remaining_vs_target_scales_with_period() {
    let (_dir, foods, workouts) = stores();
    foods.append(&food("u", Meal::Lunch, 2500.0, today())).unwrap();
    workouts.append(&workout("u", 300.0, today())).unwrap();

    let aggregator = SummaryAggregator::new(&foods, &workouts);
    let daily = aggregator.summarize("u", Period::Today, today()).unwrap();
    assert_eq!(daily.remaining_vs_target(2000), -200.0);

    let weekly = aggregator.summarize("u", Period::ThisWeek, today()).unwrap();
    assert_eq!(weekly.remaining_vs_target(2000), 11_800.0);
}

#[test]
fn test_period_parsing_and_labels() {
    assert_eq!("today".parse::<Period>().unwrap(), Period::Today);
    assert_eq!("This Week".parse::<Period>().unwrap(), Period::ThisWeek);
    assert_eq!("week".parse::<Period>().unwrap(), Period::ThisWeek);
    assert!("month".parse::<Period>().is_err());

    assert_eq!(Period::Today.label(today()), "Today");
    assert_eq!(
        Period::ThisWeek.label(today()),
        "This Week (2024-05-13 to 2024-05-19)"
    );
}

#[test]
fn test_summarize_now_uses_local_date() {
    let (_dir, foods, workouts) = stores();
    let now = Local::now().date_naive();
    foods.append(&food("Tejaswini", Meal::Dinner, 420.0, now)).unwrap();
    workouts.append(&workout("Tejaswini", 120.0, now)).unwrap();

    let summary = SummaryAggregator::new(&foods, &workouts)
        .summarize_now("Tejaswini", Period::ThisWeek)
        .unwrap();

    assert!(summary.window.contains(now));
    assert_eq!(summary.calories_in, 420.0);
    assert_eq!(summary.net, 300.0);
    assert!(summary.label().starts_with("This Week ("));
}
