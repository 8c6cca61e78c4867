//! Tests for the append-only workout and food logs

use chrono::NaiveDate;
use fitness_tracker::log_store::{FoodLog, WorkoutLog};
use fitness_tracker::models::{ActivityType, FoodEntry, Meal, WorkoutEntry};
use fitness_tracker::FitnessError;
use std::fs;
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn workout(user: &str, activity: ActivityType, calories: f64, day: NaiveDate) -> WorkoutEntry {
    WorkoutEntry {
        username: user.to_string(),
        activity,
        duration_minutes: 30.0,
        calories_burned: calories,
        date: day,
    }
}

#[test]
fn test_append_then_load_on_empty_store() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let log = WorkoutLog::new(temp_dir.path().join("workout_log.csv"));
    let entry = workout("Tejaswini", ActivityType::GymWorkout, 250.75, date(2024, 5, 13));

    log.append(&entry).unwrap();

    assert_eq!(log.load_all().unwrap(), vec![entry]);
}

#[test]
fn test_header_written_once() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("workout_log.csv");
    let log = WorkoutLog::new(&path);

    log.append(&workout("a", ActivityType::Running, 100.0, date(2024, 5, 13))).unwrap();
    log.append(&workout("b", ActivityType::Cycling, 200.0, date(2024, 5, 14))).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = raw.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Username,Activity,Duration,Calories,Date");
    assert!(lines[1].starts_with("a,Running,"));
    assert!(lines[2].ends_with(",2024-05-14"));
}

#[test]
fn test_food_columns_and_gym_label() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("food_log.csv");
    let log = FoodLog::new(&path);

    log.append(&FoodEntry {
        username: "Thanvith".to_string(),
        date: date(2024, 5, 13),
        meal: Meal::Lunch,
        food_name: "Chicken Breast".to_string(),
        quantity: 200.0,
        calories: 330.0,
    })
    .unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.starts_with("Username,Date,Meal,Food,Quantity,Calories\n"));
    assert!(raw.contains("Thanvith,2024-05-13,Lunch,Chicken Breast,"));

    let workouts = WorkoutLog::new(temp_dir.path().join("workout_log.csv"));
    workouts
        .append(&workout("Thanvith", ActivityType::GymWorkout, 10.0, date(2024, 5, 13)))
        .unwrap();
    let raw = fs::read_to_string(workouts.path()).unwrap();
    assert!(raw.contains(",Gym Workout,"));
}

#[test]
fn test_absent_store_loads_empty() {
    let temp_dir = tempdir().unwrap();
    let log = FoodLog::new(temp_dir.path().join("missing.csv"));
    assert!(!log.exists());
    assert!(log.load_all().unwrap().is_empty());
}

#[test]
fn test_empty_file_gets_header_on_append() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("workout_log.csv");
    fs::write(&path, "").unwrap();
    let log = WorkoutLog::new(&path);

    assert!(log.load_all().unwrap().is_empty());
    log.append(&workout("a", ActivityType::Swimming, 300.0, date(2024, 1, 1))).unwrap();
    assert_eq!(log.load_all().unwrap().len(), 1);
}

#[test]
fn test_reads_rows_written_by_other_tools() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("workout_log.csv");
    fs::write(
        &path,
        "Username,Activity,Duration,Calories,Date\n\
         Tejaswini,Running,30,412.5,2024-05-13\n\
         Tejaswini,Gym Workout,45,300,2024-05-14 00:00:00\n",
    )
    .unwrap();

    let entries = WorkoutLog::new(&path).load_all().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].calories_burned, 412.5);
    assert_eq!(entries[1].activity, ActivityType::GymWorkout);
    assert_eq!(entries[1].date, date(2024, 5, 14));
}

#[test]
fn test_malformed_row_is_fatal() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("workout_log.csv");
    fs::write(
        &path,
        "Username,Activity,Duration,Calories,Date\nTejaswini,Running,thirty,412.5,2024-05-13\n",
    )
    .unwrap();

    let result = WorkoutLog::new(&path).load_all();
    assert!(matches!(result, Err(FitnessError::MalformedStore { .. })));
}

#[test]
fn test_load_for_user_matches_exactly() {
    let temp_dir = tempdir().unwrap();
    let log = WorkoutLog::new(temp_dir.path().join("workout_log.csv"));
    log.append(&workout("Tejaswini", ActivityType::Running, 100.0, date(2024, 5, 13))).unwrap();
    log.append(&workout("tejaswini", ActivityType::Running, 200.0, date(2024, 5, 13))).unwrap();
    log.append(&workout("Ghost", ActivityType::Running, 300.0, date(2024, 5, 13))).unwrap();

    let mine = log.load_for_user("Tejaswini").unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].calories_burned, 100.0);
}
