#![allow(clippy::print_stdout)]

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use fitness_tracker::config::AppConfig;
use fitness_tracker::food::{FoodChoice, FOOD_DATABASE};
use fitness_tracker::logging::init_logging;
use fitness_tracker::models::{ActivityType, Meal, UserProfile, WorkoutEntry};
use fitness_tracker::service::{FoodRequest, WorkoutRequest};
use fitness_tracker::validation::InputValidator;
use fitness_tracker::{CalorieSummary, FitnessError, FitnessTracker, Period, PredictionInput, Session};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Extra configuration file layered over config/default and config/local
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the credential, log and training files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Account to act as
    #[arg(short, long, global = true)]
    username: Option<String>,

    /// Password for the account
    #[arg(short, long, global = true, env = "FITNESS_TRACKER_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a workout
    LogWorkout {
        /// Running, Cycling, Swimming or Gym Workout
        #[arg(short, long)]
        activity: ActivityType,

        /// Duration in minutes
        #[arg(long, default_value = "30")]
        duration: f64,

        /// Calories burned; a placeholder estimate is recorded when omitted
        #[arg(long)]
        calories: Option<f64>,

        /// Workout date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Record a food item
    LogFood {
        /// Breakfast, Lunch, Dinner or Snack
        #[arg(short, long)]
        meal: Meal,

        /// Food from the reference table (see `foods`)
        #[arg(short, long, required_unless_present = "custom_name")]
        food: Option<String>,

        /// Quantity in grams or servings
        #[arg(short, long, default_value = "100")]
        quantity: f64,

        /// Name of a food missing from the reference table
        #[arg(long)]
        custom_name: Option<String>,

        /// Calories recorded for the custom food
        #[arg(long, default_value = "0")]
        custom_calories: f64,

        /// Meal date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Show calories consumed, burned and net
    Summary {
        /// today or week
        #[arg(long, default_value = "today")]
        period: Period,
    },
    /// List every logged workout
    Workouts,
    /// Show the user profile and BMI
    Profile,
    /// Predict calories burned from physiological inputs
    Predict {
        /// Age in years
        #[arg(long, default_value = "30")]
        age: f64,

        /// Body mass index
        #[arg(long, default_value = "22.0")]
        bmi: f64,

        /// Exercise duration in minutes
        #[arg(long, default_value = "30")]
        duration: f64,

        /// Heart rate in bpm
        #[arg(long, default_value = "90")]
        heart_rate: f64,

        /// Body temperature in °C
        #[arg(long, default_value = "37.0")]
        body_temp: f64,
    },
    /// List the food reference table
    Foods,
    /// Provision a new account
    AddUser {
        /// Name of the new account
        #[arg(long)]
        new_username: String,

        /// Password of the new account
        #[arg(long)]
        new_password: String,
    },
    /// Interactive session with login and logout
    Shell,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Load configuration
    let mut config = match cli.config.as_deref() {
        Some(path) => AppConfig::load_from(Some(path))?,
        None => AppConfig::load()?,
    };
    if let Some(data_dir) = &cli.data_dir {
        config = config.with_data_dir(data_dir);
    }

    // Initialize logging
    let log_file = config.logging.file_path.as_ref().map(PathBuf::from);
    let _log_guard = init_logging(
        Some(&config.get_log_level()),
        log_file.as_deref(),
        config.logging.format == "json",
    )?;

    info!("Starting fitness-tracker");
    let mut tracker = FitnessTracker::open(config).context("Failed to open data stores")?;
    let today = Local::now().date_naive();

    match cli.command {
        Commands::LogWorkout {
            activity,
            duration,
            calories,
            date,
        } => {
            let session = authenticate(&tracker, cli.username, cli.password)?;
            let request = WorkoutRequest {
                activity,
                duration_minutes: duration,
                calories_burned: calories,
                date: resolve_date(date.as_deref(), today)?,
            };
            let entry = tracker.log_workout(session.require_user()?, request)?;
            println!(
                "Workout logged: {} for {} min, {:.2} kcal on {}",
                entry.activity, entry.duration_minutes, entry.calories_burned, entry.date
            );
        }
        Commands::LogFood {
            meal,
            food,
            quantity,
            custom_name,
            custom_calories,
            date,
        } => {
            let session = authenticate(&tracker, cli.username, cli.password)?;
            let choice = match (custom_name.filter(|name| !name.trim().is_empty()), food) {
                (Some(name), _) => FoodChoice::Custom {
                    name,
                    calories: custom_calories,
                },
                (None, Some(food)) => FoodChoice::Reference(food),
                (None, None) => anyhow::bail!("Either --food or --custom-name is required"),
            };
            let request = FoodRequest {
                meal,
                choice,
                quantity,
                date: resolve_date(date.as_deref(), today)?,
            };
            let entry = tracker.log_food(session.require_user()?, request)?;
            println!(
                "Added {} ({} g, {:.2} kcal) to your {} log!",
                entry.food_name, entry.quantity, entry.calories, entry.meal
            );
        }
        Commands::Summary { period } => {
            let session = authenticate(&tracker, cli.username, cli.password)?;
            let summary = tracker.summary(session.require_user()?, period, today)?;
            print_summary(&summary, tracker.daily_calorie_target());
        }
        Commands::Workouts => {
            let session = authenticate(&tracker, cli.username, cli.password)?;
            print_workouts(&tracker.workout_history(session.require_user()?)?);
        }
        Commands::Profile => {
            let session = authenticate(&tracker, cli.username, cli.password)?;
            print_profile(tracker.profile(session.require_user()?)?.as_ref());
        }
        Commands::Predict {
            age,
            bmi,
            duration,
            heart_rate,
            body_temp,
        } => {
            let input = PredictionInput {
                age,
                bmi,
                duration,
                heart_rate,
                body_temp,
            };
            print_prediction(tracker.predict(&input)?);
        }
        Commands::Foods => print_foods(),
        Commands::AddUser {
            new_username,
            new_password,
        } => {
            tracker.add_user(&new_username, &new_password)?;
            println!("User {new_username} created");
        }
        Commands::Shell => run_shell(&tracker)?,
    }

    Ok(())
}

/// Log in with the global credential flags
fn authenticate(tracker: &FitnessTracker, username: Option<String>, password: Option<String>) -> Result<Session> {
    let (Some(username), Some(password)) = (username, password) else {
        anyhow::bail!("--username and --password (or FITNESS_TRACKER_PASSWORD) are required");
    };
    let mut session = Session::new();
    session.login(tracker.credentials(), &username, &password)?;
    Ok(session)
}

fn resolve_date(date: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    Ok(date.map(InputValidator::parse_date).transpose()?.unwrap_or(today))
}

#[derive(Debug, PartialEq, Eq)]
enum ShellFlow {
    Continue,
    Quit,
}

/// Line-oriented session: the explicit LoggedOut/LoggedIn state lives here
fn run_shell(tracker: &FitnessTracker) -> Result<()> {
    let mut session = Session::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("Fitness Tracker. Type `help` for commands.");
    loop {
        let prompt = session
            .current_user()
            .map_or_else(|| "login> ".to_string(), |user| format!("{user}> "));
        write!(stdout, "{prompt}")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let words: Vec<&str> = line.split_whitespace().collect();

        match shell_command(tracker, &mut session, &words) {
            Ok(ShellFlow::Continue) => {}
            Ok(ShellFlow::Quit) => break,
            Err(e) if e.is_recoverable() => println!("{e}"),
            Err(e) => return Err(e.into()),
        }
    }

    debug!("Shell closed");
    Ok(())
}

const SHELL_HELP: &str = "\
login <user> <password> | logout
log-workout <activity> <minutes> [calories]
log-food <meal> <quantity> <food name...>
summary [today|week] | workouts | profile | foods
predict [age bmi duration heart_rate body_temp]
quit";

/// Run one shell line. Dates are read from the clock per command.
fn shell_command(tracker: &FitnessTracker, session: &mut Session, words: &[&str]) -> Result<ShellFlow, FitnessError> {
    match words {
        [] => {}
        ["quit" | "exit"] => return Ok(ShellFlow::Quit),
        ["help"] => println!("{SHELL_HELP}"),
        ["login", username, password] => {
            session.login(tracker.credentials(), username, password)?;
            println!("Welcome, {username}!");
        }
        ["logout"] => session.logout()?,
        ["log-workout", activity, duration, rest @ ..] if rest.len() <= 1 => {
            let username = session.require_user()?;
            let request = WorkoutRequest {
                activity: activity.parse()?,
                duration_minutes: parse_number("duration", duration)?,
                calories_burned: rest.first().map(|raw| parse_number("calories", raw)).transpose()?,
                date: Local::now().date_naive(),
            };
            let entry = tracker.log_workout(username, request)?;
            println!(
                "Workout logged: {} for {} min, {:.2} kcal",
                entry.activity, entry.duration_minutes, entry.calories_burned
            );
        }
        ["log-food", meal, quantity, food @ ..] if !food.is_empty() => {
            let username = session.require_user()?;
            let request = FoodRequest {
                meal: meal.parse()?,
                choice: FoodChoice::Reference(food.join(" ")),
                quantity: parse_number("quantity", quantity)?,
                date: Local::now().date_naive(),
            };
            let entry = tracker.log_food(username, request)?;
            println!(
                "Added {} ({} g, {:.2} kcal) to your {} log!",
                entry.food_name, entry.quantity, entry.calories, entry.meal
            );
        }
        ["summary", rest @ ..] if rest.len() <= 1 => {
            let period = rest.first().map_or(Ok(Period::Today), |p| p.parse())?;
            let summary = tracker.summary_now(session.require_user()?, period)?;
            print_summary(&summary, tracker.daily_calorie_target());
        }
        ["workouts"] => print_workouts(&tracker.workout_history(session.require_user()?)?),
        ["profile"] => print_profile(tracker.profile(session.require_user()?)?.as_ref()),
        ["foods"] => print_foods(),
        ["predict"] => print_prediction(tracker.predict(&PredictionInput::default())?),
        ["predict", age, bmi, duration, heart_rate, body_temp] => {
            let input = PredictionInput {
                age: parse_number("age", age)?,
                bmi: parse_number("bmi", bmi)?,
                duration: parse_number("duration", duration)?,
                heart_rate: parse_number("heart_rate", heart_rate)?,
                body_temp: parse_number("body_temp", body_temp)?,
            };
            print_prediction(tracker.predict(&input)?);
        }
        other => {
            return Err(FitnessError::InvalidInput(format!(
                "Unknown command: {}",
                other.join(" ")
            )))
        }
    }
    Ok(ShellFlow::Continue)
}

fn parse_number(field: &str, raw: &str) -> Result<f64, FitnessError> {
    raw.parse()
        .map_err(|_| FitnessError::InvalidInput(format!("{field} must be a number, got {raw}")))
}

fn print_prediction(calories: f64) {
    println!("Predicted Calories Burned: {calories:.2} kcal");
}

fn print_summary(summary: &CalorieSummary, daily_target: u32) {
    let label = summary.label();
    if !summary.has_data {
        println!("Start logging your food and workouts to see your calorie summary!");
        return;
    }

    println!("Calorie Summary - {label}");
    println!("  Calories Consumed: {:.2} kcal", summary.calories_in);
    println!("  Calories Burned:   {:.2} kcal", summary.calories_out);
    println!("  Net Calories:      {:.2} kcal", summary.net);
    println!(
        "  Remaining vs target ({daily_target} kcal/day): {:.2} kcal",
        summary.remaining_vs_target(daily_target)
    );

    println!("Food Log - {label}");
    if summary.food_entries.is_empty() {
        println!("  No food entries for {}", label.to_lowercase());
    } else {
        for total in &summary.meal_totals {
            println!("  {:<10} {:>10.2} kcal", total.meal.label(), total.calories);
        }
        for entry in &summary.food_entries {
            println!(
                "  {} {:<10} {:<20} {:>8} {:>10.2}",
                entry.date,
                entry.meal.label(),
                entry.food_name,
                entry.quantity,
                entry.calories
            );
        }
    }

    println!("Workout Log - {label}");
    if summary.workout_entries.is_empty() {
        println!("  No workout entries for {}", label.to_lowercase());
    } else {
        print_workouts(&summary.workout_entries);
    }
}

fn print_workouts(entries: &[WorkoutEntry]) {
    if entries.is_empty() {
        println!("No workouts logged yet!");
        return;
    }
    for entry in entries {
        println!(
            "  {} {:<12} {:>6} min {:>10.2} kcal",
            entry.date,
            entry.activity.label(),
            entry.duration_minutes,
            entry.calories_burned
        );
    }
}

fn print_profile(profile: Option<&UserProfile>) {
    let Some(profile) = profile else {
        println!("Profile information not available.");
        return;
    };
    match profile.age {
        Some(age) => println!("Age: {age}"),
        None => println!("Age: not provided"),
    }
    println!("Height: {} cm", profile.height);
    println!("Weight: {} kg", profile.weight);
    println!("BMI: {:.1}", profile.bmi());
    println!("BMI Category: {}", profile.bmi_category());
    println!("Fitness Level: {}", profile.fitness_level);
    println!("Member since: {}", profile.registration_date);
}

fn print_foods() {
    for (name, kcal) in FOOD_DATABASE {
        println!("  {name:<20} {kcal:>6} kcal / 100 g");
    }
}
