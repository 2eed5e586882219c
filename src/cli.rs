use chrono::{Datelike, Duration, NaiveDate, Weekday};
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use crate::error::{PlanError, Result};
use crate::models::{DayMeal, MealSlotType, Person};
use crate::planner::constants::DAYS_IN_PLAN;

/// Meal Week Planner: plan who eats what across the week.
#[derive(Parser, Debug)]
#[command(name = "meal_week_planner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the plan store JSON file.
    #[arg(short, long, default_value = "meal_plan.json", global = true)]
    pub file: String,

    /// Path to the recipe catalog (JSON, or CSV by extension).
    #[arg(short, long, default_value = "recipes.json", global = true)]
    pub recipes: String,

    /// Any date in the week to work on (YYYY-MM-DD). Defaults to the
    /// upcoming planning week.
    #[arg(short, long, global = true)]
    pub week: Option<NaiveDate>,

    /// Seed for reproducible recipe draws.
    #[arg(long, global = true)]
    pub seed: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the week's plan.
    Show {
        /// Show the week after.
        #[arg(long, conflicts_with = "previous")]
        next: bool,

        /// Show the week before.
        #[arg(long)]
        previous: bool,
    },

    /// Draw recipes for every unpinned meal.
    Populate {
        /// Save without asking.
        #[arg(short, long)]
        yes: bool,
    },

    /// Toggle whether a person is eating a meal.
    Toggle(PersonMealArgs),

    /// Record why a person is skipping a meal. An empty reason clears it.
    Reason {
        #[command(flatten)]
        target: PersonMealArgs,

        /// Reason text.
        #[arg(default_value = "")]
        text: String,
    },

    /// Mark a meal as needing something quick.
    Quick {
        #[command(flatten)]
        meal: MealArgs,

        /// Clear the flag instead.
        #[arg(long)]
        off: bool,
    },

    /// Pin a meal so populate leaves it alone.
    Pin {
        #[command(flatten)]
        meal: MealArgs,

        /// Unpin instead.
        #[arg(long)]
        off: bool,
    },

    /// Assign a recipe to one person's meal.
    Select {
        #[command(flatten)]
        target: PersonMealArgs,

        /// Recipe name (fuzzy matched).
        recipe: String,
    },

    /// Clear the recipe for everyone at a meal.
    Remove(MealArgs),

    /// Let attendees of a meal have different recipes.
    Split(MealArgs),

    /// Give every attendee the first person's recipe.
    Join(MealArgs),

    /// Swap the recipes of two meals.
    Swap {
        /// First meal's day.
        first_day: String,
        /// First meal's slot.
        first_slot: String,
        /// Second meal's day.
        second_day: String,
        /// Second meal's slot.
        second_slot: String,
    },

    /// Manage food that needs using up.
    Food {
        #[command(subcommand)]
        action: FoodCommand,
    },

    /// List the recipe catalog.
    Recipes,

    /// Convert a CSV recipe list into the JSON catalog at --recipes.
    ImportCsv {
        /// CSV file with Name,Breakfast,Lunch,Dinner columns.
        csv: String,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Show {
            next: false,
            previous: false,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum FoodCommand {
    /// Add an item.
    Add {
        name: String,

        /// The item is a full meal on its own.
        #[arg(long)]
        meal: bool,

        /// The item is frozen.
        #[arg(long)]
        frozen: bool,
    },

    /// Replace an item's details.
    Update {
        id: Uuid,

        name: String,

        #[arg(long)]
        meal: bool,

        #[arg(long)]
        frozen: bool,
    },

    /// Remove an item.
    Remove { id: Uuid },

    /// List items.
    List,
}

/// A meal within the active week.
#[derive(Args, Debug, Clone)]
pub struct MealArgs {
    /// Day of the week (mon..sun) or a date (YYYY-MM-DD).
    pub day: String,

    /// Meal slot, e.g. breakfast, lunch, dinner, "evening snack".
    pub slot: String,
}

impl MealArgs {
    pub fn day_meal(&self, week_start: NaiveDate) -> Result<DayMeal> {
        parse_day_meal(&self.day, &self.slot, week_start)
    }
}

/// One person's seat at a meal within the active week.
#[derive(Args, Debug, Clone)]
pub struct PersonMealArgs {
    /// Person's name.
    pub person: String,

    #[command(flatten)]
    pub meal: MealArgs,
}

impl PersonMealArgs {
    pub fn person(&self) -> Result<Person> {
        parse_person(&self.person)
    }
}

pub fn parse_person(input: &str) -> Result<Person> {
    Person::from_input(input).ok_or_else(|| {
        let known: Vec<&str> = Person::ALL.iter().map(|p| p.name()).collect();
        PlanError::InvalidInput(format!(
            "Unknown person '{}' (expected one of: {})",
            input,
            known.join(", ")
        ))
    })
}

/// Resolve a day and slot typed by the user.
///
/// Weekday names count from `week_start`. Full dates must fall inside the
/// week starting at `week_start`.
pub fn parse_day_meal(day: &str, slot: &str, week_start: NaiveDate) -> Result<DayMeal> {
    let date = parse_day(day, week_start)?;
    let slot = MealSlotType::from_input(slot)
        .ok_or_else(|| PlanError::InvalidInput(format!("Unknown meal slot '{}'", slot)))?;
    Ok(DayMeal::new(date, slot))
}

fn parse_day(input: &str, week_start: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        let week_end = week_start + Duration::days(DAYS_IN_PLAN);
        if date < week_start || date >= week_end {
            return Err(PlanError::InvalidInput(format!(
                "{} is outside the week of {} (use --week to change week)",
                date, week_start
            )));
        }
        return Ok(date);
    }
    let weekday: Weekday = input
        .parse()
        .map_err(|_| PlanError::InvalidInput(format!("Unknown day '{}'", input)))?;

    let offset = (7 + i64::from(weekday.num_days_from_monday())
        - i64::from(week_start.weekday().num_days_from_monday()))
        % 7;
    Ok(week_start + Duration::days(offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[test]
    fn test_parse_weekday_relative_to_week() {
        let meal = parse_day_meal("thu", "dinner", monday()).unwrap();
        assert_eq!(meal.date, NaiveDate::from_ymd_opt(2026, 3, 5).unwrap());
        assert_eq!(meal.slot, MealSlotType::Dinner);

        let meal = parse_day_meal("Sunday", "Evening snack", monday()).unwrap();
        assert_eq!(meal.date, NaiveDate::from_ymd_opt(2026, 3, 8).unwrap());
        assert_eq!(meal.slot, MealSlotType::EveningSnack);
    }

    #[test]
    fn test_parse_full_date() {
        let meal = parse_day_meal("2026-03-04", "lunch", monday()).unwrap();
        assert_eq!(meal.date, NaiveDate::from_ymd_opt(2026, 3, 4).unwrap());

        let meal = parse_day_meal("2026-03-08", "dinner", monday()).unwrap();
        assert_eq!(meal.date, NaiveDate::from_ymd_opt(2026, 3, 8).unwrap());
    }

    #[test]
    fn test_full_date_outside_week_rejected() {
        for day in ["2026-03-01", "2026-03-09", "2026-04-01"] {
            assert!(matches!(
                parse_day_meal(day, "dinner", monday()),
                Err(PlanError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_day_meal("someday", "lunch", monday()).is_err());
        assert!(parse_day_meal("mon", "brunch", monday()).is_err());
        assert!(parse_person("Bob").is_err());
        assert_eq!(parse_person("sarah").unwrap(), Person::Sarah);
    }

    #[test]
    fn test_cli_parses_select() {
        let cli = Cli::try_parse_from([
            "meal_week_planner",
            "select",
            "tony",
            "wed",
            "dinner",
            "chilli",
            "--seed",
            "4",
        ])
        .unwrap();
        assert_eq!(cli.seed, Some(4));
        match cli.command {
            Some(Command::Select { target, recipe }) => {
                assert_eq!(target.person, "tony");
                assert_eq!(target.meal.day, "wed");
                assert_eq!(recipe, "chilli");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
