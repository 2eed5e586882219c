pub mod cli;
pub mod error;
pub mod interface;
pub mod models;
pub mod planner;
pub mod state;

pub use error::{PlanError, Result};
pub use models::{DayMeal, MealSelection, MealSlotType, Person, PersonMealKey, Recipe};
pub use state::PlanningEngine;
