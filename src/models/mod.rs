pub mod food;
pub mod keys;
pub mod person;
pub mod recipe;
pub mod selection;

pub use food::FoodToUseUp;
pub use keys::{DayMeal, PersonMealKey};
pub use person::{MealSlotType, Person};
pub use recipe::{Recipe, Suitability};
pub use selection::MealSelection;
