use crate::models::keys::{DayMeal, PersonMealKey};
use crate::models::person::Person;
use crate::models::recipe::Recipe;

/// One person's seat at one meal occasion.
#[derive(Debug, Clone, PartialEq)]
pub struct MealSelection {
    pub person: Person,
    pub day_meal: DayMeal,
    pub attending: bool,
    pub recipe: Option<Recipe>,
}

impl MealSelection {
    /// A default selection: attending, nothing assigned.
    pub fn new(person: Person, day_meal: DayMeal) -> Self {
        Self {
            person,
            day_meal,
            attending: true,
            recipe: None,
        }
    }

    pub fn key(&self) -> PersonMealKey {
        PersonMealKey::new(self.person, self.day_meal)
    }

    /// Name of the assigned recipe, if any.
    pub fn recipe_name(&self) -> Option<&str> {
        self.recipe.as_ref().map(|r| r.name.as_str())
    }
}
