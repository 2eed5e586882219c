use crate::models::{DayMeal, FoodToUseUp, MealSlotType, Recipe};
use crate::planner::constants::NO_MEAL_SELECTED;
use crate::state::PlanningEngine;

const SLOT_WIDTH: usize = 16;

/// Format one row of the week view.
///
/// Returns `None` for snack slots with nothing planned, which are hidden.
pub fn format_meal_row(engine: &PlanningEngine, day_meal: &DayMeal) -> Option<String> {
    let description = engine.meal_description(day_meal);
    let is_snack = !matches!(
        day_meal.slot,
        MealSlotType::Breakfast | MealSlotType::Lunch | MealSlotType::Dinner
    );
    if is_snack && description == NO_MEAL_SELECTED {
        return None;
    }

    let mut tags = Vec::new();
    if engine.is_pinned(day_meal) {
        tags.push("pinned");
    }
    if engine.is_quick_meal(day_meal) {
        tags.push("quick");
    }
    let tags_str = if tags.is_empty() {
        String::new()
    } else {
        format!("  [{}]", tags.join(", "))
    };

    Some(format!(
        "  {:<slot_width$} {} | {}{}",
        day_meal.slot.label(),
        description,
        engine.serving_info(day_meal),
        tags_str,
        slot_width = SLOT_WIDTH
    ))
}

/// Display the active week, day by day.
pub fn display_week(engine: &PlanningEngine) {
    println!();
    println!(
        "=== Week of {} ===",
        engine.week_start().format("%a %d %b %Y")
    );

    for date in engine.dates() {
        println!();
        println!("{}", date.format("%A %d %b"));
        for &slot in MealSlotType::ALL {
            if let Some(row) = format_meal_row(engine, &DayMeal::new(*date, slot)) {
                println!("{}", row);
            }
        }
    }

    println!();
    display_foods_to_use_up(engine.foods_to_use_up());
}

/// Display the food-to-use-up list.
pub fn display_foods_to_use_up(foods: &[FoodToUseUp]) {
    if foods.is_empty() {
        println!("Food to use up: (none)");
        return;
    }

    println!("=== Food to use up ({} items) ===", foods.len());
    for food in foods {
        let tags = food.tags();
        if tags.is_empty() {
            println!("  {}  {}", food.id, food.name);
        } else {
            println!("  {}  {} {}", food.id, food.name, tags);
        }
    }
    println!();
}

/// Display the recipe catalog with per-meal suitability.
pub fn display_recipes(recipes: &[Recipe]) {
    if recipes.is_empty() {
        println!("Recipes: (none)");
        return;
    }

    let width = recipes.iter().map(|r| r.name.len()).max().unwrap_or(10);

    println!();
    println!("=== Recipes ({} items) ===", recipes.len());
    println!();
    for recipe in recipes {
        println!(
            "  {:<width$}  breakfast:{:<9} lunch:{:<9} dinner:{:<9}",
            recipe.name,
            format!("{:?}", recipe.breakfast).to_lowercase(),
            format!("{:?}", recipe.lunch).to_lowercase(),
            format!("{:?}", recipe.dinner).to_lowercase(),
            width = width
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Person, Suitability};
    use crate::planner::random::SequenceSource;
    use chrono::NaiveDate;

    fn engine() -> PlanningEngine {
        let catalog = vec![Recipe::new("Chilli").with_dinner(Suitability::Always)];
        let monday = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        PlanningEngine::new(monday, catalog, Box::new(SequenceSource::first()))
    }

    #[test]
    fn test_row_shows_recipe_servings_and_tags() {
        let mut engine = engine();
        let dinner = DayMeal::new(engine.week_start(), MealSlotType::Dinner);
        engine.select_recipe(Recipe::new("Chilli"), Person::Tony, &dinner);
        engine.join_meal(&dinner);
        engine.set_pinned(true, &dinner);

        let row = format_meal_row(&engine, &dinner).unwrap();
        assert!(row.contains("Chilli | 2 x servings"));
        assert!(row.ends_with("[pinned]"));
    }

    #[test]
    fn test_empty_snacks_hidden() {
        let engine = engine();
        let snack = DayMeal::new(engine.week_start(), MealSlotType::MorningSnack);
        assert!(format_meal_row(&engine, &snack).is_none());

        let lunch = DayMeal::new(engine.week_start(), MealSlotType::Lunch);
        let row = format_meal_row(&engine, &lunch).unwrap();
        assert!(row.contains(NO_MEAL_SELECTED));
    }
}
