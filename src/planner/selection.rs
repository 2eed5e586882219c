use tracing::debug;

use crate::models::{DayMeal, MealSlotType, Recipe};
use crate::planner::random::RandomSource;

/// Check whether `recipe` may be placed at `target` given the recipes already
/// placed elsewhere in the current pass.
///
/// A recipe used anywhere else is a repeat, unless the target is a lunch and
/// every earlier use was the previous day's dinner (planned leftovers).
pub fn is_eligible(target: &DayMeal, recipe: &Recipe, already_used: &[(DayMeal, Recipe)]) -> bool {
    let mut prior_uses = already_used
        .iter()
        .filter(|(day_meal, used)| used.name == recipe.name && day_meal != target)
        .map(|(day_meal, _)| day_meal)
        .peekable();

    if prior_uses.peek().is_none() {
        return true;
    }
    if target.slot != MealSlotType::Lunch {
        return false;
    }

    let previous_dinner = DayMeal::new(target.date, MealSlotType::Dinner).previous_day();
    prior_uses.all(|day_meal| *day_meal == previous_dinner)
}

/// Pick a recipe for `target`.
///
/// Eligible recipes are weighted by their suitability for the target slot and
/// drawn uniformly from the expanded pool: a recipe with weight 3 occupies
/// three entries. Returns `None` when nothing is eligible, which callers treat
/// as "leave unassigned".
pub fn pick_recipe(
    target: &DayMeal,
    catalog: &[Recipe],
    already_used: &[(DayMeal, Recipe)],
    rng: &mut dyn RandomSource,
) -> Option<Recipe> {
    let pool: Vec<&Recipe> = catalog
        .iter()
        .filter(|recipe| is_eligible(target, recipe, already_used))
        .flat_map(|recipe| std::iter::repeat(recipe).take(recipe.suitability(target.slot).weight()))
        .collect();

    if pool.is_empty() {
        debug!(day_meal = %target, "no eligible recipe");
        return None;
    }

    let picked = pool[rng.next_index(pool.len())];
    debug!(day_meal = %target, recipe = %picked.name, pool = pool.len(), "picked recipe");
    Some(picked.clone())
}
