pub mod prompts;
pub mod render;

pub use prompts::{fuzzy_candidates, prompt_yes_no, resolve_recipe};
pub use render::{display_foods_to_use_up, display_recipes, display_week, format_meal_row};
