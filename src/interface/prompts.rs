use dialoguer::{Confirm, Select};
use strsim::jaro_winkler;

use crate::error::{PlanError, Result};
use crate::models::Recipe;
use crate::planner::constants::{FUZZY_MATCH_THRESHOLD, FUZZY_MAX_CANDIDATES};

/// Catalog recipes resembling `input`, best match first.
pub fn fuzzy_candidates<'a>(catalog: &'a [Recipe], input: &str) -> Vec<&'a Recipe> {
    let needle = input.trim().to_lowercase();
    let mut candidates: Vec<(&Recipe, f64)> = catalog
        .iter()
        .map(|r| (r, jaro_winkler(&r.name.to_lowercase(), &needle)))
        .filter(|(_, score)| *score > FUZZY_MATCH_THRESHOLD)
        .collect();

    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    candidates.into_iter().map(|(r, _)| r).collect()
}

/// Find the recipe the user meant by `input`.
///
/// An exact (case-insensitive) name wins outright. Otherwise close matches
/// are offered for confirmation. Returns `None` if the user declines.
pub fn resolve_recipe(catalog: &[Recipe], input: &str) -> Result<Option<Recipe>> {
    let input = input.trim();

    if let Some(recipe) = catalog.iter().find(|r| r.name.eq_ignore_ascii_case(input)) {
        return Ok(Some(recipe.clone()));
    }

    let candidates = fuzzy_candidates(catalog, input);
    match candidates.as_slice() {
        [] => Err(PlanError::RecipeNotFound(input.to_string())),
        [only] => {
            let confirm = Confirm::new()
                .with_prompt(format!("Did you mean '{}'?", only.name))
                .default(true)
                .interact()?;
            Ok(confirm.then(|| (*only).clone()))
        }
        many => {
            let options: Vec<&str> = many
                .iter()
                .take(FUZZY_MAX_CANDIDATES)
                .map(|r| r.name.as_str())
                .collect();

            let mut selection_options = options.clone();
            selection_options.push("None of these");

            let selection = Select::new()
                .with_prompt("Which did you mean?")
                .items(&selection_options)
                .default(0)
                .interact()?;

            Ok(many.get(selection).filter(|_| selection < options.len()).map(|r| (*r).clone()))
        }
    }
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
