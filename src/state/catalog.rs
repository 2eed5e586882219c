use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::models::Recipe;

/// Read access to the recipe catalog.
pub trait RecipeCatalog {
    /// Every known recipe. Names are unique.
    fn all_recipes(&self) -> Result<Vec<Recipe>>;
}

impl RecipeCatalog for Vec<Recipe> {
    fn all_recipes(&self) -> Result<Vec<Recipe>> {
        Ok(dedupe_by_name(self.clone()))
    }
}

/// A catalog file on disk: JSON, or CSV when the extension is `.csv`.
#[derive(Debug, Clone)]
pub struct RecipeFile {
    path: PathBuf,
}

impl RecipeFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_csv(&self) -> bool {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
    }
}

impl RecipeCatalog for RecipeFile {
    fn all_recipes(&self) -> Result<Vec<Recipe>> {
        if self.is_csv() {
            load_recipes_csv(&self.path)
        } else {
            load_recipes(&self.path)
        }
    }
}

/// Load recipes from a JSON array.
///
/// Deduplicates by name (last occurrence wins, first position kept).
pub fn load_recipes<P: AsRef<Path>>(path: P) -> Result<Vec<Recipe>> {
    let content = fs::read_to_string(path.as_ref())?;
    let recipes: Vec<Recipe> = serde_json::from_str(&content)?;
    debug!(path = %path.as_ref().display(), count = recipes.len(), "loaded recipe file");
    Ok(dedupe_by_name(recipes))
}

/// Load recipes from a CSV file with `Name,Breakfast,Lunch,Dinner` headers.
pub fn load_recipes_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Recipe>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path.as_ref())?;

    let mut recipes = Vec::new();
    for row in reader.deserialize() {
        let recipe: Recipe = row?;
        recipes.push(recipe);
    }
    debug!(path = %path.as_ref().display(), count = recipes.len(), "loaded recipe csv");
    Ok(dedupe_by_name(recipes))
}

/// Save recipes to a JSON file.
pub fn save_recipes<P: AsRef<Path>>(path: P, recipes: &[Recipe]) -> Result<()> {
    let deduped = dedupe_by_name(recipes.to_vec());
    let json = serde_json::to_string_pretty(&deduped)?;
    fs::write(path, json)?;
    Ok(())
}

fn dedupe_by_name(recipes: Vec<Recipe>) -> Vec<Recipe> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut deduped: Vec<Recipe> = Vec::with_capacity(recipes.len());

    for recipe in recipes {
        match positions.get(&recipe.name) {
            Some(&index) => deduped[index] = recipe,
            None => {
                positions.insert(recipe.name.clone(), deduped.len());
                deduped.push(recipe);
            }
        }
    }

    deduped
}
