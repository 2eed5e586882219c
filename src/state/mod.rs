mod catalog;
mod engine;
mod persistence;
mod store;

pub use catalog::{load_recipes, load_recipes_csv, save_recipes, RecipeCatalog, RecipeFile};
pub use engine::PlanningEngine;
pub use persistence::{from_epoch, to_epoch, StoredSelection, WeekSnapshot};
pub use store::{JsonFileStore, MemoryStore, PlanStore, PlanWeekRecord};
