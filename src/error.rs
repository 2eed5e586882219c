use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Recipe not found: {0}")]
    RecipeNotFound(String),

    #[error("Food to use up not found: {0}")]
    FoodNotFound(uuid::Uuid),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;
