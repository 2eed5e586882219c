use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::person::MealSlotType;
use crate::planner::constants::{WEIGHT_ALWAYS, WEIGHT_NEVER, WEIGHT_SOMETIMES};

/// How well a recipe fits a meal category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suitability {
    #[default]
    #[serde(alias = "Never")]
    Never,
    #[serde(alias = "Sometimes")]
    Sometimes,
    #[serde(alias = "Always")]
    Always,
}

impl Suitability {
    /// Number of draws this suitability contributes to the weighted pick.
    pub fn weight(self) -> usize {
        match self {
            Suitability::Never => WEIGHT_NEVER,
            Suitability::Sometimes => WEIGHT_SOMETIMES,
            Suitability::Always => WEIGHT_ALWAYS,
        }
    }

    /// Parse `never`, `sometimes` or `always`, ignoring case.
    pub fn from_name(name: &str) -> Option<Suitability> {
        match name.trim().to_lowercase().as_str() {
            "never" => Some(Suitability::Never),
            "sometimes" => Some(Suitability::Sometimes),
            "always" => Some(Suitability::Always),
            _ => None,
        }
    }
}

/// Empty cells and nulls read as `Never`.
fn suitability_or_never<'de, D>(deserializer: D) -> Result<Suitability, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(Suitability::Never),
        Some(text) => Suitability::from_name(text)
            .ok_or_else(|| D::Error::custom(format!("unknown suitability '{}'", text))),
    }
}

/// A catalog recipe. Identity is the name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Breakfast", default, deserialize_with = "suitability_or_never")]
    pub breakfast: Suitability,

    #[serde(rename = "Lunch", default, deserialize_with = "suitability_or_never")]
    pub lunch: Suitability,

    #[serde(rename = "Dinner", default, deserialize_with = "suitability_or_never")]
    pub dinner: Suitability,
}

impl Recipe {
    /// A recipe suitable for nothing until its weights are set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            breakfast: Suitability::Never,
            lunch: Suitability::Never,
            dinner: Suitability::Never,
        }
    }

    pub fn with_breakfast(mut self, suitability: Suitability) -> Self {
        self.breakfast = suitability;
        self
    }

    pub fn with_lunch(mut self, suitability: Suitability) -> Self {
        self.lunch = suitability;
        self
    }

    pub fn with_dinner(mut self, suitability: Suitability) -> Self {
        self.dinner = suitability;
        self
    }

    /// Suitability for a slot. Snack slots are never suitable.
    pub fn suitability(&self, slot: MealSlotType) -> Suitability {
        match slot {
            MealSlotType::Breakfast => self.breakfast,
            MealSlotType::Lunch => self.lunch,
            MealSlotType::Dinner => self.dinner,
            MealSlotType::MorningSnack
            | MealSlotType::AfternoonSnack
            | MealSlotType::EveningSnack => Suitability::Never,
        }
    }
}

impl PartialEq for Recipe {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Recipe {}

impl std::hash::Hash for Recipe {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snacks_are_never_suitable() {
        let recipe = Recipe::new("Toast")
            .with_breakfast(Suitability::Always)
            .with_lunch(Suitability::Always)
            .with_dinner(Suitability::Always);
        assert_eq!(recipe.suitability(MealSlotType::Breakfast), Suitability::Always);
        assert_eq!(recipe.suitability(MealSlotType::MorningSnack), Suitability::Never);
        assert_eq!(recipe.suitability(MealSlotType::EveningSnack), Suitability::Never);
    }

    #[test]
    fn test_weights() {
        assert_eq!(Suitability::Never.weight(), 0);
        assert_eq!(Suitability::Sometimes.weight(), 1);
        assert_eq!(Suitability::Always.weight(), 3);
    }

    #[test]
    fn test_equality_by_name() {
        let a = Recipe::new("Chilli").with_dinner(Suitability::Always);
        let b = Recipe::new("Chilli");
        assert_eq!(a, b);
        assert_ne!(a, Recipe::new("chilli"));
    }

    #[test]
    fn test_deserialize_missing_weights_default_to_never() {
        let json = r#"{"Name": "Porridge", "Breakfast": "always"}"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.breakfast, Suitability::Always);
        assert_eq!(recipe.lunch, Suitability::Never);
        assert_eq!(recipe.dinner, Suitability::Never);
    }

    #[test]
    fn test_deserialize_blank_and_null_weights() {
        let json = r#"{"Name": "Soup", "Breakfast": "", "Lunch": "Always", "Dinner": null}"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.breakfast, Suitability::Never);
        assert_eq!(recipe.lunch, Suitability::Always);
        assert_eq!(recipe.dinner, Suitability::Never);

        let bad = r#"{"Name": "Soup", "Lunch": "often"}"#;
        assert!(serde_json::from_str::<Recipe>(bad).is_err());
    }
}
