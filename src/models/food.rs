use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A leftover or pantry item that should be eaten soon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodToUseUp {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub is_full_meal: bool,
    #[serde(default)]
    pub is_frozen: bool,
}

impl FoodToUseUp {
    pub fn new(name: impl Into<String>, is_full_meal: bool, is_frozen: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            is_full_meal,
            is_frozen,
        }
    }

    /// Short tag list for display, e.g. `[meal, frozen]`.
    pub fn tags(&self) -> String {
        let mut tags = Vec::new();
        if self.is_full_meal {
            tags.push("meal");
        }
        if self.is_frozen {
            tags.push("frozen");
        }
        if tags.is_empty() {
            String::new()
        } else {
            format!("[{}]", tags.join(", "))
        }
    }
}
