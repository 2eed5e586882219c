use std::fmt;

use serde::{Deserialize, Serialize};

/// A participant in the weekly plan.
///
/// The set is closed; code that walks people must go through [`Person::ALL`]
/// rather than assuming how many there are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Person {
    Tony,
    Sarah,
}

impl Person {
    /// Every person, in canonical order. The first entry is the reference
    /// person used when splitting and joining meals.
    pub const ALL: &'static [Person] = &[Person::Tony, Person::Sarah];

    /// Name used in display text and persisted keys.
    pub fn name(self) -> &'static str {
        match self {
            Person::Tony => "Tony",
            Person::Sarah => "Sarah",
        }
    }

    /// Exact, case-sensitive lookup by persisted name.
    pub fn from_name(name: &str) -> Option<Person> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }

    /// Case-insensitive lookup for user input.
    pub fn from_input(input: &str) -> Option<Person> {
        let input = input.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(input))
    }

    /// The person whose recipe survives a split and is copied on join.
    pub fn reference() -> Person {
        Self::ALL[0]
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A meal occasion within a day, declared in chronological order.
///
/// The derived ordering follows declaration order, which is the slot's sort
/// position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MealSlotType {
    Breakfast,
    MorningSnack,
    Lunch,
    AfternoonSnack,
    Dinner,
    EveningSnack,
}

impl MealSlotType {
    pub const ALL: &'static [MealSlotType] = &[
        MealSlotType::Breakfast,
        MealSlotType::MorningSnack,
        MealSlotType::Lunch,
        MealSlotType::AfternoonSnack,
        MealSlotType::Dinner,
        MealSlotType::EveningSnack,
    ];

    /// Canonical name, as written into persisted keys.
    pub fn name(self) -> &'static str {
        match self {
            MealSlotType::Breakfast => "Breakfast",
            MealSlotType::MorningSnack => "MorningSnack",
            MealSlotType::Lunch => "Lunch",
            MealSlotType::AfternoonSnack => "AfternoonSnack",
            MealSlotType::Dinner => "Dinner",
            MealSlotType::EveningSnack => "EveningSnack",
        }
    }

    /// Human-readable label for terminal output.
    pub fn label(self) -> &'static str {
        match self {
            MealSlotType::Breakfast => "Breakfast",
            MealSlotType::MorningSnack => "Morning snack",
            MealSlotType::Lunch => "Lunch",
            MealSlotType::AfternoonSnack => "Afternoon snack",
            MealSlotType::Dinner => "Dinner",
            MealSlotType::EveningSnack => "Evening snack",
        }
    }

    /// Position within the day.
    pub fn sort_order(self) -> u8 {
        self as u8
    }

    pub fn from_name(name: &str) -> Option<MealSlotType> {
        Self::ALL.iter().copied().find(|s| s.name() == name)
    }

    /// Case-insensitive lookup for user input; accepts either the canonical
    /// name or the label.
    pub fn from_input(input: &str) -> Option<MealSlotType> {
        let input = input.trim();
        Self::ALL.iter().copied().find(|s| {
            s.name().eq_ignore_ascii_case(input) || s.label().eq_ignore_ascii_case(input)
        })
    }
}

impl fmt::Display for MealSlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
