use std::fmt;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};

use crate::error::{PlanError, Result};
use crate::models::person::{MealSlotType, Person};

/// Date portion of persisted keys, e.g. `2026/03/05`.
pub const KEY_DATE_FORMAT: &str = "%Y/%m/%d";

/// A parser for one generation of the key format.
///
/// Receives the raw key and the date to substitute when the format carries
/// none.
type DayMealFormat = fn(&str, NaiveDate) -> Option<DayMeal>;

/// Known key formats, newest first.
const DAY_MEAL_FORMATS: &[DayMealFormat] = &[parse_dated, parse_undated];

/// One meal occasion: a calendar day plus a slot.
///
/// Ordered by date, then slot position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayMeal {
    pub date: NaiveDate,
    pub slot: MealSlotType,
}

impl DayMeal {
    pub fn new(date: NaiveDate, slot: MealSlotType) -> Self {
        Self { date, slot }
    }

    /// Build from a timestamp, discarding the time of day.
    pub fn at(timestamp: NaiveDateTime, slot: MealSlotType) -> Self {
        Self::new(timestamp.date(), slot)
    }

    /// Map/storage key, e.g. `2026/03/05-Breakfast`.
    pub fn key(&self) -> String {
        format!("{}-{}", self.date.format(KEY_DATE_FORMAT), self.slot.name())
    }

    /// The same slot on the previous calendar day.
    pub fn previous_day(&self) -> Self {
        Self::new(self.date - Duration::days(1), self.slot)
    }

    /// Parse a key, substituting today's date for legacy keys without one.
    pub fn parse(key: &str) -> Result<Self> {
        Self::parse_with_fallback(key, Local::now().date_naive())
    }

    /// Parse a key, substituting `fallback` for legacy keys without a date.
    pub fn parse_with_fallback(key: &str, fallback: NaiveDate) -> Result<Self> {
        DAY_MEAL_FORMATS
            .iter()
            .find_map(|format| format(key, fallback))
            .ok_or_else(|| PlanError::InvalidKey(key.to_string()))
    }
}

impl fmt::Display for DayMeal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// `YYYY/MM/DD-<Slot>`
fn parse_dated(key: &str, _fallback: NaiveDate) -> Option<DayMeal> {
    let (date, slot) = key.split_once('-')?;
    let date = NaiveDate::parse_from_str(date, KEY_DATE_FORMAT).ok()?;
    let slot = MealSlotType::from_name(slot)?;
    Some(DayMeal::new(date, slot))
}

/// `<Slot>`, written before keys carried a date.
fn parse_undated(key: &str, fallback: NaiveDate) -> Option<DayMeal> {
    MealSlotType::from_name(key).map(|slot| DayMeal::new(fallback, slot))
}

/// Identity of one person's seat at a [`DayMeal`].
///
/// Field order puts the meal first so the derived ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PersonMealKey {
    pub day_meal: DayMeal,
    pub person: Person,
}

impl PersonMealKey {
    pub fn new(person: Person, day_meal: DayMeal) -> Self {
        Self { day_meal, person }
    }

    /// Storage key, e.g. `Tony-2026/03/05-Breakfast`.
    pub fn key(&self) -> String {
        format!("{}-{}", self.person.name(), self.day_meal.key())
    }

    pub fn parse(key: &str) -> Result<Self> {
        Self::parse_with_fallback(key, Local::now().date_naive())
    }

    /// Parse a key; the meal portion goes through the same format list as
    /// [`DayMeal::parse_with_fallback`], so `Tony-Breakfast` is accepted.
    pub fn parse_with_fallback(key: &str, fallback: NaiveDate) -> Result<Self> {
        let invalid = || PlanError::InvalidKey(key.to_string());
        let (person, meal) = key.split_once('-').ok_or_else(invalid)?;
        let person = Person::from_name(person).ok_or_else(invalid)?;
        let day_meal = DayMeal::parse_with_fallback(meal, fallback).map_err(|_| invalid())?;
        Ok(Self::new(person, day_meal))
    }
}

impl fmt::Display for PersonMealKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}
