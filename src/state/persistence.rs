use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::models::{DayMeal, FoodToUseUp, MealSelection, MealSlotType, Person, PersonMealKey};
use crate::state::store::PlanWeekRecord;

/// Flat on-disk form of a [`MealSelection`]. The recipe is stored by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSelection {
    pub person: String,
    /// Start of the meal's day, seconds since the Unix epoch (UTC).
    pub date: i64,
    pub slot: String,
    pub attending: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<String>,
}

impl StoredSelection {
    pub fn from_selection(selection: &MealSelection) -> Self {
        Self {
            person: selection.person.name().to_string(),
            date: to_epoch(selection.day_meal.date),
            slot: selection.day_meal.slot.name().to_string(),
            attending: selection.attending,
            recipe: selection.recipe_name().map(str::to_string),
        }
    }

    /// The identity this entry belongs to, if its fields are recognised.
    pub fn key(&self) -> Option<PersonMealKey> {
        let person = Person::from_name(&self.person)?;
        let slot = MealSlotType::from_name(&self.slot)?;
        let date = from_epoch(self.date)?;
        Some(PersonMealKey::new(person, DayMeal::new(date, slot)))
    }
}

/// Decoded contents of a [`PlanWeekRecord`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeekSnapshot {
    pub selections: Vec<StoredSelection>,
    pub reasons: HashMap<PersonMealKey, String>,
    pub quick_meals: HashMap<DayMeal, bool>,
    pub pinned_meals: HashMap<DayMeal, bool>,
    pub foods_to_use_up: Vec<FoodToUseUp>,
}

impl WeekSnapshot {
    /// Decode every category of `record`.
    ///
    /// A blob that fails to decode becomes an empty collection; the other
    /// categories still load. Legacy keys without a date take `fallback`.
    pub fn decode(record: &PlanWeekRecord, fallback: NaiveDate) -> Self {
        let reasons: BTreeMap<String, String> = decode_blob(record.reasons.as_deref(), "reasons");
        let quick_meals: BTreeMap<String, bool> =
            decode_blob(record.quick_meals.as_deref(), "quick meals");
        let pinned_meals: BTreeMap<String, bool> =
            decode_blob(record.pinned_meals.as_deref(), "pinned meals");

        Self {
            selections: decode_blob(record.selections.as_deref(), "selections"),
            reasons: parse_person_keys(reasons, fallback),
            quick_meals: parse_day_meal_keys(quick_meals, fallback),
            pinned_meals: parse_day_meal_keys(pinned_meals, fallback),
            foods_to_use_up: decode_blob(record.food_to_use_up.as_deref(), "food to use up"),
        }
    }

    /// Serialize every category into `record`, replacing what was there.
    pub fn encode_into(&self, record: &mut PlanWeekRecord) -> Result<()> {
        let reasons: BTreeMap<String, &String> =
            self.reasons.iter().map(|(k, v)| (k.key(), v)).collect();
        let quick_meals: BTreeMap<String, bool> =
            self.quick_meals.iter().map(|(k, v)| (k.key(), *v)).collect();
        let pinned_meals: BTreeMap<String, bool> =
            self.pinned_meals.iter().map(|(k, v)| (k.key(), *v)).collect();

        record.selections = Some(serde_json::to_string(&self.selections)?);
        record.reasons = Some(serde_json::to_string(&reasons)?);
        record.quick_meals = Some(serde_json::to_string(&quick_meals)?);
        record.pinned_meals = Some(serde_json::to_string(&pinned_meals)?);
        record.food_to_use_up = Some(serde_json::to_string(&self.foods_to_use_up)?);
        Ok(())
    }
}

/// Seconds since the epoch for the start of `date` in UTC.
pub fn to_epoch(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// The UTC calendar day containing `timestamp`.
pub fn from_epoch(timestamp: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.date_naive())
}

fn decode_blob<T: DeserializeOwned + Default>(blob: Option<&str>, category: &str) -> T {
    let Some(text) = blob else {
        return T::default();
    };
    serde_json::from_str(text).unwrap_or_else(|e| {
        warn!(category, error = %e, "discarding undecodable plan data");
        T::default()
    })
}

fn parse_person_keys(
    entries: BTreeMap<String, String>,
    fallback: NaiveDate,
) -> HashMap<PersonMealKey, String> {
    entries
        .into_iter()
        .filter_map(|(key, value)| match PersonMealKey::parse_with_fallback(&key, fallback) {
            Ok(parsed) => Some((parsed, value)),
            Err(e) => {
                warn!(error = %e, "skipping reason with unreadable key");
                None
            }
        })
        .collect()
}

fn parse_day_meal_keys(
    entries: BTreeMap<String, bool>,
    fallback: NaiveDate,
) -> HashMap<DayMeal, bool> {
    entries
        .into_iter()
        .filter_map(|(key, value)| match DayMeal::parse_with_fallback(&key, fallback) {
            Ok(parsed) => Some((parsed, value)),
            Err(e) => {
                warn!(error = %e, "skipping flag with unreadable key");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Recipe;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn monday() -> NaiveDate {
        date(2)
    }

    #[test]
    fn test_epoch_roundtrip_is_day_granular() {
        let d = date(5);
        let ts = to_epoch(d);
        assert_eq!(ts % 86_400, 0);
        assert_eq!(from_epoch(ts), Some(d));
        // Any time during the day maps back to the same date
        assert_eq!(from_epoch(ts + 3_600 * 13), Some(d));
    }

    #[test]
    fn test_stored_selection_shape() {
        let mut selection =
            MealSelection::new(Person::Tony, DayMeal::new(date(5), MealSlotType::Dinner));
        selection.recipe = Some(Recipe::new("Chilli"));

        let stored = StoredSelection::from_selection(&selection);
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["person"], "Tony");
        assert_eq!(json["slot"], "Dinner");
        assert_eq!(json["attending"], true);
        assert_eq!(json["recipe"], "Chilli");
        assert_eq!(stored.key(), Some(selection.key()));
    }

    #[test]
    fn test_unknown_person_has_no_key() {
        let stored = StoredSelection {
            person: "Nobody".to_string(),
            date: to_epoch(date(5)),
            slot: "Lunch".to_string(),
            attending: true,
            recipe: None,
        };
        assert_eq!(stored.key(), None);
    }

    #[test]
    fn test_encoded_key_formats() {
        let lunch = DayMeal::new(date(5), MealSlotType::Lunch);
        let mut snapshot = WeekSnapshot::default();
        snapshot
            .reasons
            .insert(PersonMealKey::new(Person::Tony, lunch), "Work".to_string());
        snapshot.pinned_meals.insert(lunch, true);

        let mut record = PlanWeekRecord::new(monday());
        snapshot.encode_into(&mut record).unwrap();

        assert_eq!(
            record.reasons.as_deref(),
            Some(r#"{"Tony-2026/03/05-Lunch":"Work"}"#)
        );
        assert_eq!(
            record.pinned_meals.as_deref(),
            Some(r#"{"2026/03/05-Lunch":true}"#)
        );
        assert_eq!(record.quick_meals.as_deref(), Some("{}"));
    }

    #[test]
    fn test_legacy_keys_use_fallback_date() {
        let mut record = PlanWeekRecord::new(monday());
        record.reasons = Some(r#"{"Sarah-Dinner":"Gym"}"#.to_string());
        record.quick_meals = Some(r#"{"Lunch":true}"#.to_string());

        let fallback = date(4);
        let snapshot = WeekSnapshot::decode(&record, fallback);

        let key = PersonMealKey::new(Person::Sarah, DayMeal::new(fallback, MealSlotType::Dinner));
        assert_eq!(snapshot.reasons.get(&key).map(String::as_str), Some("Gym"));
        assert_eq!(
            snapshot
                .quick_meals
                .get(&DayMeal::new(fallback, MealSlotType::Lunch)),
            Some(&true)
        );
    }

    #[test]
    fn test_corrupt_blob_only_drops_its_category() {
        let mut record = PlanWeekRecord::new(monday());
        record.selections = Some("{{{ not json".to_string());
        record.reasons = Some(r#"{"Tony-2026/03/05-Lunch":"Work"}"#.to_string());
        record.food_to_use_up = Some(r#"[{"oops": 1}]"#.to_string());

        let snapshot = WeekSnapshot::decode(&record, monday());
        assert!(snapshot.selections.is_empty());
        assert!(snapshot.foods_to_use_up.is_empty());
        assert_eq!(snapshot.reasons.len(), 1);
    }

    #[test]
    fn test_unreadable_keys_are_skipped() {
        let mut record = PlanWeekRecord::new(monday());
        record.pinned_meals =
            Some(r#"{"2026/03/05-Dinner":true,"garbage":true}"#.to_string());

        let snapshot = WeekSnapshot::decode(&record, monday());
        assert_eq!(snapshot.pinned_meals.len(), 1);
    }

    #[test]
    fn test_empty_record_decodes_empty() {
        let snapshot = WeekSnapshot::decode(&PlanWeekRecord::new(monday()), monday());
        assert_eq!(snapshot, WeekSnapshot::default());
    }
}
