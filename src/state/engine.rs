use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Duration, Local, NaiveDate};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{PlanError, Result};
use crate::models::{
    DayMeal, FoodToUseUp, MealSelection, MealSlotType, Person, PersonMealKey, Recipe,
};
use crate::planner::constants::{
    DAYS_IN_PLAN, NO_MEAL_REQUIRED, NO_MEAL_SELECTED, UNASSIGNED_MARKER,
};
use crate::planner::random::RandomSource;
use crate::planner::selection::pick_recipe;
use crate::planner::week::{monday_of_week, window_dates};
use crate::state::persistence::{StoredSelection, WeekSnapshot};
use crate::state::store::PlanStore;

/// Holds one week of meal planning state and every operation on it.
///
/// A selection exists for every person, date and slot in the window; only
/// their fields change. Lookups outside the window return defaults
/// (attending, no recipe, no reason, flags off).
pub struct PlanningEngine {
    week_start: NaiveDate,
    dates: Vec<NaiveDate>,
    selections: BTreeMap<PersonMealKey, MealSelection>,
    reasons: HashMap<PersonMealKey, String>,
    quick_meals: HashMap<DayMeal, bool>,
    pinned_meals: HashMap<DayMeal, bool>,
    foods_to_use_up: Vec<FoodToUseUp>,
    catalog: Vec<Recipe>,
    rng: Box<dyn RandomSource>,
}

impl PlanningEngine {
    /// Create an engine for the seven days starting at `start`.
    pub fn new(start: NaiveDate, catalog: Vec<Recipe>, rng: Box<dyn RandomSource>) -> Self {
        let mut engine = Self {
            week_start: start,
            dates: Vec::new(),
            selections: BTreeMap::new(),
            reasons: HashMap::new(),
            quick_meals: HashMap::new(),
            pinned_meals: HashMap::new(),
            foods_to_use_up: Vec::new(),
            catalog,
            rng,
        };
        engine.reset_window(start);
        engine
    }

    // ─────────────────────────────────────────────────────────────────────
    // Window
    // ─────────────────────────────────────────────────────────────────────

    pub fn week_start(&self) -> NaiveDate {
        self.week_start
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Every meal occasion in the window, chronologically.
    pub fn day_meals(&self) -> Vec<DayMeal> {
        self.dates
            .iter()
            .flat_map(|&date| MealSlotType::ALL.iter().map(move |&slot| DayMeal::new(date, slot)))
            .collect()
    }

    /// Monday identifying the persisted record for this window.
    pub fn record_week(&self) -> NaiveDate {
        monday_of_week(self.week_start)
    }

    /// Replace the window and reset all state to defaults.
    fn reset_window(&mut self, start: NaiveDate) {
        self.week_start = start;
        self.dates = window_dates(start);
        self.selections = self
            .dates
            .iter()
            .flat_map(|&date| MealSlotType::ALL.iter().map(move |&slot| DayMeal::new(date, slot)))
            .flat_map(|day_meal| {
                Person::ALL.iter().map(move |&person| {
                    let selection = MealSelection::new(person, day_meal);
                    (selection.key(), selection)
                })
            })
            .collect();
        self.reasons.clear();
        self.quick_meals.clear();
        self.pinned_meals.clear();
        self.foods_to_use_up.clear();
    }

    /// Move back one week and load whatever was saved for it.
    pub fn go_to_previous_week(&mut self, store: &mut dyn PlanStore) -> Result<()> {
        self.shift_window(-DAYS_IN_PLAN, store)
    }

    /// Move forward one week and load whatever was saved for it.
    pub fn go_to_next_week(&mut self, store: &mut dyn PlanStore) -> Result<()> {
        self.shift_window(DAYS_IN_PLAN, store)
    }

    fn shift_window(&mut self, days: i64, store: &mut dyn PlanStore) -> Result<()> {
        let start = self.week_start + Duration::days(days);
        info!(from = %self.week_start, to = %start, "changing week");
        self.reset_window(start);
        self.load(store)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Attendance, reasons and flags
    // ─────────────────────────────────────────────────────────────────────

    pub fn is_attending(&self, person: Person, day_meal: &DayMeal) -> bool {
        self.selections
            .get(&PersonMealKey::new(person, *day_meal))
            .map(|s| s.attending)
            .unwrap_or(true)
    }

    /// Flip attendance. The assigned recipe and any reason are untouched.
    pub fn toggle_attendance(&mut self, person: Person, day_meal: &DayMeal) {
        match self.selection_mut(person, day_meal) {
            Some(selection) => {
                selection.attending = !selection.attending;
                debug!(%person, %day_meal, attending = selection.attending, "toggled attendance");
            }
            None => debug!(%person, %day_meal, "toggle outside window ignored"),
        }
    }

    /// People attending `day_meal`, in canonical order.
    pub fn attendees(&self, day_meal: &DayMeal) -> Vec<Person> {
        Person::ALL
            .iter()
            .copied()
            .filter(|&p| self.is_attending(p, day_meal))
            .collect()
    }

    pub fn attendee_count(&self, day_meal: &DayMeal) -> usize {
        self.attendees(day_meal).len()
    }

    pub fn reason(&self, person: Person, day_meal: &DayMeal) -> &str {
        self.reasons
            .get(&PersonMealKey::new(person, *day_meal))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Store a trimmed reason. An empty reason removes the entry.
    pub fn set_reason(&mut self, text: &str, person: Person, day_meal: &DayMeal) {
        let key = PersonMealKey::new(person, *day_meal);
        let text = text.trim();
        if text.is_empty() {
            self.reasons.remove(&key);
        } else {
            self.reasons.insert(key, text.to_string());
        }
    }

    pub fn is_quick_meal(&self, day_meal: &DayMeal) -> bool {
        self.quick_meals.get(day_meal).copied().unwrap_or(false)
    }

    pub fn set_quick_meal(&mut self, quick: bool, day_meal: &DayMeal) {
        self.quick_meals.insert(*day_meal, quick);
    }

    pub fn is_pinned(&self, day_meal: &DayMeal) -> bool {
        self.pinned_meals.get(day_meal).copied().unwrap_or(false)
    }

    pub fn set_pinned(&mut self, pinned: bool, day_meal: &DayMeal) {
        self.pinned_meals.insert(*day_meal, pinned);
    }

    /// Serving summary, e.g. `2 x servings` or `1 x serving (Sarah)`.
    pub fn serving_info(&self, day_meal: &DayMeal) -> String {
        let attendees = self.attendee_count(day_meal);
        let absentees: Vec<Person> = Person::ALL
            .iter()
            .copied()
            .filter(|&p| !self.is_attending(p, day_meal))
            .collect();

        match (attendees, absentees.as_slice()) {
            (0, _) => self.no_meal_text(day_meal, &absentees),
            (1, [absentee]) => format!("1 x serving ({absentee})"),
            (n, _) => format!("{n} x servings"),
        }
    }

    /// Text for a meal nobody attends.
    ///
    /// One distinct reason is shown bare; several are attributed by name.
    fn no_meal_text(&self, day_meal: &DayMeal, absentees: &[Person]) -> String {
        let given: Vec<(Person, &str)> = absentees
            .iter()
            .map(|&p| (p, self.reason(p, day_meal)))
            .filter(|(_, reason)| !reason.is_empty())
            .collect();
        let distinct: BTreeSet<&str> = given.iter().map(|(_, reason)| *reason).collect();

        match distinct.len() {
            0 => NO_MEAL_REQUIRED.to_string(),
            1 => format!("{NO_MEAL_REQUIRED} - {}", given[0].1),
            _ => {
                let attributed: Vec<String> = given
                    .iter()
                    .map(|(person, reason)| format!("{person}: {reason}"))
                    .collect();
                format!("{NO_MEAL_REQUIRED} - {}", attributed.join(", "))
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Recipes
    // ─────────────────────────────────────────────────────────────────────

    pub fn catalog(&self) -> &[Recipe] {
        &self.catalog
    }

    /// Replace the catalog. Assigned recipes keep their current values.
    pub fn set_catalog(&mut self, catalog: Vec<Recipe>) {
        self.catalog = catalog;
    }

    /// Catalog entry with exactly this name.
    pub fn recipe_named(&self, name: &str) -> Option<&Recipe> {
        find_recipe(&self.catalog, name)
    }

    pub fn recipe_for(&self, person: Person, day_meal: &DayMeal) -> Option<&Recipe> {
        self.selections
            .get(&PersonMealKey::new(person, *day_meal))
            .and_then(|s| s.recipe.as_ref())
    }

    pub fn selection(&self, person: Person, day_meal: &DayMeal) -> Option<&MealSelection> {
        self.selections.get(&PersonMealKey::new(person, *day_meal))
    }

    fn selection_mut(&mut self, person: Person, day_meal: &DayMeal) -> Option<&mut MealSelection> {
        self.selections.get_mut(&PersonMealKey::new(person, *day_meal))
    }

    fn assign(&mut self, recipe: Option<Recipe>, person: Person, day_meal: &DayMeal) {
        if let Some(selection) = self.selection_mut(person, day_meal) {
            selection.recipe = recipe;
        }
    }

    /// Assign `recipe` to one person only.
    pub fn select_recipe(&mut self, recipe: Recipe, person: Person, day_meal: &DayMeal) {
        debug!(%person, %day_meal, recipe = %recipe.name, "selected recipe");
        self.assign(Some(recipe), person, day_meal);
    }

    /// Clear the recipe for everyone at `day_meal`.
    pub fn remove_meal(&mut self, day_meal: &DayMeal) {
        for &person in Person::ALL {
            self.assign(None, person, day_meal);
        }
        debug!(%day_meal, "removed meal");
    }

    /// Clear every attendee's recipe except the reference person's, so each
    /// can be chosen separately.
    pub fn split_meal(&mut self, day_meal: &DayMeal) {
        let reference = Person::reference();
        for person in self.attendees(day_meal) {
            if person != reference {
                self.assign(None, person, day_meal);
            }
        }
        debug!(%day_meal, "split meal");
    }

    /// Give every attendee the reference person's recipe.
    pub fn join_meal(&mut self, day_meal: &DayMeal) {
        let reference = Person::reference();
        let shared = self.recipe_for(reference, day_meal).cloned();
        for person in self.attendees(day_meal) {
            if person != reference {
                self.assign(shared.clone(), person, day_meal);
            }
        }
        debug!(%day_meal, "joined meal");
    }

    /// Whether attendees at `day_meal` are down for different recipes.
    ///
    /// An attendee with nothing assigned counts as differing from one with a
    /// recipe.
    pub fn is_split(&self, day_meal: &DayMeal) -> bool {
        let names: BTreeSet<Option<&str>> = self
            .attendees(day_meal)
            .into_iter()
            .map(|p| self.recipe_for(p, day_meal).map(|r| r.name.as_str()))
            .collect();
        names.len() > 1
    }

    /// Exchange the recipes at `a` and `b`, person by person.
    ///
    /// Both meals must be in the window; otherwise nothing changes.
    pub fn swap_meals(&mut self, a: &DayMeal, b: &DayMeal) {
        if a == b {
            return;
        }
        if !self.dates.contains(&a.date) || !self.dates.contains(&b.date) {
            debug!(%a, %b, "swap outside window ignored");
            return;
        }
        for &person in Person::ALL {
            let recipe_a = self.selection_mut(person, a).and_then(|s| s.recipe.take());
            let recipe_b = self.selection_mut(person, b).and_then(|s| s.recipe.take());
            self.assign(recipe_b, person, a);
            self.assign(recipe_a, person, b);
        }
        debug!(%a, %b, "swapped meals");
    }

    /// Display text for what is being eaten at `day_meal`.
    pub fn meal_description(&self, day_meal: &DayMeal) -> String {
        let attendees = self.attendees(day_meal);
        let assigned: Vec<(Person, Option<&Recipe>)> = attendees
            .iter()
            .map(|&p| (p, self.recipe_for(p, day_meal)))
            .collect();

        if assigned.iter().all(|(_, recipe)| recipe.is_none()) {
            return NO_MEAL_SELECTED.to_string();
        }
        if !self.is_split(day_meal) {
            if let Some((_, Some(recipe))) = assigned.first() {
                return recipe.name.clone();
            }
        }

        assigned
            .iter()
            .map(|(person, recipe)| {
                let name = recipe.map(|r| r.name.as_str()).unwrap_or(UNASSIGNED_MARKER);
                format!("{person}: {name}")
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Draw a fresh recipe for every unpinned meal that someone attends.
    ///
    /// Meals are filled in chronological order and each draw avoids recipes
    /// already drawn in this pass. Recipes at pinned meals are excluded from
    /// the start, so a pinned Thursday dinner is never repeated on Monday.
    /// Pinned meals and meals nobody attends keep whatever they had.
    pub fn populate_meal_recipes(&mut self) {
        let day_meals = self.day_meals();

        let mut used: Vec<(DayMeal, Recipe)> = day_meals
            .iter()
            .filter(|dm| self.is_pinned(dm))
            .flat_map(|dm| {
                Person::ALL
                    .iter()
                    .filter_map(|&p| self.recipe_for(p, dm).map(|r| (*dm, r.clone())))
                    .collect::<Vec<_>>()
            })
            .collect();

        let mut filled = 0usize;
        for day_meal in &day_meals {
            if self.is_pinned(day_meal) {
                continue;
            }
            let attendees = self.attendees(day_meal);
            if attendees.is_empty() {
                continue;
            }

            let picked = pick_recipe(day_meal, &self.catalog, &used, self.rng.as_mut());
            for person in attendees {
                self.assign(picked.clone(), person, day_meal);
            }
            if let Some(recipe) = picked {
                used.push((*day_meal, recipe));
                filled += 1;
            }
        }

        info!(week = %self.week_start, filled, "populated meal recipes");
    }

    // ─────────────────────────────────────────────────────────────────────
    // Food to use up
    // ─────────────────────────────────────────────────────────────────────

    pub fn foods_to_use_up(&self) -> &[FoodToUseUp] {
        &self.foods_to_use_up
    }

    pub fn add_food_to_use_up(
        &mut self,
        name: &str,
        is_full_meal: bool,
        is_frozen: bool,
    ) -> Result<Uuid> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PlanError::InvalidInput("Food name cannot be empty".to_string()));
        }
        let item = FoodToUseUp::new(name, is_full_meal, is_frozen);
        let id = item.id;
        self.foods_to_use_up.push(item);
        Ok(id)
    }

    pub fn update_food_to_use_up(
        &mut self,
        id: Uuid,
        name: &str,
        is_full_meal: bool,
        is_frozen: bool,
    ) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PlanError::InvalidInput("Food name cannot be empty".to_string()));
        }
        let item = self
            .foods_to_use_up
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(PlanError::FoodNotFound(id))?;
        item.name = name.to_string();
        item.is_full_meal = is_full_meal;
        item.is_frozen = is_frozen;
        Ok(())
    }

    pub fn remove_food_to_use_up(&mut self, id: Uuid) -> Result<FoodToUseUp> {
        let index = self
            .foods_to_use_up
            .iter()
            .position(|f| f.id == id)
            .ok_or(PlanError::FoodNotFound(id))?;
        Ok(self.foods_to_use_up.remove(index))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Persistence
    // ─────────────────────────────────────────────────────────────────────

    /// Write the whole week into its record, replacing what was stored.
    pub fn save(&self, store: &mut dyn PlanStore) -> Result<()> {
        let mut record = store.find_or_create(self.record_week())?;
        self.snapshot().encode_into(&mut record)?;
        store.write(record)?;
        info!(week = %self.record_week(), "saved plan week");
        Ok(())
    }

    /// Replace in-memory state with the stored record for this week.
    ///
    /// Recipes are matched by name against the current catalog; names that
    /// no longer exist load as unassigned.
    pub fn load(&mut self, store: &mut dyn PlanStore) -> Result<()> {
        let record = store.find_or_create(self.record_week())?;
        let snapshot = WeekSnapshot::decode(&record, Local::now().date_naive());

        self.reset_window(self.week_start);

        for stored in snapshot.selections {
            let Some(key) = stored.key() else {
                debug!(
                    person = %stored.person,
                    slot = %stored.slot,
                    "skipping unrecognised selection"
                );
                continue;
            };
            let Some(selection) = self.selections.get_mut(&key) else {
                continue;
            };
            selection.attending = stored.attending;
            selection.recipe = stored.recipe.as_deref().and_then(|name| {
                let found = find_recipe(&self.catalog, name).cloned();
                if found.is_none() {
                    debug!(recipe = name, "stored recipe no longer in catalog");
                }
                found
            });
        }
        self.reasons = snapshot.reasons;
        self.quick_meals = snapshot.quick_meals;
        self.pinned_meals = snapshot.pinned_meals;
        self.foods_to_use_up = snapshot.foods_to_use_up;

        info!(week = %self.record_week(), "loaded plan week");
        Ok(())
    }

    fn snapshot(&self) -> WeekSnapshot {
        WeekSnapshot {
            selections: self.selections.values().map(StoredSelection::from_selection).collect(),
            reasons: self.reasons.clone(),
            quick_meals: self.quick_meals.clone(),
            pinned_meals: self.pinned_meals.clone(),
            foods_to_use_up: self.foods_to_use_up.clone(),
        }
    }
}

fn find_recipe<'a>(catalog: &'a [Recipe], name: &str) -> Option<&'a Recipe> {
    catalog.iter().find(|r| r.name == name)
}
