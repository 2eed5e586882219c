/// Draw weight for a recipe marked `never` for a slot (excluded).
pub const WEIGHT_NEVER: usize = 0;

/// Draw weight for a recipe marked `sometimes` for a slot.
pub const WEIGHT_SOMETIMES: usize = 1;

/// Draw weight for a recipe marked `always` for a slot.
pub const WEIGHT_ALWAYS: usize = 3;

/// Number of consecutive dates in a planning window.
pub const DAYS_IN_PLAN: i64 = 7;

/// Days from Monday (0 = Monday) up to which planning targets the current
/// week. Later days plan the following week.
pub const LAST_PLANNING_WEEKDAY: u32 = 2;

// ─────────────────────────────────────────────────────────────────────────────
// Display text
// ─────────────────────────────────────────────────────────────────────────────

pub const NO_MEAL_REQUIRED: &str = "No meal required";

pub const NO_MEAL_SELECTED: &str = "No meal selected";

/// Placeholder for an attendee without a recipe in a split meal.
pub const UNASSIGNED_MARKER: &str = "-";

/// Minimum Jaro-Winkler similarity for a fuzzy recipe-name match.
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.7;

/// Maximum fuzzy candidates offered in a selection prompt.
pub const FUZZY_MAX_CANDIDATES: usize = 5;
