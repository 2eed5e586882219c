pub mod constants;
pub mod random;
pub mod selection;
pub mod week;

pub use constants::*;
pub use random::{RandomSource, SequenceSource, StdRandom};
pub use selection::{is_eligible, pick_recipe};
pub use week::{monday_of_week, start_of_planning_week, window_dates};
