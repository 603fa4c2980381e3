pub mod extract;
pub mod record;

pub use extract::{extract_boxed, find_boxed, Extraction, BOXED_MARKER, NOT_FOUND};
pub use record::{first_choice_turns, TurnScan};
