//! Calendar-day identity and week conventions.

mod date_key;
mod week_start;

pub use date_key::{DateKey, ParseDateKeyError};
pub use week_start::WeekStart;
