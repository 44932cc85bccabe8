//! Session-level orchestration: the engine, its clock, and the view model.

mod clock;
mod engine;
mod view;

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::ActivityEngine;
pub use view::{ActivitySnapshot, EngineSettings, ViewState, WeekDay};
