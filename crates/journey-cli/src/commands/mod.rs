pub mod browse;
pub mod config;
pub mod goal;
pub mod history;
pub mod log;
pub mod show;

use journey_core::storage::keys;
use journey_core::{
    ActivityEngine, Config, Database, DateKey, EngineSettings, SystemClock, ViewState,
};

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub type Engine = ActivityEngine<Database, SystemClock>;

/// Open the engine over the on-disk store, restoring the last browse state.
pub fn open_engine() -> CliResult<Engine> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let saved = load_view(&db);
    Ok(ActivityEngine::open_with_view(
        db,
        SystemClock,
        EngineSettings::from(&config),
        saved,
    ))
}

fn load_view(db: &Database) -> Option<ViewState> {
    match db.kv_get(keys::UI_VIEW) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(view) => Some(view),
            Err(e) => {
                tracing::warn!("discarding unreadable view state: {e}");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!("could not read view state: {e}");
            None
        }
    }
}

pub fn save_view(engine: &Engine) -> CliResult {
    let json = serde_json::to_string(engine.view())?;
    engine.store().kv_set(keys::UI_VIEW, &json)?;
    Ok(())
}

/// `YYYY-MM-DD`, or `today`.
pub fn parse_date(raw: &str, engine: &Engine) -> CliResult<DateKey> {
    if raw.eq_ignore_ascii_case("today") {
        return Ok(engine.today());
    }
    Ok(raw.parse::<DateKey>()?)
}
