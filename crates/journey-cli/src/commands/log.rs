use clap::ValueEnum;
use journey_core::DayStatus;

use super::{open_engine, parse_date, save_view, CliResult};

/// CLI-facing status, mapped to the domain `DayStatus`.
#[derive(Debug, Clone, ValueEnum)]
pub enum StatusArg {
    /// A day spent learning.
    Learned,
    /// An excused day; at most two per week.
    Frozen,
    /// Log the day as none: neither learned nor frozen.
    None,
}

impl StatusArg {
    fn to_domain(&self) -> DayStatus {
        match self {
            Self::Learned => DayStatus::Learned,
            Self::Frozen => DayStatus::Frozen,
            Self::None => DayStatus::None,
        }
    }
}

pub fn run(status: StatusArg, date: Option<&str>) -> CliResult {
    let mut engine = open_engine()?;
    if let Some(raw) = date {
        let date = parse_date(raw, &engine)?;
        engine.select(date);
    }

    let date = engine.view().selected;
    let status = status.to_domain();
    if status == DayStatus::Frozen
        && engine.status_for(date) != DayStatus::Frozen
        && !engine.is_freeze_available()
    {
        save_view(&engine)?;
        return Err(format!("no freezes left for the week of {}", engine.view().week_start).into());
    }

    engine.log_selected(status)?;
    println!("{date}: {}", status.as_str());
    save_view(&engine)
}
