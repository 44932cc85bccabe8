use clap::Subcommand;

use super::{open_engine, parse_date, save_view, CliResult, Engine};

#[derive(Subcommand)]
pub enum WeekAction {
    /// Previous week
    Prev,
    /// Next week
    Next,
}

pub fn run_week(action: WeekAction) -> CliResult {
    let mut engine = open_engine()?;
    match action {
        WeekAction::Prev => engine.previous_week(),
        WeekAction::Next => engine.next_week(),
    };
    report(&engine)
}

pub fn run_month(year: i32, month: u32) -> CliResult {
    let mut engine = open_engine()?;
    engine.show_month(year, month)?;
    report(&engine)
}

pub fn run_select(raw: &str) -> CliResult {
    let mut engine = open_engine()?;
    let date = parse_date(raw, &engine)?;
    engine.select(date);
    report(&engine)
}

fn report(engine: &Engine) -> CliResult {
    let view = engine.view();
    println!("Week of {}, selected {}", view.week_start, view.selected);
    save_view(engine)
}
