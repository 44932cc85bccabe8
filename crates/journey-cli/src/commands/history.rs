use journey_core::history::{weekday_headers, HistoryCell};
use journey_core::DayStatus;

use super::{open_engine, CliResult};

pub fn run(json: bool) -> CliResult {
    let engine = open_engine()?;
    let sections = engine.history();
    if json {
        println!("{}", serde_json::to_string_pretty(&sections)?);
        return Ok(());
    }

    let headers = weekday_headers(engine.settings().week_start).join(" ");
    for section in &sections {
        println!("{}", section.label);
        println!("{headers}");
        for row in &section.rows {
            let line: Vec<String> = row.iter().map(cell).collect();
            println!("{}", line.join(" "));
        }
        println!();
    }
    println!("L = learned, F = frozen, * = today");
    Ok(())
}

fn cell(slot: &Option<HistoryCell>) -> String {
    let Some(c) = slot else {
        return "   ".to_string();
    };
    let mark = match c.status {
        DayStatus::Learned => 'L',
        DayStatus::Frozen => 'F',
        DayStatus::None if c.is_today => '*',
        DayStatus::None => ' ',
    };
    format!("{:>2}{mark}", c.date.day())
}
