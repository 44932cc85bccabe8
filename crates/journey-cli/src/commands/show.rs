use journey_core::{ActivitySnapshot, DayStatus};

use super::{open_engine, save_view, CliResult};

pub fn run(json: bool) -> CliResult {
    let engine = open_engine()?;
    let snapshot = engine.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_snapshot(&snapshot);
    }
    save_view(&engine)
}

fn status_mark(status: DayStatus) -> &'static str {
    match status {
        DayStatus::Learned => "learned",
        DayStatus::Frozen => "frozen",
        DayStatus::None => "-",
    }
}

pub fn print_snapshot(s: &ActivitySnapshot) {
    println!(
        "Goal: {} ({}) since {}",
        s.goal.topic, s.goal.timeframe, s.goal.period_start
    );

    let displayed = &s.displayed_period;
    let live = if displayed.start == s.live_period.start {
        " [live]"
    } else {
        ""
    };
    let state = if s.period_complete {
        "complete"
    } else {
        "in progress"
    };
    println!(
        "Period: {} .. {} ({state}){live}",
        displayed.start,
        displayed.end_exclusive.add_days(-1)
    );
    println!();
    println!("{}", s.month_label);

    for day in &s.week {
        let cursor = if day.is_selected { '>' } else { ' ' };
        let today = if day.is_today { "  (today)" } else { "" };
        println!(
            "{cursor} {} {}  {}{today}",
            day.weekday,
            day.date,
            status_mark(day.status)
        );
    }

    println!();
    println!(
        "Learned {}  Frozen {}",
        s.counts.learned, s.counts.frozen
    );
    println!("{}", s.freeze_label);
    if s.awaiting_first_log {
        println!("Log {} to begin the new period.", s.selected);
    }
}
