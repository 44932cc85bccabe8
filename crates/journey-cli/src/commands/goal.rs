use clap::{Subcommand, ValueEnum};
use journey_core::{Event, Timeframe};

use super::{open_engine, save_view, CliResult, Engine};

/// CLI-facing timeframe, mapped to the domain `Timeframe`.
#[derive(Debug, Clone, ValueEnum)]
pub enum TimeframeArg {
    Week,
    Month,
    Year,
}

impl TimeframeArg {
    fn to_domain(&self) -> Timeframe {
        match self {
            Self::Week => Timeframe::Week,
            Self::Month => Timeframe::Month,
            Self::Year => Timeframe::Year,
        }
    }
}

#[derive(Subcommand)]
pub enum GoalAction {
    /// Print the current goal
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Set the topic and timeframe, starting a new period today
    Set {
        topic: String,
        /// Keeps the current timeframe when omitted
        #[arg(long, value_enum)]
        timeframe: Option<TimeframeArg>,
    },
    /// Start a new period today with the same goal
    Restart,
}

pub fn run(action: GoalAction) -> CliResult {
    let mut engine = open_engine()?;
    match action {
        GoalAction::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(engine.goal())?);
            } else {
                print_goal(&engine);
            }
        }
        GoalAction::Set { topic, timeframe } => {
            let timeframe = timeframe
                .map(|t| t.to_domain())
                .unwrap_or(engine.goal().timeframe);
            if !engine.goal_has_changes(&topic, timeframe) {
                println!("goal unchanged");
            } else {
                let event = engine.create_or_edit_goal(&topic, timeframe)?;
                print_revision(&event);
            }
        }
        GoalAction::Restart => {
            let event = engine.restart_same_goal()?;
            print_revision(&event);
        }
    }
    save_view(&engine)
}

fn print_goal(engine: &Engine) {
    let goal = engine.goal();
    let period = engine.live_period();
    println!("Topic:     {}", goal.topic);
    println!("Timeframe: {}", goal.timeframe);
    println!(
        "Period:    {} .. {}",
        period.start,
        period.end_exclusive.add_days(-1)
    );
    println!("Revision:  {}", engine.revision());
}

fn print_revision(event: &Event) {
    if let Event::GoalRevised {
        revision,
        goal,
        focus,
        ..
    } = event
    {
        println!(
            "Goal set: {} ({}) from {}, revision {revision}",
            goal.topic, goal.timeframe, goal.period_start
        );
        println!("Next day to log: {focus}");
    }
}
