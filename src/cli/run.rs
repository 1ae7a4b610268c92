use std::path::PathBuf;

use chrono::NaiveTime;
use clap::{ArgAction, Parser, builder::BoolishValueParser};
use enumset::EnumSet;

use crate::core::tariff::Tariff;

#[derive(Parser)]
pub struct RunArgs {
    /// Tariffs to compare, the current one included.
    #[clap(
        long = "tariffs",
        env = "TARIFFS",
        value_delimiter = ',',
        num_args = 1..,
        default_value = "agile,go,cosy",
    )]
    pub tariffs: Vec<Tariff>,

    /// Compare and report, but never switch.
    #[clap(long, env = "DRY_RUN", action = ArgAction::SetTrue, value_parser = BoolishValueParser::new())]
    pub dry_run: bool,

    /// Run the comparison once and exit instead of running it daily.
    #[clap(long = "one-off", env = "ONE_OFF_RUN", action = ArgAction::SetTrue, value_parser = BoolishValueParser::new())]
    pub one_off: bool,

    /// Local time of the daily comparison.
    #[clap(
        long,
        env = "EXECUTION_TIME",
        default_value = "11:00",
        value_parser = parse_execution_time,
    )]
    pub execution_time: NaiveTime,

    /// TOML file remembering the last execution date across restarts.
    #[clap(long, env = "STATE_FILE")]
    pub state_file: Option<PathBuf>,
}

impl RunArgs {
    #[must_use]
    pub fn tariffs(&self) -> EnumSet<Tariff> {
        self.tariffs.iter().copied().collect()
    }
}

fn parse_execution_time(value: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(value, "%H:%M")
}
