use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use tokio::time::sleep;

use crate::{notifier::Notifier, prelude::*};

const TICK: Duration = Duration::from_secs(30);

/// Persisted across restarts, so that the comparison runs at most once a day.
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    #[serde(default)]
    pub last_execution_date: Option<NaiveDate>,
}

impl State {
    #[instrument]
    pub fn read_from<P: AsRef<Path> + Debug>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.is_file() {
            Ok(toml::from_str(&fs::read_to_string(path)?)?)
        } else {
            Ok(Self::default())
        }
    }

    #[instrument(skip(self))]
    pub fn write_to<P: AsRef<Path> + Debug>(&self, path: P) -> Result {
        fs::write(path, toml::to_string(self)?)?;
        Ok(())
    }
}

/// Whether the comparison is due: the local time reads the execution time, and nothing ran today.
pub fn is_due(
    now: NaiveDateTime,
    execution_time: NaiveTime,
    last_execution_date: Option<NaiveDate>,
) -> bool {
    now.hour() == execution_time.hour()
        && now.minute() == execution_time.minute()
        && last_execution_date != Some(now.date())
}

/// Runs the comparison once a day at the execution time, forever.
pub struct Scheduler<'a> {
    notifier: &'a Notifier,
    execution_time: NaiveTime,
    state_file: Option<PathBuf>,
    state: State,
}

impl<'a> Scheduler<'a> {
    pub fn new(
        notifier: &'a Notifier,
        execution_time: NaiveTime,
        state_file: Option<PathBuf>,
    ) -> Result<Self> {
        let state = match &state_file {
            Some(path) => State::read_from(path)
                .with_context(|| format!("failed to read the state from `{}`", path.display()))?,
            None => State::default(),
        };
        info!(last_execution_date = ?state.last_execution_date, "loaded the state");
        Ok(Self { notifier, execution_time, state_file, state })
    }

    /// Check the clock and run the comparison when due, returning whether it ran.
    ///
    /// The date is recorded before running, so that a failed run is not repeated on the same day.
    pub async fn tick<F: Future<Output = ()>>(
        &mut self,
        now: NaiveDateTime,
        run: impl FnOnce() -> F,
    ) -> bool {
        if !is_due(now, self.execution_time, self.state.last_execution_date) {
            return false;
        }
        self.notifier
            .notify(&format!("Executing tariff comparison at {}…", now.format("%H:%M")))
            .await;
        self.state.last_execution_date = Some(now.date());
        if let Some(path) = &self.state_file
            && let Err(error) = self.state.write_to(path)
        {
            warn!("failed to persist the state: {error:#}");
        }
        run().await;
        true
    }

    pub async fn run_forever<F: Future<Output = ()>>(&mut self, mut run: impl FnMut() -> F) {
        loop {
            self.tick(Local::now().naive_local(), &mut run).await;
            sleep(TICK).await;
        }
    }
}
