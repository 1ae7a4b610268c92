use bon::Builder;
use chrono::NaiveDate;
use enumset::EnumSet;

use crate::{
    core::{
        decision::{Decision, compare},
        provider::Provider,
        switch::{Cooldown, SwitchReport, SwitchWorkflow},
        switcher::Switcher,
        tariff::Tariff,
    },
    notifier::Notifier,
    prelude::*,
    tables::build_totals_table,
};

#[derive(Debug)]
pub enum Outcome {
    /// Compared only, whatever the decision.
    DryRun(Decision),

    /// The current tariff is already the cheapest.
    Kept(Decision),

    Switched(Decision, SwitchReport),
}

/// Log the outcome of a run, or deliver its failure through the notifier.
///
/// Returns whether the run succeeded.
pub async fn report(result: Result<Outcome>, notifier: &Notifier) -> bool {
    match result {
        Ok(Outcome::DryRun(decision)) => {
            info!(best_tariff = %decision.best_tariff, "compared without switching");
            true
        }
        Ok(Outcome::Kept(decision)) => {
            info!(current_tariff = %decision.current_tariff, "kept the current tariff");
            true
        }
        Ok(Outcome::Switched(decision, report)) => {
            info!(
                best_tariff = %decision.best_tariff,
                resolution = ?report.resolution,
                verified = report.verified,
                "switched",
            );
            true
        }
        Err(error) => {
            error!("the run failed: {error:#}");
            notifier.notify(&format!("{error:?}")).await;
            false
        }
    }
}

/// Compare today's costs and switch to the cheapest tariff.
#[derive(Builder)]
pub struct Pipeline<'a> {
    provider: &'a dyn Provider,
    switcher: &'a dyn Switcher,
    notifier: &'a Notifier,
    candidates: EnumSet<Tariff>,
    dry_run: bool,
    cooldown: Cooldown,
}

impl Pipeline<'_> {
    #[instrument(skip_all, fields(today = ?today, dry_run = self.dry_run))]
    pub async fn compare_and_switch(&self, today: NaiveDate) -> Result<Outcome> {
        self.notifier.notify("Starting comparison of today's costs…").await;
        let decision = compare(self.provider, self.notifier, self.candidates, today).await?;
        println!("{}", build_totals_table(&decision));

        let summary = decision.summary();
        if self.dry_run {
            self.notifier.notify(&format!("DRY RUN: {summary}")).await;
            Ok(Outcome::DryRun(decision))
        } else if decision.should_switch() {
            self.notifier
                .notify(&format!("{summary}\nInitiating switch to {}", decision.best_tariff))
                .await;
            let report = SwitchWorkflow::builder()
                .provider(self.provider)
                .switcher(self.switcher)
                .notifier(self.notifier)
                .cooldown(self.cooldown)
                .build()
                .run(decision.best_tariff, today)
                .await?;
            Ok(Outcome::Switched(decision, report))
        } else {
            self.notifier.notify(&format!("Not switching today. {summary}")).await;
            Ok(Outcome::Kept(decision))
        }
    }
}
