use std::time::Duration;

use bon::Builder;
use chrono::NaiveDate;
use tokio::time::sleep;

use crate::{
    core::{
        enrolment::{Resolution, TermsVersion, resolve},
        provider::Provider,
        switcher::Switcher,
        tariff::Tariff,
    },
    error::HopperError,
    notifier::Notifier,
    prelude::*,
};

/// Waiting for the provider to create the enrolment after the switch request.
#[derive(Copy, Clone, Debug)]
pub struct Cooldown {
    /// Unconditional wait before the first look at the enrolments.
    pub min_wait: Duration,

    /// Total wait after which a missing enrolment is final. Never less than `min_wait`.
    pub budget: Duration,

    /// First delay between polls, doubled after each poll.
    pub poll_interval: Duration,
}

impl Default for Cooldown {
    fn default() -> Self {
        Self {
            min_wait: Duration::from_secs(60),
            budget: Duration::from_secs(60),
            poll_interval: Duration::from_secs(15),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SwitchReport {
    pub resolution: Resolution,

    /// Whether a new agreement starting today was observed afterwards.
    pub verified: bool,
}

/// Request, wait, accept, verify. Nothing is ever rolled back.
#[derive(Builder)]
pub struct SwitchWorkflow<'a> {
    provider: &'a dyn Provider,
    switcher: &'a dyn Switcher,
    notifier: &'a Notifier,
    cooldown: Cooldown,
}

impl SwitchWorkflow<'_> {
    #[instrument(skip_all, fields(to = %target, today = ?today))]
    pub async fn run(&self, target: Tariff, today: NaiveDate) -> Result<SwitchReport> {
        self.switcher
            .request_switch(target)
            .await
            .with_context(|| format!("failed to request the switch to {target}"))?;
        self.notifier.notify("Tariff switch requested successfully.").await;

        let resolution = self.wait_for_enrolment(today).await?;
        match &resolution {
            Resolution::Accept { enrolment_id } => {
                self.provider
                    .accept_enrolment_terms(enrolment_id, TermsVersion::CURRENT)
                    .await
                    .with_context(|| format!("failed to accept the enrolment `{enrolment_id}`"))?;
                self.notifier.notify("Accepted agreement. Switch successful.").await;
            }
            Resolution::AlreadyCompleted => {
                self.notifier
                    .notify("Post-enrolment automatically completed with today's date.")
                    .await;
            }
        }

        let verified = self.verify(today).await;
        Ok(SwitchReport { resolution, verified })
    }

    /// Sleep the minimum wait, then poll with doubling delays until the budget runs out.
    async fn wait_for_enrolment(&self, today: NaiveDate) -> Result<Resolution> {
        info!(min_wait = ?self.cooldown.min_wait, "waiting for the enrolment…");
        sleep(self.cooldown.min_wait).await;
        let mut waited = self.cooldown.min_wait;
        let mut delay = self.cooldown.poll_interval;

        loop {
            let enrolments =
                self.provider.get_enrolments().await.context("failed to fetch the enrolments")?;
            debug!(n_enrolments = enrolments.len(), "fetched the enrolments");
            match resolve(&enrolments, today) {
                Err(error)
                    if matches!(
                        error.downcast_ref::<HopperError>(),
                        Some(HopperError::EnrolmentNotFound)
                    ) && waited < self.cooldown.budget =>
                {
                    let delay_now = delay.min(self.cooldown.budget - waited);
                    info!(?waited, delay = ?delay_now, "no enrolment yet, polling again…");
                    sleep(delay_now).await;
                    waited += delay_now;
                    delay *= 2;
                }
                result => break result,
            }
        }
    }

    /// Advisory: any outcome is reported, none is fatal.
    async fn verify(&self, today: NaiveDate) -> bool {
        match self.provider.get_account().await {
            Ok(account) if account.has_agreement_starting_on(today) => {
                self.notifier.notify("Verified new agreement successfully. Process finished.").await;
                true
            }
            Ok(_) => {
                self.notifier
                    .notify("Unable to verify the new agreement. Please check manually.")
                    .await;
                false
            }
            Err(error) => {
                self.notifier
                    .notify(&format!(
                        "Unable to verify the new agreement ({error:#}). Please check manually.",
                    ))
                    .await;
                false
            }
        }
    }
}
