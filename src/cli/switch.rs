use std::time::Duration;

use clap::Parser;

use crate::{api::sign_up::SignUpCommand, core::switch::Cooldown};

#[derive(Parser)]
pub struct SwitchArgs {
    /// Shell command requesting the switch on the website.
    ///
    /// It receives `ACCOUNT_NUMBER`, `TARGET_TARIFF`, `SIGN_UP_URL`, `OCTOPUS_LOGIN_EMAIL`,
    /// and `OCTOPUS_LOGIN_PASSWORD` in the environment.
    #[clap(long = "switch-command", env = "SWITCH_COMMAND")]
    pub command: Option<String>,

    #[clap(long, env = "OCTOPUS_LOGIN_EMAIL")]
    pub login_email: Option<String>,

    #[clap(long, env = "OCTOPUS_LOGIN_PASSWORD", hide_env_values = true)]
    pub login_password: Option<String>,

    #[clap(long = "switch-timeout-secs", env = "SWITCH_TIMEOUT_SECS", default_value = "300")]
    pub timeout_secs: u64,

    /// Minimum wait after the switch request before looking for the enrolment.
    #[clap(
        long = "enrolment-cooldown-secs",
        env = "ENROLMENT_COOLDOWN_SECS",
        default_value = "60"
    )]
    pub cooldown_secs: u64,

    /// Total wait for the enrolment to appear, never less than the cooldown.
    #[clap(
        long = "enrolment-poll-budget-secs",
        env = "ENROLMENT_POLL_BUDGET_SECS",
        default_value = "60"
    )]
    pub poll_budget_secs: u64,
}

impl SwitchArgs {
    #[must_use]
    pub fn cooldown(&self) -> Cooldown {
        let min_wait = Duration::from_secs(self.cooldown_secs);
        Cooldown {
            min_wait,
            budget: Duration::from_secs(self.poll_budget_secs).max(min_wait),
            ..Cooldown::default()
        }
    }

    /// The command fails every switch when none is configured.
    #[must_use]
    pub fn sign_up_command(&self, account_number: &str) -> SignUpCommand {
        let command = self
            .command
            .as_ref()
            .map(|command| vec!["sh".to_owned(), "-c".to_owned(), command.clone()])
            .unwrap_or_default();
        SignUpCommand::builder()
            .command(command)
            .account_number(account_number.to_owned())
            .maybe_login_email(self.login_email.clone())
            .maybe_login_password(self.login_password.clone())
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
    }
}
