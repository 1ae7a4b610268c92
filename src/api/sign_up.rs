use std::{process::Stdio, time::Duration};

use async_trait::async_trait;
use bon::Builder;
use tokio::{process::Command, time::timeout};

use crate::{
    core::{switcher::Switcher, tariff::Tariff},
    prelude::*,
};

/// Public sign-up page of the tariff for an existing account.
pub fn sign_up_url(tariff: Tariff, account_number: &str) -> String {
    format!(
        "https://octopus.energy/smart/{}/sign-up/?accountNumber={account_number}",
        tariff.sign_up_slug(),
    )
}

/// Requests the switch by running an external browser-automation command.
///
/// The command receives everything it needs through the environment and signals success
/// with a zero exit status.
#[derive(Builder)]
pub struct SignUpCommand {
    /// Program and its arguments.
    command: Vec<String>,

    account_number: String,
    login_email: Option<String>,
    login_password: Option<String>,
    timeout: Duration,
}

impl SignUpCommand {
    fn build_command(&self, target: Tariff) -> Result<Command> {
        let (program, args) =
            self.command.split_first().context("no sign-up command is configured")?;
        let mut command = Command::new(program);
        command
            .args(args)
            .env("ACCOUNT_NUMBER", &self.account_number)
            .env("TARGET_TARIFF", target.code_marker())
            .env("SIGN_UP_URL", sign_up_url(target, &self.account_number))
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if let Some(login_email) = &self.login_email {
            command.env("OCTOPUS_LOGIN_EMAIL", login_email);
        }
        if let Some(login_password) = &self.login_password {
            command.env("OCTOPUS_LOGIN_PASSWORD", login_password);
        }
        Ok(command)
    }
}

#[async_trait]
impl Switcher for SignUpCommand {
    #[instrument(skip_all, fields(to = %target, program = ?self.command.first()))]
    async fn request_switch(&self, target: Tariff) -> Result {
        info!("running…");
        let output = timeout(self.timeout, self.build_command(target)?.output())
            .await
            .with_context(|| format!("the sign-up command timed out after {:?}", self.timeout))?
            .context("failed to run the sign-up command")?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        ensure!(
            output.status.success(),
            "the sign-up command failed with {}: {}",
            output.status,
            stderr.trim(),
        );
        debug!(stdout = %String::from_utf8_lossy(&output.stdout).trim(), "finished");
        Ok(())
    }
}
