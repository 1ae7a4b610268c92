use std::time::Duration;

use clap::Parser;
use reqwest::Url;

use crate::{
    api::{client, discord, telegram},
    notifier::Notifier,
    prelude::*,
};

#[derive(Parser)]
pub struct NotificationArgs {
    #[clap(long = "discord-webhook-url", env = "DISCORD_WEBHOOK", hide_env_values = true)]
    pub discord_webhook_url: Option<Url>,

    #[clap(
        long,
        env = "TELEGRAM_BOT_TOKEN",
        hide_env_values = true,
        requires = "telegram_chat_id"
    )]
    pub telegram_bot_token: Option<String>,

    #[clap(long, env = "TELEGRAM_CHAT_ID", requires = "telegram_bot_token")]
    pub telegram_chat_id: Option<String>,
}

impl NotificationArgs {
    pub fn build_notifier(&self, timeout: Duration) -> Result<Notifier> {
        let client = client::try_new(timeout)?;
        let mut notifier = Notifier::default();
        if let Some(url) = &self.discord_webhook_url {
            notifier = notifier.with_channel(discord::Webhook::new(client.clone(), url.clone()));
        }
        if let (Some(token), Some(chat_id)) = (&self.telegram_bot_token, &self.telegram_chat_id) {
            notifier = notifier.with_channel(telegram::Bot::new(
                client,
                token.clone(),
                chat_id.clone(),
            ));
        }
        info!(n_channels = notifier.n_channels(), "built the notifier");
        Ok(notifier)
    }
}
