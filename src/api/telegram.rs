use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::{api::client::check_status, notifier::Channel, prelude::*};

/// Telegram bot posting into a single chat.
pub struct Bot {
    client: Client,
    token: String,
    chat_id: String,
}

impl Bot {
    pub const fn new(client: Client, token: String, chat_id: String) -> Self {
        Self { client, token, chat_id }
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[async_trait]
impl Channel for Bot {
    fn name(&self) -> &'static str {
        "telegram"
    }

    #[instrument(skip_all, fields(chat_id = self.chat_id))]
    async fn send(&self, text: &str) -> Result {
        // The URL contains the token, so it never goes into the error.
        let response = self
            .client
            .post(format!("https://api.telegram.org/bot{}/sendMessage", self.token))
            .form(&SendMessage { chat_id: &self.chat_id, text })
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("failed to call the Telegram bot API")?;
        check_status(response, "Telegram sendMessage")?;
        Ok(())
    }
}
