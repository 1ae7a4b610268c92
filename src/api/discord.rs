use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;

use crate::{api::client::check_status, notifier::Channel, prelude::*};

/// Discord channel webhook.
pub struct Webhook {
    client: Client,
    url: Url,
}

impl Webhook {
    pub const fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }
}

#[derive(Serialize)]
struct Message {
    content: String,
}

impl Message {
    /// Inline code keeps Discord from interpreting the text as markdown.
    fn new(text: &str) -> Self {
        Self { content: format!("`{text}`") }
    }
}

#[async_trait]
impl Channel for Webhook {
    fn name(&self) -> &'static str {
        "discord"
    }

    #[instrument(skip_all)]
    async fn send(&self, text: &str) -> Result {
        let response = self
            .client
            .post(self.url.clone())
            .json(&Message::new(text))
            .send()
            .await
            .context("failed to call the Discord webhook")?;
        check_status(response, "Discord webhook")?;
        Ok(())
    }
}
