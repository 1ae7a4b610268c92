use async_trait::async_trait;

use crate::prelude::*;

/// User-facing message sink, such as a chat webhook.
#[async_trait]
pub trait Channel: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, text: &str) -> Result;
}

/// Fans every message out to the log and to all configured channels.
///
/// Delivery failures are logged and swallowed, so that a broken channel never affects the others
/// nor the caller.
#[derive(Default)]
pub struct Notifier {
    channels: Vec<Box<dyn Channel>>,
}

impl Notifier {
    #[must_use]
    pub fn with_channel(mut self, channel: impl Channel + 'static) -> Self {
        self.channels.push(Box::new(channel));
        self
    }

    pub fn n_channels(&self) -> usize {
        self.channels.len()
    }

    pub async fn notify(&self, text: &str) {
        info!("{text}");
        for channel in &self.channels {
            if let Err(error) = channel.send(text).await {
                warn!(channel = channel.name(), "failed to deliver the message: {error:#}");
            }
        }
    }
}
