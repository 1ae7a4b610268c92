use async_trait::async_trait;

use crate::{core::tariff::Tariff, prelude::*};

/// Files the tariff switch request through the provider's self-service flow.
#[async_trait]
pub trait Switcher: Sync {
    async fn request_switch(&self, target: Tariff) -> Result;
}
