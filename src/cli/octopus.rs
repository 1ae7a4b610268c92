use std::time::Duration;

use clap::Parser;
use reqwest::Url;

use crate::{
    api::{client, kraken::Session, octopus::Octopus, products::Catalogue},
    prelude::*,
};

#[derive(Parser)]
pub struct OctopusArgs {
    #[clap(long = "api-key", env = "OCTOPUS_API_KEY", hide_env_values = true)]
    pub api_key: String,

    #[clap(long, env = "OCTOPUS_ACCOUNT_NUMBER")]
    pub account_number: String,

    #[clap(long, env = "OCTOPUS_API_BASE_URL", default_value = "https://api.octopus.energy/v1")]
    pub base_url: Url,

    /// Timeout of every single API call.
    #[clap(long = "request-timeout-secs", env = "REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub request_timeout_secs: u64,
}

impl OctopusArgs {
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn graphql_url(&self) -> Result<Url> {
        let base_url = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base_url}/graphql/"))?)
    }

    /// Authenticate a new session for the run.
    pub async fn connect(&self) -> Result<Octopus> {
        let client = client::try_new(self.request_timeout())?;
        let session = Session::authenticate(client.clone(), self.graphql_url()?, &self.api_key)
            .await
            .context("failed to authenticate")?;
        let catalogue = Catalogue::new(client, &self.base_url);
        Ok(Octopus::new(session, catalogue, self.account_number.clone()))
    }
}
