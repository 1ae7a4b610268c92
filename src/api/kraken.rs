mod account;
mod enrolments;
mod response;
mod telemetry;

use http::HeaderValue;
use reqwest::{Client, Url, header::AUTHORIZATION};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use self::response::{Request, Response};
use crate::{
    api::client::check_status,
    core::{
        account::Account,
        consumption::ConsumptionReading,
        enrolment::{Enrolment, TermsVersion},
        interval::Interval,
    },
    prelude::*,
};

/// Authenticated Kraken GraphQL session, created once per run.
pub struct Session {
    client: Client,
    url: Url,
    token: HeaderValue,
}

impl Session {
    /// Exchange the API key for a Kraken token.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn authenticate(client: Client, url: Url, api_key: &str) -> Result<Self> {
        #[derive(Serialize)]
        struct Variables<'a> {
            input: Input<'a>,
        }

        #[derive(Serialize)]
        struct Input<'a> {
            #[serde(rename = "APIKey")]
            api_key: &'a str,
        }

        #[derive(Deserialize)]
        struct Data {
            #[serde(rename = "obtainKrakenToken")]
            obtained: Obtained,
        }

        #[derive(Deserialize)]
        struct Obtained {
            token: String,
        }

        info!("authenticating…");
        let request = Request {
            operation_name: "ObtainKrakenToken",
            query: "mutation ObtainKrakenToken($input: ObtainJSONWebTokenInput!) { obtainKrakenToken(input: $input) { token } }",
            variables: Variables { input: Input { api_key } },
        };
        let data: Data = Self::post(&client, &url, None, &request).await?;
        let mut token = HeaderValue::from_str(&data.obtained.token)
            .context("the obtained token is not a valid header value")?;
        token.set_sensitive(true);
        Ok(Self { client, url, token })
    }

    #[instrument(skip_all, fields(account_number = account_number))]
    pub async fn get_account(&self, account_number: &str) -> Result<Account> {
        info!("fetching…");
        let request = Request {
            operation_name: "Account",
            query: account::QUERY,
            variables: account::Variables { account_number },
        };
        Ok(self.execute::<_, account::Data>(&request).await?.into())
    }

    #[instrument(skip_all, fields(device_id = device_id, interval = ?interval))]
    pub async fn get_telemetry(
        &self,
        device_id: &str,
        interval: Interval,
    ) -> Result<Vec<ConsumptionReading>> {
        info!("fetching…");
        let request = Request {
            operation_name: "SmartMeterTelemetry",
            query: telemetry::QUERY,
            variables: telemetry::Variables { device_id, start: interval.start, end: interval.end },
        };
        Ok(self.execute::<_, telemetry::Data>(&request).await?.into())
    }

    #[instrument(skip_all, fields(account_number = account_number))]
    pub async fn get_enrolments(&self, account_number: &str) -> Result<Vec<Enrolment>> {
        info!("fetching…");
        let request = Request {
            operation_name: "ProductEnrolments",
            query: enrolments::QUERY,
            variables: enrolments::Variables { account_number },
        };
        Ok(self.execute::<_, enrolments::Data>(&request).await?.into())
    }

    #[instrument(skip_all, fields(account_number = account_number, enrolment_id = enrolment_id))]
    pub async fn accept_terms(
        &self,
        account_number: &str,
        enrolment_id: &str,
        terms_version: TermsVersion,
    ) -> Result {
        info!(?terms_version, "accepting…");
        let request = Request {
            operation_name: "AcceptTermsAndConditions",
            query: enrolments::ACCEPT_MUTATION,
            variables: enrolments::AcceptVariables {
                input: enrolments::AcceptInput { account_number, enrolment_id, terms_version },
            },
        };
        let data: enrolments::AcceptData = self.execute(&request).await?;
        let accepted_version = data.accepted.and_then(|accepted| accepted.version);
        info!(?accepted_version, "accepted");
        Ok(())
    }

    async fn execute<V, D>(&self, request: &Request<V>) -> Result<D>
    where
        V: Serialize + Sync,
        D: DeserializeOwned,
    {
        Self::post(&self.client, &self.url, Some(&self.token), request).await
    }

    #[instrument(skip_all, level = Level::DEBUG, fields(operation = request.operation_name))]
    async fn post<V, D>(
        client: &Client,
        url: &Url,
        token: Option<&HeaderValue>,
        request: &Request<V>,
    ) -> Result<D>
    where
        V: Serialize + Sync,
        D: DeserializeOwned,
    {
        let operation_name = request.operation_name;
        let mut builder = client.post(url.clone()).json(request);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, token.clone());
        }
        let response = builder
            .send()
            .await
            .with_context(|| format!("failed to call `{operation_name}`"))?;
        check_status(response, operation_name)?
            .json::<Response<D>>()
            .await
            .with_context(|| format!("failed to deserialize `{operation_name}` response JSON"))?
            .into_result(operation_name)
    }
}
