use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, Url};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    api::client::check_status,
    core::{interval::Interval, provider::Product, rates::RatePeriod},
    error::HopperError,
    prelude::*,
    quantity::{cost::Cost, rate::KilowattHourRate},
};

/// Public product catalogue and tariff charges, no authentication needed.
pub struct Catalogue {
    client: Client,
    base_url: String,
}

impl Catalogue {
    pub fn new(client: Client, base_url: &Url) -> Self {
        Self { client, base_url: base_url.as_str().trim_end_matches('/').to_owned() }
    }

    #[instrument(skip_all)]
    pub async fn get_products(&self) -> Result<Vec<Product>> {
        info!("fetching…");
        let products: Vec<Product> =
            self.get_all(format!("{}/products/", self.base_url), None).await?;
        info!(n_products = products.len(), "fetched");
        Ok(products)
    }

    #[instrument(skip_all, fields(tariff_code = tariff_code))]
    pub async fn get_standing_charge(
        &self,
        product_code: &str,
        tariff_code: &str,
        interval: Interval,
    ) -> Result<Cost> {
        let url = self.tariff_url(product_code, tariff_code, "standing-charges");
        let charges: Vec<Charge> = self.get_all(url, Some(interval)).await?;
        charges
            .first()
            .map(|charge| Cost::from(charge.value_inc_vat))
            .ok_or_else(|| {
                HopperError::data(format!("no standing charge for `{tariff_code}`")).into()
            })
    }

    #[instrument(skip_all, fields(tariff_code = tariff_code))]
    pub async fn get_unit_rates(
        &self,
        product_code: &str,
        tariff_code: &str,
        interval: Interval,
    ) -> Result<Vec<RatePeriod>> {
        let url = self.tariff_url(product_code, tariff_code, "standard-unit-rates");
        let charges: Vec<Charge> = self.get_all(url, Some(interval)).await?;
        Ok(charges.into_iter().map(RatePeriod::from).collect())
    }

    fn tariff_url(&self, product_code: &str, tariff_code: &str, charges: &str) -> String {
        format!(
            "{}/products/{product_code}/electricity-tariffs/{tariff_code}/{charges}/",
            self.base_url,
        )
    }

    /// Collect the results of all pages, following the `next` links.
    #[instrument(skip_all, level = Level::DEBUG, fields(url = url))]
    async fn get_all<T: DeserializeOwned>(
        &self,
        url: String,
        period: Option<Interval>,
    ) -> Result<Vec<T>> {
        let mut results = Vec::new();
        let mut request = self.client.get(&url);
        if let Some(period) = period {
            request = request.query(&[
                ("period_from", period.start.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("period_to", period.end.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ]);
        }
        let mut target = url;

        loop {
            let response =
                request.send().await.with_context(|| format!("failed to request `{target}`"))?;
            let page = check_status(response, &target)?
                .json::<Page<T>>()
                .await
                .with_context(|| format!("failed to deserialize `{target}` response JSON"))?;
            results.extend(page.results);
            let Some(next) = page.next else {
                break Ok(results);
            };
            debug!(%next, "following…");
            request = self.client.get(&next);
            target = next;
        }
    }
}

#[derive(Deserialize)]
struct Page<T> {
    next: Option<String>,
    results: Vec<T>,
}

#[derive(Deserialize)]
struct Charge {
    /// Pence, or pence per kilowatt-hour.
    value_inc_vat: f64,

    valid_from: DateTime<Utc>,
    valid_to: Option<DateTime<Utc>>,
}

impl From<Charge> for RatePeriod {
    fn from(charge: Charge) -> Self {
        Self {
            valid_from: charge.valid_from,
            valid_to: charge.valid_to,
            rate: KilowattHourRate::from(charge.value_inc_vat),
        }
    }
}
