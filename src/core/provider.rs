use async_trait::async_trait;

use crate::{
    core::{
        account::Account,
        consumption::ConsumptionReading,
        enrolment::{Enrolment, TermsVersion},
        interval::Interval,
        rates::RatePeriod,
    },
    prelude::*,
    quantity::cost::Cost,
};

/// Catalogue entry of the public products API.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct Product {
    pub code: String,
    pub display_name: String,
    pub direction: String,
    pub brand: String,
}

/// Account data, rates and enrolments of a single account.
///
/// Implementations are bound to one authenticated session and one account number.
#[async_trait]
pub trait Provider: Sync {
    async fn get_account(&self) -> Result<Account>;

    async fn get_consumption(
        &self,
        device_id: &str,
        interval: Interval,
    ) -> Result<Vec<ConsumptionReading>>;

    async fn get_products(&self) -> Result<Vec<Product>>;

    async fn get_standing_charge(
        &self,
        product_code: &str,
        tariff_code: &str,
        interval: Interval,
    ) -> Result<Cost>;

    async fn get_unit_rates(
        &self,
        product_code: &str,
        tariff_code: &str,
        interval: Interval,
    ) -> Result<Vec<RatePeriod>>;

    async fn get_enrolments(&self) -> Result<Vec<Enrolment>>;

    /// Not safe to repeat: callers must only accept an enrolment that is still in progress.
    async fn accept_enrolment_terms(&self, enrolment_id: &str, version: TermsVersion) -> Result;
}
