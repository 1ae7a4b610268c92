use async_trait::async_trait;

use crate::{
    api::{kraken::Session, products::Catalogue},
    core::{
        account::Account,
        consumption::ConsumptionReading,
        enrolment::{Enrolment, TermsVersion},
        interval::Interval,
        provider::{Product, Provider},
        rates::RatePeriod,
    },
    prelude::*,
    quantity::cost::Cost,
};

/// Octopus Energy account: the Kraken session for account data, the catalogue for the rates.
pub struct Octopus {
    session: Session,
    catalogue: Catalogue,
    account_number: String,
}

impl Octopus {
    pub const fn new(session: Session, catalogue: Catalogue, account_number: String) -> Self {
        Self { session, catalogue, account_number }
    }
}

#[async_trait]
impl Provider for Octopus {
    async fn get_account(&self) -> Result<Account> {
        self.session.get_account(&self.account_number).await
    }

    async fn get_consumption(
        &self,
        device_id: &str,
        interval: Interval,
    ) -> Result<Vec<ConsumptionReading>> {
        self.session.get_telemetry(device_id, interval).await
    }

    async fn get_products(&self) -> Result<Vec<Product>> {
        self.catalogue.get_products().await
    }

    async fn get_standing_charge(
        &self,
        product_code: &str,
        tariff_code: &str,
        interval: Interval,
    ) -> Result<Cost> {
        self.catalogue.get_standing_charge(product_code, tariff_code, interval).await
    }

    async fn get_unit_rates(
        &self,
        product_code: &str,
        tariff_code: &str,
        interval: Interval,
    ) -> Result<Vec<RatePeriod>> {
        self.catalogue.get_unit_rates(product_code, tariff_code, interval).await
    }

    async fn get_enrolments(&self) -> Result<Vec<Enrolment>> {
        self.session.get_enrolments(&self.account_number).await
    }

    async fn accept_enrolment_terms(&self, enrolment_id: &str, version: TermsVersion) -> Result {
        self.session.accept_terms(&self.account_number, enrolment_id, version).await
    }
}
