use chrono::{DateTime, FixedOffset, NaiveDate};
use enumset::EnumSet;
use itertools::Itertools;

use crate::{
    core::{
        consumption::ConsumptionReading,
        interval::Interval,
        provider::{Product, Provider},
        rates::TariffRates,
        tariff::{RegionCode, Tariff},
    },
    error::HopperError,
    prelude::*,
    quantity::cost::Cost,
};

/// Active electricity agreements of the account.
#[derive(Clone, Debug, Default)]
pub struct Account {
    pub agreements: Vec<Agreement>,
}

#[derive(Clone, Debug, Default)]
pub struct Agreement {
    pub valid_from: Option<DateTime<FixedOffset>>,
    pub tariff_code: Option<String>,
    pub standing_charge: Option<Cost>,
    pub device_ids: Vec<String>,
}

impl Agreement {
    /// Whether the agreement starts on the date, in its own offset.
    pub fn starts_on(&self, date: NaiveDate) -> bool {
        self.valid_from.is_some_and(|valid_from| valid_from.date_naive() == date)
    }
}

impl Account {
    /// Whether any agreement took effect on the date.
    pub fn has_agreement_starting_on(&self, date: NaiveDate) -> bool {
        self.agreements.iter().any(|agreement| agreement.starts_on(date))
    }
}

/// What the pipeline needs to know about the account before comparing.
#[derive(Clone, Debug, PartialEq)]
pub struct AccountState {
    pub current_tariff: Tariff,
    pub tariff_code: String,
    pub standing_charge: Cost,
    pub region_code: RegionCode,
    pub device_id: String,
}

impl AccountState {
    pub fn try_from_account(account: &Account, candidates: EnumSet<Tariff>) -> Result<Self> {
        ensure!(
            !account.agreements.is_empty(),
            HopperError::data("no active electricity agreement"),
        );

        let agreement = exactly_one(
            account.agreements.iter().filter(|agreement| agreement.tariff_code.is_some()),
            |agreement| agreement.tariff_code.as_deref(),
            "tariff code",
        )?;
        let tariff_code = agreement.tariff_code.clone().unwrap_or_default();
        let standing_charge = agreement
            .standing_charge
            .ok_or_else(|| HopperError::data(format!("no standing charge for `{tariff_code}`")))?;

        let device_id = exactly_one(
            account.agreements.iter().flat_map(|agreement| &agreement.device_ids),
            |device_id| Some(device_id.as_str()),
            "smart device",
        )?
        .clone();

        Ok(Self {
            current_tariff: Tariff::try_from_tariff_code(candidates, &tariff_code)?,
            region_code: RegionCode::try_from_tariff_code(&tariff_code)?,
            tariff_code,
            standing_charge,
            device_id,
        })
    }
}

/// Find the single item, treating duplicates of the same key as one.
fn exactly_one<'a, T>(
    items: impl Iterator<Item = &'a T>,
    key: impl Fn(&T) -> Option<&str>,
    what: &str,
) -> Result<&'a T> {
    let items = items.unique_by(|item| key(item).map(str::to_owned)).collect_vec();
    match items.as_slice() {
        [] => Err(HopperError::data(format!("no {what} found")).into()),
        [item] => Ok(*item),
        _ => Err(HopperError::ambiguous(format!(
            "{} different values for {what}: {}",
            items.len(),
            items.iter().filter_map(|item| key(item)).join(", "),
        ))
        .into()),
    }
}

#[instrument(skip_all)]
pub async fn fetch_account_state(
    provider: &dyn Provider,
    candidates: EnumSet<Tariff>,
) -> Result<AccountState> {
    let account = provider.get_account().await?;
    let state = AccountState::try_from_account(&account, candidates)?;
    info!(
        tariff = %state.current_tariff,
        tariff_code = state.tariff_code,
        region = %state.region_code,
        "fetched the account",
    );
    Ok(state)
}

#[instrument(skip_all, fields(device_id = device_id, on = ?on))]
pub async fn fetch_consumption(
    provider: &dyn Provider,
    device_id: &str,
    on: NaiveDate,
) -> Result<Vec<ConsumptionReading>> {
    let readings = provider.get_consumption(device_id, Interval::whole_day(on)).await?;
    info!(n_readings = readings.len(), "fetched the consumption");
    Ok(readings)
}

#[instrument(skip_all, fields(tariff = %tariff, region = %region_code, on = ?on))]
pub async fn fetch_tariff_rates(
    provider: &dyn Provider,
    tariff: Tariff,
    region_code: RegionCode,
    on: NaiveDate,
) -> Result<TariffRates> {
    let product = provider
        .get_products()
        .await?
        .into_iter()
        .find(|product| product.is_import_of(tariff))
        .ok_or_else(|| HopperError::data(format!("no product for {tariff}")))?;
    let tariff_code = region_code.tariff_code(&product.code);
    let interval = Interval::whole_day(on);

    let standing_charge =
        provider.get_standing_charge(&product.code, &tariff_code, interval).await?;
    let unit_rates = provider.get_unit_rates(&product.code, &tariff_code, interval).await?;
    info!(
        product_code = product.code,
        tariff_code,
        ?standing_charge,
        n_unit_rates = unit_rates.len(),
        "fetched the rates",
    );
    Ok(TariffRates { standing_charge, unit_rates })
}

impl Product {
    fn is_import_of(&self, tariff: Tariff) -> bool {
        self.display_name == tariff.display_name()
            && self.direction == "IMPORT"
            && self.brand == "OCTOPUS_ENERGY"
    }
}
