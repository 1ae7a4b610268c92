//! In-memory collaborators for pipeline tests.

use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use enumset::EnumSet;

use crate::{
    core::{
        account::{Account, Agreement},
        consumption::ConsumptionReading,
        enrolment::{Enrolment, TermsVersion},
        interval::Interval,
        provider::{Product, Provider},
        rates::{RatePeriod, TariffRates},
        switcher::Switcher,
        tariff::{RegionCode, Tariff},
    },
    prelude::*,
    quantity::{cost::Cost, energy::KilowattHours, rate::KilowattHourRate},
};

pub const STANDING_CHARGE: f64 = 50.0;
pub const REGION: RegionCode = RegionCode('C');

pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

pub fn product_code(tariff: Tariff) -> String {
    format!("{}-24-01-01", tariff.code_marker())
}

pub fn agreement_on(tariff: Tariff, valid_from: NaiveDate) -> Agreement {
    Agreement {
        valid_from: Some(valid_from.and_time(NaiveTime::MIN).and_utc().fixed_offset()),
        tariff_code: Some(REGION.tariff_code(&product_code(tariff))),
        standing_charge: Some(Cost::from(STANDING_CHARGE)),
        device_ids: vec!["00-11-22".to_owned()],
    }
}

/// Provider serving one day of two 1 kWh readings, one empty reading at 12:15, and flat rates.
///
/// Account and enrolment responses are queued: each call takes the next one, and the last one
/// repeats forever.
pub struct FakeProvider {
    pub accounts: Mutex<VecDeque<Account>>,
    pub readings: Vec<ConsumptionReading>,
    pub products: Vec<Product>,
    pub rates: HashMap<String, TariffRates>,
    pub enrolments: Mutex<VecDeque<Vec<Enrolment>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeProvider {
    /// Day totals in pence, standing charge included.
    pub fn with_totals(current: Tariff, current_total: f64, others: &[(Tariff, f64)]) -> Self {
        let half = (current_total - STANDING_CHARGE) / 2.0;
        let reading = |time: &str, watt_hours: f64, cost: f64| ConsumptionReading {
            read_at: format!("2024-01-01T{time}Z").parse().unwrap(),
            consumption: KilowattHours::from_watt_hours(watt_hours),
            cost: Cost::from(cost),
        };
        let readings = vec![
            reading("06:00:00", 1000.0, half),
            reading("12:15:00", 0.0, 0.0),
            reading("18:00:00", 1000.0, half),
        ];

        let mut products = vec![Product {
            code: "AGILE-OUTGOING-19-05-13".to_owned(),
            display_name: Tariff::Agile.display_name().to_owned(),
            direction: "EXPORT".to_owned(),
            brand: "OCTOPUS_ENERGY".to_owned(),
        }];
        products.extend(EnumSet::<Tariff>::all().iter().map(|tariff| Product {
            code: product_code(tariff),
            display_name: tariff.display_name().to_owned(),
            direction: "IMPORT".to_owned(),
            brand: "OCTOPUS_ENERGY".to_owned(),
        }));

        let rates = others
            .iter()
            .map(|(tariff, total)| {
                let rates = TariffRates {
                    standing_charge: Cost::from(STANDING_CHARGE),
                    unit_rates: vec![RatePeriod {
                        valid_from: "2024-01-01T00:00:00Z".parse().unwrap(),
                        valid_to: Some("2024-01-02T00:00:00Z".parse().unwrap()),
                        rate: KilowattHourRate::from((total - STANDING_CHARGE) / 2.0),
                    }],
                };
                (REGION.tariff_code(&product_code(*tariff)), rates)
            })
            .collect();

        Self {
            accounts: Mutex::new(VecDeque::from([Account {
                agreements: vec![agreement_on(current, NaiveDate::from_ymd_opt(2023, 6, 1).unwrap())],
            }])),
            readings,
            products,
            rates,
            enrolments: Mutex::new(VecDeque::from([Vec::new()])),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Leave 12:00 to 12:30 uncovered in the tariff's schedule.
    pub fn punch_gap(&mut self, tariff: Tariff) {
        let rates = self
            .rates
            .get_mut(&REGION.tariff_code(&product_code(tariff)))
            .unwrap();
        let rate = rates.unit_rates[0].rate;
        rates.unit_rates = vec![
            RatePeriod {
                valid_from: "2024-01-01T00:00:00Z".parse().unwrap(),
                valid_to: Some("2024-01-01T12:00:00Z".parse().unwrap()),
                rate,
            },
            RatePeriod {
                valid_from: "2024-01-01T12:30:00Z".parse().unwrap(),
                valid_to: Some("2024-01-02T00:00:00Z".parse().unwrap()),
                rate,
            },
        ];
    }

    /// Replace the queued account responses.
    pub fn with_account(self, account: Account) -> Self {
        *self.accounts.lock().unwrap() = VecDeque::from([account]);
        self
    }

    pub fn then_account(self, account: Account) -> Self {
        self.accounts.lock().unwrap().push_back(account);
        self
    }

    pub fn then_enrolments(self, enrolments: Vec<Enrolment>) -> Self {
        self.enrolments.lock().unwrap().push_back(enrolments);
        self
    }

    /// Replace the queued enrolment responses.
    pub fn with_enrolments(self, enrolments: Vec<Enrolment>) -> Self {
        *self.enrolments.lock().unwrap() = VecDeque::from([enrolments]);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn next<T: Clone>(queue: &Mutex<VecDeque<T>>) -> T {
        let mut queue = queue.lock().unwrap();
        if queue.len() > 1 { queue.pop_front().unwrap() } else { queue[0].clone() }
    }
}

#[async_trait]
impl Provider for FakeProvider {
    async fn get_account(&self) -> Result<Account> {
        self.record("get_account".to_owned());
        Ok(Self::next(&self.accounts))
    }

    async fn get_consumption(
        &self,
        device_id: &str,
        _interval: Interval,
    ) -> Result<Vec<ConsumptionReading>> {
        self.record(format!("get_consumption {device_id}"));
        Ok(self.readings.clone())
    }

    async fn get_products(&self) -> Result<Vec<Product>> {
        self.record("get_products".to_owned());
        Ok(self.products.clone())
    }

    async fn get_standing_charge(
        &self,
        _product_code: &str,
        tariff_code: &str,
        _interval: Interval,
    ) -> Result<Cost> {
        self.record(format!("get_standing_charge {tariff_code}"));
        self.rates
            .get(tariff_code)
            .map(|rates| rates.standing_charge)
            .with_context(|| format!("no rates for `{tariff_code}`"))
    }

    async fn get_unit_rates(
        &self,
        _product_code: &str,
        tariff_code: &str,
        _interval: Interval,
    ) -> Result<Vec<RatePeriod>> {
        self.record(format!("get_unit_rates {tariff_code}"));
        self.rates
            .get(tariff_code)
            .map(|rates| rates.unit_rates.clone())
            .with_context(|| format!("no rates for `{tariff_code}`"))
    }

    async fn get_enrolments(&self) -> Result<Vec<Enrolment>> {
        self.record("get_enrolments".to_owned());
        Ok(Self::next(&self.enrolments))
    }

    async fn accept_enrolment_terms(&self, enrolment_id: &str, version: TermsVersion) -> Result {
        self.record(format!("accept {enrolment_id} {}.{}", version.major, version.minor));
        Ok(())
    }
}

/// Records the requested switches, optionally failing them.
#[derive(Default)]
pub struct FakeSwitcher {
    fail: bool,
    requests: Mutex<Vec<Tariff>>,
}

impl FakeSwitcher {
    pub fn failing() -> Self {
        Self { fail: true, requests: Mutex::default() }
    }

    pub fn requests(&self) -> Vec<Tariff> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Switcher for FakeSwitcher {
    async fn request_switch(&self, target: Tariff) -> Result {
        self.requests.lock().unwrap().push(target);
        ensure!(!self.fail, "the sign-up page did not load");
        Ok(())
    }
}
