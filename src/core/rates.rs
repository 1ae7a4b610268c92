use chrono::{DateTime, Utc};

use crate::quantity::{cost::Cost, rate::KilowattHourRate};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RatePeriod {
    pub valid_from: DateTime<Utc>,

    /// Open-ended when `None`.
    pub valid_to: Option<DateTime<Utc>>,

    pub rate: KilowattHourRate,
}

impl RatePeriod {
    /// Half-open containment: `valid_from <= at < valid_to`.
    fn covers(&self, at: DateTime<Utc>) -> bool {
        self.valid_from <= at && self.valid_to.is_none_or(|valid_to| at < valid_to)
    }

    fn ends_at(&self, at: DateTime<Utc>) -> bool {
        self.valid_to == Some(at)
    }
}

/// Standing charge and unit rates of a tariff for one day.
#[derive(Clone, Debug)]
pub struct TariffRates {
    pub standing_charge: Cost,
    pub unit_rates: Vec<RatePeriod>,
}

/// Find the rate period for the timestamp.
///
/// The first period starting at or before the timestamp and ending after it wins. A timestamp
/// equal to the end of a period, with no period starting there, falls back to that period, so that
/// the bounds are effectively inclusive.
pub fn find_rate_period(periods: &[RatePeriod], at: DateTime<Utc>) -> Option<&RatePeriod> {
    periods
        .iter()
        .find(|period| period.covers(at))
        .or_else(|| periods.iter().find(|period| period.ends_at(at)))
}
