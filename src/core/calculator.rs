use chrono::{DateTime, Utc};

use crate::{
    core::{
        consumption::ConsumptionReading,
        rates::{RatePeriod, TariffRates, find_rate_period},
    },
    error::HopperError,
    prelude::*,
    quantity::{cost::Cost, energy::KilowattHours, rate::KilowattHourRate},
};

/// Cost of a single reading under a hypothetical tariff.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CostBreakdown {
    pub read_at: DateTime<Utc>,
    pub consumption: KilowattHours,
    pub rate: KilowattHourRate,
    pub cost: Cost,
}

/// Price every reading with the rate period covering it.
///
/// A reading outside all periods means the schedule is incomplete, and the whole computation fails.
pub fn compute_costs(
    readings: &[ConsumptionReading],
    periods: &[RatePeriod],
) -> Result<Vec<CostBreakdown>> {
    readings
        .iter()
        .map(|reading| -> Result<CostBreakdown> {
            let period = find_rate_period(periods, reading.read_at)
                .ok_or(HopperError::Lookup(reading.read_at))?;
            Ok(CostBreakdown {
                read_at: reading.read_at,
                consumption: reading.consumption,
                rate: period.rate,
                cost: (reading.consumption * period.rate).round_to_ten_thousandths(),
            })
        })
        .collect()
}

/// Sum of the period costs plus the daily standing charge.
pub fn day_total(breakdown: &[CostBreakdown], standing_charge: Cost) -> Cost {
    breakdown.iter().map(|period| period.cost).sum::<Cost>() + standing_charge
}

/// What the readings would have cost on the tariff.
#[instrument(skip_all, fields(n_readings = readings.len(), n_periods = rates.unit_rates.len()))]
pub fn total_cost(readings: &[ConsumptionReading], rates: &TariffRates) -> Result<Cost> {
    let breakdown = compute_costs(readings, &rates.unit_rates)?;
    let total = day_total(&breakdown, rates.standing_charge);
    debug!(?total, "computed");
    Ok(total)
}
