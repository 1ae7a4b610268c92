use chrono::{DateTime, Utc};

use crate::quantity::{cost::Cost, energy::KilowattHours};

/// Half-hourly smart meter reading.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConsumptionReading {
    pub read_at: DateTime<Utc>,
    pub consumption: KilowattHours,

    /// What the period cost under the current tariff.
    pub cost: Cost,
}

/// Total billed by the provider for the readings under the current tariff, without standing charge.
pub fn billed_cost(readings: &[ConsumptionReading]) -> Cost {
    readings.iter().map(|reading| reading.cost).sum()
}
