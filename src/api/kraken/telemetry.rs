use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use crate::{
    core::consumption::ConsumptionReading,
    quantity::{cost::Cost, energy::KilowattHours},
};

pub const QUERY: &str = "query SmartMeterTelemetry($deviceId: String!, $start: DateTime!, $end: DateTime!) { smartMeterTelemetry(deviceId: $deviceId, grouping: HALF_HOURLY, start: $start, end: $end) { readAt consumptionDelta costDeltaWithTax } }";

#[derive(Serialize)]
pub struct Variables<'a> {
    #[serde(rename = "deviceId")]
    pub device_id: &'a str,

    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct Data {
    #[serde(rename = "smartMeterTelemetry")]
    telemetry: Option<Vec<TelemetryNode>>,
}

#[serde_as]
#[derive(Deserialize)]
struct TelemetryNode {
    #[serde(rename = "readAt")]
    read_at: DateTime<Utc>,

    /// Watt-hours.
    #[serde(rename = "consumptionDelta")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    consumption_delta: f64,

    /// Pence.
    #[serde(rename = "costDeltaWithTax")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    cost_delta_with_tax: f64,
}

impl From<Data> for Vec<ConsumptionReading> {
    fn from(data: Data) -> Self {
        data.telemetry
            .unwrap_or_default()
            .into_iter()
            .map(|node| ConsumptionReading {
                read_at: node.read_at,
                consumption: KilowattHours::from_watt_hours(node.consumption_delta),
                cost: Cost::from(node.cost_delta_with_tax),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn parse_telemetry_ok() -> Result<(), serde_json::Error> {
        // language=json
        let body = r#"{
            "smartMeterTelemetry": [
                {
                    "readAt": "2024-01-01T00:00:00+00:00",
                    "consumptionDelta": "245.0",
                    "costDeltaWithTax": "5.8457"
                },
                {
                    "readAt": "2024-01-01T00:30:00+00:00",
                    "consumptionDelta": 180,
                    "costDeltaWithTax": 4.2
                }
            ]
        }"#;
        let readings = Vec::<ConsumptionReading>::from(serde_json::from_str::<Data>(body)?);
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].read_at.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_abs_diff_eq!(readings[0].consumption.0, 0.245);
        assert_abs_diff_eq!(readings[0].cost.0, 5.8457);
        assert_abs_diff_eq!(readings[1].consumption.0, 0.18);
        Ok(())
    }

    #[test]
    fn null_telemetry_is_empty() -> Result<(), serde_json::Error> {
        let data = serde_json::from_str::<Data>(r#"{"smartMeterTelemetry": null}"#)?;
        assert!(Vec::<ConsumptionReading>::from(data).is_empty());
        Ok(())
    }

    #[test]
    fn variables_use_utc_designator() -> Result<(), serde_json::Error> {
        let variables = Variables {
            device_id: "00-11",
            start: "2024-01-01T00:00:00Z".parse().unwrap(),
            end: "2024-01-01T23:59:59Z".parse().unwrap(),
        };
        assert_eq!(
            serde_json::to_string(&variables)?,
            r#"{"deviceId":"00-11","start":"2024-01-01T00:00:00Z","end":"2024-01-01T23:59:59Z"}"#,
        );
        Ok(())
    }
}
