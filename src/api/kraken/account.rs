use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::{
    core::account::{Account, Agreement},
    quantity::cost::Cost,
};

pub const QUERY: &str = "query Account($accountNumber: String!) { account(accountNumber: $accountNumber) { electricityAgreements(active: true) { validFrom validTo meterPoint { meters(includeInactive: false) { smartDevices { deviceId } } mpan } tariff { ... on HalfHourlyTariff { id productCode tariffCode standingCharge } } } } }";

#[derive(Serialize)]
pub struct Variables<'a> {
    #[serde(rename = "accountNumber")]
    pub account_number: &'a str,
}

#[derive(Deserialize)]
pub struct Data {
    account: AccountNode,
}

#[derive(Deserialize)]
struct AccountNode {
    #[serde(rename = "electricityAgreements")]
    electricity_agreements: Vec<AgreementNode>,
}

#[derive(Deserialize)]
struct AgreementNode {
    #[serde(rename = "validFrom")]
    valid_from: Option<DateTime<FixedOffset>>,

    #[serde(rename = "meterPoint")]
    meter_point: Option<MeterPointNode>,

    /// Empty object unless the tariff is half-hourly.
    tariff: Option<TariffNode>,
}

#[derive(Deserialize)]
struct MeterPointNode {
    #[serde(default)]
    meters: Vec<MeterNode>,
}

#[derive(Deserialize)]
struct MeterNode {
    #[serde(rename = "smartDevices", default)]
    smart_devices: Vec<SmartDeviceNode>,
}

#[derive(Deserialize)]
struct SmartDeviceNode {
    #[serde(rename = "deviceId")]
    device_id: Option<String>,
}

#[derive(Deserialize)]
struct TariffNode {
    #[serde(rename = "tariffCode")]
    tariff_code: Option<String>,

    #[serde(rename = "standingCharge")]
    standing_charge: Option<Cost>,
}

impl From<Data> for Account {
    fn from(data: Data) -> Self {
        Self {
            agreements: data
                .account
                .electricity_agreements
                .into_iter()
                .map(Agreement::from)
                .collect(),
        }
    }
}

impl From<AgreementNode> for Agreement {
    fn from(node: AgreementNode) -> Self {
        let (tariff_code, standing_charge) = node
            .tariff
            .map_or((None, None), |tariff| (tariff.tariff_code, tariff.standing_charge));
        let device_ids = node
            .meter_point
            .into_iter()
            .flat_map(|meter_point| meter_point.meters)
            .flat_map(|meter| meter.smart_devices)
            .filter_map(|device| device.device_id)
            .collect();
        Self { valid_from: node.valid_from, tariff_code, standing_charge, device_ids }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn parse_account_ok() -> Result<(), serde_json::Error> {
        // language=json
        let body = r#"{
            "account": {
                "electricityAgreements": [
                    {
                        "validFrom": "2024-03-14T00:00:00+00:00",
                        "validTo": null,
                        "meterPoint": {
                            "meters": [
                                {"smartDevices": [{"deviceId": "00-11-22-33-44-55-66-77"}]}
                            ],
                            "mpan": "1900000000000"
                        },
                        "tariff": {
                            "id": "12345",
                            "productCode": "AGILE-24-10-01",
                            "tariffCode": "E-1R-AGILE-24-10-01-C",
                            "standingCharge": 48.7935
                        }
                    }
                ]
            }
        }"#;
        let account = Account::from(serde_json::from_str::<Data>(body)?);
        assert_eq!(account.agreements.len(), 1);
        let agreement = &account.agreements[0];
        assert_eq!(agreement.tariff_code.as_deref(), Some("E-1R-AGILE-24-10-01-C"));
        assert_eq!(agreement.standing_charge, Some(Cost::from(48.7935)));
        assert_eq!(agreement.device_ids, ["00-11-22-33-44-55-66-77"]);
        assert!(agreement.starts_on(NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()));
        Ok(())
    }

    #[test]
    fn parse_non_half_hourly_tariff_ok() -> Result<(), serde_json::Error> {
        // language=json
        let body = r#"{
            "account": {
                "electricityAgreements": [
                    {"validFrom": null, "validTo": null, "meterPoint": null, "tariff": {}}
                ]
            }
        }"#;
        let account = Account::from(serde_json::from_str::<Data>(body)?);
        let agreement = &account.agreements[0];
        assert!(agreement.tariff_code.is_none());
        assert!(agreement.standing_charge.is_none());
        assert!(agreement.device_ids.is_empty());
        Ok(())
    }
}
