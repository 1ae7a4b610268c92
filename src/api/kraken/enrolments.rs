use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::enrolment::{Enrolment, Stage, Status, Step, TermsVersion};

pub const QUERY: &str = "query ProductEnrolments($accountNumber: String!) { productEnrolments(accountNumber: $accountNumber) { id status product { code displayName } stages { name status steps { displayName status updatedAt } } } }";

pub const ACCEPT_MUTATION: &str = "mutation AcceptTermsAndConditions($input: AcceptTermsAndConditionsInput!) { acceptTermsAndConditions(input: $input) { acceptedVersion } }";

#[derive(Serialize)]
pub struct Variables<'a> {
    #[serde(rename = "accountNumber")]
    pub account_number: &'a str,
}

#[derive(Serialize)]
pub struct AcceptVariables<'a> {
    pub input: AcceptInput<'a>,
}

#[derive(Serialize)]
pub struct AcceptInput<'a> {
    #[serde(rename = "accountNumber")]
    pub account_number: &'a str,

    #[serde(rename = "enrolmentId")]
    pub enrolment_id: &'a str,

    #[serde(rename = "termsVersion")]
    pub terms_version: TermsVersion,
}

#[derive(Deserialize)]
pub struct AcceptData {
    #[serde(rename = "acceptTermsAndConditions")]
    pub accepted: Option<Accepted>,
}

#[derive(Deserialize)]
pub struct Accepted {
    #[serde(rename = "acceptedVersion")]
    pub version: Option<String>,
}

#[derive(Deserialize)]
pub struct Data {
    #[serde(rename = "productEnrolments")]
    enrolments: Option<Vec<EnrolmentNode>>,
}

#[derive(Deserialize)]
struct EnrolmentNode {
    id: String,
    status: String,
    stages: Option<Vec<StageNode>>,
}

#[derive(Deserialize)]
struct StageNode {
    name: String,
    status: String,
    steps: Option<Vec<StepNode>>,
}

#[derive(Deserialize)]
struct StepNode {
    #[serde(rename = "updatedAt")]
    updated_at: Option<DateTime<Utc>>,
}

impl From<Data> for Vec<Enrolment> {
    fn from(data: Data) -> Self {
        data.enrolments
            .unwrap_or_default()
            .into_iter()
            .map(|node| Enrolment {
                id: node.id,
                status: Status::from(node.status),
                stages: node.stages.unwrap_or_default().into_iter().map(Stage::from).collect(),
            })
            .collect()
    }
}

impl From<StageNode> for Stage {
    fn from(node: StageNode) -> Self {
        Self {
            name: node.name,
            status: Status::from(node.status),
            steps: node
                .steps
                .unwrap_or_default()
                .into_iter()
                .map(|step| Step { updated_at: step.updated_at })
                .collect(),
        }
    }
}
