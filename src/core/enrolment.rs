use chrono::{DateTime, NaiveDate, Utc};
use itertools::Itertools;

use crate::{error::HopperError, prelude::*};

/// Stage marking the completion of a tariff enrolment.
pub const POST_ENROLMENT_STAGE: &str = "post-enrolment";

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Status {
    InProgress,
    Completed,
    Other(String),
}

impl From<String> for Status {
    fn from(status: String) -> Self {
        match status.as_str() {
            "IN_PROGRESS" => Self::InProgress,
            "COMPLETED" => Self::Completed,
            _ => Self::Other(status),
        }
    }
}

/// Provider-side workflow moving the account onto a new product.
#[derive(Clone, Debug)]
pub struct Enrolment {
    pub id: String,
    pub status: Status,
    pub stages: Vec<Stage>,
}

#[derive(Clone, Debug)]
pub struct Stage {
    pub name: String,
    pub status: Status,
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug)]
pub struct Step {
    pub updated_at: Option<DateTime<Utc>>,
}

impl Stage {
    /// Completed post-enrolment stage whose last step was updated on the date.
    fn completed_post_enrolment_on(&self, date: NaiveDate) -> bool {
        self.name == POST_ENROLMENT_STAGE
            && self.status == Status::Completed
            && self
                .steps
                .last()
                .and_then(|step| step.updated_at)
                .is_some_and(|updated_at| updated_at.date_naive() == date)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, serde::Serialize)]
pub struct TermsVersion {
    #[serde(rename = "versionMajor")]
    pub major: u32,

    #[serde(rename = "versionMinor")]
    pub minor: u32,
}

impl TermsVersion {
    pub const CURRENT: Self = Self { major: 1, minor: 1 };
}

/// What to do about the enrolments after a switch has been requested.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Resolution {
    /// Accept the terms of the in-progress enrolment.
    Accept { enrolment_id: String },

    /// The provider completed the enrolment on its own today.
    AlreadyCompleted,
}

/// Decide how to proceed with the enrolments fetched after the switch request.
pub fn resolve(enrolments: &[Enrolment], today: NaiveDate) -> Result<Resolution> {
    let in_progress = enrolments
        .iter()
        .filter(|enrolment| enrolment.status == Status::InProgress)
        .collect_vec();
    match in_progress.as_slice() {
        [enrolment] => {
            return Ok(Resolution::Accept { enrolment_id: enrolment.id.clone() });
        }
        [] => {}
        _ => {
            warn!(
                ids = %in_progress.iter().map(|enrolment| &enrolment.id).join(", "),
                "several enrolments are in progress, not accepting any",
            );
        }
    }

    if enrolments
        .iter()
        .flat_map(|enrolment| &enrolment.stages)
        .any(|stage| stage.completed_post_enrolment_on(today))
    {
        Ok(Resolution::AlreadyCompleted)
    } else {
        Err(HopperError::EnrolmentNotFound.into())
    }
}
