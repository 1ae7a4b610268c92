use chrono::{DateTime, Utc};
use http::StatusCode;

/// Failures the pipeline distinguishes from plain I/O trouble.
///
/// These travel inside [`anyhow::Error`] and are recovered with `downcast_ref` where the
/// kind matters.
#[derive(Debug, thiserror::Error)]
pub enum HopperError {
    /// Upstream data is missing: no active agreement, no device, no matching product.
    #[error("missing data: {0}")]
    Data(String),

    /// Upstream data is present more than once where exactly one is expected.
    #[error("ambiguous data: {0}")]
    Ambiguous(String),

    #[error("tariff code `{0}` does not match any known tariff")]
    UnknownTariff(String),

    /// A consumption reading is not covered by any rate period.
    #[error("no rate period covers the reading at {0}")]
    Lookup(DateTime<Utc>),

    #[error("no in-progress enrolment and no post-enrolment completed today")]
    EnrolmentNotFound,

    #[error("`{target}` failed with {status}")]
    Transport { target: String, status: StatusCode },

    /// The API responded successfully but reported errors in the payload.
    #[error("`{target}` returned an error: {message}")]
    Api { target: String, message: String },
}

impl HopperError {
    pub fn data(message: impl Into<String>) -> Self {
        Self::Data(message.into())
    }

    pub fn ambiguous(message: impl Into<String>) -> Self {
        Self::Ambiguous(message.into())
    }
}
