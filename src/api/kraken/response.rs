use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{error::HopperError, prelude::*};

/// GraphQL request with typed variables.
#[derive(Serialize)]
pub struct Request<V> {
    #[serde(rename = "operationName")]
    pub operation_name: &'static str,

    pub query: &'static str,

    pub variables: V,
}

/// GraphQL response envelope.
///
/// Kraken reports failed operations with HTTP 200 and a non-empty `errors` array.
#[derive(Deserialize)]
pub struct Response<D> {
    data: Option<D>,

    #[serde(default)]
    errors: Vec<ResponseError>,
}

#[derive(Deserialize)]
struct ResponseError {
    message: String,
}

impl<D> Response<D> {
    pub fn into_result(self, operation_name: &str) -> Result<D> {
        if !self.errors.is_empty() {
            let message = self.errors.into_iter().map(|error| error.message).join("; ");
            return Err(HopperError::Api { target: operation_name.to_owned(), message }.into());
        }
        self.data.ok_or_else(|| {
            HopperError::Api { target: operation_name.to_owned(), message: "no data".to_owned() }
                .into()
        })
    }
}
