use std::time::Duration;

use reqwest::{Client, Response};

use crate::{error::HopperError, prelude::*};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Build a client bounded by the timeout.
pub fn try_new(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().user_agent(USER_AGENT).timeout(timeout).build()?)
}

/// Turn a non-success status into a [`HopperError::Transport`] naming the target.
pub fn check_status(response: Response, target: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(HopperError::Transport { target: target.to_owned(), status }.into())
    }
}
