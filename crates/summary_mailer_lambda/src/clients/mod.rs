//! HTTP implementations of the capability traits.
//!
//! The traits are synchronous, so each client drives its async request on
//! the current Tokio runtime through `block_in_place`. Binaries must run on
//! the multi-threaded runtime.

pub mod mail_api;
pub mod notion;
pub mod openai;
pub mod webhook;

#[cfg(test)]
pub(crate) mod test_server;

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Response};

use crate::adapters::AdapterError;

pub(crate) fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

pub(crate) fn http_client(timeout: Duration) -> Result<Client, AdapterError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(AdapterError::from)
}

pub(crate) async fn ensure_success(response: Response) -> Result<Response, AdapterError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(AdapterError::UnexpectedStatus {
        status: status.as_u16(),
        body,
    })
}
