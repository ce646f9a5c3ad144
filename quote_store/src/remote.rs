//! HTTP implementation of the remote source.
//!
//! Talks to a mock endpoint that serves a JSON array of title-bearing
//! records and accepts posted quotes. The endpoint is treated as opaque:
//! any transport or decode failure maps to
//! [`StoreError::RemoteUnavailable`] and is left for the sync engine to
//! handle on its next tick.

use std::time::Duration;

use log::debug;

use crate::error::StoreError;
use crate::quote::Quote;
use crate::result::Result;
use crate::sync::{RemoteQuote, RemoteSource};

/// Request timeout applied to both fetch and push.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Remote source backed by an HTTP endpoint serving JSON.
pub struct HttpRemote {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpRemote {
    /// Create a client for the endpoint at `base_url`.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StoreError::RemoteUnavailable(e.to_string()))?;
        Ok(HttpRemote {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

impl RemoteSource for HttpRemote {
    fn fetch(&self) -> Result<Vec<RemoteQuote>> {
        debug!("Fetching quotes from {}", self.base_url);
        self.client
            .get(&self.base_url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.json::<Vec<RemoteQuote>>())
            .map_err(|e| StoreError::RemoteUnavailable(e.to_string()))
    }

    fn push(&self, quote: &Quote) -> Result<()> {
        debug!("Pushing quote to {}", self.base_url);
        self.client
            .post(&self.base_url)
            .json(quote)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| StoreError::RemoteUnavailable(e.to_string()))?;
        Ok(())
    }
}
