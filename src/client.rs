// scoutseed — client.rs
// Index lifecycle (clear / create) and batch upload against the index service.
// Author: d65v <https://github.com/d65v>
//
// Every call is issued exactly once. Status codes are handed back to the
// caller for reporting and are never treated as failures here; only a
// request that cannot complete at all becomes an error.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

use crate::{Record, Result, SeedError};

// ── Index Identity ────────────────────────────────────────────────────────────

/// Host plus index name: the resource every call targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexTarget {
    pub host: String,
    pub index: String,
}

impl IndexTarget {
    pub fn new(host: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            index: index.into(),
        }
    }

    /// `{host}/index/{index}`, without doubling the slash when the host ends in one.
    pub fn url(&self) -> String {
        format!("{}/index/{}", self.host.trim_end_matches('/'), self.index)
    }
}

// ── Service Interface ─────────────────────────────────────────────────────────

/// Calls the seeding run makes against a remote index.
/// Each method returns the HTTP status code of the response.
pub trait IndexService {
    /// Remove or empty the index. Best effort: the status is informational.
    fn clear(&self, target: &IndexTarget) -> Result<u16>;

    /// (Re)create the index so it can receive uploads.
    fn create(&self, target: &IndexTarget) -> Result<u16>;

    /// Replace the index contents covered by `records` in one request.
    fn upload_batch(&self, target: &IndexTarget, records: &[Record]) -> Result<u16>;
}

impl<T: IndexService + ?Sized> IndexService for &T {
    fn clear(&self, target: &IndexTarget) -> Result<u16> {
        (**self).clear(target)
    }

    fn create(&self, target: &IndexTarget) -> Result<u16> {
        (**self).create(target)
    }

    fn upload_batch(&self, target: &IndexTarget, records: &[Record]) -> Result<u16> {
        (**self).upload_batch(target, records)
    }
}

// ── HTTP Implementation ───────────────────────────────────────────────────────

/// Blocking HTTP client speaking the index service's JSON API.
#[derive(Debug, Clone)]
pub struct HttpIndexClient {
    client: Client,
}

impl HttpIndexClient {
    /// Build a client that sends `Content-Type: application/json` on every
    /// request. `timeout` of `None` keeps reqwest's default.
    ///
    /// # Errors
    /// Returns `SeedError::InvalidConfiguration` if the TLS backend or
    /// connection pool cannot be set up.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }

        let client = builder.build().map_err(|e| {
            SeedError::InvalidConfiguration(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self { client })
    }

    fn finish(method: &'static str, url: String, sent: reqwest::Result<Response>) -> Result<u16> {
        match sent {
            Ok(resp) => {
                let status = resp.status().as_u16();
                log::debug!("{} {} -> {}", method, url, status);
                Ok(status)
            }
            Err(source) => Err(SeedError::Transport {
                method,
                url,
                source,
            }),
        }
    }
}

impl IndexService for HttpIndexClient {
    fn clear(&self, target: &IndexTarget) -> Result<u16> {
        let url = target.url();
        let sent = self.client.delete(&url).send();
        Self::finish("DELETE", url, sent)
    }

    fn create(&self, target: &IndexTarget) -> Result<u16> {
        let url = target.url();
        let sent = self.client.post(&url).send();
        Self::finish("POST", url, sent)
    }

    fn upload_batch(&self, target: &IndexTarget, records: &[Record]) -> Result<u16> {
        let url = target.url();
        let body = serde_json::to_vec(records)?;
        log::debug!("PUT {}: {} records, {} bytes", url, records.len(), body.len());
        let sent = self.client.put(&url).body(body).send();
        Self::finish("PUT", url, sent)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
