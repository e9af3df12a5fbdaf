//! Remote resource client
//!
//! [`RemoteClient`] wraps a `reqwest::Client` bound to the backend's base URL.
//! Reads go through a [`Loader`], which replaces a [`MirrorStore`] on success;
//! writes go through a [`Mutation`], which runs a completion callback once the
//! backend has accepted the write. Failures are normalized into
//! [`RemoteError::Fetch`] and [`RemoteError::Mutation`].
//!
//! [`MirrorStore`]: crate::store::MirrorStore

pub mod loader;
pub mod mutation;

use std::time::Duration;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::ApiConfig;
use crate::core::error::RemoteError;

pub use loader::Loader;
pub use mutation::Mutation;

/// Base URL of the household backend when none is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:3005";

/// HTTP request timeout when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client bound to one backend
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, RemoteError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, RemoteError> {
        Self::with_timeout(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of an API path
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// GET `path` and decode the JSON body
    ///
    /// Anything but a 200 response, a transport failure or an undecodable body
    /// is reported as [`RemoteError::Fetch`] carrying `error_message`.
    pub async fn load<T: DeserializeOwned>(
        &self,
        path: &str,
        error_message: &str,
    ) -> Result<T, RemoteError> {
        let url = self.url(path);
        let fetch_error = |status: Option<u16>, detail: String| {
            debug!(url = %url, ?status, detail = %detail, "Fetch failed");
            RemoteError::Fetch {
                url: url.clone(),
                status,
                message: error_message.to_string(),
            }
        };

        debug!(url = %url, "GET");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| fetch_error(None, e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(fetch_error(Some(status), body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| fetch_error(None, e.to_string()))
    }

    /// Send a write with a JSON body
    ///
    /// Only 200 and 201 count as success. The response body is returned as
    /// JSON when it parses, as a JSON string when it does not, and as `null`
    /// when it is empty.
    pub async fn mutate<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        error_message: &str,
    ) -> Result<Value, RemoteError> {
        let url = self.url(path);
        let mutation_error = |status: Option<u16>, detail: String| {
            debug!(method = %method, url = %url, ?status, detail = %detail, "Mutation failed");
            RemoteError::Mutation {
                method: method.to_string(),
                url: url.clone(),
                status,
                message: error_message.to_string(),
            }
        };

        debug!(method = %method, url = %url, "Sending mutation");
        let response = self
            .http
            .request(method.clone(), &url)
            .json(body)
            .send()
            .await
            .map_err(|e| mutation_error(None, e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| mutation_error(Some(status), e.to_string()))?;

        if !matches!(status, 200 | 201) {
            return Err(mutation_error(Some(status), text));
        }

        Ok(parse_body(text))
    }
}

fn parse_body(text: String) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}
