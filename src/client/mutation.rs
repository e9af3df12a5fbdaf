//! Write requests with a completion callback

use std::future::Future;

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::RemoteClient;
use crate::core::error::RemoteError;

/// A write against one API path
///
/// The same mutation can be sent any number of times with different bodies.
#[derive(Debug, Clone)]
pub struct Mutation {
    method: Method,
    path: String,
    error_message: String,
}

impl Mutation {
    pub fn new(method: Method, path: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            error_message: error_message.into(),
        }
    }

    pub fn post(path: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self::new(Method::POST, path, error_message)
    }

    pub fn put(path: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self::new(Method::PUT, path, error_message)
    }

    pub fn delete(path: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path, error_message)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Send the write and return the decoded response body
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        client: &RemoteClient,
        body: &B,
    ) -> Result<Value, RemoteError> {
        client
            .mutate(self.method.clone(), &self.path, body, &self.error_message)
            .await
    }

    /// Send the write, then run `on_success` with the response body
    ///
    /// `on_success` only starts after the backend accepted the write; when the
    /// write fails it is never called and the error is returned instead.
    pub async fn send_then<B, F, Fut, O>(
        &self,
        client: &RemoteClient,
        body: &B,
        on_success: F,
    ) -> Result<O, RemoteError>
    where
        B: Serialize + ?Sized,
        F: FnOnce(Value) -> Fut,
        Fut: Future<Output = O>,
    {
        let response = self.send(client, body).await?;
        debug!(method = %self.method, path = %self.path, "Mutation accepted, running completion");
        Ok(on_success(response).await)
    }
}
