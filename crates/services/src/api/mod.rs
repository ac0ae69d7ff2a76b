//! Typed access to the backend REST API.
//!
//! `ApiClient` is the transport seam (JSON in, JSON out); `Api` layers typed
//! decoding on top so services never touch raw responses.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use quest_core::model::AccessToken;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

mod http;

pub use http::HttpApiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        })
    }
}

/// Transport for backend calls.
///
/// `path` is relative to the API base (`"games/memory-code/tasks/random?language=python"`).
/// The bearer token is attached when present. Non-2xx responses must map to
/// `ApiError::from_response`; an empty success body is `Value::Null`.
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn call(
        &self,
        method: HttpMethod,
        path: &str,
        token: Option<&AccessToken>,
        body: Option<Value>,
    ) -> Result<Value, ApiError>;
}

/// Cheap-to-clone typed facade over an `ApiClient`.
#[derive(Clone)]
pub struct Api {
    client: Arc<dyn ApiClient>,
}

impl Api {
    #[must_use]
    pub fn new(client: Arc<dyn ApiClient>) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, non-2xx status or a body
    /// that does not decode as `T`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&AccessToken>,
    ) -> Result<T, ApiError> {
        let value = self.client.call(HttpMethod::Get, path, token, None).await?;
        decode(path, value)
    }

    /// Fetch a list, tolerating a non-array body (empty list) and dropping
    /// elements that do not decode.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or non-2xx status.
    pub async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&AccessToken>,
    ) -> Result<Vec<T>, ApiError> {
        let value = self.client.call(HttpMethod::Get, path, token, None).await?;
        Ok(decode_list(path, value))
    }

    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, non-2xx status or a body
    /// that does not decode as `T`.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&AccessToken>,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(HttpMethod::Post, path, token, Some(encode(body)?))
            .await
    }

    /// POST without a request body, ignoring the response body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or non-2xx status.
    pub async fn post_empty(&self, path: &str, token: Option<&AccessToken>) -> Result<(), ApiError> {
        self.client
            .call(HttpMethod::Post, path, token, None)
            .await
            .map(|_| ())
    }

    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, non-2xx status or a body
    /// that does not decode as `T`.
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&AccessToken>,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(HttpMethod::Put, path, token, Some(encode(body)?))
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or non-2xx status.
    pub async fn delete(&self, path: &str, token: Option<&AccessToken>) -> Result<(), ApiError> {
        self.client
            .call(HttpMethod::Delete, path, token, None)
            .await
            .map(|_| ())
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        token: Option<&AccessToken>,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let value = self.client.call(method, path, token, body).await?;
        decode(path, value)
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|err| ApiError::Decode(err.to_string()))
}

fn decode<T: DeserializeOwned>(path: &str, value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|err| ApiError::Decode(format!("{path}: {err}")))
}

fn decode_list<T: DeserializeOwned>(path: &str, value: Value) -> Vec<T> {
    let Value::Array(items) = value else {
        tracing::warn!(path, "expected a JSON array; treating as empty");
        return Vec::new();
    };
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                tracing::warn!(path, index, error = %err, "dropping malformed list element");
                None
            }
        })
        .collect()
}
