use async_trait::async_trait;
use quest_core::model::AccessToken;
use reqwest::{Client, Method};
use serde_json::Value;
use url::Url;

use super::{ApiClient, HttpMethod};
use crate::config::ClientConfig;
use crate::error::ApiError;

/// `reqwest`-backed transport rooted at the configured API base.
#[derive(Clone, Debug)]
pub struct HttpApiClient {
    client: Client,
    base: Url,
}

impl HttpApiClient {
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(Client::new(), config.api_base.clone())
    }

    #[must_use]
    pub fn with_client(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|err| ApiError::Decode(format!("bad endpoint {path}: {err}")))
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn call(
        &self,
        verb: HttpMethod,
        path: &str,
        token: Option<&AccessToken>,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let url = self.url(path)?;
        tracing::debug!(method = %verb, %url, "api request");

        let mut request = self.client.request(method(verb), url);
        if let Some(token) = token {
            request = request.bearer_auth(token.as_str());
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;

        if !status.is_success() {
            let err = ApiError::from_response(status.as_u16(), &text);
            tracing::debug!(method = %verb, path, status = status.as_u16(), error = %err, "api error");
            return Err(err);
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|err| ApiError::Decode(format!("{path}: {err}")))
    }
}
