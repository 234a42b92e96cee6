//! Where the bot gets its square roots from.

use reqwest::Client;
use serde::Deserialize;

use crate::auth::API_KEY_HEADER;
use crate::domain::compute_sqrt;
use crate::error::{ApiError, ApiResult};

/// Body returned by a remote Square Root API, success or failure.
#[derive(Debug, Deserialize)]
struct RemoteBody {
    #[serde(default)]
    sqrt: Option<f64>,
    #[serde(default)]
    error: Option<String>,
    /// FastAPI-style error field.
    #[serde(default)]
    detail: Option<String>,
}

impl RemoteBody {
    fn into_result(self) -> ApiResult<f64> {
        match self.sqrt {
            Some(sqrt) => Ok(sqrt),
            None => Err(ApiError::Upstream(
                self.error
                    .or(self.detail)
                    .unwrap_or_else(|| "Unknown error".to_string()),
            )),
        }
    }
}

/// A remote deployment of this API.
#[derive(Clone)]
pub struct RemoteSqrtApi {
    client: Client,
    base_url: String,
    bearer_token: Option<String>,
    api_key: Option<String>,
}

impl RemoteSqrtApi {
    pub fn new(
        client: Client,
        base_url: &str,
        bearer_token: Option<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token,
            api_key,
        }
    }

    fn url_for(&self, number: f64) -> String {
        format!("{}/sqrt/{:?}", self.base_url, number)
    }

    async fn sqrt(&self, number: f64) -> ApiResult<f64> {
        let mut request = self.client.get(self.url_for(number));
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Upstream(format!("Request failed: {}", e)))?;
        let status = response.status();

        let body: RemoteBody = response
            .json()
            .await
            .map_err(|e| ApiError::Upstream(format!("API error {}: {}", status, e)))?;

        body.into_result()
    }
}

/// Square-root source for the bot.
#[derive(Clone)]
pub enum SqrtBackend {
    /// Compute in-process.
    Local,
    /// Call a deployed API over HTTP.
    Remote(RemoteSqrtApi),
}

impl SqrtBackend {
    /// Compute the square root of `number`.
    ///
    /// Negative numbers are rejected before any remote call.
    pub async fn sqrt(&self, number: f64) -> ApiResult<f64> {
        match self {
            SqrtBackend::Local => compute_sqrt(number).map(|r| r.sqrt),
            SqrtBackend::Remote(api) => {
                if number < 0.0 {
                    return Err(ApiError::NegativeNumber);
                }
                api.sqrt(number).await
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SqrtBackend::Local => "local",
            SqrtBackend::Remote(_) => "remote",
        }
    }
}
