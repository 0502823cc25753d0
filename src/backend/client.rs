use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::backend::models::{ConversionRequest, ConversionResult};
use crate::error::{AppError, Result};

const CONVERT_FALLBACK_ERROR: &str = "Failed to convert playlist";

#[derive(Debug, Deserialize)]
struct LoginResponse {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ConvertErrorBody {
    error: Option<String>,
}

/// HTTP surface of the conversion backend. The matching algorithm lives
/// behind this seam; the client only relies on the wire contract.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// Fetch the URL the user must visit to authorize the source platform.
    async fn login_url(&self) -> Result<String>;

    /// Submit a conversion and wait for the matching report.
    async fn convert(&self, request: &ConversionRequest) -> Result<ConversionResult>;
}

pub struct BackendClient {
    http_client: Client,
    api_url: String,
}

impl BackendClient {
    pub fn new(api_url: &str) -> Self {
        Self {
            http_client: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BackendApi for BackendClient {
    async fn login_url(&self) -> Result<String> {
        let response = self
            .http_client
            .get(format!("{}/login", self.api_url))
            .send()
            .await
            .map_err(|e| AppError::LoginInitiation(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::LoginInitiation(format!(
                "login endpoint returned {}",
                response.status()
            )));
        }

        // A body without a `url` field fails to decode and is reported the
        // same way as a transport failure.
        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| AppError::LoginInitiation(e.to_string()))?;

        debug!("received login redirect target");
        Ok(body.url)
    }

    async fn convert(&self, request: &ConversionRequest) -> Result<ConversionResult> {
        let response = self
            .http_client
            .post(format!("{}/convert", self.api_url))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = convert_error_message(&body);
            warn!("convert request failed ({}): {}", status, message);
            return Err(AppError::Conversion(message));
        }

        let result: ConversionResult = response.json().await?;
        info!(
            "conversion report received: {}/{} tracks matched",
            result.summary.matched, result.summary.total
        );
        Ok(result)
    }
}

/// Pull the server-supplied message out of a non-2xx `/convert` body,
/// falling back to a generic message when the body has no `error` field.
fn convert_error_message(body: &str) -> String {
    serde_json::from_str::<ConvertErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| CONVERT_FALLBACK_ERROR.to_string())
}
