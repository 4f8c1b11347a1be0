//! Native HTTP Client
//!
//! `reqwest` implementation of [`FoodApi`].

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::{
    decode_ack, decode_body, delete_log_url, endpoint_url, food_logs_url, ClientError,
    ClientResult, FoodApi, DEFAULT_API_BASE, LOGIN_PATH, RECOGNIZE_PATH, REGISTER_PATH,
};
use crate::models::{AuthGrant, Credentials, FoodLogEntry, ImageUpload, LogId, RecognitionResult};
use crate::session::Session;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpFoodApiConfig {
    /// Service base URL (e.g., "http://localhost:5000")
    pub base_url: String,
    /// Applied to every request; a stalled request surfaces as
    /// [`ClientError::Timeout`] instead of hanging forever.
    pub request_timeout: Duration,
}

impl Default for HttpFoodApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// FoodLens REST client
pub struct HttpFoodApi {
    client: Client,
    config: HttpFoodApiConfig,
}

impl HttpFoodApi {
    pub fn new(config: HttpFoodApiConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    async fn post_credentials(&self, path: &str, credentials: &Credentials) -> ClientResult<AuthGrant> {
        let url = endpoint_url(&self.config.base_url, path);
        tracing::debug!(%url, username = %credentials.username, "Sending credentials");

        let response = self.client.post(&url).json(credentials).send().await?;
        read_json(response).await
    }
}

#[async_trait]
impl FoodApi for HttpFoodApi {
    async fn login(&self, credentials: &Credentials) -> ClientResult<AuthGrant> {
        self.post_credentials(LOGIN_PATH, credentials).await
    }

    async fn register(&self, credentials: &Credentials) -> ClientResult<AuthGrant> {
        self.post_credentials(REGISTER_PATH, credentials).await
    }

    async fn food_logs(&self, session: &Session) -> ClientResult<Vec<FoodLogEntry>> {
        let url = food_logs_url(&self.config.base_url, session);
        let response = self.client.get(&url).send().await?;
        read_json(response).await
    }

    async fn recognize(
        &self,
        session: &Session,
        image: &ImageUpload,
        weight_grams: u32,
    ) -> ClientResult<RecognitionResult> {
        let url = endpoint_url(&self.config.base_url, RECOGNIZE_PATH);

        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)
            .map_err(|e| ClientError::Validation(format!("Invalid image type: {}", e)))?;

        let form = Form::new()
            .part("image", part)
            .text("userId", session.id().to_string())
            .text("weight", weight_grams.to_string());

        tracing::debug!(%url, file = %image.file_name, bytes = image.bytes.len(), weight_grams, "Uploading image");

        let response = self.client.post(&url).multipart(form).send().await?;
        read_json(response).await
    }

    async fn delete_log(&self, session: &Session, id: LogId) -> ClientResult<()> {
        let url = delete_log_url(&self.config.base_url, session, id);
        let response = self.client.delete(&url).send().await?;
        let body = response.text().await?;
        decode_ack(&body)
    }
}

/// Read the body as text and decode it. Status codes are ignored: the
/// services signal failures through an `error` field.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
    let status = response.status();
    let body = response.text().await?;

    match decode_body(&body) {
        Err(ClientError::Parse(e)) if !status.is_success() => {
            Err(ClientError::Transport(format!("HTTP {}: {}", status.as_u16(), e)))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpFoodApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let api = HttpFoodApi::new(HttpFoodApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            request_timeout: Duration::from_secs(2),
        })
        .unwrap();

        let session = Session::new("1").unwrap();
        let err = api.food_logs(&session).await.unwrap_err();
        assert!(err.is_transport(), "{:?}", err);
    }
}
