use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::core::error::{ConfigError, Error};
use crate::types::request::{PasswordRecoveryData, PasswordResetData, SignInData, VerifyData};
use crate::types::response::Authenticated;

/// HTTP client for the workshop backend.
#[derive(Clone)]
pub(crate) struct Client {
    client: reqwest::Client,
    url: String,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").field("url", &self.url).finish()
    }
}

impl Client {
    pub(crate) fn new(url: &str, api_key: &str) -> Result<Self, ConfigError> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ApiUrl(url.to_owned()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key).map_err(|_| ConfigError::ApiKey)?,
        );

        let client = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_owned(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.url, path.trim_start_matches('/'))
    }

    #[instrument(skip_all)]
    pub(crate) async fn sign_in(&self, data: &SignInData) -> Result<Authenticated, Error> {
        self.post("auth/sign-in", data).await
    }

    #[instrument(skip_all)]
    pub(crate) async fn sign_up(&self, data: &serde_json::Value) -> Result<serde_json::Value, Error> {
        self.post("auth/sign-up", data).await
    }

    #[instrument(skip_all)]
    pub(crate) async fn verify(&self, data: &VerifyData) -> Result<Authenticated, Error> {
        self.post("auth/verify", data).await
    }

    #[instrument(skip_all)]
    pub(crate) async fn recover_password(
        &self,
        data: &PasswordRecoveryData,
    ) -> Result<serde_json::Value, Error> {
        self.post("auth/password-recovery", data).await
    }

    #[instrument(skip_all)]
    pub(crate) async fn reset_password(
        &self,
        data: &PasswordResetData,
    ) -> Result<Authenticated, Error> {
        self.post("auth/password-reset", data).await
    }

    /// Authenticated read on behalf of a session.
    #[instrument(skip(self, access_token))]
    pub(crate) async fn get(
        &self,
        path: &str,
        query: Option<&str>,
        access_token: &str,
    ) -> Result<serde_json::Value, Error> {
        let mut url = self.endpoint(path);
        if let Some(query) = query.filter(|query| !query.is_empty()) {
            url.push('?');
            url.push_str(query);
        }

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {access_token}"))
            .send()
            .await?;

        Self::read(response).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.client.post(self.endpoint(path)).json(body).send().await?;

        Self::read(response).await
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, Error> {
        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Backend responded with {}", status);

            // only error statuses are meaningful to the browser
            if status.is_informational() || status.is_redirection() {
                return Err(Error::Backend(StatusCode::BAD_GATEWAY));
            }

            return Err(Error::Backend(status));
        }

        Ok(response.json::<T>().await?)
    }
}
