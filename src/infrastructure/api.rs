//! Backend API client.
//!
//! The `ConversationApi` trait is the seam between the export pipeline and
//! the network; `BackendApi` is the reqwest implementation against the
//! ChatGPT backend endpoints.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::domain::{ConversationDetail, ConversationPage, ExportError, Result};

/// Read access to the conversation index and per-conversation detail.
#[allow(async_fn_in_trait)]
pub trait ConversationApi {
    /// Fetch one page of the conversation index.
    ///
    /// # Errors
    /// Returns error on authentication failure, rate limiting, or any
    /// transport/HTTP failure.
    async fn list_page(
        &self,
        credential: &str,
        offset: usize,
        limit: usize,
    ) -> Result<ConversationPage>;

    /// Fetch the full detail of one conversation.
    ///
    /// # Errors
    /// Same error kinds as [`Self::list_page`], scoped to one conversation.
    async fn fetch_detail(&self, credential: &str, id: &str) -> Result<ConversationDetail>;
}

/// reqwest-backed client for the ChatGPT backend API.
#[derive(Debug, Clone)]
pub struct BackendApi {
    client: reqwest::Client,
    base_url: String,
}

impl BackendApi {
    /// Create a client for the given base URL.
    ///
    /// # Errors
    /// Returns error if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(ExportError::transport)?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { client, base_url })
    }

    /// GET a path and decode the JSON body, mapping HTTP statuses to the
    /// error taxonomy (401 auth, 429 rate limit, other non-2xx API error).
    async fn get_json<T: DeserializeOwned>(&self, path: &str, credential: &str) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .bearer_auth(credential)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(ExportError::transport)?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Err(ExportError::Auth {
                message: "session expired or token invalid; re-authenticate and try again".into(),
            }),
            StatusCode::TOO_MANY_REQUESTS => Err(ExportError::RateLimited),
            status if !status.is_success() => Err(ExportError::Api {
                status: status.as_u16(),
                path: path.to_string(),
            }),
            _ => response.json::<T>().await.map_err(|err| {
                ExportError::InvalidResponse {
                    message: err.to_string(),
                    source: None,
                }
            }),
        }
    }
}

impl ConversationApi for BackendApi {
    async fn list_page(
        &self,
        credential: &str,
        offset: usize,
        limit: usize,
    ) -> Result<ConversationPage> {
        self.get_json(
            &format!("/conversations?limit={limit}&offset={offset}"),
            credential,
        )
        .await
    }

    async fn fetch_detail(&self, credential: &str, id: &str) -> Result<ConversationDetail> {
        self.get_json(&format!("/conversation/{id}"), credential)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let api = BackendApi::new("https://example.com/backend-api/").unwrap();
        assert_eq!(api.base_url, "https://example.com/backend-api");
    }
}
