//! GitHub REST HTTP client.

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use sublog_core::error::{AuthError, ProtocolError};
use sublog_core::{AccessToken, ApiUrl, Error, Result};

use crate::endpoints::{API_VERSION, GithubErrorResponse, MEDIA_TYPE};
use crate::error::map_reqwest;

/// Authenticated HTTP client for one GitHub API host.
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: reqwest::Client,
    api: ApiUrl,
    token: AccessToken,
}

impl GithubClient {
    /// Create a client for `api` that authenticates with `token`.
    pub fn new(api: ApiUrl, token: AccessToken) -> Result<Self> {
        if token.is_empty() {
            return Err(AuthError::MissingToken.into());
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(MEDIA_TYPE));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));

        let client = reqwest::Client::builder()
            .user_agent(concat!("sublog/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(map_reqwest)?;

        Ok(Self { client, api, token })
    }

    /// Returns the API base URL this client is configured for.
    pub fn api(&self) -> &ApiUrl {
        &self.api
    }

    /// GET request.
    #[instrument(skip(self), fields(api = %self.api))]
    pub async fn get<R>(&self, path: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let url = self.api.endpoint(path);
        debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.token.as_str())
            .send()
            .await
            .map_err(map_reqwest)?;

        self.handle_response(response).await
    }

    /// GET request with query parameters.
    #[instrument(skip(self), fields(api = %self.api))]
    pub async fn get_with_query<Q, R>(&self, path: &str, query: &Q) -> Result<R>
    where
        Q: Serialize + std::fmt::Debug,
        R: DeserializeOwned,
    {
        let url = self.api.endpoint(path);
        debug!(%url, "GET");
        trace!(?query, "query parameters");

        let response = self
            .client
            .get(&url)
            .query(query)
            .bearer_auth(self.token.as_str())
            .send()
            .await
            .map_err(map_reqwest)?;

        self.handle_response(response).await
    }

    /// PUT request with a JSON body.
    #[instrument(skip(self, body), fields(api = %self.api))]
    pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.api.endpoint(path);
        debug!(%url, "PUT");

        let response = self
            .client
            .put(&url)
            .json(body)
            .bearer_auth(self.token.as_str())
            .send()
            .await
            .map_err(map_reqwest)?;

        self.handle_response(response).await
    }

    /// POST request with a JSON body.
    #[instrument(skip(self, body), fields(api = %self.api))]
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.api.endpoint(path);
        debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .json(body)
            .bearer_auth(self.token.as_str())
            .send()
            .await
            .map_err(map_reqwest)?;

        self.handle_response(response).await
    }

    async fn handle_response<R: DeserializeOwned>(&self, response: reqwest::Response) -> Result<R> {
        let status = response.status();
        trace!(status = %status, "GitHub response");

        if status.is_success() {
            return response.json::<R>().await.map_err(map_reqwest);
        }

        let error = self.parse_error_response(response).await;
        if error.status == 401 {
            let message = error.message.unwrap_or_else(|| "token was rejected".to_string());
            return Err(AuthError::InvalidCredentials(message).into());
        }
        Err(Error::Protocol(error))
    }

    async fn parse_error_response(&self, response: reqwest::Response) -> ProtocolError {
        let status = response.status().as_u16();

        match response.json::<GithubErrorResponse>().await {
            Ok(body) => ProtocolError::new(status, body.message)
                .with_documentation_url(body.documentation_url),
            Err(_) => ProtocolError::new(status, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let client = GithubClient::new(ApiUrl::github(), AccessToken::new("ghp_test")).unwrap();
        assert_eq!(client.api(), &ApiUrl::github());
        assert!(!format!("{:?}", client).contains("ghp_test"));
    }
}
