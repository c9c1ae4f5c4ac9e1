//! `TmdbClient` - TMDB API client implementation.

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tracing::instrument;
use url::Url;

use super::api::LocalTmdbApi;
use super::types::{
    DiscoverParams, SearchMultiParams, TmdbDetails, TmdbErrorResponse, TmdbGenreList,
    TmdbMediaResult, TmdbPage, TmdbVideoList,
};
use crate::model::MediaType;

/// Default base URL for TMDB API v3.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// How requests are authenticated.
#[derive(Clone)]
enum Credentials {
    /// v3 API key sent as the `api_key` query parameter.
    ApiKey(String),
    /// v4 read access token sent as a bearer token.
    Bearer(String),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(..)"),
            Self::Bearer(_) => f.write_str("Bearer(..)"),
        }
    }
}

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// API key or bearer token.
    credentials: Credentials,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    credentials: Option<Credentials>,
    user_agent: Option<String>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            credentials: None,
            user_agent: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Authenticates with a v3 API key (`api_key` query parameter).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::ApiKey(key.into()));
        self
    }

    /// Authenticates with a bearer token.
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::Bearer(token.into()));
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - Neither `api_key` nor `api_token` is set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let credentials = self
            .credentials
            .context("api_key or api_token is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            credentials,
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Sends a GET request with credentials and query params, and decodes
    /// the JSON body.
    #[instrument(skip_all, fields(path = path))]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let mut builder = self.http_client.get(url).query(query);
        builder = match &self.credentials {
            Credentials::ApiKey(key) => builder.query(&[("api_key", key.as_str())]),
            Credentials::Bearer(token) => builder.bearer_auth(token),
        };
        let request = builder
            .build()
            .with_context(|| format!("failed to build request: {path}"))?;

        tracing::debug!(path, "TMDB API request");

        let result = self.http_client.execute(request).await;
        let response = result.with_context(|| format!("request failed: {path}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                bail!(
                    "TMDB API error (HTTP {}): code={}, message={}",
                    status,
                    error_response.status_code,
                    error_response.status_message,
                );
            }
            bail!("TMDB API error (HTTP {status}): {body}");
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {path}"))?;
        let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
        raw_result.with_context(|| format!("failed to decode JSON response: {path}"))
    }

    /// Fetches a paged list endpoint that only takes `language` and `page`.
    async fn get_list(
        &self,
        path: &str,
        page: u32,
        language: &str,
    ) -> Result<TmdbPage<TmdbMediaResult>> {
        let query = [
            ("language", String::from(language)),
            ("page", page.to_string()),
        ];
        self.get_json(path, &query).await
    }
}

impl LocalTmdbApi for TmdbClient {
    #[instrument(skip_all)]
    async fn trending(&self, language: &str) -> Result<TmdbPage<TmdbMediaResult>> {
        let query = [("language", String::from(language))];
        self.get_json("trending/all/day", &query).await
    }

    #[instrument(skip_all)]
    async fn popular(
        &self,
        media_type: MediaType,
        page: u32,
        language: &str,
    ) -> Result<TmdbPage<TmdbMediaResult>> {
        let path = format!("{media_type}/popular");
        self.get_list(&path, page, language).await
    }

    #[instrument(skip_all)]
    async fn top_rated(
        &self,
        media_type: MediaType,
        page: u32,
        language: &str,
    ) -> Result<TmdbPage<TmdbMediaResult>> {
        let path = format!("{media_type}/top_rated");
        self.get_list(&path, page, language).await
    }

    #[instrument(skip_all)]
    async fn discover(
        &self,
        media_type: MediaType,
        params: &DiscoverParams,
    ) -> Result<TmdbPage<TmdbMediaResult>> {
        let path = format!("discover/{media_type}");
        let query = [
            ("language", params.language.clone()),
            ("with_genres", params.genre_id.to_string()),
            ("page", params.page.to_string()),
        ];
        self.get_json(&path, &query).await
    }

    #[instrument(skip_all)]
    async fn genres(&self, media_type: MediaType, language: &str) -> Result<TmdbGenreList> {
        let path = format!("genre/{media_type}/list");
        let query = [("language", String::from(language))];
        self.get_json(&path, &query).await
    }

    #[instrument(skip_all)]
    async fn search_multi(&self, params: &SearchMultiParams) -> Result<TmdbPage<TmdbMediaResult>> {
        let query = [
            ("query", params.query.clone()),
            ("language", params.language.clone()),
            ("page", params.page.to_string()),
            ("include_adult", params.include_adult.to_string()),
        ];
        self.get_json("search/multi", &query).await
    }

    #[instrument(skip_all)]
    async fn details(&self, media_type: MediaType, id: u64, language: &str) -> Result<TmdbDetails> {
        let path = format!("{media_type}/{id}");
        let query = [("language", String::from(language))];
        self.get_json(&path, &query).await
    }

    #[instrument(skip_all)]
    async fn videos(
        &self,
        media_type: MediaType,
        id: u64,
        language: &str,
    ) -> Result<TmdbVideoList> {
        let path = format!("{media_type}/{id}/videos");
        let query = [("language", String::from(language))];
        self.get_json(&path, &query).await
    }
}
