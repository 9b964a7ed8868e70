//! Threads API client: OAuth authorization-code flow and keyword search.
//!
//! No refresh, revocation or retry; a token lives as long as its session.

use crate::config::ThreadsConfig;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub const SCOPES: &str = "threads_basic,threads_keyword_search";
pub const SEARCH_FIELDS: &str = "id,text,username,permalink,timestamp";

#[derive(Debug, Error)]
pub enum ThreadsError {
    #[error("invalid Threads URL: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Transport(reqwest::Error),

    #[error("Threads API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("token response did not contain an access token")]
    MissingToken,
}

// Search URLs carry the access token in the query string.
impl From<reqwest::Error> for ThreadsError {
    fn from(err: reqwest::Error) -> Self {
        ThreadsError::Transport(err.without_url())
    }
}

/// One keyword-search hit. Every field is optional upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadsPost {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<ThreadsPost>,
}

#[derive(Clone)]
pub struct ThreadsClient {
    client: Client,
    config: ThreadsConfig,
}

impl ThreadsClient {
    pub fn new(config: ThreadsConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Where to send the browser to start the OAuth flow.
    pub fn authorize_url(&self) -> Result<String, ThreadsError> {
        let url = Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", SCOPES),
            ],
        )
        .map_err(|e| ThreadsError::InvalidUrl(e.to_string()))?;
        Ok(url.into())
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<String, ThreadsError> {
        debug!("Exchanging Threads authorization code");

        let resp = self
            .client
            .post(&self.config.token_url)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        let resp = check_status(resp).await?;
        let token: TokenResponse = resp.json().await?;
        let token = token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(ThreadsError::MissingToken)?;

        info!("Threads access token obtained");
        Ok(token)
    }

    /// Top posts matching `keyword`.
    pub async fn keyword_search(
        &self,
        access_token: &str,
        keyword: &str,
    ) -> Result<Vec<ThreadsPost>, ThreadsError> {
        let url = format!("{}/keyword_search", self.config.api_base);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("q", keyword),
                ("search_type", "TOP"),
                ("fields", SEARCH_FIELDS),
                ("access_token", access_token),
            ])
            .send()
            .await?;

        let resp = check_status(resp).await?;
        let search: SearchResponse = resp.json().await?;
        info!(
            "Threads keyword search '{}': {} results",
            keyword,
            search.data.len()
        );
        Ok(search.data)
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ThreadsError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ThreadsError::Api {
        status: status.as_u16(),
        body,
    })
}
