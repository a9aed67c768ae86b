//! HTTP capability the provider borrows from its host.
//!
//! The host decides how a page is fetched (plain HTTP, a scripting-capable
//! renderer, a cache). The provider only describes what it wants with a
//! [`FetchRequest`] and reads back the raw body.

use std::time::Duration;

use async_trait::async_trait;
use scraper::Html;
use tracing::debug;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub timeout: Option<Duration>,
    pub headers: Vec<(String, String)>,
    pub referer: Option<String>,
    /// Ask the host to execute page scripts before returning the body
    pub scripting: bool,
}

impl FetchRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: None,
            headers: Vec::new(),
            referer: None,
            scripting: false,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    pub fn scripting(mut self, enabled: bool) -> Self {
        self.scripting = enabled;
        self
    }
}

#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub text: String,
}

impl FetchResponse {
    pub fn document(&self) -> Html {
        Html::parse_document(&self.text)
    }
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse>;
}

/// Static reqwest-backed fetcher. Page scripts are never executed.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .cookie_store(true)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        debug!(
            url = %request.url,
            scripting = request.scripting,
            timeout = ?request.timeout,
            "Fetching page"
        );

        let mut builder = self.client.get(&request.url);
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(referer) = &request.referer {
            builder = builder.header(reqwest::header::REFERER, referer.as_str());
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let text = response.text().await?;
        debug!(url = %request.url, bytes = text.len(), "Fetched page");

        Ok(FetchResponse { text })
    }
}
