//! The SieuTamPhim content provider.
//!
//! Implements the host's provider contract: search the site, load a title's
//! episode list, and resolve an episode to a playable HLS stream. Missing
//! markup is never an error here; only transport failures propagate.

pub mod extract;
pub mod parse;

use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::config::ProviderConfig;
use crate::error::Result;
use crate::fetch::{FetchRequest, Fetcher};
use crate::models::{LinkType, LoadResult, Quality, SearchResult, StreamLink, TvType};
use crate::urls::{repair_scheme, resolve_against, search_url};

pub use extract::{find_player_url, find_stream_url};
pub use parse::{parse_search_results, parse_title_page};

/// Receives each stream link a provider resolves
pub type LinkCallback<'a> = dyn FnMut(StreamLink) + Send + 'a;

#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;

    fn main_url(&self) -> &str;

    fn lang(&self) -> &str;

    fn supported_types(&self) -> &[TvType];

    fn has_main_page(&self) -> bool {
        false
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>>;

    async fn load(&self, url: &str) -> Result<LoadResult>;

    /// Resolve an episode's `data` into stream links passed to `callback`.
    /// `Ok(false)` means no playable link was found.
    async fn load_links(&self, data: &str, callback: &mut LinkCallback<'_>) -> Result<bool>;
}

pub struct SieuTamPhim<F> {
    config: ProviderConfig,
    fetcher: F,
}

impl<F: Fetcher> SieuTamPhim<F> {
    pub fn new(config: ProviderConfig, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    fn page_request(&self, url: &str) -> FetchRequest {
        FetchRequest::get(url)
            .timeout(self.config.http.timeout())
            .scripting(true)
    }

    /// Episode page -> player URL, repaired to an absolute https URL
    async fn locate_player(&self, episode_url: &str) -> Result<Option<String>> {
        let request = self
            .page_request(episode_url)
            .header("User-Agent", self.config.http.user_agent.as_str())
            .header("Referer", self.config.site.base_url.trim_end_matches('/'));
        let response = self.fetcher.fetch(&request).await?;

        let document = response.document();
        let player = find_player_url(&document, &response.text);
        Ok(player.map(|url| repair_scheme(&url)))
    }

    fn stream_link(&self, stream_url: String, player_url: &str) -> StreamLink {
        let mut headers = BTreeMap::new();
        headers.insert("Referer".to_string(), player_url.to_string());

        StreamLink {
            source: self.config.links.source_label.clone(),
            name: self.config.links.display_label.clone(),
            url: stream_url,
            referer: player_url.to_string(),
            quality: Quality::Unknown,
            link_type: LinkType::M3u8,
            headers,
        }
    }
}

#[async_trait]
impl<F: Fetcher> Provider for SieuTamPhim<F> {
    fn name(&self) -> &str {
        &self.config.site.name
    }

    fn main_url(&self) -> &str {
        &self.config.site.base_url
    }

    fn lang(&self) -> &str {
        &self.config.site.lang
    }

    fn supported_types(&self) -> &[TvType] {
        &[TvType::Anime]
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let url = search_url(&self.config.site.base_url, query);
        debug!(url = %url, "Searching");

        let response = self.fetcher.fetch(&FetchRequest::get(url)).await?;
        let results = parse_search_results(&response.text, &self.config);

        info!(query = %query, count = results.len(), "Search complete");
        Ok(results)
    }

    async fn load(&self, url: &str) -> Result<LoadResult> {
        let response = self.fetcher.fetch(&FetchRequest::get(url)).await?;
        let result = parse_title_page(&response.text, url, &self.config);

        info!(
            title = %result.title,
            episodes = result.episodes.len(),
            "Loaded title"
        );
        Ok(result)
    }

    async fn load_links(&self, data: &str, callback: &mut LinkCallback<'_>) -> Result<bool> {
        let Some(player_url) = self.locate_player(data).await? else {
            warn!(episode = %data, "No player found on episode page");
            return Ok(false);
        };
        debug!(player = %player_url, "Fetching player page");

        let request = self.page_request(&player_url).referer(data);
        let response = self.fetcher.fetch(&request).await?;

        let Some(stream_url) = find_stream_url(&response.text) else {
            warn!(player = %player_url, "No stream URL found on player page");
            return Ok(false);
        };
        let stream_url = resolve_against(&player_url, &stream_url)?;

        info!(stream = %stream_url, "Resolved stream");
        callback(self.stream_link(stream_url, &player_url));
        Ok(true)
    }
}
