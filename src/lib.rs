//! Content provider for sieutamphim.org.
//!
//! ```rust,no_run
//! use sieutamphim::{HttpFetcher, Provider, ProviderConfig, SieuTamPhim};
//!
//! # async fn example() -> sieutamphim::Result<()> {
//! let config = ProviderConfig::default();
//! let fetcher = HttpFetcher::new(&config.http.user_agent)?;
//! let provider = SieuTamPhim::new(config, fetcher);
//!
//! let results = provider.search("tây du ký").await?;
//! if let Some(first) = results.first() {
//!     let title = provider.load(&first.url).await?;
//!     let mut links = Vec::new();
//!     provider
//!         .load_links(&title.episodes[0].data, &mut |link: sieutamphim::StreamLink| links.push(link))
//!         .await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod provider;
pub mod urls;

pub use config::ProviderConfig;
pub use error::{Error, Result};
pub use fetch::{FetchRequest, FetchResponse, Fetcher, HttpFetcher};
pub use models::{
    DubStatus, Episode, LinkType, LoadResult, Quality, SearchResult, ShowStatus, StreamLink, TvType,
};
pub use provider::{LinkCallback, Provider, SieuTamPhim};
