use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TvType {
    Anime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DubStatus {
    Dubbed,
    Subbed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowStatus {
    Completed,
    Ongoing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    /// HLS playlist
    M3u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub poster_url: Option<String>,
    pub media_type: TvType,
    pub dub_status: DubStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Episode {
    /// URL handed back to `load_links`
    pub data: String,
    pub name: String,
    pub episode: u32,
}

impl Episode {
    pub fn numbered(data: String, episode: u32) -> Self {
        Self {
            data,
            name: format!("Tập {}", episode),
            episode,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadResult {
    pub title: String,
    pub url: String,
    pub media_type: TvType,
    pub poster_url: Option<String>,
    pub plot: Option<String>,
    pub tags: Vec<String>,
    pub year: i32,
    pub show_status: ShowStatus,
    pub dub_status: DubStatus,
    pub episodes: Vec<Episode>,
}

/// A playable stream handed to the host player
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamLink {
    pub source: String,
    pub name: String,
    pub url: String,
    pub referer: String,
    pub quality: Quality,
    pub link_type: LinkType,
    pub headers: BTreeMap<String, String>,
}
