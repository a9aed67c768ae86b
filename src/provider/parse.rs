//! Listing and title page parsing.
//!
//! Everything here is synchronous and works on an already fetched body:
//! `scraper::Html` is not `Send`, so it never lives across an await.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::models::{Episode, LoadResult, SearchResult, TvType};
use crate::urls::fix_url;

static ARTICLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article.post").expect("Invalid article selector"));
static HEADING_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2 a").expect("Invalid heading link selector"));
static IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("Invalid image selector"));
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1").expect("Invalid title selector"));
static POSTER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".poster img").expect("Invalid poster selector"));
static DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".description").expect("Invalid description selector"));
// "/tap-" is the site's episode path segment ("tập" = episode)
static EPISODE_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href*="/tap-"]"#).expect("Invalid episode selector"));

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

pub const UNKNOWN_TITLE: &str = "Unknown";

/// Visible text with whitespace runs squeezed to single spaces
fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() { None } else { Some(value) }
}

fn image_src(scope: ElementRef<'_>, selector: &Selector, base: &str) -> Option<String> {
    scope
        .select(selector)
        .next()
        .and_then(|img| img.attr("src"))
        .and_then(non_empty)
        .map(|src| fix_url(base, src))
}

/// Parse a search listing page into results, in document order
pub fn parse_search_results(html: &str, config: &ProviderConfig) -> Vec<SearchResult> {
    let document = Html::parse_document(html);
    let base = config.site.base_url.as_str();

    let results: Vec<SearchResult> = document
        .select(&ARTICLE)
        .filter_map(|article| {
            let link = article.select(&HEADING_LINK).next()?;
            let title = element_text(link);
            if title.is_empty() {
                return None;
            }
            let href = link.attr("href").and_then(non_empty)?;

            Some(SearchResult {
                title,
                url: fix_url(base, href),
                poster_url: image_src(article, &IMAGE, base),
                media_type: TvType::Anime,
                dub_status: config.defaults.dub_status,
            })
        })
        .collect();

    debug!(count = results.len(), "Parsed search results");
    results
}

/// First number in an episode link's visible text, if any.
/// Zero is not a valid episode number.
pub fn episode_number_from_text(text: &str) -> Option<u32> {
    DIGITS
        .find(text)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|&n| n > 0)
}

/// Episode anchors in document order. Returns an empty list when the page
/// has none; the caller decides on a fallback.
pub fn parse_episode_links(document: &Html, base: &str) -> Vec<Episode> {
    document
        .select(&EPISODE_LINK)
        .enumerate()
        .map(|(index, anchor)| {
            let href = fix_url(base, anchor.attr("href").unwrap_or_default());
            let number = episode_number_from_text(&element_text(anchor))
                .unwrap_or(index as u32 + 1);
            Episode::numbered(href, number)
        })
        .collect()
}

/// Synthetic `<url>/tap-<n>` episodes for pages without an episode list
pub fn synthesize_episodes(title_url: &str, count: u32) -> Vec<Episode> {
    (1..=count)
        .map(|n| Episode::numbered(format!("{}/tap-{}", title_url, n), n))
        .collect()
}

/// Parse a title page into a load result
pub fn parse_title_page(html: &str, url: &str, config: &ProviderConfig) -> LoadResult {
    let document = Html::parse_document(html);
    let base = config.site.base_url.as_str();
    let defaults = &config.defaults;

    let title = document
        .select(&TITLE)
        .next()
        .map(element_text)
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

    let poster_url = image_src(document.root_element(), &POSTER, base);

    let plot = document
        .select(&DESCRIPTION)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty());

    let mut episodes = parse_episode_links(&document, base);
    if episodes.is_empty() {
        debug!(
            url = %url,
            count = defaults.fallback_episode_count,
            "No episode links found, synthesizing episode list"
        );
        episodes = synthesize_episodes(url, defaults.fallback_episode_count);
    }

    LoadResult {
        title,
        url: url.to_string(),
        media_type: TvType::Anime,
        poster_url,
        plot,
        tags: defaults.tags.clone(),
        year: defaults.year,
        show_status: defaults.status,
        dub_status: defaults.dub_status,
        episodes,
    }
}
