//! Player and stream URL extraction.
//!
//! Each extractor is a pure function over a fetched page. They are tried in
//! order and the first hit wins.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

/// `(document, raw body) -> url`
pub type PlayerStrategy = fn(&Html, &str) -> Option<String>;

static PLAYER_IFRAME: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"iframe[src*="/player/"]"#).expect("Invalid player iframe selector")
});
static EMBED_IFRAME: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"iframe[src*="embed"]"#).expect("Invalid embed iframe selector")
});
static SCRIPT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script").expect("Invalid script selector"));

static SCRIPT_SRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"src=["']([^"']+)["']"#).unwrap());

static STREAM_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // "file": "https://.../index.m3u8" (jwplayer style setup)
        Regex::new(r#"["']file["']\s*:\s*["']([^"']+\.m3u8)"#).unwrap(),
        // src: "https://.../index.m3u8"
        Regex::new(r#"src["']?\s*:\s*["']([^"']+\.m3u8)"#).unwrap(),
    ]
});

/// Ordered player lookup strategies
pub const PLAYER_STRATEGIES: &[(&str, PlayerStrategy)] = &[
    ("player-iframe", player_iframe),
    ("embed-iframe", embed_iframe),
    ("script-src", script_src),
];

fn first_src(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|el| el.attr("src"))
        .filter(|src| !src.is_empty())
        .map(str::to_string)
}

pub fn player_iframe(document: &Html, _raw: &str) -> Option<String> {
    first_src(document, &PLAYER_IFRAME)
}

pub fn embed_iframe(document: &Html, _raw: &str) -> Option<String> {
    first_src(document, &EMBED_IFRAME)
}

/// Only the first script mentioning an iframe or player is inspected
pub fn script_src(document: &Html, _raw: &str) -> Option<String> {
    let script = document
        .select(&SCRIPT)
        .map(|el| el.text().collect::<String>())
        .find(|text| text.contains("iframe") || text.contains("player"))?;

    SCRIPT_SRC
        .captures(&script)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Run the player strategies in order
pub fn find_player_url(document: &Html, raw: &str) -> Option<String> {
    PLAYER_STRATEGIES.iter().find_map(|(name, strategy)| {
        let url = strategy(document, raw)?;
        debug!(strategy = *name, url = %url, "Found player URL");
        Some(url)
    })
}

/// Pull an HLS playlist URL out of a player page's raw body
pub fn find_stream_url(raw: &str) -> Option<String> {
    STREAM_PATTERNS.iter().find_map(|re| {
        re.captures(raw)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|url| !url.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(html: &str) -> Option<String> {
        find_player_url(&Html::parse_document(html), html)
    }

    #[test]
    fn test_player_iframe_wins() {
        let html = r#"
            <iframe src="https://ads.example/embed/banner"></iframe>
            <iframe src="https://cdn.example/player/abc"></iframe>
        "#;
        assert_eq!(player(html).as_deref(), Some("https://cdn.example/player/abc"));
    }

    #[test]
    fn test_embed_iframe() {
        let html = r#"<iframe src="//video.example/embed/xyz"></iframe>"#;
        assert_eq!(player(html).as_deref(), Some("//video.example/embed/xyz"));
    }

    #[test]
    fn test_script_src() {
        let html = r#"
            <script>var a = 1;</script>
            <script>
              document.getElementById("box").innerHTML =
                '<iframe src="https://cdn.example/v/1" allowfullscreen></iframe>';
            </script>
        "#;
        assert_eq!(player(html).as_deref(), Some("https://cdn.example/v/1"));
    }

    #[test]
    fn test_script_without_src() {
        let html = r#"
            <script>var player = null;</script>
            <script>load('<iframe src="https://cdn.example/v/2">')</script>
        "#;
        assert_eq!(player(html), None);
    }

    #[test]
    fn test_no_player() {
        assert_eq!(player("<html><body><p>Hết phim</p></body></html>"), None);
    }

    #[test]
    fn test_strategy_order() {
        let names: Vec<_> = PLAYER_STRATEGIES.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["player-iframe", "embed-iframe", "script-src"]);
    }

    #[test]
    fn test_stream_file_pattern() {
        let raw = r#"jwplayer("p").setup({"file": "https://cdn.example/video.m3u8", "type": "hls"});"#;
        assert_eq!(
            find_stream_url(raw).as_deref(),
            Some("https://cdn.example/video.m3u8")
        );
    }

    #[test]
    fn test_stream_file_single_quotes() {
        let raw = "setup({ 'file' : '/hls/abc/index.m3u8' })";
        assert_eq!(find_stream_url(raw).as_deref(), Some("/hls/abc/index.m3u8"));
    }

    #[test]
    fn test_stream_src_pattern() {
        let raw = r#"var cfg = { src: "hls/720p.m3u8" };"#;
        assert_eq!(find_stream_url(raw).as_deref(), Some("hls/720p.m3u8"));
    }

    #[test]
    fn test_stream_file_preferred_over_src() {
        let raw = r#"{ src: "a.m3u8", "file": "b.m3u8" }"#;
        assert_eq!(find_stream_url(raw).as_deref(), Some("b.m3u8"));
    }

    #[test]
    fn test_stream_missing() {
        assert_eq!(find_stream_url(r#"{"file": "video.mp4"}"#), None);
        assert_eq!(find_stream_url("<video></video>"), None);
    }
}
