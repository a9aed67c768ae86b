use url::Url;

use crate::error::Result;

/// Make a site href absolute by plain concatenation with `base`.
///
/// Protocol-relative hrefs and `..` segments are not handled.
pub fn fix_url(base: &str, url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("{}{}", base, url.strip_prefix('/').unwrap_or(url))
    }
}

/// Give a scheme-less (`//host/path`) URL an https scheme
pub fn repair_scheme(url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("https:{}", url)
    }
}

/// Standard relative reference resolution against `base`
pub fn resolve_against(base: &str, url: &str) -> Result<String> {
    if url.starts_with("http") {
        return Ok(url.to_string());
    }
    Ok(Url::parse(base)?.join(url)?.to_string())
}

/// Search endpoint URL; spaces become `+`
pub fn search_url(base: &str, query: &str) -> String {
    let encoded: Vec<_> = query.split(' ').map(urlencoding::encode).collect();
    format!("{}?s={}", base, encoded.join("+"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.sieutamphim.org/";

    #[test]
    fn test_fix_url_absolute_unchanged() {
        assert_eq!(
            fix_url(BASE, "https://cdn.example/a.jpg"),
            "https://cdn.example/a.jpg"
        );
        assert_eq!(fix_url(BASE, "http://x.example/"), "http://x.example/");
    }

    #[test]
    fn test_fix_url_relative() {
        assert_eq!(
            fix_url(BASE, "/phim/abc"),
            "https://www.sieutamphim.org/phim/abc"
        );
        assert_eq!(
            fix_url(BASE, "phim/abc"),
            "https://www.sieutamphim.org/phim/abc"
        );
    }

    #[test]
    fn test_fix_url_strips_one_slash() {
        assert_eq!(fix_url(BASE, "//x/y"), "https://www.sieutamphim.org//x/y");
    }

    #[test]
    fn test_repair_scheme() {
        assert_eq!(
            repair_scheme("//cdn.example/player/x"),
            "https://cdn.example/player/x"
        );
        assert_eq!(
            repair_scheme("https://cdn.example/player/x"),
            "https://cdn.example/player/x"
        );
    }

    #[test]
    fn test_resolve_against_player_path() {
        assert_eq!(
            resolve_against("https://cdn.example/player/x/index.html", "hls/video.m3u8").unwrap(),
            "https://cdn.example/player/x/hls/video.m3u8"
        );
        assert_eq!(
            resolve_against("https://cdn.example/player/x/index.html", "/hls/video.m3u8").unwrap(),
            "https://cdn.example/hls/video.m3u8"
        );
    }

    #[test]
    fn test_resolve_against_absolute() {
        assert_eq!(
            resolve_against("https://cdn.example/p", "https://other.example/v.m3u8").unwrap(),
            "https://other.example/v.m3u8"
        );
    }

    #[test]
    fn test_resolve_against_bad_base() {
        assert!(resolve_against("not a url", "v.m3u8").is_err());
    }

    #[test]
    fn test_search_url() {
        assert_eq!(
            search_url(BASE, "one piece"),
            "https://www.sieutamphim.org/?s=one+piece"
        );
        assert_eq!(
            search_url(BASE, "tây du ký"),
            "https://www.sieutamphim.org/?s=t%C3%A2y+du+k%C3%BD"
        );
    }
}
