use once_cell::sync::Lazy;
use regex::Regex;

/// URL shapes tried in order; the first capture wins.
static VIDEO_ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"youtu\.be/([a-zA-Z0-9_-]{6,})",
        r"[?&]v=([a-zA-Z0-9_-]{6,})",
        r"youtube\.com/shorts/([a-zA-Z0-9_-]{6,})",
        r"youtube\.com/embed/([a-zA-Z0-9_-]{6,})",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Extract a YouTube video ID from short-link, `?v=`, `/shorts/`, or `/embed/` URLs.
pub fn extract_video_id(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(url))
        .map(|caps| caps[1].to_string())
}

pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{video_id}/hqdefault.jpg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_link() {
        assert_eq!(
            extract_video_id("https://youtu.be/abc123XYZ").as_deref(),
            Some("abc123XYZ")
        );
    }

    #[test]
    fn watch_query_parameter() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?feature=share&v=a_b-c12").as_deref(),
            Some("a_b-c12")
        );
    }

    #[test]
    fn shorts_and_embed_paths() {
        assert_eq!(
            extract_video_id("https://youtube.com/shorts/Short_01?si=x").as_deref(),
            Some("Short_01")
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/Embed-99").as_deref(),
            Some("Embed-99")
        );
    }

    #[test]
    fn unrelated_or_too_short_urls_yield_none() {
        assert_eq!(extract_video_id("https://example.com/tool"), None);
        assert_eq!(extract_video_id("https://youtu.be/abc"), None);
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn thumbnail_uses_high_quality_image() {
        assert_eq!(
            thumbnail_url("abc123XYZ"),
            "https://img.youtube.com/vi/abc123XYZ/hqdefault.jpg"
        );
    }
}
