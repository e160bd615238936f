//! Video-id extraction from the URL shapes users paste.

use regex::Regex;
use std::sync::LazyLock;

// Tried in order; the first capture wins.
static PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\n?#]+)")
            .unwrap(),
        Regex::new(r"youtube\.com/v/([^&\n?#]+)").unwrap(),
        Regex::new(r"youtube\.com/watch\?.*v=([^&\n?#]+)").unwrap(),
    ]
});

/// `None` for anything that is not a recognizable YouTube video URL.
pub fn extract_video_id(url: &str) -> Option<&str> {
    PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_watch_urls() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=abc123"),
            Some("abc123")
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn extracts_from_short_urls() {
        assert_eq!(extract_video_id("https://youtu.be/abc123"), Some("abc123"));
        assert_eq!(
            extract_video_id("https://youtu.be/abc123?t=5"),
            Some("abc123")
        );
    }

    #[test]
    fn extracts_from_embed_and_v_urls() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/xyz789"),
            Some("xyz789")
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/v/xyz789"),
            Some("xyz789")
        );
    }

    #[test]
    fn extracts_v_param_from_anywhere_in_the_query() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?feature=shared&v=abc123"),
            Some("abc123")
        );
    }

    #[test]
    fn rejects_non_video_urls() {
        assert_eq!(extract_video_id("https://example.com/notyoutube"), None);
        assert_eq!(extract_video_id("not a url at all"), None);
        assert_eq!(extract_video_id(""), None);
    }
}
