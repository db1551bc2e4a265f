//! Product media attachments.

use crate::error::CommerceError;
use serde::{Deserialize, Serialize};

/// The video shown on a product page.
///
/// A product has either an uploaded video file, an external video link, or
/// nothing; never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "url", rename_all = "snake_case")]
pub enum VideoMedia {
    /// No video.
    #[default]
    None,
    /// A file uploaded through file storage.
    Uploaded(String),
    /// An external (YouTube) link.
    External(String),
}

impl VideoMedia {
    /// Build an external video after checking it is a YouTube link.
    pub fn external(url: &str) -> Result<Self, CommerceError> {
        let url = url.trim();
        if !is_youtube_url(url) {
            return Err(CommerceError::validation(
                "video_url",
                format!("'{}' is not a YouTube URL", url),
            ));
        }
        Ok(VideoMedia::External(url.to_string()))
    }

    /// The video location, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            VideoMedia::None => None,
            VideoMedia::Uploaded(url) | VideoMedia::External(url) => Some(url),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, VideoMedia::None)
    }

    pub fn is_uploaded(&self) -> bool {
        matches!(self, VideoMedia::Uploaded(_))
    }

    pub fn is_external(&self) -> bool {
        matches!(self, VideoMedia::External(_))
    }
}

/// A downloadable document attached to a product (datasheet, manual).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDocument {
    /// Display name.
    pub name: String,
    /// Retrieval URL returned by file storage.
    pub url: String,
}

/// Check for `[http[s]://][www.]youtube.com/...` or `youtu.be/...`.
pub fn is_youtube_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);

    ["youtube.com/", "youtu.be/"]
        .iter()
        .any(|host| rest.strip_prefix(host).is_some_and(|path| !path.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_youtube_urls() {
        assert!(is_youtube_url("https://www.youtube.com/watch?v=abc"));
        assert!(is_youtube_url("http://youtu.be/abc"));
        assert!(is_youtube_url("youtube.com/embed/xyz"));
        assert!(!is_youtube_url("https://vimeo.com/123"));
        assert!(!is_youtube_url("https://youtube.com/"));
        assert!(!is_youtube_url("https://notyoutube.com/watch"));
    }

    #[test]
    fn test_external_video_validation() {
        let video = VideoMedia::external(" https://youtu.be/abc ").unwrap();
        assert_eq!(video.url(), Some("https://youtu.be/abc"));
        assert!(video.is_external());

        assert!(VideoMedia::external("ftp://example.com/clip").is_err());
    }

    #[test]
    fn test_video_serialization_is_tagged() {
        let json = serde_json::to_value(VideoMedia::Uploaded("/uploads/a.mp4".into())).unwrap();
        assert_eq!(json["kind"], "uploaded");
        assert_eq!(json["url"], "/uploads/a.mp4");

        let none: VideoMedia = serde_json::from_value(serde_json::json!({"kind": "none"})).unwrap();
        assert!(none.is_none());
    }
}
