//! Video identity and source-URL handling.

use std::sync::LazyLock;

use regex::Regex;

/// Opaque video identifier extracted from a source URL or passed bare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoId(String);

impl VideoId {
    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A loaded video: the extracted identifier plus the source URL it came
/// from. A session either has both or neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRef {
    pub id: VideoId,
    pub url: String,
}

/// Recognizes `watch?v=ID`, `youtu.be/ID` and `embed/ID` URL forms; the id
/// runs up to the next `&`, newline, `?` or `#`.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\n?#]+)")
        .expect("URL_PATTERN should be a valid regex")
});

/// Recognizes a bare 11-character video id passed directly.
static BARE_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-zA-Z0-9_-]{11})$").expect("BARE_ID_PATTERN should be a valid regex"));

/// Extract a video identifier from a URL or bare-id string.
///
/// Patterns are tried in order and the first match wins; when neither
/// matches, extraction fails and the caller drops the whole command.
pub fn extract_video_id(input: &str) -> Option<VideoId> {
    for pattern in [&*URL_PATTERN, &*BARE_ID_PATTERN] {
        if let Some(id) = pattern.captures(input).and_then(|c| c.get(1)) {
            return Some(VideoId(id.as_str().to_string()));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_watch_url() {
        // テスト項目: watch?v= 形式の URL から動画 ID を抽出できる
        // given (前提条件):
        let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

        // when (操作):
        let result = extract_video_id(url);

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_extract_from_short_url() {
        // テスト項目: youtu.be 形式の URL から動画 ID を抽出できる
        // given (前提条件):
        let url = "https://youtu.be/dQw4w9WgXcQ";

        // when (操作):
        let result = extract_video_id(url);

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_extract_from_embed_url() {
        // テスト項目: embed 形式の URL から動画 ID を抽出できる
        // given (前提条件):
        let url = "https://www.youtube.com/embed/dQw4w9WgXcQ";

        // when (操作):
        let result = extract_video_id(url);

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_extract_from_bare_id() {
        // テスト項目: 11 文字の動画 ID をそのまま渡しても抽出できる
        // given (前提条件):
        let input = "dQw4w9WgXcQ";

        // when (操作):
        let result = extract_video_id(input);

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_extract_stops_at_query_separator() {
        // テスト項目: ID の後に続くクエリパラメータが ID に含まれない
        // given (前提条件):
        let with_params = "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s";
        let with_si = "https://youtu.be/dQw4w9WgXcQ?si=abcdef";
        let with_fragment = "https://www.youtube.com/embed/dQw4w9WgXcQ#start";

        // when (操作):
        // then (期待する結果):
        assert_eq!(extract_video_id(with_params).unwrap().as_str(), "dQw4w9WgXcQ");
        assert_eq!(extract_video_id(with_si).unwrap().as_str(), "dQw4w9WgXcQ");
        assert_eq!(extract_video_id(with_fragment).unwrap().as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_extract_fails_for_non_url_input() {
        // テスト項目: URL でも動画 ID でもない入力では抽出が失敗する
        // given (前提条件):
        let input = "not a url";

        // when (操作):
        let result = extract_video_id(input);

        // then (期待する結果):
        assert!(result.is_none());
    }

    #[test]
    fn test_extract_fails_for_wrong_length_bare_id() {
        // テスト項目: 11 文字以外の素の文字列では抽出が失敗する
        // given (前提条件):
        let too_short = "dQw4w9WgXc";
        let too_long = "dQw4w9WgXcQQ";

        // when (操作):
        // then (期待する結果):
        assert!(extract_video_id(too_short).is_none());
        assert!(extract_video_id(too_long).is_none());
    }
}
