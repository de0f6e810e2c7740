//! Destination filename derivation.

/// Returns the final `/`-delimited segment of `url`.
///
/// No percent-decoding or sanitizing is applied. A URL without any `/` is
/// returned whole; a URL ending in `/` yields an empty string.
#[must_use]
pub fn filename_from_url(url: &str) -> &str {
    url.rsplit_once('/').map_or(url, |(_, last)| last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_from_url_last_segment() {
        assert_eq!(
            filename_from_url("https://example.test/ex3/song-01.mp3"),
            "song-01.mp3"
        );
    }

    #[test]
    fn test_filename_from_url_without_separator_is_whole_url() {
        assert_eq!(filename_from_url("song-01.mp3"), "song-01.mp3");
    }

    #[test]
    fn test_filename_from_url_keeps_percent_encoding() {
        assert_eq!(
            filename_from_url("https://example.test/ex1/Dragon%20Song.mp3"),
            "Dragon%20Song.mp3"
        );
    }

    #[test]
    fn test_filename_from_url_trailing_slash_is_empty() {
        assert_eq!(filename_from_url("https://example.test/ex3/"), "");
    }
}
