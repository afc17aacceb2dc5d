//! Shared libcurl handle setup and response-header parsing.
//!
//! Both the release feed and the executable download go through a plain
//! curl easy handle: redirects followed, launcher user-agent set, no timeouts.

use crate::error::LaunchError;
use curl::easy::Easy;

/// Maximum redirects followed (GitHub's `latest/download` hops through a CDN).
const MAX_REDIRECTS: u32 = 10;

/// Build a GET handle for `url` carrying `user_agent`.
pub(crate) fn get_handle(url: &str, user_agent: &str) -> Result<Easy, LaunchError> {
    let mut easy = Easy::new();
    easy.url(url)
        .map_err(|e| LaunchError::transport(format!("invalid URL {}", url), e))?;
    easy.useragent(user_agent)
        .map_err(|e| LaunchError::transport("set user-agent", e))?;
    easy.follow_location(true)
        .map_err(|e| LaunchError::transport("enable redirects", e))?;
    easy.max_redirections(MAX_REDIRECTS)
        .map_err(|e| LaunchError::transport("set redirect limit", e))?;
    Ok(easy)
}

/// Key headers of the final response of a transfer.
///
/// Curl hands every header line of every hop to the header callback; a new
/// status line starts a new response, so earlier redirect headers are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    /// Status code from the latest status line.
    pub status: Option<u32>,
    /// Declared body size, if `Content-Length` is present and numeric.
    pub content_length: Option<u64>,
}

impl ResponseHeaders {
    /// Feed one raw header line (as delivered by curl).
    pub fn push_line(&mut self, raw: &[u8]) {
        let Ok(line) = std::str::from_utf8(raw) else {
            return;
        };
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        if line.starts_with("HTTP/") {
            *self = ResponseHeaders {
                status: line
                    .split_whitespace()
                    .nth(1)
                    .and_then(|code| code.parse().ok()),
                content_length: None,
            };
            return;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                self.content_length = value.trim().parse::<u64>().ok();
            }
        }
    }

    /// Total size to report progress against; 0 when unknown.
    pub fn total_size(&self) -> u64 {
        self.content_length.unwrap_or(0)
    }
}

pub(crate) fn is_success(code: u32) -> bool {
    (200..300).contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Parse collected header lines into ResponseHeaders.
    fn parse_headers<S: AsRef<str>>(lines: &[S]) -> ResponseHeaders {
        let mut headers = ResponseHeaders::default();
        for line in lines {
            headers.push_line(line.as_ref().as_bytes());
        }
        headers
    }

    #[test]
    fn parse_headers_content_length() {
        let r = parse_headers(&["HTTP/1.1 200 OK", "Content-Length: 12345", "Accept-Ranges: bytes"]);
        assert_eq!(r.status, Some(200));
        assert_eq!(r.content_length, Some(12345));
        assert_eq!(r.total_size(), 12345);
    }

    #[test]
    fn parse_headers_redirect_hop_is_discarded() {
        let r = parse_headers(&[
            "HTTP/1.1 302 Found",
            "Location: https://objects.example.com/zed.exe",
            "Content-Length: 0",
            "",
            "HTTP/2 200",
            "content-type: application/octet-stream",
        ]);
        assert_eq!(r.status, Some(200));
        assert_eq!(r.content_length, None);
        assert_eq!(r.total_size(), 0);
    }

    #[test]
    fn parse_headers_case_insensitive_and_garbage_length() {
        let r = parse_headers(&["HTTP/1.1 200 OK", "CONTENT-LENGTH: 77"]);
        assert_eq!(r.content_length, Some(77));
        let r = parse_headers(&["HTTP/1.1 200 OK", "Content-Length: lots"]);
        assert_eq!(r.content_length, None);
    }

    #[test]
    fn success_range() {
        assert!(is_success(200));
        assert!(is_success(204));
        assert!(!is_success(302));
        assert!(!is_success(404));
    }
}
