//! Guard in front of the static video directory.

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Answers 404 for any dot-prefixed path segment, which covers the upload
/// staging directory.
pub async fn hide_hidden_paths(request: Request, next: Next) -> Response {
    if is_hidden_path(request.uri().path()) {
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(request).await
}

/// Whether any segment of a raw request path starts with `.`, literal or
/// percent-encoded.
pub fn is_hidden_path(path: &str) -> bool {
    path.split('/').any(|segment| {
        segment.starts_with('.')
            || segment
                .get(..3)
                .is_some_and(|head| head.eq_ignore_ascii_case("%2e"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_segments() {
        assert!(is_hidden_path("/.incoming/1-a.mp4.part"));
        assert!(is_hidden_path("/%2Eincoming/1-a.mp4.part"));
        assert!(is_hidden_path("/%2eincoming/x"));
        assert!(is_hidden_path("/.."));
    }

    #[test]
    fn test_stored_names_visible() {
        assert!(!is_hidden_path("/1700000000000-intro.mp4"));
        assert!(!is_hidden_path("/"));
        assert!(!is_hidden_path("/a.b.mp4"));
    }
}
