use axum::http::{header::AUTHORIZATION, HeaderMap};

/// Accepts `x-api-key: <token>` or `Authorization: Bearer <token>`.
/// With no token configured every request is let through.
pub fn is_authorized(headers: &HeaderMap, token: Option<&str>) -> bool {
    let Some(token) = token else {
        return true;
    };
    if let Some(v) = headers.get("x-api-key") {
        if v.to_str().ok() == Some(token) {
            return true;
        }
    }
    if let Some(v) = headers.get(AUTHORIZATION) {
        if let Ok(s) = v.to_str() {
            if s.strip_prefix("Bearer ") == Some(token) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn open_when_no_token_configured() {
        assert!(is_authorized(&HeaderMap::new(), None));
    }

    #[test]
    fn accepts_api_key_or_bearer() {
        let mut headers = HeaderMap::new();
        assert!(!is_authorized(&headers, Some("s3cret")));

        headers.insert("x-api-key", HeaderValue::from_static("s3cret"));
        assert!(is_authorized(&headers, Some("s3cret")));

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer s3cret"));
        assert!(is_authorized(&headers, Some("s3cret")));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer wrong"));
        assert!(!is_authorized(&headers, Some("s3cret")));
    }
}
