//! Session state supplied by the fronting auth layer.
//!
//! Login and cookie handling live outside this server. The auth proxy in
//! front of it forwards the session as request headers, which are trusted
//! as-is. The premium gate middleware adds what the catalog knows about the
//! user and leaves the result in the request extensions.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::core::config::parse_flag;

/// Header carrying the logged-in user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the premium flag.
pub const PREMIUM_HEADER: &str = "x-user-premium";

/// Header carrying the admin flag.
pub const ADMIN_HEADER: &str = "x-user-admin";

/// The caller's session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user_id: Option<String>,
    pub premium: bool,
    pub admin: bool,
}

impl SessionState {
    /// Read the session from request headers. Missing or malformed headers
    /// leave the corresponding field unset.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let text = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };
        let flag = |name: &str| text(name).and_then(parse_flag).unwrap_or(false);

        Self {
            user_id: text(USER_ID_HEADER).map(str::to_string),
            premium: flag(PREMIUM_HEADER),
            admin: flag(ADMIN_HEADER),
        }
    }

    /// The session left by the middleware, or the headers if none ran.
    pub fn from_parts(parts: &Parts) -> Self {
        parts
            .extensions
            .get::<SessionState>()
            .cloned()
            .unwrap_or_else(|| Self::from_headers(&parts.headers))
    }

    pub fn is_logged_in(&self) -> bool {
        self.user_id.is_some()
    }

    /// Logged in with the premium flag.
    pub fn is_premium_user(&self) -> bool {
        self.is_logged_in() && self.premium
    }
}

impl<S> FromRequestParts<S> for SessionState
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("42"));
        headers.insert(PREMIUM_HEADER, HeaderValue::from_static("true"));
        headers.insert(ADMIN_HEADER, HeaderValue::from_static("0"));

        let session = SessionState::from_headers(&headers);
        assert_eq!(session.user_id.as_deref(), Some("42"));
        assert!(session.is_premium_user());
        assert!(!session.admin);
    }

    #[test]
    fn test_anonymous_and_malformed() {
        assert_eq!(SessionState::from_headers(&HeaderMap::new()), SessionState::default());

        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("  "));
        headers.insert(PREMIUM_HEADER, HeaderValue::from_static("maybe"));
        let session = SessionState::from_headers(&headers);
        assert!(!session.is_logged_in());
        assert!(!session.premium);
    }

    #[test]
    fn test_extension_wins_over_headers() {
        let (mut parts, _) = axum::http::Request::builder()
            .header(USER_ID_HEADER, "42")
            .body(())
            .unwrap()
            .into_parts();
        assert!(!SessionState::from_parts(&parts).premium);

        parts.extensions.insert(SessionState {
            user_id: Some("42".into()),
            premium: true,
            admin: false,
        });
        assert!(SessionState::from_parts(&parts).is_premium_user());
    }

    #[test]
    fn test_premium_needs_login() {
        let session = SessionState {
            user_id: None,
            premium: true,
            admin: false,
        };
        assert!(!session.is_premium_user());
    }
}
