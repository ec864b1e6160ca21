//! Premium gating decision.

use std::borrow::Cow;

use super::session::SessionState;
use crate::domains::catalog::ToolRecord;

/// Where callers without access to a premium tool are sent.
pub const PREMIUM_REQUIRED_PATH: &str = "/premium-required";

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Redirect(&'static str),
}

/// Decide whether `session` may request `path`.
///
/// Admin and auth routes, admin sessions and the home page always pass.
/// Otherwise the first path segment is matched against tool slugs; a
/// premium tool needs a logged-in premium session. Paths that match no
/// tool pass through.
///
/// The segment is percent-decoded and compared ignoring case, the same way
/// the router resolves it.
pub fn check_access(path: &str, session: &SessionState, tools: &[ToolRecord]) -> AccessDecision {
    let path = path.trim_start_matches('/');
    let raw = path.split('/').next().unwrap_or_default();
    let first = urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw));

    if first.eq_ignore_ascii_case("admin") || first.eq_ignore_ascii_case("auth") || session.admin {
        return AccessDecision::Allow;
    }

    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("home")
        || trimmed.eq_ignore_ascii_case("home/index")
    {
        return AccessDecision::Allow;
    }

    let Some(tool) = tools.iter().find(|t| t.slug.eq_ignore_ascii_case(&first)) else {
        return AccessDecision::Allow;
    };

    if tool.premium_required && !session.is_premium_user() {
        return AccessDecision::Redirect(PREMIUM_REQUIRED_PATH);
    }

    AccessDecision::Allow
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, name: &str, slug: &str, premium_required: bool) -> ToolRecord {
        ToolRecord {
            id,
            name: name.to_string(),
            slug: slug.to_string(),
            description: "d".to_string(),
            enabled: true,
            premium_required,
            category: "Crypto".to_string(),
            file_name: None,
        }
    }

    fn tools() -> Vec<ToolRecord> {
        vec![
            record(1, "Hash Text", "hash-text", false),
            record(2, "Token Generator", "token-generator", true),
        ]
    }

    fn session(user: Option<&str>, premium: bool, admin: bool) -> SessionState {
        SessionState {
            user_id: user.map(str::to_string),
            premium,
            admin,
        }
    }

    #[test]
    fn test_decision_table() {
        let redirect = AccessDecision::Redirect(PREMIUM_REQUIRED_PATH);
        let cases = [
            // path, session, expected
            ("/token-generator", session(None, false, false), redirect),
            ("/token-generator", session(Some("1"), false, false), redirect),
            ("/token-generator", session(None, true, false), redirect),
            ("/token-generator", session(Some("1"), true, false), AccessDecision::Allow),
            ("/token-generator/execute", session(Some("1"), false, false), redirect),
            ("/token-generator", session(None, false, true), AccessDecision::Allow),
            ("/Token-Generator", session(Some("1"), false, false), redirect),
            ("/token%2Dgenerator/execute", session(Some("1"), false, false), redirect),
            ("/token%2dgenerator", session(None, false, false), redirect),
            ("/%74oken-generator", session(Some("1"), true, false), AccessDecision::Allow),
            ("/hash-text", session(None, false, false), AccessDecision::Allow),
            ("/unknown-tool", session(None, false, false), AccessDecision::Allow),
            ("/", session(None, false, false), AccessDecision::Allow),
            ("/Home", session(None, false, false), AccessDecision::Allow),
            ("/home/index", session(None, false, false), AccessDecision::Allow),
            ("/admin/tools", session(None, false, false), AccessDecision::Allow),
            ("/Auth/login", session(None, false, false), AccessDecision::Allow),
        ];

        for (path, session, expected) in cases {
            assert_eq!(
                check_access(path, &session, &tools()),
                expected,
                "path {path} with {session:?}"
            );
        }
    }

    #[test]
    fn test_undecodable_segment_is_matched_raw() {
        // %FF is not UTF-8; the raw segment matches no slug.
        assert_eq!(
            check_access("/token-generator%FF", &SessionState::default(), &tools()),
            AccessDecision::Allow
        );
    }

    #[test]
    fn test_no_records_fails_open() {
        assert_eq!(
            check_access("/token-generator", &SessionState::default(), &[]),
            AccessDecision::Allow
        );
    }
}
