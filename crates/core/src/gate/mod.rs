//! Route access gate.
//!
//! A stateless predicate evaluated once per inbound request: administrative
//! paths require a present session, everything else passes through. The
//! matcher is configuration, not logic: exactly one path-template pattern
//! (default `/:institution/(admin)/:path*`) decides which paths are gated.
//!
//! The gate checks presence-of-session only. Whether the session's
//! institution matches the institution named by the path's slug segment is
//! a handler-layer concern.

use flutr_shared::Claims;
use thiserror::Error;

/// Errors produced while parsing a gate path template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    /// The pattern was empty.
    #[error("gate pattern must not be empty")]
    Empty,

    /// A `:name` or `:name*` segment had no name.
    #[error("pattern segment '{0}' has no name")]
    UnnamedSegment(String),

    /// A `(group)` segment had no content.
    #[error("pattern group segment is empty")]
    EmptyGroup,

    /// A wildcard segment appeared before the end of the pattern.
    #[error("wildcard segment must be the last segment")]
    WildcardNotLast,
}

/// One segment of a parsed path template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Plain literal text.
    Literal(String),
    /// Parenthesized group; matches its literal text.
    Group(String),
    /// Named single-segment parameter (`:institution`).
    Param(String),
    /// Named multi-segment wildcard (`:path*`); matches zero or more
    /// trailing segments.
    Wildcard(String),
}

/// A compiled path-template matcher.
#[derive(Debug, Clone)]
pub struct RouteMatcher {
    segments: Vec<Segment>,
}

impl RouteMatcher {
    /// Compiles a path template.
    ///
    /// Supported segment forms: literal text, `(literal)` groups, `:name`
    /// single-segment parameters, and one trailing `:name*` wildcard.
    ///
    /// # Errors
    ///
    /// Returns a `PatternError` if the template is empty or structurally
    /// invalid.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let trimmed = pattern.trim().trim_start_matches('/');
        if trimmed.is_empty() {
            return Err(PatternError::Empty);
        }

        let mut segments = Vec::new();
        let raw: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
        let last = raw.len().saturating_sub(1);

        for (i, part) in raw.iter().enumerate() {
            let segment = if let Some(name) = part.strip_prefix(':') {
                if let Some(name) = name.strip_suffix('*') {
                    if name.is_empty() {
                        return Err(PatternError::UnnamedSegment((*part).to_string()));
                    }
                    if i != last {
                        return Err(PatternError::WildcardNotLast);
                    }
                    Segment::Wildcard(name.to_string())
                } else if name.is_empty() {
                    return Err(PatternError::UnnamedSegment((*part).to_string()));
                } else {
                    Segment::Param(name.to_string())
                }
            } else if let Some(inner) = part.strip_prefix('(').and_then(|p| p.strip_suffix(')')) {
                if inner.is_empty() {
                    return Err(PatternError::EmptyGroup);
                }
                Segment::Group(inner.to_string())
            } else {
                Segment::Literal((*part).to_string())
            };
            segments.push(segment);
        }

        Ok(Self { segments })
    }

    /// Returns true if the request path matches the template.
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut idx = 0;

        for segment in &self.segments {
            match segment {
                Segment::Wildcard(_) => return true,
                Segment::Param(_) => {
                    if idx >= parts.len() {
                        return false;
                    }
                    idx += 1;
                }
                Segment::Literal(text) | Segment::Group(text) => {
                    if idx >= parts.len() || parts[idx] != text {
                        return false;
                    }
                    idx += 1;
                }
            }
        }

        idx == parts.len()
    }
}

/// Decision produced by the gate for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// The request may be served.
    Allow,
    /// The path requires a session and none is present; redirect to login.
    Redirect,
}

/// The route access gate: one matcher plus the login redirect target.
#[derive(Debug, Clone)]
pub struct RouteGate {
    matcher: RouteMatcher,
    login_path: String,
}

impl RouteGate {
    /// Builds the gate from its configured pattern and login path.
    ///
    /// # Errors
    ///
    /// Returns a `PatternError` if the pattern does not compile.
    pub fn new(pattern: &str, login_path: &str) -> Result<Self, PatternError> {
        Ok(Self {
            matcher: RouteMatcher::new(pattern)?,
            login_path: login_path.to_string(),
        })
    }

    /// Evaluates the gate for a request path and its session claims.
    ///
    /// Absent claims on a gated path yield a redirect decision, never an
    /// error: an unauthenticated visitor hitting an admin URL is a normal
    /// flow, not a failure.
    #[must_use]
    pub fn decide(&self, path: &str, claims: Option<&Claims>) -> GateDecision {
        if self.matcher.is_match(path) && claims.is_none() {
            GateDecision::Redirect
        } else {
            GateDecision::Allow
        }
    }

    /// Returns the login path unauthenticated requests are redirected to.
    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use flutr_shared::UserRole;
    use rstest::rstest;

    const ADMIN_PATTERN: &str = "/:institution/(admin)/:path*";

    fn session_claims() -> Claims {
        Claims::new(1, 1, UserRole::OrgAdmin, Utc::now() + Duration::hours(1))
    }

    #[rstest]
    #[case("/ansel/admin", true)]
    #[case("/ansel/admin/", true)]
    #[case("/ansel/admin/dashboard", true)]
    #[case("/ansel/admin/shipments/14/items", true)]
    #[case("/ansel", false)]
    #[case("/ansel/species", false)]
    #[case("/ansel/news/latest", false)]
    #[case("/login", false)]
    #[case("/", false)]
    fn test_admin_pattern_matching(#[case] path: &str, #[case] expected: bool) {
        let matcher = RouteMatcher::new(ADMIN_PATTERN).unwrap();
        assert_eq!(matcher.is_match(path), expected, "path: {path}");
    }

    #[test]
    fn test_pattern_rejects_empty() {
        assert_eq!(RouteMatcher::new("").unwrap_err(), PatternError::Empty);
        assert_eq!(RouteMatcher::new("/").unwrap_err(), PatternError::Empty);
    }

    #[test]
    fn test_pattern_rejects_unnamed_segments() {
        assert!(matches!(
            RouteMatcher::new("/:/admin").unwrap_err(),
            PatternError::UnnamedSegment(_)
        ));
        assert!(matches!(
            RouteMatcher::new("/:institution/:*").unwrap_err(),
            PatternError::UnnamedSegment(_)
        ));
    }

    #[test]
    fn test_pattern_rejects_interior_wildcard() {
        assert_eq!(
            RouteMatcher::new("/:path*/admin").unwrap_err(),
            PatternError::WildcardNotLast
        );
    }

    #[test]
    fn test_pattern_rejects_empty_group() {
        assert_eq!(
            RouteMatcher::new("/:institution/()/:path*").unwrap_err(),
            PatternError::EmptyGroup
        );
    }

    #[test]
    fn test_gate_redirects_without_session() {
        let gate = RouteGate::new(ADMIN_PATTERN, "/login").unwrap();
        assert_eq!(
            gate.decide("/ansel/admin/suppliers", None),
            GateDecision::Redirect
        );
    }

    #[test]
    fn test_gate_allows_with_session() {
        let gate = RouteGate::new(ADMIN_PATTERN, "/login").unwrap();
        let claims = session_claims();
        assert_eq!(
            gate.decide("/ansel/admin/suppliers", Some(&claims)),
            GateDecision::Allow
        );
    }

    #[test]
    fn test_gate_ignores_public_paths() {
        let gate = RouteGate::new(ADMIN_PATTERN, "/login").unwrap();
        assert_eq!(gate.decide("/ansel/species", None), GateDecision::Allow);
        assert_eq!(gate.decide("/login", None), GateDecision::Allow);
    }

    #[test]
    fn test_gate_exposes_login_path() {
        let gate = RouteGate::new(ADMIN_PATTERN, "/login").unwrap();
        assert_eq!(gate.login_path(), "/login");
    }
}
