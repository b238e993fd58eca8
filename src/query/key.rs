//! Cache keys and staleness tiers.

use std::fmt;
use std::time::Duration;

use crate::context::LoggedUser;

/// User identity segment used for signed-out requests.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Kind of request a cache entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKey {
    PublicSquadRequests,
    SquadPostRequests,
    Feeds,
    FeedPreview,
}

impl RequestKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKey::PublicSquadRequests => "public_squad_requests",
            RequestKey::SquadPostRequests => "squad_post_requests",
            RequestKey::Feeds => "feeds",
            RequestKey::FeedPreview => "feed_preview",
        }
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured cache key: `[kind, user, ...params]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Request kind segment.
    pub fn kind(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

/// Build the cache key for `kind` scoped to `user` and extra `params`.
pub fn generate_query_key(kind: RequestKey, user: Option<&LoggedUser>, params: &[&str]) -> QueryKey {
    let mut segments = Vec::with_capacity(2 + params.len());
    segments.push(kind.as_str().to_string());
    segments.push(
        user.map(|u| u.id.clone())
            .unwrap_or_else(|| ANONYMOUS_USER.to_string()),
    );
    segments.extend(params.iter().map(|p| p.to_string()));
    QueryKey(segments)
}

/// Named staleness windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleTime {
    Default,
    OneHour,
}

impl StaleTime {
    pub fn duration(&self) -> Duration {
        match self {
            StaleTime::Default => Duration::from_secs(60),
            StaleTime::OneHour => Duration::from_secs(60 * 60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_includes_user_and_params() {
        let user = LoggedUser::new("u1");
        let key = generate_query_key(RequestKey::SquadPostRequests, Some(&user), &["squad-9"]);

        assert_eq!(key.segments(), &["squad_post_requests", "u1", "squad-9"]);
        assert_eq!(key.kind(), Some("squad_post_requests"));
        assert_eq!(key.to_string(), "[squad_post_requests, u1, squad-9]");
    }

    #[test]
    fn test_key_for_anonymous_user() {
        let key = generate_query_key(RequestKey::Feeds, None, &[]);
        assert_eq!(key.segments(), &["feeds", ANONYMOUS_USER]);
    }

    #[test]
    fn test_keys_differ_per_user() {
        let a = generate_query_key(RequestKey::Feeds, Some(&LoggedUser::new("a")), &[]);
        let b = generate_query_key(RequestKey::Feeds, Some(&LoggedUser::new("b")), &[]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_stale_tiers() {
        assert!(StaleTime::Default.duration() < StaleTime::OneHour.duration());
        assert_eq!(StaleTime::OneHour.duration(), Duration::from_secs(3600));
    }
}
