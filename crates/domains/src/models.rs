//! # Domain Models
//!
//! These structs represent the core entities of the posts board.
//! Posts are identified by a store-assigned integer id; ordering by id is
//! ordering by creation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned post identifier. Higher ids are newer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub i64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PostId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(PostId)
    }
}

/// The already-authenticated identifier of the requester.
///
/// Supplied by the upstream authenticator and trusted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Cookie-carried continuity marker of the form `originalId_digest`.
///
/// Parsing only checks the shape. Whether the digest actually belongs to a
/// given caller is decided by the tracking identity manager in `services`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TrackingId {
    original_id: u64,
    digest: String,
}

/// Returned when a raw cookie value is not shaped like a tracking id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MalformedTrackingId;

impl fmt::Display for MalformedTrackingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("malformed tracking id")
    }
}

impl std::error::Error for MalformedTrackingId {}

impl TrackingId {
    pub fn new(original_id: u64, digest: impl Into<String>) -> Self {
        Self {
            original_id,
            digest: digest.into(),
        }
    }

    pub fn original_id(&self) -> u64 {
        self.original_id
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Splits `raw` into its id and digest halves.
    ///
    /// The id must be canonical decimal (no sign, no leading zeros) so that a
    /// tracking id has exactly one textual form. The digest must be non-empty
    /// lowercase hex.
    pub fn parse(raw: &str) -> Result<Self, MalformedTrackingId> {
        let (id, digest) = raw.split_once('_').ok_or(MalformedTrackingId)?;

        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MalformedTrackingId);
        }
        if id.len() > 1 && id.starts_with('0') {
            return Err(MalformedTrackingId);
        }
        let original_id: u64 = id.parse().map_err(|_| MalformedTrackingId)?;

        let is_lower_hex = |b: u8| b.is_ascii_digit() || (b'a'..=b'f').contains(&b);
        if digest.is_empty() || digest.len() % 2 != 0 || !digest.bytes().all(is_lower_hex) {
            return Err(MalformedTrackingId);
        }

        Ok(Self::new(original_id, digest))
    }
}

impl fmt::Display for TrackingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.original_id, self.digest)
    }
}

impl FromStr for TrackingId {
    type Err = MalformedTrackingId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<TrackingId> for String {
    fn from(id: TrackingId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for TrackingId {
    type Error = MalformedTrackingId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

/// Single-use anti-replay value handed out with every list view.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OneTimeToken(String);

impl OneTimeToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, presented: &str) -> bool {
        !presented.is_empty() && self.0 == presented
    }
}

// Tokens stay out of logs.
impl fmt::Debug for OneTimeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OneTimeToken(..)")
    }
}

/// The fundamental unit of conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    /// Stored verbatim; display-time normalisation happens elsewhere
    pub content: String,
    /// Tracking id of the session that created the post
    pub tracking_cookie: TrackingId,
    /// Caller identity of the author
    pub posted_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A post as submitted, before the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub content: String,
    pub tracking_cookie: TrackingId,
    pub posted_by: UserId,
}

/// Everything the rendering boundary needs to draw the list page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListView {
    pub posts: Vec<Post>,
    pub user: UserId,
    pub tracking_id: TrackingId,
    pub one_time_token: OneTimeToken,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracking_id_display_matches_parse() {
        let raw = "72057594037927935_0a1b";
        let id = TrackingId::parse(raw).unwrap();
        assert_eq!(id.original_id(), 72_057_594_037_927_935);
        assert_eq!(id.digest(), "0a1b");
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn test_tracking_id_rejects_malformed() {
        for raw in [
            "",
            "_",
            "123",
            "123_",
            "_abcd",
            "abc_abcd",
            "+12_abcd",
            "012_abcd",
            "12_ABCD",
            "12_abc",
            "12_zz",
            "99999999999999999999_abcd",
        ] {
            assert_eq!(TrackingId::parse(raw), Err(MalformedTrackingId), "{raw:?}");
        }
    }

    #[test]
    fn test_tracking_id_zero_is_canonical() {
        assert!(TrackingId::parse("0_ab").is_ok());
    }

    #[test]
    fn test_tracking_id_serializes_as_cookie_text() {
        let id = TrackingId::new(42, "beef");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"42_beef\"");
        let back: TrackingId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_one_time_token_never_matches_empty() {
        let token = OneTimeToken::new("");
        assert!(!token.matches(""));
        let token = OneTimeToken::new("ab12");
        assert!(token.matches("ab12"));
        assert!(!token.matches("ab13"));
    }

    #[test]
    fn test_one_time_token_debug_is_redacted() {
        let token = OneTimeToken::new("secretvalue");
        assert!(!format!("{token:?}").contains("secretvalue"));
    }

    #[test]
    fn test_post_id_from_form_text() {
        assert_eq!(" 17 ".parse::<PostId>().unwrap(), PostId(17));
        assert!("x".parse::<PostId>().is_err());
    }
}
