use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric status id. Serialized as a bare JSON number (v1.1 `id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TweetId(pub u64);

impl fmt::Display for TweetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TweetId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(TweetId)
    }
}

impl From<u64> for TweetId {
    fn from(v: u64) -> Self {
        TweetId(v)
    }
}

/// Followed account id, requested with `stringify_ids=true`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A status as returned by the timeline, favorites and destroy endpoints.
///
/// For likes this is the liked status, so `created_at` is when that status
/// was posted, not when it was liked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tweet {
    pub id: TweetId,
    /// `Www Mmm DD HH:MM:SS +ZZZZ YYYY`, e.g. `Wed Oct 10 20:19:24 +0000 2018`.
    pub created_at: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub full_text: Option<String>,
}

impl Tweet {
    pub fn body(&self) -> &str {
        self.full_text
            .as_deref()
            .or(self.text.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendIds {
    pub ids: Vec<AccountId>,
    #[serde(default)]
    pub next_cursor_str: Option<String>,
}

impl FriendIds {
    pub fn has_more(&self) -> bool {
        self.next_cursor_str
            .as_deref()
            .is_some_and(|c| !c.is_empty() && c != "0")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendshipUpdate {
    pub relationship: Relationship,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub source: RelationshipSide,
    #[serde(default)]
    pub target: RelationshipSide,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationshipSide {
    #[serde(default)]
    pub id_str: Option<String>,
    #[serde(default)]
    pub screen_name: Option<String>,
    #[serde(default)]
    pub want_retweets: Option<bool>,
}
