//! Age and allowlist policy deciding which statuses are deleted.
//!
//! A status is deletable iff its id is not allowlisted and its `created_at`
//! is strictly before the cutoff. The cutoff is computed once per run.
use crate::error::{Result, SweepError};
use std::collections::HashSet;
use sweeper_social::twitter::types::{Tweet, TweetId};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Duration, OffsetDateTime};

/// Upstream `created_at` layout, e.g. `Wed Oct 10 20:19:24 +0000 2018`.
pub const CREATED_AT_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[weekday repr:short] [month repr:short] [day] [hour]:[minute]:[second] [offset_hour sign:mandatory][offset_minute] [year]"
);

/// Status ids that are never deleted, whatever their age.
pub const KEEP_FOREVER: &[u64] = &[];

pub fn parse_created_at(raw: &str) -> std::result::Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(raw.trim(), CREATED_AT_FORMAT)
}

pub fn format_created_at(at: OffsetDateTime) -> std::result::Result<String, time::error::Format> {
    at.format(CREATED_AT_FORMAT)
}

/// Frozen cutoff instant; anything created strictly before it has expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionWindow {
    cutoff: OffsetDateTime,
}

impl RetentionWindow {
    pub fn ending_at(now: OffsetDateTime, days: i64) -> Self {
        Self {
            cutoff: now - Duration::days(days),
        }
    }

    pub fn cutoff(&self) -> OffsetDateTime {
        self.cutoff
    }

    pub fn has_expired(&self, created_at: OffsetDateTime) -> bool {
        created_at < self.cutoff
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allowlist {
    ids: HashSet<TweetId>,
}

impl Allowlist {
    /// The compiled-in [`KEEP_FOREVER`] set.
    pub fn builtin() -> Self {
        KEEP_FOREVER.iter().copied().collect()
    }

    pub fn extend(mut self, extra: impl IntoIterator<Item = u64>) -> Self {
        self.ids.extend(extra.into_iter().map(TweetId));
        self
    }

    pub fn contains(&self, id: TweetId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<u64> for Allowlist {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(TweetId).collect(),
        }
    }
}

/// Select the statuses to delete, preserving input order.
///
/// Every timestamp is parsed, allowlisted or not; one bad timestamp fails the
/// whole selection.
pub fn filter_deletable<'a>(
    items: &'a [Tweet],
    allowlist: &Allowlist,
    window: &RetentionWindow,
) -> Result<Vec<&'a Tweet>> {
    let mut deletable = Vec::new();
    for item in items {
        let created_at =
            parse_created_at(&item.created_at).map_err(|source| SweepError::Timestamp {
                id: item.id,
                raw: item.created_at.clone(),
                source,
            })?;
        if !allowlist.contains(item.id) && window.has_expired(created_at) {
            deletable.push(item);
        }
    }
    Ok(deletable)
}
