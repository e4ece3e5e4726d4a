//! The sweep job: purge old statuses and likes, then mute retweets from follows.
//!
//! A run is three sequential phases against one [`SocialApi`]:
//!
//! 1. [`purge::purge_posts`]: page through the whole timeline, keep what is
//!    allowlisted or newer than the cutoff, delete the rest (tolerant batch).
//! 2. [`purge::purge_likes`]: same policy over the latest page of likes only.
//! 3. [`retweets::disable_retweets_for_all_followed`]: turn retweets off for
//!    every followed account (strict batch).
//!
//! [`run::run`] is the entry point. It never fails: whatever a phase raises is
//! logged at error level and the run ends there.
//!
//! ```no_run
//! # async fn demo(api: &dyn sweeper_social::SocialApi) {
//! use sweeper_jobs::{JobConfig, retention::Allowlist};
//!
//! let cfg = JobConfig::new("sweeper_bot", Allowlist::builtin());
//! let _summary = sweeper_jobs::run::run(api, &cfg).await;
//! # }
//! ```
pub mod batch;
pub mod collect;
pub mod error;
pub mod purge;
pub mod retention;
pub mod retweets;
pub mod run;

pub use error::{Result, SweepError};
pub use sweeper_social::SocialApi;

use retention::{Allowlist, RetentionWindow};
use time::OffsetDateTime;

/// Largest page the listing endpoints accept.
pub const PAGE_SIZE: u32 = 200;
/// Statuses and likes older than this many days are removed.
pub const RETENTION_DAYS: i64 = 14;

/// Everything a run needs besides the API client. Built once per invocation.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub handle: String,
    pub page_size: u32,
    pub window: RetentionWindow,
    pub allowlist: Allowlist,
}

impl JobConfig {
    /// Freeze the retention cutoff at the current instant.
    pub fn new(handle: impl Into<String>, allowlist: Allowlist) -> Self {
        Self::at(handle, OffsetDateTime::now_utc(), allowlist)
    }

    /// Same as [`JobConfig::new`] with an explicit "now".
    pub fn at(handle: impl Into<String>, now: OffsetDateTime, allowlist: Allowlist) -> Self {
        Self {
            handle: handle.into(),
            page_size: PAGE_SIZE,
            window: RetentionWindow::ending_at(now, RETENTION_DAYS),
            allowlist,
        }
    }
}
