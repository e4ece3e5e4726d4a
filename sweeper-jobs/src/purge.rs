//! Deleting expired statuses and likes.
//!
//! Deletion is a tolerant batch: each failure is logged and skipped, and the
//! phase reports how many deletions went through.
use crate::batch::run_batch;
use crate::collect::{collect_all_posts, collect_recent_likes};
use crate::error::Result;
use crate::retention::filter_deletable;
use crate::JobConfig;
use sweeper_social::twitter::types::Tweet;
use sweeper_social::SocialApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Post,
    Like,
}

impl Target {
    pub fn label(self) -> &'static str {
        match self {
            Target::Post => "tweet",
            Target::Like => "like",
        }
    }
}

/// Outcome of one purge phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeReport {
    pub fetched: usize,
    pub deletable: usize,
    pub deleted: usize,
}

/// Issue one delete per item concurrently; returns how many succeeded.
pub async fn delete_all<A>(api: &A, target: Target, items: &[&Tweet]) -> usize
where
    A: SocialApi + ?Sized,
{
    let report = run_batch(items.iter().map(|t| t.id), |id| async move {
        let outcome = match target {
            Target::Post => api.delete_post(id).await,
            Target::Like => api.delete_like(id).await,
        };
        match &outcome {
            Ok(deleted) => tracing::info!(
                kind = target.label(),
                %id,
                created_at = %deleted.created_at,
                text = %deleted.body(),
                "deleted {}",
                target.label()
            ),
            Err(err) => tracing::error!(
                kind = target.label(),
                %id,
                error = %err,
                "failed to delete {}",
                target.label()
            ),
        }
        outcome
    })
    .await;

    let (deleted, failures) = report.into_tolerant();
    if !failures.is_empty() {
        tracing::warn!(
            kind = target.label(),
            deleted,
            failed = failures.len(),
            "some deletions failed"
        );
    }
    deleted
}

pub async fn purge_posts<A>(api: &A, cfg: &JobConfig) -> Result<PurgeReport>
where
    A: SocialApi + ?Sized,
{
    tracing::info!("Deleting tweets...");
    let posts = collect_all_posts(api, &cfg.handle, cfg.page_size).await?;
    let deletable = filter_deletable(&posts, &cfg.allowlist, &cfg.window)?;
    let deleted = delete_all(api, Target::Post, &deletable).await;

    tracing::info!(
        deleted,
        total = posts.len(),
        "Deleted {} tweets out of {} total tweets",
        deleted,
        posts.len()
    );
    Ok(PurgeReport {
        fetched: posts.len(),
        deletable: deletable.len(),
        deleted,
    })
}

/// Only the latest page of likes is considered. Allowlisted ids are kept here
/// as well, not just among the user's own statuses.
pub async fn purge_likes<A>(api: &A, cfg: &JobConfig) -> Result<PurgeReport>
where
    A: SocialApi + ?Sized,
{
    tracing::info!("Deleting likes...");
    let likes = collect_recent_likes(api, cfg.page_size).await?;
    let deletable = filter_deletable(&likes, &cfg.allowlist, &cfg.window)?;
    let deleted = delete_all(api, Target::Like, &deletable).await;

    tracing::info!(
        deleted,
        total = likes.len(),
        "Deleted {} likes out of {} total likes",
        deleted,
        likes.len()
    );
    Ok(PurgeReport {
        fetched: likes.len(),
        deletable: deletable.len(),
        deleted,
    })
}
