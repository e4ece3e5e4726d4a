//! Read-only collectors over the timeline and likes endpoints.
use crate::error::Result;
use std::collections::HashSet;
use sweeper_social::SocialApi;
use sweeper_social::twitter::types::{Tweet, TweetId};

/// Page through `handle`'s whole timeline, newest page first.
///
/// Each follow-up request uses one less than the oldest id seen as `max_id`,
/// so pages do not overlap and the loop ends on the first empty page. Ids
/// are still de-duplicated, and a page that contributes nothing new ends the
/// walk, so an upstream that ignores the cursor cannot loop forever.
pub async fn collect_all_posts<A>(api: &A, handle: &str, page_size: u32) -> Result<Vec<Tweet>>
where
    A: SocialApi + ?Sized,
{
    let mut posts: Vec<Tweet> = Vec::new();
    let mut seen: HashSet<TweetId> = HashSet::new();
    let mut cursor: Option<TweetId> = None;
    let mut pages = 0usize;

    loop {
        let page = api.list_user_posts(handle, cursor, page_size).await?;
        pages += 1;

        let Some(oldest) = page.iter().map(|t| t.id).min() else {
            break;
        };

        let before = posts.len();
        posts.extend(page.into_iter().filter(|t| seen.insert(t.id)));
        if posts.len() == before {
            tracing::warn!(
                handle,
                ?cursor,
                pages,
                "timeline.cursor_stalled: page held only already-seen statuses"
            );
            break;
        }

        match oldest.0.checked_sub(1) {
            Some(next) => cursor = Some(TweetId(next)),
            None => break,
        }
    }

    tracing::debug!(handle, pages, total = posts.len(), "timeline.collected");
    Ok(posts)
}

/// The latest `page_size` likes. Older likes are never looked at.
pub async fn collect_recent_likes<A>(api: &A, page_size: u32) -> Result<Vec<Tweet>>
where
    A: SocialApi + ?Sized,
{
    let likes = api.list_recent_likes(page_size).await?;
    tracing::debug!(total = likes.len(), "likes.collected");
    Ok(likes)
}
