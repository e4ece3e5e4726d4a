use crate::twitter::types::{AccountId, Relationship, Tweet, TweetId};
use async_trait::async_trait;
use sweeper_http::HttpError;

/// Remote operations the sweeper needs from a social network account.
///
/// Every method is a single request; implementations must not retry.
#[async_trait]
pub trait SocialApi: Send + Sync {
    /// One page of `handle`'s timeline, newest first. `max_id` is an
    /// inclusive upper bound on returned ids.
    async fn list_user_posts(
        &self,
        handle: &str,
        max_id: Option<TweetId>,
        count: u32,
    ) -> Result<Vec<Tweet>, HttpError>;

    /// The most recent `count` liked statuses of the authenticated user.
    async fn list_recent_likes(&self, count: u32) -> Result<Vec<Tweet>, HttpError>;

    /// Delete one of the authenticated user's statuses; returns the deleted status.
    async fn delete_post(&self, id: TweetId) -> Result<Tweet, HttpError>;

    /// Remove a like; returns the status that was un-liked.
    async fn delete_like(&self, id: TweetId) -> Result<Tweet, HttpError>;

    /// Ids of every account `handle` follows, in a single call.
    async fn list_followed_account_ids(&self, handle: &str) -> Result<Vec<AccountId>, HttpError>;

    /// Toggle whether retweets from `account` show up in the home timeline.
    async fn set_show_retweets(
        &self,
        account: &AccountId,
        show: bool,
    ) -> Result<Relationship, HttpError>;
}
