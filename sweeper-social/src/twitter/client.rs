//! OAuth-signed wrapper around the Twitter/X v1.1 REST endpoints the sweeper uses.
//!
//! | operation                   | endpoint                          |
//! |-----------------------------|-----------------------------------|
//! | `list_user_posts`           | `GET statuses/user_timeline.json` |
//! | `list_recent_likes`         | `GET favorites/list.json`         |
//! | `delete_post`               | `POST statuses/destroy/:id.json`  |
//! | `delete_like`               | `POST favorites/destroy.json`     |
//! | `list_followed_account_ids` | `GET friends/ids.json`            |
//! | `set_show_retweets`         | `POST friendships/update.json`    |
use crate::api::SocialApi;
use crate::twitter::types::{AccountId, FriendIds, FriendshipUpdate, Relationship, Tweet, TweetId};
use async_trait::async_trait;
use std::borrow::Cow;
use std::time::Duration;
use sweeper_http::{Auth, HttpClient, HttpError, OAuth1Keys, RequestOpts};

pub const DEFAULT_BASE_URL: &str = "https://api.twitter.com/1.1/";

type Query<'a> = Vec<(&'a str, Cow<'a, str>)>;

#[derive(Clone)]
pub struct TwitterApi {
    http: HttpClient,
    keys: OAuth1Keys,
}

impl TwitterApi {
    pub fn new(keys: OAuth1Keys) -> Result<Self, HttpError> {
        Self::with_base_url(DEFAULT_BASE_URL, keys)
    }

    /// Point the client at another API root (must end with `/`).
    pub fn with_base_url(base_url: &str, keys: OAuth1Keys) -> Result<Self, HttpError> {
        let http = HttpClient::new(base_url)?;
        Ok(Self { http, keys })
    }

    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.http = self.http.with_timeout(dur);
        self
    }

    fn signed<'a>(&'a self, query: Query<'a>) -> RequestOpts<'a> {
        RequestOpts {
            auth: Some(Auth::OAuth1(&self.keys)),
            query: Some(query),
            ..Default::default()
        }
    }
}

#[async_trait]
impl SocialApi for TwitterApi {
    async fn list_user_posts(
        &self,
        handle: &str,
        max_id: Option<TweetId>,
        count: u32,
    ) -> Result<Vec<Tweet>, HttpError> {
        let mut query: Query<'_> = vec![
            ("count", count.to_string().into()),
            ("screen_name", handle.into()),
            ("trim_user", "true".into()),
        ];
        if let Some(max_id) = max_id {
            query.push(("max_id", max_id.to_string().into()));
        }

        let page: Vec<Tweet> = self
            .http
            .get_json("statuses/user_timeline.json", self.signed(query))
            .await?;
        tracing::debug!(handle, ?max_id, returned = page.len(), "twitter.timeline.page");
        Ok(page)
    }

    async fn list_recent_likes(&self, count: u32) -> Result<Vec<Tweet>, HttpError> {
        let query: Query<'_> = vec![
            ("count", count.to_string().into()),
            ("include_entities", "false".into()),
        ];
        let likes: Vec<Tweet> = self
            .http
            .get_json("favorites/list.json", self.signed(query))
            .await?;
        tracing::debug!(returned = likes.len(), "twitter.favorites.page");
        Ok(likes)
    }

    async fn delete_post(&self, id: TweetId) -> Result<Tweet, HttpError> {
        let path = format!("statuses/destroy/{id}.json");
        self.http
            .post_query(&path, self.signed(vec![("trim_user", "true".into())]))
            .await
    }

    async fn delete_like(&self, id: TweetId) -> Result<Tweet, HttpError> {
        let query: Query<'_> = vec![
            ("id", id.to_string().into()),
            ("include_entities", "false".into()),
        ];
        self.http
            .post_query("favorites/destroy.json", self.signed(query))
            .await
    }

    async fn list_followed_account_ids(&self, handle: &str) -> Result<Vec<AccountId>, HttpError> {
        let query: Query<'_> = vec![
            ("screen_name", handle.into()),
            ("stringify_ids", "true".into()),
        ];
        let friends: FriendIds = self
            .http
            .get_json("friends/ids.json", self.signed(query))
            .await?;
        if friends.has_more() {
            tracing::warn!(
                handle,
                returned = friends.ids.len(),
                next_cursor = ?friends.next_cursor_str,
                "twitter.friends.truncated: only the first page of follows is processed"
            );
        }
        Ok(friends.ids)
    }

    async fn set_show_retweets(
        &self,
        account: &AccountId,
        show: bool,
    ) -> Result<Relationship, HttpError> {
        let query: Query<'_> = vec![
            ("user_id", account.0.as_str().into()),
            ("retweets", show.to_string().into()),
        ];
        let update: FriendshipUpdate = self
            .http
            .post_query("friendships/update.json", self.signed(query))
            .await?;
        Ok(update.relationship)
    }
}
