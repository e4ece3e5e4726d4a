// Shared by several integration test binaries; not every helper is used by each.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::io;
use std::sync::{Arc, Mutex, OnceLock};
use sweeper_common::observability::{LogConfig, LogFormat};
use sweeper_http::{HttpError, StatusCode};
use sweeper_jobs::retention::format_created_at;
use sweeper_social::SocialApi;
use sweeper_social::twitter::types::{AccountId, Relationship, RelationshipSide, Tweet, TweetId};
use time::{Duration, OffsetDateTime};

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "sweeper-tests",
            log_dir: Some(std::env::temp_dir().join("sweeper-tests")),
            emit_stderr: true,
            format: if std::env::var("SWEEPER_LOG_FORMAT")
                .map(|raw| raw.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false)
            {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
            default_filter: "debug".to_string(),
        };

        sweeper_common::observability::init_logging(config).unwrap_or_default()
    });
}

/// In-memory log sink, installed as the thread's default subscriber.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// First captured line containing `needle`.
    pub fn line_with(&self, needle: &str) -> Option<String> {
        self.contents()
            .lines()
            .find(|line| line.contains(needle))
            .map(str::to_owned)
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn aged(id: u64, now: OffsetDateTime, days_old: i64) -> Tweet {
    Tweet {
        id: TweetId(id),
        created_at: format_created_at(now - Duration::days(days_old)).unwrap(),
        text: Some(format!("status {id}")),
        full_text: None,
    }
}

fn api_error(status: StatusCode, message: &str) -> HttpError {
    HttpError::Api {
        status,
        message: message.to_string(),
        request_id: "-".into(),
    }
}

/// In-memory account: a timeline, likes and follows, with scripted failures.
#[derive(Default)]
pub struct FakeApi {
    /// Newest first, like the real endpoint.
    pub timeline: Vec<Tweet>,
    pub likes: Vec<Tweet>,
    pub friends: Vec<AccountId>,

    pub fail_timeline: bool,
    /// Return the first page for every request, whatever the cursor.
    pub ignore_cursor: bool,
    pub failing_deletes: HashSet<TweetId>,
    pub failing_updates: HashSet<AccountId>,

    pub timeline_calls: Mutex<Vec<Option<TweetId>>>,
    pub likes_calls: Mutex<Vec<u32>>,
    pub deleted_posts: Mutex<Vec<TweetId>>,
    pub deleted_likes: Mutex<Vec<TweetId>>,
    pub retweet_updates: Mutex<Vec<(AccountId, bool)>>,
}

impl FakeApi {
    /// `count` statuses with descending ids starting at 10_000, all `days_old` old.
    pub fn with_timeline(count: u64, now: OffsetDateTime, days_old: i64) -> Self {
        Self {
            timeline: (0..count).map(|i| aged(10_000 + count - i, now, days_old)).collect(),
            ..Default::default()
        }
    }

    pub fn timeline_call_count(&self) -> usize {
        self.timeline_calls.lock().unwrap().len()
    }

    pub fn deleted_posts(&self) -> Vec<TweetId> {
        let mut v = self.deleted_posts.lock().unwrap().clone();
        v.sort();
        v
    }

    pub fn deleted_likes(&self) -> Vec<TweetId> {
        let mut v = self.deleted_likes.lock().unwrap().clone();
        v.sort();
        v
    }
}

#[async_trait]
impl SocialApi for FakeApi {
    async fn list_user_posts(
        &self,
        _handle: &str,
        max_id: Option<TweetId>,
        count: u32,
    ) -> Result<Vec<Tweet>, HttpError> {
        self.timeline_calls.lock().unwrap().push(max_id);
        if self.fail_timeline {
            return Err(HttpError::Network("connection reset".into()));
        }
        let bound = if self.ignore_cursor { None } else { max_id };
        Ok(self
            .timeline
            .iter()
            .filter(|t| bound.is_none_or(|m| t.id <= m))
            .take(count as usize)
            .cloned()
            .collect())
    }

    async fn list_recent_likes(&self, count: u32) -> Result<Vec<Tweet>, HttpError> {
        self.likes_calls.lock().unwrap().push(count);
        Ok(self.likes.iter().take(count as usize).cloned().collect())
    }

    async fn delete_post(&self, id: TweetId) -> Result<Tweet, HttpError> {
        tokio::task::yield_now().await;
        if self.failing_deletes.contains(&id) {
            return Err(api_error(StatusCode::NOT_FOUND, "No status found with that ID."));
        }
        self.deleted_posts.lock().unwrap().push(id);
        self.timeline
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "unknown status"))
    }

    async fn delete_like(&self, id: TweetId) -> Result<Tweet, HttpError> {
        tokio::task::yield_now().await;
        if self.failing_deletes.contains(&id) {
            return Err(api_error(StatusCode::FORBIDDEN, "You have not favorited this status."));
        }
        self.deleted_likes.lock().unwrap().push(id);
        self.likes
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "unknown status"))
    }

    async fn list_followed_account_ids(&self, _handle: &str) -> Result<Vec<AccountId>, HttpError> {
        Ok(self.friends.clone())
    }

    async fn set_show_retweets(
        &self,
        account: &AccountId,
        show: bool,
    ) -> Result<Relationship, HttpError> {
        tokio::task::yield_now().await;
        self.retweet_updates
            .lock()
            .unwrap()
            .push((account.clone(), show));
        if self.failing_updates.contains(account) {
            return Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal error"));
        }
        Ok(Relationship {
            source: RelationshipSide {
                want_retweets: Some(show),
                ..Default::default()
            },
            target: RelationshipSide {
                id_str: Some(account.0.clone()),
                ..Default::default()
            },
        })
    }
}
