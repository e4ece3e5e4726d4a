use sweeper_http::HttpError;
use sweeper_social::twitter::types::TweetId;

#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    /// Network or API failure from the remote service.
    #[error("transport error: {0}")]
    Transport(#[from] HttpError),

    /// `created_at` did not match the upstream timestamp format.
    #[error("status {id} has unparsable created_at {raw:?}: {source}")]
    Timestamp {
        id: TweetId,
        raw: String,
        #[source]
        source: time::error::Parse,
    },
}

pub type Result<T> = std::result::Result<T, SweepError>;
