use crate::error::Result;
use crate::purge::{purge_likes, purge_posts, PurgeReport};
use crate::retweets::disable_retweets_for_all_followed;
use crate::JobConfig;
use sweeper_social::SocialApi;
use tracing::Instrument;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub posts: PurgeReport,
    pub likes: PurgeReport,
    pub retweets_disabled: usize,
}

/// Run the three phases in order, stopping at the first phase that fails.
pub async fn run_phases<A>(api: &A, cfg: &JobConfig) -> Result<RunSummary>
where
    A: SocialApi + ?Sized,
{
    let posts = purge_posts(api, cfg).await?;
    let likes = purge_likes(api, cfg).await?;
    let retweets_disabled = disable_retweets_for_all_followed(api, &cfg.handle).await?;
    Ok(RunSummary {
        posts,
        likes,
        retweets_disabled,
    })
}

/// Entry point for one scheduled invocation.
///
/// Errors are logged, never returned; `None` means a phase failed.
pub async fn run<A>(api: &A, cfg: &JobConfig) -> Option<RunSummary>
where
    A: SocialApi + ?Sized,
{
    let span = tracing::info_span!("sweep", handle = %cfg.handle);
    async {
        tracing::info!(
            cutoff = %cfg.window.cutoff(),
            allowlisted = cfg.allowlist.len(),
            "Deleting tweets and likes that occurred before {}, and disabling all retweets.",
            cfg.window.cutoff()
        );

        match run_phases(api, cfg).await {
            Ok(summary) => {
                tracing::info!(?summary, "sweep finished");
                Some(summary)
            }
            Err(err) => {
                tracing::error!(error = %err, "sweep aborted");
                None
            }
        }
    }
    .instrument(span)
    .await
}
