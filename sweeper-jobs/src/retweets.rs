//! Hiding retweets from every followed account.
//!
//! Unlike deletions this is a strict batch: all updates are attempted, and if
//! any of them failed the phase fails with the first error.
use crate::batch::run_batch;
use crate::error::Result;
use sweeper_social::SocialApi;

pub async fn disable_retweets_for_all_followed<A>(api: &A, handle: &str) -> Result<usize>
where
    A: SocialApi + ?Sized,
{
    let followed = api.list_followed_account_ids(handle).await?;

    let report = run_batch(followed.iter(), |account| async move {
        tracing::info!(%account, "Disabling retweets for {}", account);
        api.set_show_retweets(account, false).await
    })
    .await;

    if report.failures.is_empty() {
        tracing::info!(total_disabled = report.succeeded, "Disabled retweets");
    } else {
        tracing::error!(
            total_disabled = report.succeeded,
            failed = report.failures.len(),
            attempted = report.attempted,
            "Error disabling retweets"
        );
    }

    Ok(report.into_strict()?)
}
