mod common;

use common::{aged, init_test_tracing, CapturedLogs, FakeApi};
use sweeper_jobs::collect::{collect_all_posts, collect_recent_likes};
use sweeper_jobs::purge::{delete_all, purge_likes, purge_posts, Target};
use sweeper_jobs::retention::Allowlist;
use sweeper_jobs::retweets::disable_retweets_for_all_followed;
use sweeper_jobs::run::{run, run_phases};
use sweeper_jobs::{JobConfig, SweepError, PAGE_SIZE};
use sweeper_social::twitter::types::{AccountId, Tweet, TweetId};
use time::macros::datetime;
use time::OffsetDateTime;

const NOW: OffsetDateTime = datetime!(2024-03-15 12:00:00 UTC);

fn cfg(allowlist: Allowlist) -> JobConfig {
    JobConfig::at("sweeper_bot", NOW, allowlist)
}

fn accounts(n: usize) -> Vec<AccountId> {
    (0..n).map(|i| AccountId(format!("{}", 700 + i))).collect()
}

#[tokio::test]
async fn timeline_walk_makes_one_call_per_page_plus_the_empty_one() -> anyhow::Result<()> {
    init_test_tracing();
    for n in [0u64, 1, 199, 200, 201, 400, 450] {
        let api = FakeApi::with_timeline(n, NOW, 30);
        let posts = collect_all_posts(&api, "sweeper_bot", PAGE_SIZE).await?;

        assert_eq!(posts.len() as u64, n, "collected for n={n}");
        assert_eq!(
            api.timeline_call_count() as u64,
            n.div_ceil(u64::from(PAGE_SIZE)) + 1,
            "calls for n={n}"
        );
    }
    Ok(())
}

#[tokio::test]
async fn follow_up_pages_start_below_the_oldest_id() -> anyhow::Result<()> {
    let api = FakeApi::with_timeline(450, NOW, 30);
    let posts = collect_all_posts(&api, "sweeper_bot", PAGE_SIZE).await?;

    let calls = api.timeline_calls.lock().unwrap().clone();
    assert_eq!(calls[0], None);
    // Page one holds ids 10450..=10251, page two 10250..=10051.
    assert_eq!(calls[1], Some(TweetId(10_250)));
    assert_eq!(calls[2], Some(TweetId(10_050)));

    let mut ids: Vec<TweetId> = posts.iter().map(|t| t.id).collect();
    ids.dedup();
    assert_eq!(ids.len(), 450);
    assert!(ids.windows(2).all(|w| w[0] > w[1]));
    Ok(())
}

#[tokio::test]
async fn cursor_ignoring_upstream_does_not_loop() -> anyhow::Result<()> {
    init_test_tracing();
    let mut api = FakeApi::with_timeline(3, NOW, 30);
    api.ignore_cursor = true;

    let posts = collect_all_posts(&api, "sweeper_bot", PAGE_SIZE).await?;
    assert_eq!(posts.len(), 3);
    assert_eq!(api.timeline_call_count(), 2);
    Ok(())
}

#[tokio::test]
async fn only_the_latest_page_of_likes_is_considered() -> anyhow::Result<()> {
    init_test_tracing();
    let api = FakeApi {
        likes: (0..500u64).map(|i| aged(50_000 - i, NOW, 60)).collect(),
        ..Default::default()
    };

    let likes = collect_recent_likes(&api, PAGE_SIZE).await?;
    assert_eq!(likes.len(), 200);

    let report = purge_likes(&api, &cfg(Allowlist::default())).await?;
    assert_eq!(report.fetched, 200);
    assert_eq!(report.deleted, 200);
    assert_eq!(*api.likes_calls.lock().unwrap(), vec![200, 200]);

    let deleted = api.deleted_likes();
    assert_eq!(deleted.first(), Some(&TweetId(49_801)));
    assert_eq!(deleted.last(), Some(&TweetId(50_000)));
    Ok(())
}

#[tokio::test]
async fn failed_deletions_are_skipped_and_counted_out() -> anyhow::Result<()> {
    init_test_tracing();
    let mut api = FakeApi::with_timeline(10, NOW, 30);
    api.failing_deletes = [10_001, 10_004, 10_007].into_iter().map(TweetId).collect();

    let report = purge_posts(&api, &cfg(Allowlist::default())).await?;
    assert_eq!(report.fetched, 10);
    assert_eq!(report.deletable, 10);
    assert_eq!(report.deleted, 7);
    assert!(!api.deleted_posts().contains(&TweetId(10_004)));
    Ok(())
}

#[tokio::test]
async fn delete_all_reports_zero_when_everything_fails() {
    let now = NOW;
    let items: Vec<Tweet> = (1..=4).map(|id| aged(id, now, 20)).collect();
    let api = FakeApi {
        failing_deletes: items.iter().map(|t| t.id).collect(),
        likes: items.clone(),
        ..Default::default()
    };

    let refs: Vec<&Tweet> = items.iter().collect();
    assert_eq!(delete_all(&api, Target::Like, &refs).await, 0);
    assert_eq!(delete_all(&api, Target::Like, &[]).await, 0);
}

#[tokio::test]
async fn retweets_are_disabled_for_every_follow() -> anyhow::Result<()> {
    let api = FakeApi {
        friends: accounts(5),
        ..Default::default()
    };

    let disabled = disable_retweets_for_all_followed(&api, "sweeper_bot").await?;
    assert_eq!(disabled, 5);

    let updates = api.retweet_updates.lock().unwrap().clone();
    assert_eq!(updates.len(), 5);
    assert!(updates.iter().all(|(_, show)| !show));
    Ok(())
}

#[tokio::test]
async fn one_failed_retweet_update_fails_the_phase_after_all_ran() {
    init_test_tracing();
    let friends = accounts(5);
    let api = FakeApi {
        failing_updates: [friends[1].clone()].into_iter().collect(),
        friends,
        ..Default::default()
    };

    let err = disable_retweets_for_all_followed(&api, "sweeper_bot")
        .await
        .unwrap_err();
    assert!(matches!(err, SweepError::Transport(_)));
    assert_eq!(api.retweet_updates.lock().unwrap().len(), 5);
}

#[tokio::test]
async fn failed_retweet_phase_logs_the_successful_update_count() {
    let logs = CapturedLogs::default();
    let _guard = logs.install();

    let friends = accounts(6);
    let api = FakeApi {
        failing_updates: [friends[3].clone()].into_iter().collect(),
        friends,
        ..Default::default()
    };

    assert!(disable_retweets_for_all_followed(&api, "sweeper_bot").await.is_err());

    let line = logs
        .line_with("Error disabling retweets")
        .expect("failure summary is logged");
    assert!(line.contains("ERROR"), "{line}");
    assert!(line.contains("total_disabled=5"), "{line}");
    assert!(line.contains("failed=1"), "{line}");
    assert!(line.contains("attempted=6"), "{line}");
    assert!(logs.line_with("Disabled retweets").is_none());
}

#[tokio::test]
async fn clean_retweet_phase_logs_the_full_count() -> anyhow::Result<()> {
    let logs = CapturedLogs::default();
    let _guard = logs.install();

    let api = FakeApi {
        friends: accounts(3),
        ..Default::default()
    };
    disable_retweets_for_all_followed(&api, "sweeper_bot").await?;

    let line = logs
        .line_with("Disabled retweets")
        .expect("summary is logged");
    assert!(line.contains("total_disabled=3"), "{line}");
    assert_eq!(logs.contents().matches("Disabling retweets for").count(), 3);
    Ok(())
}

#[tokio::test]
async fn no_follows_is_a_clean_no_op() -> anyhow::Result<()> {
    let api = FakeApi::default();
    assert_eq!(disable_retweets_for_all_followed(&api, "sweeper_bot").await?, 0);
    Ok(())
}

#[tokio::test]
async fn only_old_unprotected_statuses_are_deleted() {
    init_test_tracing();
    let api = FakeApi {
        timeline: vec![
            aged(300, NOW, 10), // B: too recent
            aged(200, NOW, 20), // C: old but allowlisted
            aged(100, NOW, 20), // A: old
        ],
        friends: accounts(2),
        ..Default::default()
    };
    let allowlist = Allowlist::builtin().extend([200]);

    let summary = run(&api, &cfg(allowlist)).await.expect("run succeeds");
    assert_eq!(api.deleted_posts(), vec![TweetId(100)]);
    assert_eq!(summary.posts.fetched, 3);
    assert_eq!(summary.posts.deleted, 1);
    assert_eq!(summary.likes.fetched, 0);
    assert_eq!(summary.retweets_disabled, 2);
}

#[tokio::test]
async fn allowlist_protects_likes_too() -> anyhow::Result<()> {
    let api = FakeApi {
        likes: vec![aged(11, NOW, 40), aged(12, NOW, 40)],
        ..Default::default()
    };
    let report = purge_likes(&api, &cfg(Allowlist::builtin().extend([12]))).await?;
    assert_eq!(report.deletable, 1);
    assert_eq!(api.deleted_likes(), vec![TweetId(11)]);
    Ok(())
}

#[tokio::test]
async fn transport_failure_ends_the_run_without_panicking() {
    init_test_tracing();
    let api = FakeApi {
        fail_timeline: true,
        likes: vec![aged(1, NOW, 40)],
        friends: accounts(1),
        ..Default::default()
    };

    assert!(run(&api, &cfg(Allowlist::default())).await.is_none());
    assert!(api.likes_calls.lock().unwrap().is_empty());
    assert!(api.retweet_updates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unparsable_timestamp_aborts_before_any_deletion() {
    init_test_tracing();
    let mut bad = aged(2, NOW, 40);
    bad.created_at = "2024-01-01T00:00:00Z".into();
    let api = FakeApi {
        timeline: vec![bad, aged(1, NOW, 40)],
        ..Default::default()
    };

    let err = run_phases(&api, &cfg(Allowlist::default()))
        .await
        .unwrap_err();
    assert!(matches!(err, SweepError::Timestamp { id: TweetId(2), .. }));
    assert!(api.deleted_posts().is_empty());

    assert!(run(&api, &cfg(Allowlist::default())).await.is_none());
}
