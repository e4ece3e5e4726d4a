use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use sweeper_common::observability::{LogConfig, LogFormat, init_logging};
use sweeper_config::{SweeperConfig, SweeperConfigLoader};
use sweeper_http::OAuth1Keys;
use sweeper_jobs::JobConfig;
use sweeper_jobs::retention::Allowlist;
use sweeper_social::twitter::TwitterApi;

/// Delete old tweets and likes, and hide retweets from followed accounts.
#[derive(Debug, Parser)]
#[command(name = "sweeper", version)]
struct Cli {
    /// YAML config file; without it `./sweeper.yaml` and the user config dir are tried.
    #[arg(long, env = "SWEEPER_CONFIG")]
    config: Option<PathBuf>,

    /// Log encoding, overrides `logging.format`.
    #[arg(long, env = "SWEEPER_LOG_FORMAT")]
    log_format: Option<LogFormat>,
}

fn log_config(cli: &Cli, cfg: &SweeperConfig) -> Result<LogConfig> {
    let format = match (cli.log_format, cfg.logging.format.as_deref()) {
        (Some(format), _) => format,
        (None, Some(raw)) => raw.parse()?,
        (None, None) => LogFormat::Text,
    };
    let defaults = LogConfig::default();
    Ok(LogConfig {
        log_dir: cfg.logging.dir.clone(),
        emit_stderr: cfg.logging.stderr.unwrap_or(defaults.emit_stderr),
        format,
        default_filter: cfg
            .logging
            .filter
            .clone()
            .unwrap_or(defaults.default_filter.clone()),
        ..defaults
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Config: defaults, then file, then SWEEPER__* env
    let loader = match &cli.config {
        Some(path) => SweeperConfigLoader::new().with_file(path),
        None => SweeperConfigLoader::new().with_default_locations(),
    };
    let cfg = loader.load().context("loading configuration")?;

    // 2) Logging
    let log_path = init_logging(log_config(&cli, &cfg)?)?;
    tracing::debug!(log_path = %log_path.display(), "logging initialised");

    // 3) Client
    let SweeperConfig {
        account,
        credentials,
        api,
        retention,
        ..
    } = cfg;
    let keys = OAuth1Keys {
        consumer_key: credentials.consumer_key,
        consumer_secret: credentials.consumer_secret,
        access_token: credentials.access_token_key,
        access_token_secret: credentials.access_token_secret,
    };
    let mut client = TwitterApi::with_base_url(&api.base_url, keys)?;
    if let Some(secs) = api.timeout_secs {
        client = client.with_timeout(Duration::from_secs(secs));
    }

    // 4) One run; its failures are logged, not returned
    let job = JobConfig::new(
        account.handle,
        Allowlist::builtin().extend(retention.keep),
    );
    if sweeper_jobs::run::run(&client, &job).await.is_none() {
        tracing::warn!("sweep ended early, see errors above");
    }
    Ok(())
}
