//! Shared plumbing for the demo binaries.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use coop_core::{load_dotenv, ConfigError, ItemParseError, Numeric, PoolConfig, WorkItem};
use tracing::info;

use crate::cooperative::CooperativePool;
use crate::event::Reporter;
use crate::event_loop::EventLoopPool;
use crate::session::HttpConnector;

/// Workload of the counting and sleeping demos.
pub const DEFAULT_WORK: [u64; 4] = [15, 10, 5, 2];

/// Sites fetched by the HTTP demos.
pub const DEFAULT_URLS: [&str; 7] = [
    "http://google.com",
    "http://yahoo.com",
    "http://linkedin.com",
    "http://apple.com",
    "http://microsoft.com",
    "http://facebook.com",
    "http://twitter.com",
];

/// Arguments every demo binary accepts.
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Path to a TOML config file (worker names, HTTP settings).
    #[arg(long, env = "COOP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Work items replacing the default workload. Integers or URLs.
    pub items: Vec<String>,
}

impl DemoArgs {
    /// Load `.env`, then the config file if given, then env overrides.
    pub fn load_config(&self) -> Result<PoolConfig, ConfigError> {
        load_dotenv();
        PoolConfig::load(self.config.as_deref())
    }

    /// Parse the positional items, or fall back to `defaults` when none were given.
    pub fn work_items(
        &self,
        numeric: Numeric,
        defaults: impl IntoIterator<Item = WorkItem>,
    ) -> Result<Vec<WorkItem>, ItemParseError> {
        if self.items.is_empty() {
            return Ok(defaults.into_iter().collect());
        }
        self.items
            .iter()
            .map(|raw| WorkItem::parse(raw, numeric))
            .collect()
    }

    /// Config and work items, ready to hand to a pool.
    fn prepare(
        &self,
        numeric: Numeric,
        defaults: impl IntoIterator<Item = WorkItem>,
    ) -> anyhow::Result<(PoolConfig, Vec<WorkItem>)> {
        let config = self.load_config()?;
        config.log_summary();
        let items = self.work_items(numeric, defaults)?;
        Ok((config, items))
    }

    /// A round-robin pool with the configured workers and the queue filled.
    pub fn cooperative_pool(
        &self,
        numeric: Numeric,
        defaults: impl IntoIterator<Item = WorkItem>,
        reporter: Arc<dyn Reporter>,
    ) -> anyhow::Result<CooperativePool> {
        let (config, items) = self.prepare(numeric, defaults)?;
        let mut pool = CooperativePool::new(HttpConnector::new(config.http), reporter);
        pool.enqueue_all(items)?;
        for name in &config.workers {
            pool.spawn_worker(name)?;
        }
        info!(queued = pool.queued(), "cooperative pool ready");
        Ok(pool)
    }

    /// An event-loop pool with the configured workers and the queue filled.
    pub fn event_loop_pool(
        &self,
        numeric: Numeric,
        defaults: impl IntoIterator<Item = WorkItem>,
        reporter: Arc<dyn Reporter>,
    ) -> anyhow::Result<EventLoopPool> {
        let (config, items) = self.prepare(numeric, defaults)?;
        let mut pool = EventLoopPool::new(HttpConnector::new(config.http), reporter);
        pool.enqueue_all(items)?;
        for name in &config.workers {
            pool.spawn_worker(name)?;
        }
        info!(queued = pool.queued(), "event-loop pool ready");
        Ok(pool)
    }
}

/// Install the fmt subscriber on stderr so stdout carries only the report.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

pub fn default_counts() -> impl Iterator<Item = WorkItem> {
    DEFAULT_WORK.into_iter().map(WorkItem::Count)
}

pub fn default_delays() -> impl Iterator<Item = WorkItem> {
    DEFAULT_WORK.into_iter().map(WorkItem::delay_secs)
}

pub fn default_urls() -> impl Iterator<Item = WorkItem> {
    DEFAULT_URLS.into_iter().map(WorkItem::url)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        args: DemoArgs,
    }

    #[test]
    fn no_arguments_uses_defaults() {
        let cli = Cli::try_parse_from(["coop-count"]).unwrap();
        let items = cli.args.work_items(Numeric::Count, default_counts()).unwrap();
        assert_eq!(
            items,
            vec![WorkItem::Count(15), WorkItem::Count(10), WorkItem::Count(5), WorkItem::Count(2)]
        );
    }

    #[test]
    fn positional_items_override_defaults() {
        let cli = Cli::try_parse_from(["coop-sleep", "3", "http://example.com"]).unwrap();
        let items = cli.args.work_items(Numeric::DelaySecs, default_delays()).unwrap();
        assert_eq!(items, vec![WorkItem::delay_secs(3), WorkItem::url("http://example.com")]);
    }

    #[test]
    fn bad_item_is_reported() {
        let cli = Cli::try_parse_from(["coop-count", "ten"]).unwrap();
        assert!(cli.args.work_items(Numeric::Count, default_counts()).is_err());
    }

    #[test]
    fn cooperative_pool_runs_the_given_items() {
        let cli = Cli::try_parse_from(["coop-count", "3", "1"]).unwrap();
        let reporter = Arc::new(crate::event::MemoryReporter::new());
        let pool = cli
            .args
            .cooperative_pool(Numeric::Count, default_counts(), reporter.clone())
            .unwrap();
        assert_eq!(pool.queued(), 2);

        let report = pool.run().unwrap();
        assert_eq!(report.items_consumed(), 2);
        assert!(reporter.lines().contains(&"Task One total: 3".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn event_loop_pool_runs_the_defaults() {
        let cli = Cli::try_parse_from(["coop-sleep"]).unwrap();
        let pool = cli
            .args
            .event_loop_pool(Numeric::DelaySecs, default_delays(), Arc::new(crate::event::NullReporter))
            .unwrap();
        assert_eq!(pool.queued(), 4);

        let report = pool.run().await.unwrap();
        assert_eq!(report.items_consumed(), 4);
    }

    #[test]
    fn default_urls_are_the_seven_sites() {
        let urls: Vec<_> = default_urls().collect();
        assert_eq!(urls.len(), 7);
        assert_eq!(urls[0], WorkItem::url("http://google.com"));
    }
}
