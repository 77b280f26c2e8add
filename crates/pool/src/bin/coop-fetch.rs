//! coop-fetch: worker tasks fetch URLs concurrently on a single-threaded event loop.
//!
//! Each task holds its own HTTP session for its whole lifetime; requests from
//! different tasks overlap while they wait on the network.

use std::sync::Arc;

use clap::Parser;
use coop_core::Numeric;

use coop_pool::demo::{self, DemoArgs};
use coop_pool::StdoutReporter;

/// Event-loop URL fetching over a shared queue.
#[derive(Parser, Debug)]
#[command(name = "coop-fetch", version, about)]
struct Cli {
    #[command(flatten)]
    args: DemoArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    demo::init_tracing();
    let cli = Cli::parse();

    let pool = cli
        .args
        .event_loop_pool(Numeric::DelaySecs, demo::default_urls(), Arc::new(StdoutReporter::new()))?;
    let report = pool.run().await?;
    report.log_summary();
    Ok(())
}
