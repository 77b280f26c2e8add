//! coop-sleep: worker tasks wait out timed delays on a single-threaded event loop.
//!
//! While one task sleeps the other keeps draining the queue, so the total is
//! bounded by the busiest worker rather than the sum of all delays.

use std::sync::Arc;

use clap::Parser;
use coop_core::Numeric;

use coop_pool::demo::{self, DemoArgs};
use coop_pool::StdoutReporter;

/// Event-loop delays over a shared queue.
#[derive(Parser, Debug)]
#[command(name = "coop-sleep", version, about)]
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
        .event_loop_pool(Numeric::DelaySecs, demo::default_delays(), Arc::new(StdoutReporter::new()))?;
    let report = pool.run().await?;
    report.log_summary();
    Ok(())
}
