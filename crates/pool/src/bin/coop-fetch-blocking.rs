//! coop-fetch-blocking: workers take turns issuing blocking HTTP GETs.
//!
//! Every fetch is one step of the round-robin driver, so only one request is
//! ever in flight and the total is roughly the sum of all request times.

use std::sync::Arc;

use clap::Parser;
use coop_core::Numeric;

use coop_pool::demo::{self, DemoArgs};
use coop_pool::StdoutReporter;

/// Cooperative, blocking URL fetching over a shared queue.
#[derive(Parser, Debug)]
#[command(name = "coop-fetch-blocking", version, about)]
struct Cli {
    #[command(flatten)]
    args: DemoArgs,
}

fn main() -> anyhow::Result<()> {
    demo::init_tracing();
    let cli = Cli::parse();

    let pool = cli
        .args
        .cooperative_pool(Numeric::DelaySecs, demo::default_urls(), Arc::new(StdoutReporter::new()))?;
    let report = pool.run()?;
    report.log_summary();
    Ok(())
}
