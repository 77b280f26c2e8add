//! coop-count: two workers interleave counting one increment per step.
//!
//! Each worker is resumed round-robin by a single-threaded driver, so the
//! output order is the same on every run.

use std::sync::Arc;

use clap::Parser;
use coop_core::Numeric;

use coop_pool::demo::{self, DemoArgs};
use coop_pool::StdoutReporter;

/// Cooperative counting over a shared queue.
#[derive(Parser, Debug)]
#[command(name = "coop-count", version, about)]
struct Cli {
    #[command(flatten)]
    args: DemoArgs,
}

fn main() -> anyhow::Result<()> {
    demo::init_tracing();
    let cli = Cli::parse();

    let pool = cli
        .args
        .cooperative_pool(Numeric::Count, demo::default_counts(), Arc::new(StdoutReporter::without_total()))?;
    let report = pool.run()?;
    report.log_summary();
    Ok(())
}
