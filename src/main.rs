// ────────────────────────────────────────────────────────────
// Global allocator setup
//   * Default  - mimalloc             (no feature flags)
//   * Debug    - jemalloc (`use-jemalloc` feature)
//   * Fallback - system allocator     (`system-alloc` feature)
// ────────────────────────────────────────────────────────────

#[cfg(feature = "use-jemalloc")]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[cfg(all(not(feature = "use-jemalloc"), not(feature = "system-alloc")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[cfg(feature = "system-alloc")]
use std::alloc::System;
#[cfg(feature = "system-alloc")]
#[global_allocator]
static GLOBAL: System = System;

use anyhow::{Context, Result};
use iamprobe::{
    app,
    cli::{CommandLineArgs, GlobalArgs},
};
use tokio::runtime::Builder;
use tracing_core::metadata::LevelFilter;
use tracing_subscriber::{
    fmt, prelude::__tracing_subscriber_SubscriberExt, registry, util::SubscriberInitExt,
};

fn main() -> Result<()> {
    color_backtrace::install();
    let args = CommandLineArgs::parse_args();
    setup_logging(&args.global_args);

    // Batches are simulated strictly one after another, so a single thread
    // is all the runtime needs.
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;
    let exit_code = runtime.block_on(app::run(&args))?;
    drop(runtime);

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

fn setup_logging(global_args: &GlobalArgs) {
    let level = LevelFilter::from(global_args.log_level());
    let all_targets = !global_args.quiet && global_args.verbose > 2;

    // `-vvv` also surfaces the AWS SDK and HTTP stack.
    let filter = if all_targets {
        tracing_subscriber::filter::Targets::new().with_default(LevelFilter::TRACE)
    } else {
        tracing_subscriber::filter::Targets::new()
            .with_default(LevelFilter::ERROR)
            .with_target(env!("CARGO_CRATE_NAME"), level)
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(false)
        .without_time();
    registry().with(fmt_layer).with(filter).init();
}
