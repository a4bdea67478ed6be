//! `kitchensink`: runs the features selected by `-f<Name>` flags.
//!
//! ```text
//! kitchensink -fCalling -fThreading
//! ```
//!
//! Timing knobs come from the TOML file named by `KITCHENSINK_CONFIG`.

use anyhow::Context;
use ks_debuggee::{debuggee_args, init_logging};
use ks_features::{default_registry, ArgumentsFeature};
use ks_harness::prelude::*;
use ks_harness::CONFIG_ENV_VAR;

fn main() -> anyhow::Result<()> {
    init_logging();

    let config = HarnessConfig::from_env()
        .with_context(|| format!("loading configuration named by {CONFIG_ENV_VAR}"))?;
    tracing::debug!(?config, "configuration loaded");

    println!(
        "KitchenSink for Business! (rustc/{} Edition)",
        std::env::consts::ARCH
    );

    let sink: Arc<dyn LineSink> = Arc::new(StdoutSink);
    let mut arguments = ArgumentsFeature::new(debuggee_args());
    arguments
        .run(Arc::clone(&sink))
        .context("parsing arguments")?;

    let summary = default_registry().run_enabled(arguments.flags(), &config, &sink)?;
    tracing::debug!(ran = ?summary.ran, "features finished");

    println!("Goodbye.");
    Ok(())
}
