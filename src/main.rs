//! DB Context Binder - build-time entry point.
//!
//! Reads a binding configuration and writes the generated producer component.

use clap::Parser;
use db_context_binder::config::{Config, load_bindings};
use db_context_binder::synth::{
    BuildProcessor, CodegenOptions, ComponentOptions, FsComponentLoader, KnownPools,
    UnremovableSet,
};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber.with(fmt::layer().json()).init();
    } else {
        subscriber
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init();
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration from command line and environment
    let config = Config::parse();

    // Initialize logging
    init_tracing(&config);

    info!(
        config = %config.config.display(),
        "Starting DB Context Binder v{}",
        env!("CARGO_PKG_VERSION")
    );

    let bindings = load_bindings(&config.config)?;
    let pools: KnownPools = config.known_pool_names()?.into_iter().collect();

    let processor = BuildProcessor::new(
        ComponentOptions {
            module_path: config.module_path.clone(),
            type_name: config.type_name.clone(),
        },
        CodegenOptions {
            crate_path: config.crate_path.clone(),
        },
    );
    let mut loader = FsComponentLoader::new(&config.out_dir);
    let mut unremovable = UnremovableSet::new();

    let outcome = match processor.run(&bindings, &pools, &mut loader, &mut unremovable) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, "Binding synthesis failed");
            return Err(e.into());
        }
    };

    if outcome.component.is_none() {
        warn!("No bindings configured, nothing generated");
        return Ok(());
    }

    for path in loader.written() {
        println!("{}", path.display());
    }
    info!(
        producers = outcome.producer_count(),
        warnings = outcome.warnings.len(),
        retained = ?unremovable.names(),
        "Build complete"
    );
    Ok(())
}
