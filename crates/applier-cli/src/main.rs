//! Applier CLI - apply named profiles, one at a time.
//!
//! # Usage
//!
//! ```text
//! applier [OPTIONS] TRIGGER...
//! applier --list
//! ```
//!
//! Each `TRIGGER` is `profile[:simple|advanced][:on|off]`. Triggers are
//! queued in order and applied sequentially; Advanced triggers open a
//! prompt on the terminal. Every dispatched order is written to stdout as
//! one JSON line. Prompts, logs and the final summary go to stderr.
//!
//! # Configuration
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`APPLIER_*`)
//! 3. Project config (`.applier/config.toml` in the project root)
//! 4. Global config (`~/.applier/config.toml`)
//! 5. Default values (lowest priority)
//!
//! # Environment Variables
//!
//! - `APPLIER_DEBUG`: Enable debug mode (`true`/`false`)
//! - `APPLIER_PROFILE_DIR`: Extra profile directories, searched first
//! - `APPLIER_EXIT_WHEN_IDLE`: Exit when the queue drains
//! - `APPLIER_INTERACTIVE`: Ask on the terminal (`false` dismisses prompts)

mod output;
mod trigger;

use anyhow::{Context, Result};
use applier_runtime::config::{ApplierConfig, ConfigLoader, ConfigResolver};
use applier_runtime::{
    ChannelDispatcher, ChooserGateway, ConsoleChooser, DismissingChooser, FsProfileStore,
    Sequencer,
};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use trigger::{parse_trigger, Trigger};

/// Applier CLI - apply named profiles, one at a time
#[derive(Parser, Debug)]
#[command(name = "applier")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Project root directory (defaults to current directory)
    #[arg(short = 'C', long)]
    project: Option<PathBuf>,

    /// Profile directory, searched before configured ones (repeatable)
    #[arg(long = "profile-dir", value_name = "DIR")]
    profile_dirs: Vec<PathBuf>,

    /// Dismiss every prompt instead of asking on the terminal
    #[arg(long)]
    no_interactive: bool,

    /// List available profiles and exit
    #[arg(long)]
    list: bool,

    /// Profiles to apply: profile[:simple|advanced][:on|off]
    #[arg(value_name = "TRIGGER", value_parser = parse_trigger, required_unless_present = "list")]
    triggers: Vec<Trigger>,
}

/// CLI-based configuration resolver.
///
/// Merges file/env config via [`ConfigLoader`] and applies CLI argument
/// overrides as the highest-priority layer.
struct CliConfigResolver {
    project_root: PathBuf,
    debug: bool,
    profile_dirs: Vec<PathBuf>,
    no_interactive: bool,
}

impl CliConfigResolver {
    fn from_args(args: &Args) -> Self {
        let project_root = args.project.clone().unwrap_or_else(|| {
            std::env::current_dir().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to get current directory, using '.'");
                PathBuf::from(".")
            })
        });

        Self {
            project_root,
            debug: args.debug,
            profile_dirs: args.profile_dirs.clone(),
            no_interactive: args.no_interactive,
        }
    }

    fn resolve(&self, loader: ConfigLoader) -> Result<ApplierConfig> {
        let mut config = loader
            .with_project_root(&self.project_root)
            .load()
            .context("Config error")?;
        self.apply(&mut config);
        Ok(config)
    }

    fn profile_store(&self, config: &ApplierConfig) -> FsProfileStore {
        FsProfileStore::with_dirs(config.profiles.resolved_dirs(Some(&self.project_root)))
    }
}

impl ConfigResolver for CliConfigResolver {
    fn apply(&self, config: &mut ApplierConfig) {
        if self.debug {
            config.debug = true;
        }
        if !self.profile_dirs.is_empty() {
            let mut dirs = self.profile_dirs.clone();
            dirs.append(&mut config.profiles.dirs);
            config.profiles.dirs = dirs;
        }
        if self.no_interactive {
            config.chooser.interactive = false;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let resolver = CliConfigResolver::from_args(&args);
    let config = resolver.resolve(ConfigLoader::new())?;

    // Terminal filter: --debug > --verbose > RUST_LOG env > default "warn".
    // Always stderr; stdout is reserved for orders.
    let terminal_filter = if config.debug {
        EnvFilter::new("debug")
    } else if args.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(terminal_filter),
        )
        .init();

    info!(path = %resolver.project_root.display(), "Project root");

    let store = resolver.profile_store(&config);
    info!(dirs = ?store.search_dirs(), "Profile search path");

    if args.list {
        let entries = store.list().await;
        print!("{}", output::profile_table(&entries));
        return Ok(());
    }

    let chooser: Arc<dyn ChooserGateway> = if config.chooser.interactive {
        Arc::new(ConsoleChooser::stdio())
    } else {
        Arc::new(DismissingChooser)
    };
    let (dispatcher, orders) = ChannelDispatcher::new();
    let executor = tokio::spawn(output::write_orders(orders, tokio::io::stdout()));

    let (sequencer, handle) = Sequencer::builder(Arc::new(store), chooser, Arc::new(dispatcher))
        .with_config(config.sequencer)
        .build();

    for trigger in args.triggers {
        let id = handle.submit(trigger.into_request())?;
        info!(request = %id, "Queued trigger");
    }
    // No more triggers: let the sequencer drain and exit.
    drop(handle);

    let report = sequencer.run().await;
    let written = executor.await.context("order writer panicked")??;
    info!(orders = written, "All orders written");

    eprint!("{}", output::summary(&report));
    Ok(())
}
