//! Console Bot Demo
//!
//! Drives the Herald dispatcher from the terminal. Every stdin line is one
//! chat message, written as `<actor>: <text>`:
//!
//! ```text
//! alice: !help
//! bob: !bam
//! alice: !ban bob 7
//! bob: !stock
//! ```
//!
//! `alice` is the admin in the bundled `herald.toml`.
//!
//! # Usage
//!
//! ```bash
//! cd demos/console_bot
//! cargo run --package console-bot
//! ```

mod commands;
mod console;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use herald::prelude::*;
use tracing::info;

use crate::commands::{Inventory, Profiles};
use crate::console::{ConsoleMessenger, stdin_messages};

/// Command line options.
#[derive(Debug, Parser)]
#[command(version, about = "Chat with a Herald bot from the terminal")]
struct Args {
    /// Configuration file to load instead of searching for `herald.toml`.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Configuration profile, e.g. `development` or `production`.
    #[arg(short, long)]
    profile: Option<String>,

    /// Ignore `HERALD_*` environment variables.
    #[arg(long)]
    no_env: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let store = Arc::new(MemoryProfileStore::new());
    let inventory = Inventory(
        [("keys", 12), ("cases", 40), ("stickers", 3)]
            .into_iter()
            .map(|(item, count)| (item.to_string(), count))
            .collect(),
    );

    let mut builder = HeraldRuntime::builder()
        .messenger(Arc::new(ConsoleMessenger))
        .profiles(store.clone())
        .state(Profiles(store))
        .state(inventory);

    if let Some(path) = args.config {
        builder = builder.config_file(path);
    }
    if let Some(profile) = args.profile {
        builder = builder.profile(profile);
    }
    if args.no_env {
        builder = builder.without_env();
    }
    for factory in commands::all() {
        builder = builder.command(factory);
    }

    let runtime = builder.build()?;
    info!(
        commands = runtime.dispatcher().registry().len(),
        "Type `<actor>: <text>` lines; Ctrl+D to quit"
    );

    runtime.run(stdin_messages()).await;
    Ok(())
}
