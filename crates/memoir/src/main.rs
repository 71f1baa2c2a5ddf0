// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Binary entry point: CLI parsing, config bootstrap, dispatch.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod seed;
mod serve;

/// Memoir - a biography-collection bot.
#[derive(Parser, Debug)]
#[command(name = "memoir", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the bot.
    Serve,
    /// Insert the built-in interview questions into the database.
    Seed,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Bad config is fatal before any command runs.
    let config = match memoir_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            memoir_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Seed) => seed::run_seed(config).await,
        None => {
            println!("memoir: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
