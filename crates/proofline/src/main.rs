// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Proofline - resilient delivery confirmation for field drivers.
//!
//! This is the operator CLI: it validates configuration, runs the capture
//! normalizer on files, and exercises the notification webhook.

mod config_cmd;
mod normalize_cmd;
mod notify_cmd;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use proofline_config::model::ProoflineConfig;
use proofline_media::DEFAULT_CONTENT_TYPE;

/// Proofline - resilient delivery confirmation for field drivers.
#[derive(Parser, Debug)]
#[command(name = "proofline", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate and summarize the effective configuration.
    Config {
        /// Print the merged configuration as TOML (secret redacted).
        #[arg(long)]
        toml: bool,
    },
    /// Decode a captured data URL or base64 file into raw bytes.
    Normalize {
        /// File holding the capture text, or `-` for stdin.
        input: PathBuf,
        /// Content type to use when the input does not declare one.
        #[arg(long, default_value = DEFAULT_CONTENT_TYPE)]
        content_type: String,
        /// Where to write the decoded bytes.
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Send one delivery notification through the configured webhook.
    Notify {
        order_id: String,
        pod_id: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) if !path.is_file() => {
            eprintln!("error: config file {} does not exist", path.display());
            std::process::exit(1);
        }
        Some(path) => proofline_config::load_and_validate_path(path),
        None => proofline_config::load_and_validate(),
    };
    let config: ProoflineConfig = match loaded {
        Ok(config) => config,
        Err(errors) => {
            proofline_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level);
    proofline_resilience::recording::register_metrics();

    let result = match cli.command {
        Some(Commands::Config { toml }) => config_cmd::run_config(&config, toml),
        Some(Commands::Normalize {
            input,
            content_type,
            output,
        }) => normalize_cmd::run_normalize(&input, &content_type, &output),
        Some(Commands::Notify { order_id, pod_id }) => {
            notify_cmd::run_notify(&config, order_id, pod_id).await
        }
        None => {
            println!("proofline: use --help for available commands");
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("proofline={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
