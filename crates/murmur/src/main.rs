// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Murmur - feedback intake with critical-feedback alerts.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use murmur::serve;
use murmur_config::model::MurmurConfig;

/// Murmur - feedback intake with critical-feedback alerts.
#[derive(Parser, Debug)]
#[command(name = "murmur", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway, and the consumer unless disabled.
    Serve,
    /// Run only the queue consumer.
    Worker,
    /// Validate and print the effective configuration, secrets redacted.
    Config,
}

fn load(path: Option<&PathBuf>) -> Result<MurmurConfig, ExitCode> {
    let loaded = match path {
        Some(path) => murmur_config::load_and_validate_path(path),
        None => murmur_config::load_and_validate(),
    };
    loaded.map_err(|errors| {
        murmur_config::render_errors(&errors);
        ExitCode::FAILURE
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load(cli.config.as_ref()) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Worker) => serve::run_worker(config).await,
        Some(Commands::Config) => {
            return match toml::to_string_pretty(&config.redacted()) {
                Ok(text) => {
                    print!("{text}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("error: failed to render configuration: {e}");
                    ExitCode::FAILURE
                }
            };
        }
        None => {
            println!("murmur: use --help for available commands");
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["murmur", "worker", "--config", "/tmp/m.toml"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Worker)));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/m.toml")));
    }

    #[test]
    fn redacted_config_renders_as_toml() {
        let config = murmur_config::load_and_validate_str(
            r#"
[email]
source_address = "murmur@example.com"
admin_address = "admin@example.com"
smtp_username = "u"
smtp_password = "hunter2"
"#,
        )
        .unwrap();
        let text = toml::to_string_pretty(&config.redacted()).unwrap();
        assert!(text.contains("admin_address = \"admin@example.com\""));
        assert!(!text.contains("hunter2"));
    }
}
