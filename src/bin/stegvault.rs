//! # stegvault Binary Entry Point
//!
//! Thin wrapper that conceals or reveals password-protected messages in
//! image files.
//!
//! ## Usage
//!
//! ```bash
//! stegvault conceal --image cover.png --message "meet at dawn" --output secret.png
//! stegvault reveal --image secret.png
//! stegvault capacity --image cover.png --message "meet at dawn"
//! ```
//!
//! The password is read from `--password` or the `STEGVAULT_PASSWORD`
//! environment variable. With `--json`, results are printed as
//! `{"message": ...}` and failures as `{"error": ..., "kind": ...}`.
//!
//! Exit codes: 0 on success, 2 for errors caused by the input (wrong
//! password, no hidden message, image too small, ...), 1 otherwise.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use serde_json::json;

use steg_vault::common::config::VaultConfig;
use steg_vault::common::logging::init_logger;
use steg_vault::processing::steganography;
use steg_vault::{Password, StegoService, Vault, VaultError};

/// Command-line arguments for the stegvault binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (TOML format)
    ///
    /// Example: config/stegvault.toml
    #[arg(short, long)]
    config: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log at debug level regardless of configuration
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encrypt a message and hide it in an image
    Conceal {
        /// Carrier image (any format the decoder understands)
        #[arg(short, long)]
        image: PathBuf,

        /// Message to hide
        #[arg(short, long)]
        message: String,

        /// Where to write the PNG carrying the message
        #[arg(short, long)]
        output: PathBuf,

        #[arg(short, long, env = "STEGVAULT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Extract and decrypt a message hidden in an image
    Reveal {
        #[arg(short, long)]
        image: PathBuf,

        #[arg(short, long, env = "STEGVAULT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Show how much an image can carry
    Capacity {
        #[arg(short, long)]
        image: PathBuf,

        /// Also check whether this message fits
        #[arg(short, long)]
        message: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command-line arguments
    let args = Args::parse();
    let json = args.json;

    // Load configuration; a missing --config means defaults
    let config = match VaultConfig::load_or_default(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            init_logger(LevelFilter::Info);
            return report_failure(&e.context("failed to load configuration"), json);
        }
    };

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        config.logging.level_filter().unwrap_or(LevelFilter::Info)
    };
    init_logger(level);

    let service = StegoService::new(Vault::new(), config.workers.pool_size);
    info!("🚀 stegvault ready with {} worker(s)", service.pool_size());

    match run(&service, args.command, json).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_failure(&e, json),
    }
}

async fn run(service: &StegoService, command: Command, json: bool) -> Result<()> {
    let request_id = rand::random::<u64>();

    match command {
        Command::Conceal {
            image,
            message,
            output,
            password,
        } => {
            let password = Password::from(password);
            let carrier = read_image(&image)?;

            let png = service.conceal(request_id, carrier, message, password).await?;
            fs::write(&output, &png)
                .with_context(|| format!("failed to write {}", output.display()))?;

            if json {
                println!(
                    "{}",
                    json!({ "output": output.display().to_string(), "bytes": png.len() })
                );
            } else {
                println!("Message hidden in {}", output.display());
            }
        }

        Command::Reveal { image, password } => {
            let password = Password::from(password);
            let carrier = read_image(&image)?;

            let message = service.reveal(request_id, carrier, password).await?;

            if json {
                println!("{}", json!({ "message": message }));
            } else {
                println!("{}", message);
            }
        }

        Command::Capacity { image, message } => {
            let carrier = read_image(&image)?;
            let img = steganography::load_carrier(&carrier)?;

            let capacity_bits = steganography::capacity_bits(img.width(), img.height());
            let max_message_bytes = Vault::max_message_len(capacity_bits);
            let required_bits = message
                .as_ref()
                .map(|m| Vault::required_bits_for_message(m.len()));

            if json {
                println!(
                    "{}",
                    json!({
                        "width": img.width(),
                        "height": img.height(),
                        "capacity_bits": capacity_bits,
                        "max_message_bytes": max_message_bytes,
                        "required_bits": required_bits,
                        "fits": required_bits.map(|bits| bits <= capacity_bits),
                    })
                );
            } else {
                println!("{}x{} image: {} bits", img.width(), img.height(), capacity_bits);
                match max_message_bytes {
                    Some(bytes) => println!("Longest message: {} bytes", bytes),
                    None => println!("Too small to hold any message"),
                }
                if let Some(bits) = required_bits {
                    let verdict = if bits <= capacity_bits { "fits" } else { "does not fit" };
                    println!("Message needs {} bits: {}", bits, verdict);
                }
            }
        }
    }

    Ok(())
}

fn read_image(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Print the failure and pick an exit code from its category.
fn report_failure(err: &anyhow::Error, json: bool) -> ExitCode {
    let vault_error = err.downcast_ref::<VaultError>();

    if json {
        let kind = vault_error.map_or("internal_error", |e| e.kind().as_str());
        println!("{}", json!({ "error": err.to_string(), "kind": kind }));
    } else {
        eprintln!("Error: {:#}", err);
    }

    match vault_error {
        Some(e) if e.is_user_facing() => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}
