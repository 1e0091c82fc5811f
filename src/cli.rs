//! Command-line interface definitions for Radio AI.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every option is optional; unset options fall back to the YAML config file
//! and then to built-in defaults (see [`crate::config`]).

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the Radio AI application.
///
/// # Examples
///
/// ```sh
/// # Defaults: ./creds.json, ./request.txt, audio service on localhost:3000
/// radio_ai
///
/// # Pick from ten business stories and use a remote audio bridge
/// radio_ai --articles 10 --section business --base-url https://suno.example.com
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to the JSON credentials file
    #[arg(long)]
    pub creds: Option<PathBuf>,

    /// Path to the lyrics request template
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Base URL of the audio generation service
    #[arg(long, env = "SUNO_BASE_URL")]
    pub base_url: Option<String>,

    /// Number of articles to offer
    #[arg(short = 'n', long)]
    pub articles: Option<usize>,

    /// Top Stories section to list (world, business, science, ...)
    #[arg(short, long)]
    pub section: Option<String>,

    /// Editor used to revise the prompt
    #[arg(long, env = "EDITOR", default_value = "nano")]
    pub editor: String,
}
