//! CLI module for videolog
//!
//! This module handles command-line argument parsing and command execution.

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// videolog - frame-accurate video logging
///
/// Converts between seconds and SMPTE-style timecode, decodes shuttle
/// controller reports, runs interactive logging sessions and submits clip
/// jobs to the rendering backend.
#[derive(Parser, Debug)]
#[command(name = "videolog")]
#[command(about = "Frame-accurate video logging with timecode entry and shuttle control")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: videolog.toml, config/videolog.toml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Logging level
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Frame rate in frames per second
    #[arg(long, global = true)]
    pub frame_rate: Option<u32>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Explicit flags as config overrides, highest precedence
    pub fn config_overrides(&self) -> Vec<(&'static str, String)> {
        let mut overrides = Vec::new();
        if let Some(level) = &self.log_level {
            overrides.push(("log_level", level.clone()));
        }
        if let Some(rate) = self.frame_rate {
            overrides.push(("frame_rate", rate.to_string()));
        }
        if let Commands::Submit(args) = &self.command {
            if let Some(url) = &args.api_base_url {
                overrides.push(("api_base_url", url.clone()));
            }
        }
        overrides
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Format a position in seconds as HH:MM:SS:FF
    Timecode(args::TimecodeArgs),
    /// Parse an operator entry into a seek target
    Seconds(args::SecondsArgs),
    /// Decode one shuttle input report
    Decode(args::DecodeArgs),
    /// Interactive logging session driven from stdin
    Session(args::SessionArgs),
    /// Validate and submit a clip job
    Submit(args::SubmitArgs),
}
