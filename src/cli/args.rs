//! Command-line argument definitions

use clap::Args;

/// Arguments for the timecode command
#[derive(Args, Debug)]
pub struct TimecodeArgs {
    /// Media position in seconds
    #[arg(allow_negative_numbers = true)]
    pub seconds: f64,
}

/// Arguments for the seconds command
#[derive(Args, Debug)]
pub struct SecondsArgs {
    /// Operator entry: optional +/- and up to 8 digits, colons allowed
    #[arg(allow_hyphen_values = true)]
    pub text: String,

    /// Current position, used to resolve relative entries
    #[arg(long, default_value_t = 0.0)]
    pub position: f64,
}

/// Arguments for the decode command
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Report bytes, decimal or 0x-prefixed hex
    #[arg(required = true)]
    pub bytes: Vec<String>,

    /// Previous report, comma separated, for dial direction
    #[arg(long, value_delimiter = ',')]
    pub previous: Option<Vec<String>>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the session command
#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Connect a shuttle controller at startup
    #[arg(long)]
    pub shuttle: bool,

    /// Media duration in seconds (unbounded when omitted)
    #[arg(long)]
    pub duration: Option<f64>,
}

/// Arguments for the submit command
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// In-point timecode
    #[arg(long)]
    pub start: String,

    /// Out-point timecode
    #[arg(long)]
    pub end: String,

    /// Talk id; with --talks, title and presenter are filled from the catalog
    #[arg(long)]
    pub talk_id: Option<String>,

    #[arg(long)]
    pub presenter: Option<String>,

    #[arg(long)]
    pub title: Option<String>,

    /// Source video name
    #[arg(long, default_value = "")]
    pub video: String,

    /// Schedule JSON file with talk metadata
    #[arg(long)]
    pub talks: Option<String>,

    /// Validate only; do not post the job
    #[arg(long)]
    pub dry_run: bool,

    /// Override the backend API base URL
    #[arg(long)]
    pub api_base_url: Option<String>,
}
