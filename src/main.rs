//! videolog
//!
//! Command-line front end for frame-accurate video logging.
//!
//! # Usage
//!
//! ```bash
//! videolog timecode 125.02 --frame-rate 50
//! videolog seconds +100 --position 10 --frame-rate 25
//! videolog decode 200 3 0 0 0x20 --previous 200,2,0,0,0
//! videolog session --shuttle
//! videolog submit --start 00:01:00:00 --end 00:02:00:00 --talk-id 12 --talks schedule.json
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use videolog::adapters::*;
use videolog::app::DefaultAppContainer;
use videolog::cli::{commands, Cli, Commands};
use videolog::config_initialization::initialize_configuration_hierarchy;
use videolog::domain::model::LogLevel;

/// Main entry point for the videolog CLI application
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Resolve configuration: CLI > Env > File > Defaults
    let config_port = TomlConfigAdapter::new();
    let config = initialize_configuration_hierarchy(
        &config_port,
        cli.config.as_deref(),
        &cli.config_overrides(),
    )
    .await?;

    // Initialize logging
    TracingLogAdapter::new(LogLevel::parse(&config.log_level)?, config.log_json).init()?;
    info!("Starting videolog");

    let rate = config.frame_rate()?;

    // Execute the requested command
    match &cli.command {
        Commands::Timecode(args) => println!("{}", commands::timecode(args, rate)),
        Commands::Seconds(args) => println!("{}", commands::seconds(args, rate)?),
        Commands::Decode(args) => println!("{}", commands::decode(args)?),
        Commands::Session(args) => {
            let container = DefaultAppContainer::new(&config, args.duration)?;
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            commands::session(&container, args.shuttle, stdin, &mut stdout).await?;
        }
        Commands::Submit(args) => println!("{}", commands::submit(args, &config).await?),
    }

    info!("videolog completed successfully");
    Ok(())
}
