//! BikeSee CLI application
//!
//! Command-line interface for finding bike-share networks and stations.
//! Loads live station availability and manages a signed-in user's favorites.

use std::process;

use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use bikesee::cli::{
    handle_favorites, handle_login, handle_logout, handle_nearest, handle_networks, handle_signup,
    handle_stations, Cli, CommandContext, Commands,
};
use bikesee::config::{AppConfig, LoggingConfig};
use bikesee::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        debug!("Command failed with {} error: {:?}", e.category(), e);
        eprintln!("Error: {}", e);
        if e.is_recoverable() {
            eprintln!("This looks temporary; try again in a moment.");
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();

    if cli.global.config.is_none() {
        if let Err(e) = AppConfig::initialize_first_run().await {
            eprintln!("⚠️  Could not create default configuration: {}", e);
        }
    }
    let config = AppConfig::load(cli.global.config.clone()).await?;

    init_logging(&cli, &config.logging);

    info!("BikeSee v{} starting", env!("CARGO_PKG_VERSION"));

    let ctx = CommandContext::from_config(&config, cli.global.quiet)?;

    match cli.command {
        Commands::Networks(args) => {
            info!("Executing networks command");
            handle_networks(args, &ctx).await
        }
        Commands::Nearest(point) => {
            info!("Executing nearest command");
            handle_nearest(point, &ctx).await
        }
        Commands::Stations(args) => {
            info!("Executing stations command");
            handle_stations(args, &ctx).await
        }
        Commands::Login(args) => {
            info!("Executing login command");
            handle_login(args, &ctx).await
        }
        Commands::Signup(args) => {
            info!("Executing signup command");
            handle_signup(args, &ctx).await
        }
        Commands::Logout => {
            info!("Executing logout command");
            handle_logout(&ctx).await
        }
        Commands::Favorites(args) => {
            info!("Executing favorites command");
            handle_favorites(args, &ctx).await
        }
    }
}

/// Initialize logging from CLI verbosity, falling back to the configured level
fn init_logging(cli: &Cli, logging: &LoggingConfig) {
    let log_level = cli
        .log_level()
        .map(|level| level.to_string().to_lowercase())
        .unwrap_or_else(|| logging.level.clone());

    let directive = format!("bikesee={}", log_level)
        .parse()
        .unwrap_or_else(|_| "bikesee=info".parse().expect("static directive is valid"));

    let filter = EnvFilter::from_default_env().add_directive(directive);

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(logging.colored_output)
        .with_level(cli.global.very_verbose) // Show levels only in very verbose mode
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
