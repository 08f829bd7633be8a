//! Command-line argument parsing for BikeSee
//!
//! This module defines the CLI structure using clap derive macros,
//! providing a user-friendly interface for browsing bike-share networks,
//! finding nearby stations, signing in, and managing favorite stations.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// BikeSee - Find bike-share stations near you
#[derive(Parser, Debug)]
#[command(
    name = "bikesee",
    version,
    about = "Find bike-share networks and stations near a location",
    long_about = "Browse the public bike-share network catalog, find the network nearest to a location,
list its live station availability, and keep a list of favorite stations."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (trace level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List bike-share networks
    Networks(NetworksArgs),

    /// Find the network nearest to a location
    Nearest(PointArgs),

    /// List the stations of a network
    Stations(StationsArgs),

    /// Sign in to an existing account
    Login(LoginArgs),

    /// Create an account
    Signup(SignupArgs),

    /// Sign out and forget the cached session
    Logout,

    /// Manage favorite stations
    Favorites(FavoritesArgs),
}

/// Arguments for the networks command
#[derive(Args, Debug, Clone, Default)]
pub struct NetworksArgs {
    /// Maximum number of networks to show
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Only show networks whose name, city or id contains TEXT
    #[arg(short, long, value_name = "TEXT")]
    pub search: Option<String>,
}

/// A location on the map
#[derive(Args, Debug, Clone, Copy, PartialEq)]
pub struct PointArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,
}

/// Arguments for the stations command
#[derive(Args, Debug, Clone, Default)]
pub struct StationsArgs {
    /// Network id (e.g. "citi-bike-nyc")
    #[arg(short, long, conflicts_with_all = ["lat", "lon"])]
    pub network: Option<String>,

    /// Latitude; the nearest network is used
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude; the nearest network is used
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Only show favorite stations
    #[arg(short, long)]
    pub favorites_only: bool,

    /// Maximum number of stations to show
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the login command
#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    /// Account email
    #[arg(short, long)]
    pub email: String,

    /// Display name (optional for login)
    #[arg(short, long)]
    pub name: Option<String>,
}

/// Arguments for the signup command
#[derive(Args, Debug, Clone)]
pub struct SignupArgs {
    /// Display name
    #[arg(short, long)]
    pub name: String,

    /// Account email
    #[arg(short, long)]
    pub email: String,
}

/// Arguments for favorites management
#[derive(Args, Debug)]
pub struct FavoritesArgs {
    #[command(subcommand)]
    pub action: FavoritesAction,
}

/// Favorites actions
#[derive(Subcommand, Debug)]
pub enum FavoritesAction {
    /// List favorite station ids
    List,

    /// Add the station if it is not a favorite, remove it otherwise
    Toggle {
        /// Station id
        #[arg(value_name = "STATION_ID")]
        station: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level forced by global arguments, if any
    pub fn log_level(&self) -> Option<tracing::Level> {
        if self.global.quiet {
            Some(tracing::Level::WARN)
        } else if self.global.very_verbose {
            Some(tracing::Level::TRACE)
        } else if self.global.verbose {
            Some(tracing::Level::DEBUG)
        } else {
            None
        }
    }
}

impl StationsArgs {
    /// Check that exactly one way of picking the network was given
    pub fn validate(&self) -> Result<(), String> {
        match (&self.network, self.lat, self.lon) {
            (Some(_), None, None) | (None, Some(_), Some(_)) => Ok(()),
            (Some(_), _, _) => Err("Use either --network or --lat/--lon, not both".to_string()),
            (None, None, None) => Err("Specify --network or --lat and --lon".to_string()),
            (None, _, _) => Err("Both --lat and --lon are required".to_string()),
        }
    }

    /// The location given on the command line, if any
    pub fn point(&self) -> Option<PointArgs> {
        Some(PointArgs {
            lat: self.lat?,
            lon: self.lon?,
        })
    }
}

impl LoginArgs {
    /// Name sent with the login request; the backend keys on email
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stations_args_validation() {
        let by_network = StationsArgs {
            network: Some("citi-bike-nyc".to_string()),
            ..Default::default()
        };
        assert!(by_network.validate().is_ok());
        assert!(by_network.point().is_none());

        let by_point = StationsArgs {
            lat: Some(40.7),
            lon: Some(-74.0),
            ..Default::default()
        };
        assert!(by_point.validate().is_ok());
        assert_eq!(
            by_point.point(),
            Some(PointArgs {
                lat: 40.7,
                lon: -74.0
            })
        );

        assert!(StationsArgs::default().validate().is_err());
        assert!(StationsArgs {
            lat: Some(40.7),
            ..Default::default()
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_parses_negative_coordinates() {
        let cli = Cli::try_parse_from(["bikesee", "nearest", "--lat", "-33.87", "--lon", "-151.2"])
            .unwrap();
        match cli.command {
            Commands::Nearest(point) => {
                assert_eq!(point.lat, -33.87);
                assert_eq!(point.lon, -151.2);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_stations_network_conflicts_with_point() {
        let result = Cli::try_parse_from([
            "bikesee",
            "stations",
            "--network",
            "nyc",
            "--lat",
            "1.0",
            "--lon",
            "2.0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_favorites_toggle_parsing() {
        let cli = Cli::try_parse_from(["bikesee", "-v", "favorites", "toggle", "abc123"]).unwrap();
        assert!(cli.global.verbose);
        match cli.command {
            Commands::Favorites(FavoritesArgs {
                action: FavoritesAction::Toggle { station },
            }) => assert_eq!(station, "abc123"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_log_level() {
        let quiet = Cli::try_parse_from(["bikesee", "-q", "logout"]).unwrap();
        let verbose = Cli::try_parse_from(["bikesee", "logout", "--verbose"]).unwrap();
        let plain = Cli::try_parse_from(["bikesee", "logout"]).unwrap();

        assert_eq!(quiet.log_level(), Some(tracing::Level::WARN));
        assert_eq!(verbose.log_level(), Some(tracing::Level::DEBUG));
        assert_eq!(plain.log_level(), None);
    }
}
