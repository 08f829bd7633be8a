//! Command-line interface components
//!
//! This module contains CLI-specific code for the BikeSee application,
//! including argument parsing, the loading spinner, and user interaction.

pub mod args;
pub mod commands;
pub mod progress;
pub mod prompt;

pub use args::{
    Cli, Commands, FavoritesAction, FavoritesArgs, GlobalArgs, LoginArgs, NetworksArgs, PointArgs,
    SignupArgs, StationsArgs,
};
pub use commands::{
    handle_favorites, handle_login, handle_logout, handle_nearest, handle_networks, handle_signup,
    handle_stations, CommandContext,
};
pub use progress::{with_spinner, OperationSpinner, ProgressConfig};
