//! Command handlers for BikeSee CLI
//!
//! This module implements the command handlers that coordinate between CLI
//! arguments and the core application functionality. Every handler runs its
//! operations through the shared [`CommandContext`] and reads results back
//! from the session store.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::app::{
    km_to_miles, resolve_network, AuthMode, Controller, Coordinate, Credentials,
    FavoriteSynchronizer, Gateway, HttpGateway, Network, NetworkId, OperationFailure, OperationKind,
    SessionStore,
    Station, StationId, ToggleOutcome, User,
};
use crate::cli::progress::{with_spinner, ProgressConfig};
use crate::cli::prompt::{prompt_password, validate_email};
use crate::cli::{
    FavoritesAction, FavoritesArgs, LoginArgs, NetworksArgs, PointArgs, SignupArgs, StationsArgs,
};
use crate::config::{AppConfig, SessionConfig};
use crate::errors::{AppError, Result};

/// Shared state for one CLI invocation
pub struct CommandContext {
    pub store: Arc<SessionStore>,
    pub controller: Arc<Controller>,
    pub favorites: FavoriteSynchronizer,
    pub progress: ProgressConfig,
    restore_on_start: bool,
}

impl CommandContext {
    /// Build the HTTP gateway and session from configuration
    pub fn from_config(config: &AppConfig, quiet: bool) -> Result<Self> {
        let (client_config, api_config, session_config) = config.to_runtime_config()?;
        let gateway = HttpGateway::new(&client_config, api_config)?;
        let progress = ProgressConfig {
            enabled: !quiet,
            ..Default::default()
        };
        Ok(Self::new(Arc::new(gateway), &session_config, progress))
    }

    pub fn new(
        gateway: Arc<dyn Gateway>,
        session_config: &SessionConfig,
        progress: ProgressConfig,
    ) -> Self {
        let store = Arc::new(SessionStore::new());
        let controller = Arc::new(
            Controller::new(gateway, Arc::clone(&store)).with_session_cache(session_config.cache()),
        );
        let favorites = FavoriteSynchronizer::new(Arc::clone(&controller));

        Self {
            store,
            controller,
            favorites,
            progress,
            restore_on_start: session_config.restore_on_start,
        }
    }

    /// Sign the cached user back in when configured to
    async fn restore(&self) -> Option<User> {
        if !self.restore_on_start {
            debug!("Session restore disabled by configuration");
            return None;
        }
        let controller = Arc::clone(&self.controller);
        let user = with_spinner(
            &self.progress,
            &self.store,
            "Restoring session...",
            async move { controller.restore_session().await },
        )
        .await;

        if user.is_some() {
            if let Some(failure) = self.store.operation_state().error {
                warn!("Favorites unavailable: {}", failure.detail);
                println!("⚠️  {}", failure);
            }
        }
        user
    }

    async fn load_catalog(&self) -> Result<usize> {
        let controller = Arc::clone(&self.controller);
        let count = with_spinner(
            &self.progress,
            &self.store,
            "Loading networks...",
            async move { controller.load_catalog().await },
        )
        .await?;
        Ok(count)
    }
}

/// Handle the networks command
pub async fn handle_networks(args: NetworksArgs, ctx: &CommandContext) -> Result<()> {
    ctx.load_catalog().await?;

    let catalog = ctx.store.catalog();
    let matching = filter_networks(&catalog, args.search.as_deref());
    let shown = args.limit.unwrap_or(matching.len()).min(matching.len());
    info!("{} of {} networks match", matching.len(), catalog.len());

    if matching.is_empty() {
        println!("No networks found.");
        return Ok(());
    }

    for network in &matching[..shown] {
        println!("{:<32} {}", network.id, network.display_name());
    }
    if shown < matching.len() {
        println!("  ... and {} more networks", matching.len() - shown);
    }
    Ok(())
}

/// Handle the nearest command
pub async fn handle_nearest(point: PointArgs, ctx: &CommandContext) -> Result<()> {
    let point = Coordinate::new(point.lat, point.lon)?;
    ctx.load_catalog().await?;

    let catalog = ctx.store.catalog();
    let network = resolve_network(point, &catalog)?;
    let km = crate::app::distance(point, network.location)?;

    println!("📍 Nearest network to {}:", point);
    println!("  {} ({})", network.display_name(), network.id);
    if let Some(company) = &network.company {
        println!("  Operated by {}", company);
    }
    println!("  {:.1} km / {:.1} mi away", km, km_to_miles(km));
    Ok(())
}

/// Handle the stations command
pub async fn handle_stations(args: StationsArgs, ctx: &CommandContext) -> Result<()> {
    args.validate().map_err(AppError::generic)?;

    ctx.restore().await;
    if args.favorites_only && ctx.store.user().is_none() {
        return Err(AppError::generic(
            "Not signed in. Run 'bikesee login' to use favorites.",
        ));
    }

    let point = match args.point() {
        Some(point) => Some(Coordinate::new(point.lat, point.lon)?),
        None => None,
    };

    let network = match (point, args.network.as_deref()) {
        (Some(point), _) => {
            ctx.load_catalog().await?;
            let controller = Arc::clone(&ctx.controller);
            let outcome = with_spinner(
                &ctx.progress,
                &ctx.store,
                "Loading stations...",
                async move { controller.locate(point).await },
            )
            .await?;
            if !outcome.committed {
                return Err(stations_error(ctx));
            }
            outcome.network
        }
        (None, Some(id)) => {
            let network = NetworkId::from(id);
            let controller = Arc::clone(&ctx.controller);
            let target = network.clone();
            with_spinner(
                &ctx.progress,
                &ctx.store,
                "Loading stations...",
                async move { controller.load_stations(&target).await },
            )
            .await?;
            network
        }
        (None, None) => return Err(AppError::generic("Specify --network or --lat and --lon")),
    };

    let snapshot = ctx.store.snapshot();
    let mut stations: Vec<&Station> = if args.favorites_only {
        snapshot.favorite_stations()
    } else {
        snapshot.stations.iter().collect()
    };
    if let Some(point) = point {
        sort_by_distance(&mut stations, point);
    }

    println!("🚲 Stations of {} ({} total)", network, snapshot.stations.len());
    if stations.is_empty() {
        println!("  No stations to show.");
        return Ok(());
    }

    let shown = args.limit.unwrap_or(stations.len()).min(stations.len());
    for station in &stations[..shown] {
        let marker = if snapshot.favorites.contains(&station.id) {
            "★"
        } else {
            " "
        };
        let distance = match point {
            Some(point) => match station.distance_from(point) {
                Ok(km) => format!(" {:>6.2} mi", km_to_miles(km)),
                Err(_) => String::new(),
            },
            None => String::new(),
        };
        println!(
            "{} {:<40} {:>3} bikes {:>3} docks{}  [{}]",
            marker, station.name, station.free_bikes, station.empty_slots, distance, station.id
        );
    }
    if shown < stations.len() {
        println!("  ... and {} more stations", stations.len() - shown);
    }
    Ok(())
}

/// Handle the login command
pub async fn handle_login(args: LoginArgs, ctx: &CommandContext) -> Result<()> {
    validate_email(&args.email)?;
    let password = prompt_password()?;
    let credentials = Credentials::new(args.display_name(), args.email.trim(), password);
    authenticate(ctx, credentials, AuthMode::Login, "Signing in...").await
}

/// Handle the signup command
pub async fn handle_signup(args: SignupArgs, ctx: &CommandContext) -> Result<()> {
    validate_email(&args.email)?;
    if args.name.trim().is_empty() {
        return Err(AppError::generic("Name cannot be empty"));
    }
    let password = prompt_password()?;
    let credentials = Credentials::new(args.name.trim(), args.email.trim(), password);
    authenticate(ctx, credentials, AuthMode::Signup, "Creating account...").await
}

async fn authenticate(
    ctx: &CommandContext,
    credentials: Credentials,
    mode: AuthMode,
    message: &str,
) -> Result<()> {
    let controller = Arc::clone(&ctx.controller);
    let result = with_spinner(&ctx.progress, &ctx.store, message, async move {
        controller.authenticate(&credentials, mode).await
    })
    .await;

    match result {
        Ok(user) => {
            println!("✅ Signed in as {} <{}>", user.name, user.email);
            println!("   {} favorite stations", ctx.store.favorites().len());
            Ok(())
        }
        // The account step succeeded; only the favorites step failed
        Err(failure) if failure.operation == OperationKind::LoadFavorites => {
            if let Some(user) = ctx.store.user() {
                println!("✅ Signed in as {} <{}>", user.name, user.email);
            }
            Err(failure.into())
        }
        Err(failure) => Err(failure.into()),
    }
}

/// Handle the logout command
pub async fn handle_logout(ctx: &CommandContext) -> Result<()> {
    let user = ctx.restore().await;
    ctx.controller.sign_out().await;

    match user {
        Some(user) => println!("👋 Signed out {}", user.email),
        None => println!("Not signed in."),
    }
    Ok(())
}

/// Handle the favorites command
pub async fn handle_favorites(args: FavoritesArgs, ctx: &CommandContext) -> Result<()> {
    let Some(user) = ctx.restore().await else {
        return Err(AppError::generic(
            "Not signed in. Run 'bikesee login' first.",
        ));
    };

    // Toggling against a set that failed to load would pick the wrong action
    if let Some(failure) = favorites_load_failure(ctx) {
        return Err(failure.into());
    }

    match args.action {
        FavoritesAction::List => {
            let favorites = ctx.store.favorites();
            println!("★ {} favorite stations for {}", favorites.len(), user.email);
            for station in favorites.iter() {
                println!("  {}", station);
            }
            Ok(())
        }
        FavoritesAction::Toggle { station } => {
            let station = StationId::from(station.as_str());
            let outcome = {
                let favorites = &ctx.favorites;
                let target = station.clone();
                with_spinner(&ctx.progress, &ctx.store, "Updating favorites...", async move {
                    favorites.toggle(&target, Some(&user)).await
                })
                .await
            };
            report_toggle(&station, outcome)
        }
    }
}

fn report_toggle(station: &StationId, outcome: ToggleOutcome) -> Result<()> {
    match outcome {
        ToggleOutcome::Added => println!("★ {} added to favorites", station),
        ToggleOutcome::Removed => println!("☆ {} removed from favorites", station),
        ToggleOutcome::Failed(failure) => return Err(failure.into()),
        other => {
            return Err(AppError::generic(format!("Station {}: {}", station, other)));
        }
    }
    Ok(())
}

fn favorites_load_failure(ctx: &CommandContext) -> Option<OperationFailure> {
    ctx.store
        .operation_state()
        .error
        .filter(|failure| failure.operation == OperationKind::LoadFavorites)
}

fn stations_error(ctx: &CommandContext) -> AppError {
    match ctx.store.operation_state().error {
        Some(failure) => failure.into(),
        None => AppError::generic("Stations changed while loading; try again"),
    }
}

/// Networks whose id, name or city contains `search` (case-insensitive)
fn filter_networks<'a>(catalog: &'a [Network], search: Option<&str>) -> Vec<&'a Network> {
    let Some(search) = search.map(str::to_lowercase) else {
        return catalog.iter().collect();
    };
    catalog
        .iter()
        .filter(|network| {
            network.id.as_str().to_lowercase().contains(&search)
                || network.name.to_lowercase().contains(&search)
                || network
                    .city
                    .as_deref()
                    .is_some_and(|city| city.to_lowercase().contains(&search))
        })
        .collect()
}

fn sort_by_distance(stations: &mut [&Station], point: Coordinate) {
    stations.sort_by(|a, b| {
        let a = a.distance_from(point).unwrap_or(f64::INFINITY);
        let b = b.distance_from(point).unwrap_or(f64::INFINITY);
        a.total_cmp(&b)
    });
}
