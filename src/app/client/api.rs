//! Typed facade over the gateway
//!
//! [`BikeApi`] issues the calls each operation needs and decodes the JSON
//! payloads into domain models. Payloads that do not match the expected
//! shape become `GatewayError::Decode`, so callers only ever deal with the
//! gateway's four failure kinds.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{Endpoint, Gateway, Method};
use crate::app::geo::Coordinate;
use crate::app::models::{
    AuthMode, Credentials, FavoriteSet, Network, NetworkId, Station, StationId, User, UserId,
};
use crate::errors::GatewayResult;

/// Typed access to the remote endpoints
#[derive(Clone)]
pub struct BikeApi {
    gateway: Arc<dyn Gateway>,
}

impl BikeApi {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// Fetch the full network catalog
    pub async fn networks(&self) -> GatewayResult<Vec<Network>> {
        let payload = self
            .gateway
            .call(Method::Get, &Endpoint::Networks, None)
            .await?;
        let envelope: NetworksEnvelope = decode(payload)?;

        let total = envelope.networks.len();
        let networks: Vec<Network> = envelope
            .networks
            .into_iter()
            .filter_map(NetworkDto::into_model)
            .collect();
        if networks.len() < total {
            warn!(
                "Skipped {} catalog entries with invalid locations",
                total - networks.len()
            );
        }
        debug!("Decoded {} networks", networks.len());
        Ok(networks)
    }

    /// Fetch the live station inventory of one network
    pub async fn stations(&self, network: &NetworkId) -> GatewayResult<Vec<Station>> {
        let payload = self
            .gateway
            .call(Method::Get, &Endpoint::Network(network.clone()), None)
            .await?;
        let body = match decode::<StationsEnvelope>(payload)? {
            StationsEnvelope::Wrapped { network } => network,
            StationsEnvelope::Bare(body) => body,
        };

        let total = body.stations.len();
        let stations: Vec<Station> = body
            .stations
            .into_iter()
            .filter_map(StationDto::into_model)
            .collect();
        if stations.len() < total {
            warn!(
                "Skipped {} stations of {} with invalid locations",
                total - stations.len(),
                network
            );
        }
        debug!("Decoded {} stations for {}", stations.len(), network);
        Ok(stations)
    }

    /// Sign in or create an account
    pub async fn authenticate(
        &self,
        credentials: &Credentials,
        mode: AuthMode,
    ) -> GatewayResult<User> {
        let endpoint = match mode {
            AuthMode::Login => Endpoint::Login,
            AuthMode::Signup => Endpoint::Signup,
        };
        let body = json!({
            "name": credentials.name,
            "email": credentials.email,
            "password": credentials.password,
        });
        let payload = self
            .gateway
            .call(Method::Post, &endpoint, Some(&body))
            .await?;
        let user: UserDto = decode(payload)?;
        Ok(user.into_model())
    }

    /// Fetch the favorite station ids of a user
    pub async fn favorites(&self, user: &UserId) -> GatewayResult<FavoriteSet> {
        let payload = self
            .gateway
            .call(Method::Get, &Endpoint::Favorites(user.clone()), None)
            .await?;
        let entries: Vec<FavoriteDto> = decode(payload)?;
        Ok(entries.into_iter().map(FavoriteDto::into_station_id).collect())
    }

    /// Persist a new favorite
    pub async fn add_favorite(&self, user: &UserId, station: &StationId) -> GatewayResult<()> {
        self.mutate_favorite(Method::Post, user, station).await
    }

    /// Delete a favorite
    pub async fn remove_favorite(&self, user: &UserId, station: &StationId) -> GatewayResult<()> {
        self.mutate_favorite(Method::Delete, user, station).await
    }

    async fn mutate_favorite(
        &self,
        method: Method,
        user: &UserId,
        station: &StationId,
    ) -> GatewayResult<()> {
        let endpoint = Endpoint::Favorite {
            user: user.clone(),
            station: station.clone(),
        };
        // Any successful acknowledgement body is accepted
        self.gateway.call(method, &endpoint, None).await?;
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(payload: Value) -> GatewayResult<T> {
    Ok(serde_json::from_value(payload)?)
}

#[derive(Deserialize)]
struct NetworksEnvelope {
    networks: Vec<NetworkDto>,
}

#[derive(Deserialize)]
struct NetworkDto {
    id: String,
    name: String,
    location: LocationDto,
    #[serde(default)]
    company: Option<CompanyDto>,
}

#[derive(Deserialize)]
struct LocationDto {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CompanyDto {
    One(String),
    Many(Vec<String>),
}

impl NetworkDto {
    fn into_model(self) -> Option<Network> {
        let location = Coordinate::new(self.location.latitude, self.location.longitude).ok()?;
        let company = match self.company {
            Some(CompanyDto::One(name)) => Some(name),
            Some(CompanyDto::Many(names)) if !names.is_empty() => Some(names.join(", ")),
            _ => None,
        };
        Some(Network {
            id: NetworkId(self.id),
            name: self.name,
            location,
            city: self.location.city,
            country: self.location.country,
            company,
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StationsEnvelope {
    Wrapped { network: StationsBody },
    Bare(StationsBody),
}

#[derive(Deserialize)]
struct StationsBody {
    stations: Vec<StationDto>,
}

#[derive(Deserialize)]
struct StationDto {
    id: String,
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    free_bikes: Option<u32>,
    #[serde(default)]
    empty_slots: Option<u32>,
    timestamp: DateTime<Utc>,
}

impl StationDto {
    fn into_model(self) -> Option<Station> {
        let location = Coordinate::new(self.latitude, self.longitude).ok()?;
        Some(Station {
            id: StationId(self.id),
            name: self.name,
            location,
            free_bikes: self.free_bikes.unwrap_or(0),
            empty_slots: self.empty_slots.unwrap_or(0),
            updated_at: self.timestamp,
        })
    }
}

/// Ids arrive as strings from the catalog and as integers from the users backend
#[derive(Deserialize)]
#[serde(untagged)]
enum IdDto {
    Text(String),
    Number(i64),
}

impl IdDto {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct UserDto {
    id: IdDto,
    name: String,
    email: String,
}

impl UserDto {
    fn into_model(self) -> User {
        User {
            id: UserId(self.id.into_string()),
            name: self.name,
            email: self.email,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FavoriteDto {
    Id(IdDto),
    Record { station_id: IdDto },
}

impl FavoriteDto {
    fn into_station_id(self) -> StationId {
        match self {
            Self::Id(id) | Self::Record { station_id: id } => StationId(id.into_string()),
        }
    }
}
