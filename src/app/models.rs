//! Data models for bike-share networks, stations and users
//!
//! These are the domain types the core works with. Wire formats are decoded
//! into these types by the client layer; nothing here knows about HTTP.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::geo::{self, Coordinate};
use crate::errors::LocationResult;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Borrow the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Identifier of a bike-share network (e.g. `citi-bike-nyc`)
    NetworkId
);
string_id!(
    /// Identifier of a docking station, unique within the catalog host
    StationId
);
string_id!(
    /// Identifier of a user account on the users backend
    UserId
);

/// A bike-share operator's service area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub id: NetworkId,
    pub name: String,
    pub location: Coordinate,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

impl Network {
    /// Create a network with only the fields the resolver needs
    pub fn new(id: impl Into<NetworkId>, name: impl Into<String>, location: Coordinate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location,
            city: None,
            country: None,
            company: None,
        }
    }

    /// Human-readable label including the city when known
    pub fn display_name(&self) -> String {
        match (self.city.as_deref(), self.country.as_deref()) {
            (Some(city), Some(country)) => format!("{} · {}, {}", self.name, city, country),
            (Some(city), None) => format!("{} · {}", self.name, city),
            _ => self.name.clone(),
        }
    }
}

/// A physical docking point with live availability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub location: Coordinate,
    pub free_bikes: u32,
    pub empty_slots: u32,
    pub updated_at: DateTime<Utc>,
}

impl Station {
    /// Distance in kilometres from `point` to this station
    pub fn distance_from(&self, point: Coordinate) -> LocationResult<f64> {
        geo::distance(point, self.location)
    }

    /// Total docks reported for the station
    pub fn capacity(&self) -> u32 {
        self.free_bikes.saturating_add(self.empty_slots)
    }
}

/// A signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// Sign-in details sent to the users backend
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

// Never print the password.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Whether `authenticate` signs into an existing account or creates one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthMode {
    Login,
    Signup,
}

/// Direction of a favorite mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FavoriteAction {
    Add,
    Remove,
}

impl fmt::Display for FavoriteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => f.write_str("add"),
            Self::Remove => f.write_str("remove"),
        }
    }
}

/// The signed-in user's favorite stations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteSet(BTreeSet<StationId>);

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, station: &StationId) -> bool {
        self.0.contains(station)
    }

    /// Insert a station, returning `false` if it was already present
    pub fn insert(&mut self, station: StationId) -> bool {
        self.0.insert(station)
    }

    /// Remove a station, returning `false` if it was not present
    pub fn remove(&mut self, station: &StationId) -> bool {
        self.0.remove(station)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StationId> {
        self.0.iter()
    }
}

impl FromIterator<StationId> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = StationId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
