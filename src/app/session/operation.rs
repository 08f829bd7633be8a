//! Loading and error tracking for named operations

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::messages;
use crate::errors::{GatewayError, GatewayErrorKind};

/// The named asynchronous operations the controller runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    LoadCatalog,
    LoadStations,
    Login,
    Signup,
    LoadFavorites,
    AddFavorite,
    RemoveFavorite,
}

impl OperationKind {
    /// User-facing message shown when the operation fails
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::LoadCatalog => messages::CATALOG_FAILED,
            Self::LoadStations => messages::STATIONS_FAILED,
            Self::Login => messages::LOGIN_FAILED,
            Self::Signup => messages::SIGNUP_FAILED,
            Self::LoadFavorites => messages::FAVORITES_FAILED,
            Self::AddFavorite => messages::ADD_FAVORITE_FAILED,
            Self::RemoveFavorite => messages::REMOVE_FAVORITE_FAILED,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::LoadCatalog => "load_catalog",
            Self::LoadStations => "load_stations",
            Self::Login => "login",
            Self::Signup => "signup",
            Self::LoadFavorites => "load_favorites",
            Self::AddFavorite => "add_favorite",
            Self::RemoveFavorite => "remove_favorite",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why the most recent failed operation failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationFailure {
    pub operation: OperationKind,
    pub kind: GatewayErrorKind,
    pub message: String,
    /// Underlying gateway error, for logs and verbose output
    pub detail: String,
}

impl OperationFailure {
    pub fn new(operation: OperationKind, error: &GatewayError) -> Self {
        Self {
            operation,
            kind: error.kind(),
            message: operation.failure_message().to_string(),
            detail: error.to_string(),
        }
    }
}

impl fmt::Display for OperationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for OperationFailure {}

/// What the presentation layer sees
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationState {
    pub loading: bool,
    pub error: Option<OperationFailure>,
}

/// Transitions accepted by the store's operation tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationTransition {
    /// An operation began; clears the previous error
    Started(OperationKind),
    /// An operation failed; records the error
    Failed(OperationFailure),
    /// An operation settled, successfully or not
    Finished(OperationKind),
}

/// In-flight counts per operation plus the last error
#[derive(Debug, Clone, Default)]
pub(crate) struct OperationTracker {
    in_flight: HashMap<OperationKind, usize>,
    error: Option<OperationFailure>,
}

impl OperationTracker {
    pub(crate) fn apply(&mut self, transition: OperationTransition) {
        match transition {
            OperationTransition::Started(kind) => {
                *self.in_flight.entry(kind).or_insert(0) += 1;
                self.error = None;
            }
            OperationTransition::Failed(failure) => {
                self.error = Some(failure);
            }
            OperationTransition::Finished(kind) => {
                if let Some(count) = self.in_flight.get_mut(&kind) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        self.in_flight.remove(&kind);
                    }
                }
            }
        }
    }

    pub(crate) fn state(&self) -> OperationState {
        OperationState {
            loading: !self.in_flight.is_empty(),
            error: self.error.clone(),
        }
    }
}
