//! Session state: the shared store, operation tracking and the user cache

pub mod cache;
pub mod operation;
pub mod store;

pub use cache::SessionCache;
pub use operation::{
    OperationFailure, OperationKind, OperationState, OperationTransition,
};
pub use store::{FavoritesUpdate, SessionState, SessionStore};
