//! Nearest-network resolution and change detection
//!
//! Map panning emits a stream of near-identical coordinates. The resolver
//! itself is pure; [`NetworkTracker`] remembers the last answer so callers
//! only refetch stations when the nearest network actually changes.

use parking_lot::Mutex;
use tracing::debug;

use crate::app::geo::{self, Coordinate};
use crate::app::models::{Network, NetworkId};
use crate::errors::{LocationError, LocationResult};

/// Find the network closest to `point`
///
/// Ties are broken in favour of the earliest network in `catalog`.
///
/// # Errors
///
/// - `LocationError::EmptyCatalog` if `catalog` is empty
/// - `LocationError::InvalidCoordinate` if `point` or a network location is
///   out of range
pub fn resolve_network(point: Coordinate, catalog: &[Network]) -> LocationResult<&Network> {
    point.validate()?;

    let mut closest: Option<(&Network, f64)> = None;
    for network in catalog {
        let km = geo::distance(point, network.location)?;
        match closest {
            // Strict comparison keeps the first network on ties
            Some((_, best)) if km >= best => {}
            _ => closest = Some((network, km)),
        }
    }

    let (network, km) = closest.ok_or(LocationError::EmptyCatalog)?;
    debug!(
        "Resolved {} to network {} ({:.2} km away)",
        point, network.id, km
    );
    Ok(network)
}

/// Remembers the most recently resolved network
#[derive(Debug, Default)]
pub struct NetworkTracker {
    current: Mutex<Option<NetworkId>>,
}

impl NetworkTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly resolved network, returning `true` if it differs from
    /// the previous one
    pub fn observe(&self, network: &NetworkId) -> bool {
        let mut current = self.current.lock();
        if current.as_ref() == Some(network) {
            return false;
        }
        *current = Some(network.clone());
        true
    }

    /// The most recently observed network
    pub fn current(&self) -> Option<NetworkId> {
        self.current.lock().clone()
    }

    /// Run `commit` only while `network` is still the current resolution
    ///
    /// The tracker stays locked for the duration of `commit`, so a concurrent
    /// [`observe`](Self::observe) either happens before the check (and the
    /// commit is skipped) or after the commit has landed.
    pub fn commit_if_current(&self, network: &NetworkId, commit: impl FnOnce()) -> bool {
        let current = self.current.lock();
        if current.as_ref() != Some(network) {
            return false;
        }
        commit();
        true
    }

    /// Forget the last resolution so the next observation counts as a change
    pub fn reset(&self) {
        *self.current.lock() = None;
    }

    /// Forget `network` if it is still the current resolution
    pub fn forget(&self, network: &NetworkId) {
        let mut current = self.current.lock();
        if current.as_ref() == Some(network) {
            *current = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(id: &str, latitude: f64, longitude: f64) -> Network {
        Network::new(id, id.to_uppercase(), Coordinate::new(latitude, longitude).unwrap())
    }

    fn point(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate::new(latitude, longitude).unwrap()
    }

    #[test]
    fn test_resolves_nyc_over_sf() {
        let catalog = vec![network("nyc", 40.7, -74.0), network("sf", 37.8, -122.4)];
        let resolved = resolve_network(point(40.75, -73.9), &catalog).unwrap();
        assert_eq!(resolved.id.as_str(), "nyc");
    }

    #[test]
    fn test_empty_catalog_fails() {
        let result = resolve_network(point(0.0, 0.0), &[]);
        assert_eq!(result, Err(LocationError::EmptyCatalog));
    }

    #[test]
    fn test_invalid_point_fails_before_catalog_check() {
        let bad = Coordinate {
            latitude: -91.0,
            longitude: 0.0,
        };
        assert!(matches!(
            resolve_network(bad, &[]),
            Err(LocationError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_tie_breaks_to_first_in_catalog() {
        let catalog = vec![
            network("east", 0.0, 1.0),
            network("west", 0.0, -1.0),
            network("east-again", 0.0, 1.0),
        ];
        let resolved = resolve_network(point(0.0, 0.0), &catalog).unwrap();
        assert_eq!(resolved.id.as_str(), "east");
    }

    #[test]
    fn test_result_has_no_strictly_closer_network() {
        let catalog = vec![
            network("london", 51.5, -0.12),
            network("paris", 48.85, 2.35),
            network("berlin", 52.52, 13.4),
            network("madrid", 40.42, -3.7),
            network("rome", 41.9, 12.5),
        ];
        let samples = [
            point(50.0, 0.0),
            point(45.0, 8.0),
            point(38.0, -5.0),
            point(55.0, 20.0),
            point(-10.0, 100.0),
        ];

        for sample in samples {
            let resolved = resolve_network(sample, &catalog).unwrap();
            let best = geo::distance(sample, resolved.location).unwrap();
            for other in &catalog {
                assert!(geo::distance(sample, other.location).unwrap() >= best);
            }
        }
    }

    #[test]
    fn test_catalog_is_not_mutated() {
        let catalog = vec![network("a", 1.0, 1.0), network("b", 2.0, 2.0)];
        let before = catalog.clone();
        let _ = resolve_network(point(1.5, 1.5), &catalog).unwrap();
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_tracker_reports_changes_only() {
        let tracker = NetworkTracker::new();
        let nyc = NetworkId::from("nyc");
        let sf = NetworkId::from("sf");

        assert!(tracker.observe(&nyc));
        assert!(!tracker.observe(&nyc));
        assert!(!tracker.observe(&nyc));
        assert!(tracker.observe(&sf));
        assert_eq!(tracker.current(), Some(sf.clone()));

        tracker.reset();
        assert_eq!(tracker.current(), None);
        assert!(tracker.observe(&sf));
    }

    #[test]
    fn test_commit_only_while_current() {
        let tracker = NetworkTracker::new();
        let nyc = NetworkId::from("nyc");
        let sf = NetworkId::from("sf");
        let mut commits = Vec::new();

        tracker.observe(&nyc);
        assert!(tracker.commit_if_current(&nyc, || commits.push("nyc")));
        tracker.observe(&sf);
        assert!(!tracker.commit_if_current(&nyc, || commits.push("stale")));
        assert_eq!(commits, vec!["nyc"]);

        tracker.forget(&nyc);
        assert_eq!(tracker.current(), Some(sf.clone()));
        tracker.forget(&sf);
        assert_eq!(tracker.current(), None);
    }
}
