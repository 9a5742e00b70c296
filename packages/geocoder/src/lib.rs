#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Location resolution for blotter records.
//!
//! Resolves free-text locations to WGS84 coordinates through a geocoding
//! provider, memoized for the process lifetime. Locations that already
//! carry a `lat;lon` coordinate literal short-circuit without a provider
//! call. The cache is append-only, never evicted, and stores misses as
//! well as hits so a failing address costs one provider call per process.
//!
//! Provider failures are soft: a transport error or no-match answer leaves
//! the record without coordinates and is never retried here — retry and
//! cancellation policy belong to the caller of the surrounding pipeline.

pub mod google;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use blotter_incident_models::Coordinates;
use thiserror::Error;
use tokio::sync::OnceCell;

/// Errors from geocoding provider calls.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },
}

/// A geocoding collaborator that resolves one free-text address.
///
/// `Ok(None)` means the provider answered but had no match; `Err` is a
/// transport-level failure. The resolver treats both as unresolved.
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    /// Resolves `address` to coordinates, if the provider can match it.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the request or response handling fails.
    async fn lookup(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError>;
}

/// Locality suffix appended to every provider query.
pub const DEFAULT_LOCALITY: &str = "Norman, OK";

type CacheCell = Arc<OnceCell<Option<Coordinates>>>;

/// Process-lifetime geocode resolver with per-key single-flight.
///
/// Owned by the pipeline and injected wherever resolution happens — there
/// is no hidden global cache. Concurrent callers for the same key share
/// one provider request; later callers for a known key never reach the
/// provider at all.
pub struct GeocodeResolver<P> {
    provider: P,
    locality: String,
    cache: Mutex<HashMap<String, CacheCell>>,
}

impl<P: GeocodeProvider> GeocodeResolver<P> {
    /// Creates a resolver over `provider` with [`DEFAULT_LOCALITY`].
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self::with_locality(provider, DEFAULT_LOCALITY)
    }

    /// Creates a resolver appending a non-default locality suffix.
    #[must_use]
    pub fn with_locality(provider: P, locality: &str) -> Self {
        Self {
            provider,
            locality: locality.to_string(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolves a raw location string to coordinates.
    ///
    /// Returns `None` for unresolvable locations: a provider miss, a
    /// transport failure, or a malformed coordinate literal. The outcome
    /// is cached either way, keyed by the exact input string.
    pub async fn resolve(&self, location: &str) -> Option<Coordinates> {
        let cell = {
            let mut cache = self
                .cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            Arc::clone(cache.entry(location.to_string()).or_default())
        };

        *cell.get_or_init(|| self.resolve_uncached(location)).await
    }

    async fn resolve_uncached(&self, location: &str) -> Option<Coordinates> {
        if location.contains(';') {
            let parsed = parse_coordinate_literal(location);
            if parsed.is_none() {
                log::warn!("malformed coordinate literal {location:?}");
            }
            return parsed;
        }

        let query = format!("{location}, {}", self.locality);
        match self.provider.lookup(&query).await {
            Ok(Some(point)) => Some(point),
            Ok(None) => {
                log::debug!("no geocoding match for {location:?}");
                None
            }
            Err(e) => {
                log::warn!("geocoding failed for {location:?}: {e}");
                None
            }
        }
    }

    /// Number of distinct locations resolved (or failed) so far.
    #[must_use]
    pub fn cached_keys(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Parses a `lat;lon` coordinate literal.
///
/// Returns `None` unless the string splits into exactly two halves that
/// both parse as floats.
#[must_use]
pub fn parse_coordinate_literal(location: &str) -> Option<Coordinates> {
    let (lat, lon) = location.split_once(';')?;
    Some(Coordinates {
        latitude: lat.trim().parse().ok()?,
        longitude: lon.trim().parse().ok()?,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingProvider {
        calls: Arc<AtomicUsize>,
        result: Option<Coordinates>,
    }

    #[async_trait]
    impl GeocodeProvider for CountingProvider {
        async fn lookup(&self, _address: &str) -> Result<Option<Coordinates>, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.result)
        }
    }

    fn counting_resolver(
        result: Option<Coordinates>,
    ) -> (GeocodeResolver<CountingProvider>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = CountingProvider {
            calls: Arc::clone(&calls),
            result,
        };
        (GeocodeResolver::new(provider), calls)
    }

    #[test]
    fn parses_coordinate_literals() {
        let point = parse_coordinate_literal("35.2;-97.4").unwrap();
        assert!((point.latitude - 35.2).abs() < 1e-9);
        assert!((point.longitude - -97.4).abs() < 1e-9);
    }

    #[test]
    fn rejects_malformed_literals() {
        assert!(parse_coordinate_literal("35.2;not-a-number").is_none());
        assert!(parse_coordinate_literal("35.2;-97.4;12").is_none());
        assert!(parse_coordinate_literal("100 MAIN ST").is_none());
    }

    #[tokio::test]
    async fn literal_path_never_queries_the_provider() {
        let (resolver, calls) = counting_resolver(None);

        let first = resolver.resolve("35.2;-97.4").await.unwrap();
        let second = resolver.resolve("35.2;-97.4").await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!((first.latitude - second.latitude).abs() < f64::EPSILON);
        assert!((first.longitude - second.longitude).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn repeated_addresses_hit_the_cache() {
        let point = Coordinates {
            latitude: 35.2,
            longitude: -97.4,
        };
        let (resolver, calls) = counting_resolver(Some(point));

        assert!(resolver.resolve("100 MAIN ST").await.is_some());
        assert!(resolver.resolve("100 MAIN ST").await.is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(resolver.cached_keys(), 1);
    }

    #[tokio::test]
    async fn failed_lookups_are_cached_as_misses() {
        let (resolver, calls) = counting_resolver(None);

        assert!(resolver.resolve("NOWHERE AT ALL").await.is_none());
        assert!(resolver.resolve("NOWHERE AT ALL").await.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_resolves_share_one_flight() {
        let point = Coordinates {
            latitude: 35.2,
            longitude: -97.4,
        };
        let (resolver, calls) = counting_resolver(Some(point));

        let (a, b) = tokio::join!(
            resolver.resolve("100 MAIN ST"),
            resolver.resolve("100 MAIN ST"),
        );

        assert!(a.is_some() && b.is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
