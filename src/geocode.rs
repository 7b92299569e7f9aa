//! Address resolution with a per-instance cache.

use std::collections::HashSet;
use std::fmt;
use std::thread;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::model::{GeocodeMap, GeocodeResult};
use crate::traits::Geocoder;

/// Pause between consecutive geocoding requests.
pub const DEFAULT_GEOCODE_DELAY: Duration = Duration::from_millis(200);

/// Lets one geocoding request through per configured delay.
pub type Limiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// `None` when `delay` is zero.
fn limiter(delay: Duration) -> Option<Limiter> {
    Quota::with_period(delay).map(RateLimiter::direct)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Addresses answered from the cache.
    pub hits: usize,
    /// Requests sent to the geocoder.
    pub lookups: usize,
}

/// Resolves addresses through a [`Geocoder`], remembering every success.
///
/// The cache is keyed by the exact address string, never evicted, and
/// lives as long as the resolver. Failures are not cached so a later
/// call can try again.
pub struct GeocodeResolver<G> {
    geocoder: G,
    cache: GeocodeMap,
    delay: Duration,
    limiter: Option<Limiter>,
    clock: DefaultClock,
    stats: CacheStats,
}

impl<G: fmt::Debug> fmt::Debug for GeocodeResolver<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeocodeResolver")
            .field("geocoder", &self.geocoder)
            .field("cached", &self.cache.len())
            .field("delay", &self.delay)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<G: Geocoder> GeocodeResolver<G> {
    pub fn new(geocoder: G) -> Self {
        Self::with_delay(geocoder, DEFAULT_GEOCODE_DELAY)
    }

    pub fn with_delay(geocoder: G, delay: Duration) -> Self {
        Self {
            geocoder,
            cache: GeocodeMap::new(),
            delay,
            limiter: limiter(delay),
            clock: DefaultClock::default(),
            stats: CacheStats::default(),
        }
    }

    /// Resolves every address it can.
    ///
    /// The returned map only holds resolvable addresses. Duplicates are
    /// looked up once; unresolvable ones are logged and skipped.
    pub fn resolve<A: AsRef<str>>(&mut self, addresses: &[A]) -> GeocodeMap {
        let total = addresses.len();
        let mut resolved = GeocodeMap::new();
        let mut failed: HashSet<&str> = HashSet::new();

        for (index, address) in addresses.iter().enumerate() {
            let address = address.as_ref();
            debug!(index = index + 1, total, address, "geocoding address");

            if let Some(hit) = self.cache.get(address) {
                debug!(address, "using cached geocode");
                self.stats.hits += 1;
                resolved.insert(address.to_string(), hit.clone());
                continue;
            }

            if failed.contains(address) {
                continue;
            }

            match self.lookup(address) {
                Some(result) => {
                    debug!(address, place_id = %result.place_id, "geocoded address");
                    self.cache.insert(address.to_string(), result.clone());
                    resolved.insert(address.to_string(), result);
                }
                None => {
                    failed.insert(address);
                }
            }
        }

        info!(
            resolved = resolved.len(),
            unresolved = failed.len(),
            total,
            "geocoding finished"
        );
        resolved
    }

    /// Cached resolution for `address`, if any.
    pub fn cached(&self, address: &str) -> Option<&GeocodeResult> {
        self.cache.get(address)
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    fn lookup(&mut self, address: &str) -> Option<GeocodeResult> {
        self.pace();
        self.stats.lookups += 1;

        match self.geocoder.geocode(address) {
            Ok(candidates) => {
                let first = candidates.into_iter().next();
                if first.is_none() {
                    warn!(address, "no geocode results for address");
                }
                first
            }
            Err(err) => {
                error!(address, error = %err, "failed to geocode address");
                None
            }
        }
    }

    /// Blocks until the limiter admits another request.
    fn pace(&self) {
        let Some(limiter) = &self.limiter else {
            return;
        };
        while let Err(not_until) = limiter.check() {
            let wait = not_until.wait_time_from(self.clock.now());
            debug!(wait_ms = wait.as_millis() as u64, "waiting for geocode rate limit");
            thread::sleep(wait);
        }
    }
}
