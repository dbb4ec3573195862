use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use super::{Canonical, CanonicalType};

/// Wrapper chains deeper than this are treated as resolved at the cut-off.
const MAX_UNWRAP_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy)]
struct Resolution {
    canonical: CanonicalType,
    wrapped: bool,
}

/// Hit/miss counters of an [`IdentityResolver`].
///
/// Informational only: under concurrent use the counters are best-effort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverStats {
    pub hits: u64,
    pub misses: u64,
}

impl ResolverStats {
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of resolutions served from the cache, `0.0` before any lookup.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_ratio(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }
}

/// Resolves and caches the canonical type of possibly-wrapped objects.
///
/// Owned explicitly rather than process-global: share one instance through an
/// `Arc` (or a registry) and build fresh ones in tests.
///
/// # Thread Safety
///
/// All methods take `&self`. The cache is a [`DashMap`], so concurrent
/// resolutions never block each other for long. Two threads missing on the
/// same type may both compute and insert the resolution; since it depends
/// only on the type, the last write wins with the same value.
#[derive(Debug, Default)]
pub struct IdentityResolver {
    cache: DashMap<CanonicalType, Resolution>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl IdentityResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical type of `obj`: its innermost wrapped type, or its own type
    /// if it is not a wrapper.
    pub fn resolve(&self, obj: &dyn Canonical) -> CanonicalType {
        let concrete = obj.concrete_type();

        if let Some(cached) = self.cache.get(&concrete).map(|entry| *entry) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return if cached.wrapped {
                cached.canonical
            } else {
                concrete
            };
        }

        let resolution = unwrap(obj, concrete);
        self.cache.insert(concrete, resolution);
        self.misses.fetch_add(1, Ordering::Relaxed);
        resolution.canonical
    }

    /// Whether `obj`'s concrete type has been seen to be a wrapper.
    ///
    /// Resolves (and caches) the type if it has not been seen yet.
    pub fn is_wrapped(&self, obj: &dyn Canonical) -> bool {
        self.resolve(obj) != obj.concrete_type()
    }

    #[must_use]
    pub fn stats(&self) -> ResolverStats {
        ResolverStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Drop every cached resolution and reset the counters.
    pub fn clear(&self) {
        self.cache.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Number of cached concrete types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

fn unwrap(obj: &dyn Canonical, concrete: CanonicalType) -> Resolution {
    let mut current = obj;
    let mut depth = 0;
    while let Some(inner) = current.underlying() {
        if depth == MAX_UNWRAP_DEPTH {
            tracing::warn!(
                "Wrapper chain of {concrete} exceeds {MAX_UNWRAP_DEPTH} levels; stopping at {}",
                current.concrete_type()
            );
            break;
        }
        current = inner;
        depth += 1;
    }

    let canonical = current.concrete_type();
    tracing::debug!("Resolved {concrete} -> {canonical} ({depth} wrapper level(s))");
    Resolution {
        canonical,
        wrapped: depth > 0,
    }
}
