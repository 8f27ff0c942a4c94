//! Convention discovery
//!
//! A [`ConventionSource`] maps a package name to the naming and layout
//! conventions handed to generators. Lookups may be expensive, so
//! [`CachedConventions`] puts a TTL cache keyed by package name in front of
//! any source.

use draftsmith_generators::Conventions;
use moka::sync::Cache;
use std::fmt;
use std::time::Duration;

/// Default cache lifetime of a lookup
pub const DEFAULT_CONVENTION_TTL: Duration = Duration::from_secs(15 * 60);

/// Resolves conventions for a package
pub trait ConventionSource: Send + Sync + fmt::Debug {
    /// Conventions for `package`, `None` if the package is unknown
    fn conventions_for(&self, package: &str) -> Option<Conventions>;
}

/// Returns the same conventions for every package
#[derive(Debug, Clone, Default)]
pub struct StaticConventions {
    conventions: Conventions,
}

impl StaticConventions {
    /// Create source answering with `conventions`
    #[inline]
    #[must_use]
    pub fn new(conventions: Conventions) -> Self {
        Self { conventions }
    }
}

impl ConventionSource for StaticConventions {
    fn conventions_for(&self, _package: &str) -> Option<Conventions> {
        Some(self.conventions.clone())
    }
}

/// TTL-cached wrapper around another source
///
/// Misses are cached too, so an unknown package is not looked up again until
/// its entry expires.
pub struct CachedConventions<S> {
    source: S,
    cache: Cache<String, Option<Conventions>>,
}

impl<S: ConventionSource> CachedConventions<S> {
    /// Wrap `source` with the default TTL
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_ttl(source, 64, DEFAULT_CONVENTION_TTL)
    }

    /// Wrap `source` with an explicit capacity and TTL
    #[must_use]
    pub fn with_ttl(source: S, max_capacity: u64, ttl: Duration) -> Self {
        Self {
            source,
            cache: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Drop every cached lookup
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

impl<S: ConventionSource> ConventionSource for CachedConventions<S> {
    fn conventions_for(&self, package: &str) -> Option<Conventions> {
        self.cache.get_with(package.to_string(), || {
            tracing::debug!(package, "convention lookup");
            self.source.conventions_for(package)
        })
    }
}

impl<S: fmt::Debug> fmt::Debug for CachedConventions<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedConventions")
            .field("source", &self.source)
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Default)]
    struct Counting {
        calls: Arc<AtomicUsize>,
    }

    impl ConventionSource for Counting {
        fn conventions_for(&self, package: &str) -> Option<Conventions> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (package == "laravel/framework").then(Conventions::default)
        }
    }

    #[test]
    fn static_source_ignores_package() {
        let mut conventions = Conventions::default();
        conventions.models_dir = PathBuf::from("src/Domain");
        let source = StaticConventions::new(conventions.clone());
        assert_eq!(source.conventions_for("anything"), Some(conventions));
    }

    #[test]
    fn cache_hits_skip_the_source() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cached = CachedConventions::new(Counting {
            calls: Arc::clone(&calls),
        });

        assert!(cached.conventions_for("laravel/framework").is_some());
        assert!(cached.conventions_for("laravel/framework").is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert!(cached.conventions_for("unknown/pkg").is_none());
        assert!(cached.conventions_for("unknown/pkg").is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn invalidate_forces_new_lookup() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cached = CachedConventions::new(Counting {
            calls: Arc::clone(&calls),
        });
        cached.conventions_for("laravel/framework");
        cached.invalidate_all();
        cached.conventions_for("laravel/framework");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn expired_entries_are_reloaded() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cached = CachedConventions::with_ttl(
            Counting {
                calls: Arc::clone(&calls),
            },
            8,
            Duration::from_millis(20),
        );
        cached.conventions_for("laravel/framework");
        std::thread::sleep(Duration::from_millis(60));
        cached.conventions_for("laravel/framework");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
