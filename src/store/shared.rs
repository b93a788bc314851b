use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use super::StoreSnapshot;

/// Refresh generation, handed out before a load starts
pub type Generation = u64;

/// Shared, refreshable resource store
///
/// Readers clone the current `Arc<StoreSnapshot>` and keep using it even if a
/// refresh installs a newer one meanwhile, so a single resolution always sees
/// one consistent state. Refreshes are tagged with a generation: a load that
/// finishes after a newer one has been installed is discarded.
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    /// Installed snapshot and the generation it came from
    current: Arc<RwLock<Installed>>,

    /// Last generation handed out
    issued: Arc<AtomicU64>,
}

#[derive(Debug, Default)]
struct Installed {
    snapshot: Arc<StoreSnapshot>,
    generation: Generation,
}

impl SharedStore {
    /// Create a store seeded with `snapshot` (generation 0)
    pub fn new(snapshot: StoreSnapshot) -> Self {
        Self {
            current: Arc::new(RwLock::new(Installed {
                snapshot: Arc::new(snapshot),
                generation: 0,
            })),
            issued: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<StoreSnapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot
            .clone()
    }

    /// Generation of the installed snapshot
    pub fn generation(&self) -> Generation {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }

    /// Start a refresh and get its generation
    pub fn begin_refresh(&self) -> Generation {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Install the result of a refresh
    ///
    /// # Returns
    /// * `bool` - False if a newer generation is already installed
    pub fn install(&self, generation: Generation, snapshot: StoreSnapshot) -> bool {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if generation <= current.generation {
            debug!(
                generation,
                installed = current.generation,
                "discarding stale store refresh"
            );
            return false;
        }

        current.snapshot = Arc::new(snapshot);
        current.generation = generation;
        true
    }
}
