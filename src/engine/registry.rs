use std::collections::hash_map::Entry;

use ahash::AHashMap;
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, info};

use crate::config::OrderIdConfig;
use crate::engine::types::{OrderId, Owner};
use crate::error::{VenueError, VenueResult};

/// Order id -> owner lookup, shared by every symbol of the venue.
///
/// Ids are drawn at random from `[0, space)` and retried on collision with
/// any id ever handed out, so an id is never reused while the registry lives.
/// Entries are kept after their order leaves the book.
#[derive(Debug)]
pub struct IdentityRegistry {
    owners: RwLock<AHashMap<OrderId, Owner>>,
    rng: Mutex<StdRng>,
    space: u64,
    max_retries: u32,
}

impl IdentityRegistry {
    pub fn new(cfg: &OrderIdConfig) -> Self {
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        info!(space = cfg.space, max_retries = cfg.max_retries, seeded = cfg.seed.is_some(), "Initialized identity registry");
        Self {
            owners: RwLock::new(AHashMap::new()),
            rng: Mutex::new(rng),
            space: cfg.space.max(1),
            max_retries: cfg.max_retries.max(1),
        }
    }

    /// Draws a fresh id and records its owner. The rng and the owner map are
    /// never locked at the same time.
    pub fn allocate(&self, owner: Owner) -> VenueResult<OrderId> {
        for attempt in 1..=self.max_retries {
            let candidate = self.rng.lock().gen_range(0..self.space);
            match self.owners.write().entry(candidate) {
                Entry::Occupied(_) => debug!(id = candidate, attempt, "Order id collision, retrying"),
                Entry::Vacant(slot) => {
                    slot.insert(owner);
                    return Ok(candidate);
                }
            }
        }
        error!(attempts = self.max_retries, space = self.space, "Order id space exhausted");
        Err(VenueError::IdSpaceExhausted { attempts: self.max_retries })
    }

    pub fn owner_of(&self, id: OrderId) -> Option<Owner> {
        self.owners.read().get(&id).cloned()
    }

    pub fn contains(&self, id: OrderId) -> bool {
        self.owners.read().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.owners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All mappings, sorted by id.
    pub fn entries(&self) -> Vec<(OrderId, Owner)> {
        let mut entries: Vec<_> = self.owners.read().iter().map(|(id, o)| (*id, o.clone())).collect();
        entries.sort_by_key(|(id, _)| *id);
        entries
    }

    /// Re-inserts a mapping taken from a snapshot. Returns false if the id is
    /// already taken.
    pub(crate) fn restore(&self, id: OrderId, owner: Owner) -> bool {
        let mut owners = self.owners.write();
        if owners.contains_key(&id) {
            return false;
        }
        owners.insert(id, owner);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(space: u64, max_retries: u32) -> OrderIdConfig {
        OrderIdConfig { space, max_retries, seed: Some(7) }
    }

    #[test]
    fn allocated_ids_are_unique_and_owned() {
        let registry = IdentityRegistry::new(&cfg(1_000, 64));
        let a = registry.allocate(Owner::trader("X")).unwrap();
        let b = registry.allocate(Owner::Unowned).unwrap();
        assert_ne!(a, b);
        assert_eq!(registry.owner_of(a), Some(Owner::trader("X")));
        assert_eq!(registry.owner_of(b), Some(Owner::Unowned));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn concurrent_allocation_never_hands_out_an_id_twice() {
        let registry = IdentityRegistry::new(&cfg(1_000_000, 64));
        let ids = parking_lot::Mutex::new(Vec::new());
        crossbeam::scope(|s| {
            for _ in 0..4 {
                s.spawn(|_| {
                    let mine: Vec<_> = (0..500).map(|_| registry.allocate(Owner::Unowned).unwrap()).collect();
                    ids.lock().extend(mine);
                });
            }
        })
        .unwrap();

        let mut ids = ids.into_inner();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 2_000);
        assert_eq!(registry.len(), 2_000);
    }

    #[test]
    fn ids_stay_inside_the_space() {
        let registry = IdentityRegistry::new(&cfg(50, 1_000));
        for _ in 0..40 {
            let id = registry.allocate(Owner::Unowned).unwrap();
            assert!(id < 50);
        }
    }

    #[test]
    fn full_space_fails_after_bounded_retries() {
        let registry = IdentityRegistry::new(&cfg(4, 1_000));
        for _ in 0..4 {
            registry.allocate(Owner::Unowned).unwrap();
        }
        let err = registry.allocate(Owner::Unowned).unwrap_err();
        assert!(matches!(err, VenueError::IdSpaceExhausted { attempts: 1_000 }));
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn restore_refuses_taken_ids() {
        let registry = IdentityRegistry::new(&cfg(1_000, 64));
        let id = registry.allocate(Owner::trader("X")).unwrap();
        assert!(!registry.restore(id, Owner::Unowned));
        assert!(registry.restore(id + 1_000, Owner::Unowned));
        assert_eq!(registry.owner_of(id), Some(Owner::trader("X")));
    }

    #[test]
    fn unknown_id_has_no_owner() {
        let registry = IdentityRegistry::new(&cfg(1_000, 64));
        assert_eq!(registry.owner_of(42), None);
    }
}
