//! Sparse symmetric store of region-pair potentials.

use log::debug;
use rustc_hash::FxHashMap;

use crate::region::RegionId;

/// A cached value, or a tombstone marking a formerly-computed entry whose
/// region has since been consumed by a merge. Tombstones read as missing;
/// they only keep "known stale" distinguishable from "never computed".
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Entry {
    Pot(f64),
    Stale,
}

/// Symmetric `(id, id) → potential` map keyed by the ordered pair, holding
/// only pairs the scheduler's size policy marked hot.
#[derive(Default)]
pub(crate) struct PotentialCache {
    map: FxHashMap<(RegionId, RegionId), Entry>,
    hits: u64,
    misses: u64,
}

impl PotentialCache {
    fn key(a: RegionId, b: RegionId) -> (RegionId, RegionId) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    pub fn get(&mut self, a: RegionId, b: RegionId) -> Option<f64> {
        match self.map.get(&Self::key(a, b)) {
            Some(&Entry::Pot(pot)) => {
                self.hits += 1;
                Some(pot)
            }
            _ => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, a: RegionId, b: RegionId, pot: f64) {
        self.map.insert(Self::key(a, b), Entry::Pot(pot));
    }

    /// Invalidation after a merge consumed the regions with ids `stale` and
    /// `dead`. The merged region inherits `stale`, so entries naming that id
    /// become tombstones: a later read must not mistake a parent-era value
    /// for one of the merged region. Entries naming `dead` are dropped
    /// outright; that id never occurs again.
    pub fn retire(&mut self, stale: RegionId, dead: RegionId) {
        self.map.retain(|&(a, b), entry| {
            if a == dead || b == dead {
                return false;
            }
            if a == stale || b == stale {
                *entry = Entry::Stale;
            }
            true
        });
    }

    pub fn log_stats(&self) {
        debug!(
            "potential cache: {} entries, {} hits, {} misses",
            self.map.len(),
            self.hits,
            self.misses
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(index: usize) -> RegionId {
        RegionId::from(index)
    }

    #[test]
    fn lookup_is_symmetric() {
        let mut cache = PotentialCache::default();
        cache.insert(id(3), id(1), 0.25);
        assert_eq!(cache.get(id(1), id(3)), Some(0.25));
        assert_eq!(cache.get(id(3), id(1)), Some(0.25));
    }

    #[test]
    fn missing_pairs_read_as_none() {
        let mut cache = PotentialCache::default();
        assert_eq!(cache.get(id(0), id(1)), None);
    }

    #[test]
    fn retire_tombstones_the_survivor_and_drops_the_dead() {
        let mut cache = PotentialCache::default();
        cache.insert(id(1), id(2), 1.0);
        cache.insert(id(2), id(3), 2.0);
        cache.insert(id(1), id(3), 3.0);
        cache.insert(id(4), id(5), 4.0);

        // region 1 lives on as the merged id, region 2 is gone
        cache.retire(id(1), id(2));

        assert_eq!(cache.get(id(1), id(2)), None);
        assert_eq!(cache.get(id(2), id(3)), None);
        assert_eq!(cache.get(id(1), id(3)), None);
        assert_eq!(cache.get(id(4), id(5)), Some(4.0));

        // the survivor's pair is a tombstone, the dead id's pairs are gone
        assert_eq!(
            cache.map.get(&PotentialCache::key(id(1), id(3))),
            Some(&Entry::Stale)
        );
        assert_eq!(cache.map.get(&PotentialCache::key(id(2), id(3))), None);
    }

    #[test]
    fn insert_overwrites_a_tombstone() {
        let mut cache = PotentialCache::default();
        cache.insert(id(1), id(3), 3.0);
        cache.retire(id(1), id(2));
        assert_eq!(cache.get(id(1), id(3)), None);

        cache.insert(id(1), id(3), 7.0);
        assert_eq!(cache.get(id(1), id(3)), Some(7.0));
    }
}
