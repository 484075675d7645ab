//! The production merge loop.
//!
//! Potentials against a freshly merged region `M = P ∪ Q` are refreshed as
//! `pot(M, R) = pot(R, P) + pot(R, Q)`: potential is a linear sum over
//! member-pair contributions, and the members of `M` are exactly the members
//! of `P` and `Q`. Each summand is served from the potential cache when the
//! size policy retained it, and summed freshly over the member split of `M`
//! otherwise.

use std::time::Instant;

use log::info;

use crate::cache::PotentialCache;
use crate::live::{self, LiveSet};
use crate::potential::pair_potential;
use crate::region::Region;
use crate::Error;

use super::{MergeSide, MergeStep, Output, Tunables};

pub(super) fn compute(live: &mut LiveSet, tunables: &Tunables) -> Result<Output, Error> {
    let timer = Instant::now();
    let mut result = Output::default();
    let mut cache = PotentialCache::default();

    live::seed_best_partners(live)?;

    while live.live_count() > 1 && result.merges.len() < tunables.max_records {
        let (absorber, absorbed) = live::select_best(live)?;
        result.merges.push(MergeStep {
            absorber: MergeSide::of(live.region(absorber)),
            absorbed: MergeSide::of(live.region(absorbed)),
        });

        let heavy = live.take(absorber);
        let light = live.take(absorbed);
        let stale_id = heavy.id;
        let dead_id = light.id;
        let split = heavy.members.len();
        let merged_slot = live.push(Region::merge(heavy, light));

        // Gather pass: refresh every survivor against the merged region
        // through the additivity shortcut, while the parents' cache rows are
        // still readable.
        let merged = live.region(merged_slot);
        let merged_id = merged.id;
        let (p_members, q_members) = merged.members.split_at(split);
        let mut refreshed = Vec::with_capacity(live.live_count() - 1);
        for slot in live.indices() {
            if slot == merged_slot {
                continue;
            }
            let region = live.region(slot);
            let vs_p = cache
                .get(region.id, stale_id)
                .unwrap_or_else(|| pair_potential(&region.members, p_members));
            let vs_q = cache
                .get(region.id, dead_id)
                .unwrap_or_else(|| pair_potential(&region.members, q_members));
            let pot = vs_p + vs_q;
            live::check_potential(pot, merged_id, region.id)?;
            refreshed.push((slot, region.id, pot));
        }

        // The parents are gone: rows naming the inherited id become
        // tombstones, rows naming the dead id disappear.
        cache.retire(stale_id, dead_id);

        let store = live.region(merged_slot).members.len() > tunables.cache_threshold;
        for &(slot, region_id, pot) in &refreshed {
            if store {
                cache.insert(merged_id, region_id, pot);
            }

            let prior = live.region(slot).best;
            if prior == Some(absorber) || prior == Some(absorbed) {
                // this region's partner was just consumed: rebuild its slot
                // from scratch before offering the merged region
                rescan(live, &mut cache, slot, merged_slot)?;
            }

            if pot > live.region(slot).best_pot {
                let region = live.region_mut(slot);
                region.best = Some(merged_slot);
                region.best_pot = pot;
            }
            if pot > live.region(merged_slot).best_pot {
                let merged = live.region_mut(merged_slot);
                merged.best = Some(slot);
                merged.best_pot = pot;
            }
        }
    }

    cache.log_stats();
    info!(
        "cached merge loop done: {} merges, {:?}",
        result.merges.len(),
        timer.elapsed()
    );
    Ok(result)
}

/// Rebuilds a region's best-partner slot against every live region except
/// itself and `skip`.
fn rescan(
    live: &mut LiveSet,
    cache: &mut PotentialCache,
    slot: usize,
    skip: usize,
) -> Result<(), Error> {
    let mut best = None;
    let mut best_pot = 0.0;
    for other in live.indices() {
        if other == slot || other == skip {
            continue;
        }
        let region = live.region(slot);
        let candidate = live.region(other);
        let pot = cache
            .get(region.id, candidate.id)
            .unwrap_or_else(|| pair_potential(&region.members, &candidate.members));
        live::check_potential(pot, region.id, candidate.id)?;
        if pot > best_pot {
            best = Some(other);
            best_pot = pot;
        }
    }

    let region = live.region_mut(slot);
    region.best = best;
    region.best_pot = best_pot;
    Ok(())
}
