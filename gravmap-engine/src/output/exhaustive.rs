//! The oracle merge loop: no cache, every refreshed potential recomputed as
//! the full sum over both member lists. Kept as the reference the cached
//! loop is checked against.

use std::time::Instant;

use log::info;

use crate::live::{self, LiveSet};
use crate::potential::pair_potential;
use crate::region::Region;
use crate::Error;

use super::{MergeSide, MergeStep, Output, Tunables};

pub(super) fn compute(live: &mut LiveSet, tunables: &Tunables) -> Result<Output, Error> {
    let timer = Instant::now();
    let mut result = Output::default();

    live::seed_best_partners(live)?;

    while live.live_count() > 1 && result.merges.len() < tunables.max_records {
        let (absorber, absorbed) = live::select_best(live)?;
        result.merges.push(MergeStep {
            absorber: MergeSide::of(live.region(absorber)),
            absorbed: MergeSide::of(live.region(absorbed)),
        });

        let heavy = live.take(absorber);
        let light = live.take(absorbed);
        let merged_slot = live.push(Region::merge(heavy, light));

        let mut refreshed = Vec::with_capacity(live.live_count() - 1);
        {
            let merged = live.region(merged_slot);
            for slot in live.indices() {
                if slot == merged_slot {
                    continue;
                }
                let region = live.region(slot);
                let pot = pair_potential(&region.members, &merged.members);
                live::check_potential(pot, merged.id, region.id)?;
                refreshed.push((slot, pot));
            }
        }

        for &(slot, pot) in &refreshed {
            let prior = live.region(slot).best;
            if prior == Some(absorber) || prior == Some(absorbed) {
                rescan(live, slot, merged_slot)?;
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

    info!(
        "exhaustive merge loop done: {} merges, {:?}",
        result.merges.len(),
        timer.elapsed()
    );
    Ok(result)
}

/// Rebuilds a region's best-partner slot against every live region except
/// itself and `skip`, recomputing each potential in full.
fn rescan(live: &mut LiveSet, slot: usize, skip: usize) -> Result<(), Error> {
    let mut best = None;
    let mut best_pot = 0.0;
    for other in live.indices() {
        if other == slot || other == skip {
            continue;
        }
        let region = live.region(slot);
        let candidate = live.region(other);
        let pot = pair_potential(&region.members, &candidate.members);
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
