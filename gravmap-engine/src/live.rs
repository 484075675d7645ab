//! The live set: an arena of in-progress regions plus the per-region
//! best-partner index.

use std::time::Instant;

use log::info;

use crate::potential::pair_potential;
use crate::region::{Point, Region, RegionId};
use crate::Error;

/// Live regions stored in an arena. Slots are never reused, so a slot index
/// is a stable handle for the whole run and partner liveness is a plain
/// occupancy check. Iteration in slot order is insertion order, which is the
/// tie-break order of the merge loop.
pub(crate) struct LiveSet {
    slots: Vec<Option<Region>>,
    live: usize,
}

impl LiveSet {
    /// One singleton region per point, ids assigned in input order.
    pub fn from_points(points: Vec<Point>) -> LiveSet {
        let slots: Vec<Option<Region>> = points
            .into_iter()
            .enumerate()
            .map(|(index, point)| Some(Region::singleton(RegionId::from(index), point)))
            .collect();
        let live = slots.len();
        LiveSet { slots, live }
    }

    pub fn live_count(&self) -> usize {
        self.live
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_live(&self, slot: usize) -> bool {
        self.slots.get(slot).map_or(false, Option::is_some)
    }

    /// Indices of live slots, in insertion order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, region)| region.as_ref().map(|_| slot))
    }

    pub fn region(&self, slot: usize) -> &Region {
        match &self.slots[slot] {
            Some(region) => region,
            None => panic!("dead region slot {} referenced", slot),
        }
    }

    pub fn region_mut(&mut self, slot: usize) -> &mut Region {
        match &mut self.slots[slot] {
            Some(region) => region,
            None => panic!("dead region slot {} referenced", slot),
        }
    }

    pub fn push(&mut self, region: Region) -> usize {
        self.slots.push(Some(region));
        self.live += 1;
        self.slots.len() - 1
    }

    /// Removes and returns the region in `slot`, retiring the slot for the
    /// rest of the run.
    pub fn take(&mut self, slot: usize) -> Region {
        match self.slots[slot].take() {
            Some(region) => {
                self.live -= 1;
                region
            }
            None => panic!("dead region slot {} taken", slot),
        }
    }
}

/// Every computed potential must be non-negative and not NaN. Positive
/// infinity is legal: coincident coordinates must merge next.
pub(crate) fn check_potential(pot: f64, a: RegionId, b: RegionId) -> Result<(), Error> {
    if pot.is_nan() || pot < 0.0 {
        return Err(Error::Numeric(format!(
            "potential between regions {} and {} is {}",
            a.index(),
            b.index(),
            pot
        )));
    }
    Ok(())
}

/// Initialization pass: evaluate every unordered pair once and seed both
/// sides' best-partner slots.
pub(crate) fn seed_best_partners(live: &mut LiveSet) -> Result<(), Error> {
    let timer = Instant::now();
    let count = live.slot_count();
    for i in 0..count {
        for j in i + 1..count {
            let pot = pair_potential(&live.region(i).members, &live.region(j).members);
            check_potential(pot, live.region(i).id, live.region(j).id)?;
            if pot > live.region(i).best_pot {
                let region = live.region_mut(i);
                region.best = Some(j);
                region.best_pot = pot;
            }
            if pot > live.region(j).best_pot {
                let region = live.region_mut(j);
                region.best = Some(i);
                region.best_pot = pot;
            }
        }
    }
    info!(
        "seeded best partners for {} regions: {:?}",
        count,
        timer.elapsed()
    );
    Ok(())
}

/// Finds the live region with the greatest recorded best-partner potential
/// and returns `(absorber, absorbed)` slots, heavier first. The first
/// maximum in slot order wins ties; an equal-weight pair keeps the selected
/// region as absorber.
pub(crate) fn select_best(live: &LiveSet) -> Result<(usize, usize), Error> {
    let mut selected: Option<(usize, usize, f64)> = None;
    for slot in live.indices() {
        let region = live.region(slot);
        let partner = match region.best {
            Some(partner) => partner,
            None => continue,
        };
        let replace = match selected {
            Some((_, _, pot)) => region.best_pot > pot,
            None => true,
        };
        if replace {
            selected = Some((slot, partner, region.best_pot));
        }
    }

    let (slot, partner, _) = selected.ok_or_else(|| {
        Error::Invariant(format!(
            "no region holds a best partner while {} regions are live",
            live.live_count()
        ))
    })?;
    if !live.is_live(partner) {
        return Err(Error::Invariant(format!(
            "region in slot {} points at retired partner slot {}",
            slot, partner
        )));
    }

    if live.region(slot).weight < live.region(partner).weight {
        Ok((partner, slot))
    } else {
        Ok((slot, partner))
    }
}
