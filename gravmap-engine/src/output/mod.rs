//! The merge scheduler and its loop variants.

use std::str::FromStr;

use log::{debug, error};

use crate::live::LiveSet;
use crate::region::{Point, Region, RegionId};
use crate::Error;

mod cached;
mod exhaustive;

/// Which merge-loop implementation to run.
#[derive(Debug, Clone, Copy)]
pub enum Algorithm {
    /// Production loop: potentials against a freshly merged region are
    /// refreshed incrementally through the potential cache.
    Cached,

    /// Oracle loop: every refreshed potential is recomputed from the member
    /// lists. Slower, cache-free.
    Exhaustive,

    /// Runs both variants and verifies they emit the same merge stream.
    Compare,
}

impl Algorithm {
    pub fn variants() -> [&'static str; 3] {
        ["Cached", "Exhaustive", "Compare"]
    }
}

impl FromStr for Algorithm {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_ref() {
            "cached" => Ok(Algorithm::Cached),
            "exhaustive" => Ok(Algorithm::Exhaustive),
            "compare" => Ok(Algorithm::Compare),
            _ => Err(String::from("valid values: Cached, Exhaustive, Compare")),
        }
    }
}

/// Scheduler tunables: the cache size policy and the record cap.
#[derive(Debug, Clone, Copy)]
pub struct Tunables {
    /// A freshly merged region caches its refreshed potentials only when it
    /// holds more members than this.
    pub cache_threshold: usize,
    /// Stop after this many merges, leaving a partial forest.
    pub max_records: usize,
}

impl Default for Tunables {
    fn default() -> Self {
        Tunables {
            cache_threshold: 100,
            max_records: usize::MAX,
        }
    }
}

/// One side of a merge, captured before the merge was applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeSide {
    pub id: RegionId,
    pub weight: f64,
    pub lat: f64,
    pub lon: f64,
    pub orig_lat: f64,
    pub orig_lon: f64,
}

impl MergeSide {
    fn of(region: &Region) -> MergeSide {
        MergeSide {
            id: region.id,
            weight: region.weight,
            lat: region.y,
            lon: region.x,
            orig_lat: region.orig_lat,
            orig_lon: region.orig_lon,
        }
    }
}

/// One record of the merge tree: the two consumed regions, heavier first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeStep {
    pub absorber: MergeSide,
    pub absorbed: MergeSide,
}

/// The computed merge tree, in merge order. `N` surviving input points
/// produce exactly `N - 1` steps unless a record cap stops the loop early.
#[derive(Debug, Clone, Default)]
pub struct Output {
    pub merges: Vec<MergeStep>,
}

impl Output {
    /// Clusters `points` down to a single region (or to the record cap) and
    /// returns the merge stream.
    ///
    /// Non-positive weights are dropped, matching the ingest contract for
    /// callers that bypass it; a non-finite coordinate or weight is a
    /// numeric error.
    pub fn compute(
        points: Vec<Point>,
        algorithm: Algorithm,
        tunables: &Tunables,
    ) -> Result<Output, Error> {
        let points = validated(points)?;
        match algorithm {
            Algorithm::Cached => {
                let mut live = LiveSet::from_points(points);
                cached::compute(&mut live, tunables)
            }
            Algorithm::Exhaustive => {
                let mut live = LiveSet::from_points(points);
                exhaustive::compute(&mut live, tunables)
            }
            Algorithm::Compare => {
                let exhaustive = {
                    let mut live = LiveSet::from_points(points.clone());
                    exhaustive::compute(&mut live, tunables)?
                };
                let cached = {
                    let mut live = LiveSet::from_points(points);
                    cached::compute(&mut live, tunables)?
                };

                if compare_merges(&exhaustive.merges, &cached.merges) {
                    panic!(concat!(
                        "The merge stream emitted by the cached loop differs from ",
                        "the stream emitted by the exhaustive loop. ",
                        "See the error log for details."
                    ));
                } else {
                    debug!("cached and exhaustive loops emitted the same merge stream.");
                }
                Ok(cached)
            }
        }
    }
}

fn validated(points: Vec<Point>) -> Result<Vec<Point>, Error> {
    let mut kept = Vec::with_capacity(points.len());
    for point in points {
        if !point.lon.is_finite() || !point.lat.is_finite() || !point.weight.is_finite() {
            return Err(Error::Numeric(format!(
                "non-finite input point ({}, {}, {})",
                point.lon, point.lat, point.weight
            )));
        }
        if point.weight > 0.0 {
            kept.push(point);
        }
    }
    Ok(kept)
}

/// Relative tolerance for coordinates when comparing the streams of two loop
/// variants. Ids and weights must match exactly; coordinates may differ by
/// float-summation order between the cached shortcut and the full
/// recomputation.
const COMPARE_TOLERANCE: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    (a - b).abs() <= COMPARE_TOLERANCE * a.abs().max(b.abs())
}

fn sides_match(a: &MergeSide, b: &MergeSide) -> bool {
    a.id == b.id
        && a.weight == b.weight
        && approx_eq(a.lat, b.lat)
        && approx_eq(a.lon, b.lon)
        && a.orig_lat == b.orig_lat
        && a.orig_lon == b.orig_lon
}

fn steps_match(a: &MergeStep, b: &MergeStep) -> bool {
    sides_match(&a.absorber, &b.absorber) && sides_match(&a.absorbed, &b.absorbed)
}

/// Compares the merge streams emitted by two variants, reporting every
/// divergent record. Returns true if the streams differ.
fn compare_merges(exhaustive: &[MergeStep], cached: &[MergeStep]) -> bool {
    let mut differ = false;
    if exhaustive.len() != cached.len() {
        error!(
            "exhaustive loop emitted {} merges, cached loop emitted {}.",
            exhaustive.len(),
            cached.len()
        );
        differ = true;
    }

    for (seq, (a, b)) in exhaustive.iter().zip(cached.iter()).enumerate() {
        if !steps_match(a, b) {
            error!(
                "merge {} differs: exhaustive {:?}, cached {:?}.",
                seq + 1,
                a,
                b
            );
            differ = true;
        }
    }

    differ
}
