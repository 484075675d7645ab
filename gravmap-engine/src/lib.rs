//! Hierarchical agglomerative clustering of weighted geographic points,
//! driven by a gravitational-potential attraction score.
//!
//! `N` input points start as `N` singleton regions. The merge loop
//! repeatedly joins the pair of live regions with the greatest mutual
//! potential `Σ w_a · w_b / d⁴` (summed over member pairs, with a planar
//! approximation of distance), until a single region remains. The result is
//! a stepwise merge tree of `N - 1` [`MergeStep`]s, each recording both
//! consumed regions with the heavier side first.
//!
//! ```
//! use gravmap_engine::{Algorithm, Output, Point, Tunables};
//!
//! let points = vec![
//!     Point { lon: -71.8027778, lat: 42.5833333, weight: 41.0 },
//!     Point { lon: -71.4166667, lat: 42.2791667, weight: 72.0 },
//!     Point { lon: -71.5527778, lat: 42.3458333, weight: 39.0 },
//! ];
//!
//! let output = Output::compute(points, Algorithm::Cached, &Tunables::default())?;
//! assert_eq!(output.merges.len(), 2);
//! # Ok::<(), gravmap_engine::Error>(())
//! ```
//!
//! Keeping the naive per-step cost tractable is the job of the potential
//! cache: refreshes against a freshly merged region reuse the parents'
//! cached rows through the additivity of the potential sum. The cache-free
//! [`Algorithm::Exhaustive`] loop is retained as the oracle, and
//! [`Algorithm::Compare`] checks one against the other.

use std::error;
use std::fmt;

pub mod geo;
pub mod potential;

mod cache;
mod live;
mod output;
mod region;

pub use crate::output::{Algorithm, MergeSide, MergeStep, Output, Tunables};
pub use crate::region::{Point, Region, RegionId};

/// An engine failure. Either kind means the run cannot continue: the merge
/// loop never recovers, because a violated invariant implies silent data
/// loss downstream.
#[derive(Clone, Debug)]
pub enum Error {
    /// A NaN or negative potential was computed, or an input carried a
    /// non-finite coordinate or weight.
    Numeric(String),
    /// Impossible live-set state, such as a retired best partner surviving
    /// to selection.
    Invariant(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Numeric(detail) => write!(f, "numeric error: {}", detail),
            Error::Invariant(detail) => write!(f, "invariant violated: {}", detail),
        }
    }
}

impl error::Error for Error {}
