// Copyright 2026 the Thorn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Locating the sharpest point of a connector.

use arrayvec::ArrayVec;

use crate::common::minimize_bounded;
use crate::curvature::ConnectorFrame;
use crate::error::{Error, Result};
use crate::ControlDistances;

/// The most local maxima [`MaxCurvatureOptions::max_candidates`] can ask
/// for.
pub const MAX_CANDIDATES: usize = 8;

/// Parameters of the search for the maximum of `|κ(t)|`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MaxCurvatureOptions {
    /// Number of intervals in the uniform sampling grid over `[0, 1]`.
    pub grid_intervals: usize,
    /// How many of the strongest sampled local maxima are refined.
    pub max_candidates: usize,
    /// Tolerance on `t` for each refinement.
    pub t_tolerance: f64,
    /// Cap on curvature evaluations for each refinement.
    pub max_iterations: usize,
}

impl Default for MaxCurvatureOptions {
    fn default() -> Self {
        MaxCurvatureOptions {
            grid_intervals: 32,
            max_candidates: 3,
            t_tolerance: 1e-6,
            max_iterations: 100,
        }
    }
}

impl MaxCurvatureOptions {
    /// Set the number of sampling intervals.
    #[must_use]
    pub fn with_grid_intervals(mut self, grid_intervals: usize) -> Self {
        self.grid_intervals = grid_intervals;
        self
    }

    /// Set the number of refined local maxima.
    #[must_use]
    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    /// Set the tolerance on `t`.
    #[must_use]
    pub fn with_t_tolerance(mut self, t_tolerance: f64) -> Self {
        self.t_tolerance = t_tolerance;
        self
    }

    /// Set the cap on evaluations per refinement.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Check that the options describe a usable search.
    pub fn validate(&self) -> Result<()> {
        if self.grid_intervals < 2 {
            return Err(Error::InvalidOptions("grid_intervals must be at least 2"));
        }
        if self.max_candidates == 0 || self.max_candidates > MAX_CANDIDATES {
            return Err(Error::InvalidOptions("max_candidates must be in 1..=8"));
        }
        if !(self.t_tolerance.is_finite() && self.t_tolerance > 0.0) {
            return Err(Error::InvalidOptions("t_tolerance must be positive"));
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidOptions("max_iterations must be positive"));
        }
        Ok(())
    }
}

/// The result of [`max_curvature`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaxCurvature {
    /// The largest `|κ|` found.
    pub value: f64,
    /// Where on the curve it was found.
    pub t: f64,
    /// Number of curvature evaluations spent.
    pub evaluations: usize,
    /// Whether every refinement met its tolerance within its cap.
    ///
    /// When this is `false` the value is still the best one seen, just
    /// possibly short of the true local maximum.
    pub converged: bool,
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    index: usize,
    value: f64,
}

/// Find the point of the connector with the largest absolute curvature.
///
/// Curvature along a cubic is not unimodal, so a single local search can
/// land on the wrong peak. Instead `|κ|` is sampled on a uniform grid, the
/// strongest local maxima among the samples are kept, and each one is
/// refined with Brent's method within the two grid cells around it. The
/// result is never smaller than the best sample.
///
/// Options are assumed valid; see [`MaxCurvatureOptions::validate`].
pub fn max_curvature(
    frame: &ConnectorFrame,
    d: ControlDistances,
    options: &MaxCurvatureOptions,
) -> MaxCurvature {
    let n = options.grid_intervals.max(2);
    let keep = options.max_candidates.clamp(1, MAX_CANDIDATES);
    let step = (n as f64).recip();
    let t_at = |i: usize| if i == n { 1.0 } else { i as f64 * step };
    let abs_k = |t: f64| frame.curvature(t, d).abs();

    let mut best = MaxCurvature {
        value: 0.0,
        t: 0.0,
        evaluations: 0,
        converged: true,
    };
    // Strongest first.
    let mut candidates: ArrayVec<Candidate, MAX_CANDIDATES> = ArrayVec::new();
    let mut consider = |candidate: Candidate| {
        let pos = candidates
            .iter()
            .position(|c| candidate.value > c.value)
            .unwrap_or(candidates.len());
        if pos < keep {
            if candidates.len() == keep {
                candidates.pop();
            }
            candidates.insert(pos, candidate);
        }
    };

    // Sliding window over the samples: prev, cur, next.
    let mut prev = f64::NEG_INFINITY;
    let mut cur = abs_k(0.0);
    best.evaluations += 1;
    best.value = cur;
    for i in 0..=n {
        let next = if i < n {
            best.evaluations += 1;
            abs_k(t_at(i + 1))
        } else {
            f64::NEG_INFINITY
        };
        if cur > best.value {
            best.value = cur;
            best.t = t_at(i);
        }
        if cur >= prev && cur > next && cur > 0.0 {
            consider(Candidate {
                index: i,
                value: cur,
            });
        }
        prev = cur;
        cur = next;
    }

    for candidate in &candidates {
        let lo = t_at(candidate.index.saturating_sub(1));
        let hi = t_at((candidate.index + 1).min(n));
        let refined = minimize_bounded(
            |t| -abs_k(t),
            lo,
            hi,
            options.t_tolerance,
            options.max_iterations,
        );
        best.evaluations += refined.evaluations;
        best.converged &= refined.converged;
        if -refined.value > best.value {
            best.value = -refined.value;
            best.t = refined.x;
        }
    }
    best
}
