// Copyright 2026 the Thorn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Choosing control distances that minimize the maximum curvature.

use crate::curvature::ConnectorFrame;
use crate::error::{AnchorRole, Error, Result};
use crate::max_curvature::{max_curvature, MaxCurvatureOptions};
use crate::simplex::{minimize_nelder_mead, SimplexOptions};
use crate::{AnchorPose, ControlDistances, SolveObserver};

/// Parameters of a connector solve.
///
/// Everything that depends on the size of the connector is given as a
/// fraction of the chord, the distance between the two anchors, so the
/// same options work at any scale.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolveOptions {
    /// Lower bound on each control distance, as a fraction of the chord.
    pub lower_bound_fraction: f64,
    /// Absolute floor on the lower bound.
    ///
    /// Anchors closer together than this are degenerate and not solved.
    pub min_lower_bound: f64,
    /// Both distances start the search at this fraction of the chord.
    pub initial_guess_fraction: f64,
    /// Size of the initial simplex, as a fraction of the chord.
    pub initial_step_fraction: f64,
    /// Convergence tolerance on the distances, as a fraction of the chord.
    pub xtol_fraction: f64,
    /// Budget of maximum-curvature evaluations for the outer search.
    pub max_evaluations: usize,
    /// Optional upper bound on each control distance, as a fraction of the
    /// chord.
    ///
    /// Some thorn configurations keep getting flatter as the arms grow, and
    /// an unbounded search then runs until the budget is spent.
    pub max_distance_fraction: Option<f64>,
    /// Parameters of the inner search for the sharpest point.
    pub max_curvature: MaxCurvatureOptions,
}

impl Default for SolveOptions {
    fn default() -> Self {
        SolveOptions {
            lower_bound_fraction: 0.01,
            min_lower_bound: 1e-6,
            initial_guess_fraction: 0.3,
            initial_step_fraction: 0.25,
            xtol_fraction: 0.1,
            max_evaluations: 400,
            max_distance_fraction: None,
            max_curvature: MaxCurvatureOptions::default(),
        }
    }
}

impl SolveOptions {
    /// The default options.
    pub fn new() -> SolveOptions {
        SolveOptions::default()
    }

    /// Set the lower bound as a fraction of the chord.
    #[must_use]
    pub fn with_lower_bound_fraction(mut self, fraction: f64) -> Self {
        self.lower_bound_fraction = fraction;
        self
    }

    /// Set the absolute floor on the lower bound.
    #[must_use]
    pub fn with_min_lower_bound(mut self, min_lower_bound: f64) -> Self {
        self.min_lower_bound = min_lower_bound;
        self
    }

    /// Set the starting distances as a fraction of the chord.
    #[must_use]
    pub fn with_initial_guess_fraction(mut self, fraction: f64) -> Self {
        self.initial_guess_fraction = fraction;
        self
    }

    /// Set the initial simplex size as a fraction of the chord.
    #[must_use]
    pub fn with_initial_step_fraction(mut self, fraction: f64) -> Self {
        self.initial_step_fraction = fraction;
        self
    }

    /// Set the convergence tolerance as a fraction of the chord.
    #[must_use]
    pub fn with_xtol_fraction(mut self, fraction: f64) -> Self {
        self.xtol_fraction = fraction;
        self
    }

    /// Set the evaluation budget of the outer search.
    #[must_use]
    pub fn with_max_evaluations(mut self, max_evaluations: usize) -> Self {
        self.max_evaluations = max_evaluations;
        self
    }

    /// Bound the control distances above, or pass `None` to leave them
    /// unbounded.
    #[must_use]
    pub fn with_max_distance_fraction(mut self, fraction: Option<f64>) -> Self {
        self.max_distance_fraction = fraction;
        self
    }

    /// Set the options of the inner search.
    #[must_use]
    pub fn with_max_curvature(mut self, options: MaxCurvatureOptions) -> Self {
        self.max_curvature = options;
        self
    }

    /// The lower bound on the control distances for a given chord.
    #[inline]
    pub fn lower_bound(&self, chord: f64) -> f64 {
        (self.lower_bound_fraction * chord).max(self.min_lower_bound)
    }

    /// Check that every field is in range.
    pub fn validate(&self) -> Result<()> {
        fn non_negative(x: f64) -> bool {
            x.is_finite() && x >= 0.0
        }
        fn positive(x: f64) -> bool {
            x.is_finite() && x > 0.0
        }
        if !non_negative(self.lower_bound_fraction) {
            return Err(Error::InvalidOptions(
                "lower_bound_fraction must be finite and non-negative",
            ));
        }
        if !positive(self.min_lower_bound) {
            return Err(Error::InvalidOptions("min_lower_bound must be positive"));
        }
        if !positive(self.initial_guess_fraction) {
            return Err(Error::InvalidOptions(
                "initial_guess_fraction must be positive",
            ));
        }
        if !positive(self.initial_step_fraction) {
            return Err(Error::InvalidOptions(
                "initial_step_fraction must be positive",
            ));
        }
        if !positive(self.xtol_fraction) {
            return Err(Error::InvalidOptions("xtol_fraction must be positive"));
        }
        if self.max_evaluations < 3 {
            return Err(Error::InvalidOptions("max_evaluations must be at least 3"));
        }
        if let Some(fraction) = self.max_distance_fraction {
            if !positive(fraction) {
                return Err(Error::InvalidOptions(
                    "max_distance_fraction must be positive",
                ));
            }
        }
        self.max_curvature.validate()
    }
}

/// How a solve ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolveStatus {
    /// The search settled within tolerance.
    Converged,
    /// The evaluation budget ran out; the best distances found are used.
    BudgetExhausted,
    /// The anchors (nearly) coincide, so no search was run and both
    /// distances sit at the lower bound.
    Degenerate,
    /// The search produced unusable distances and both were reset to the
    /// lower bound.
    Fallback,
}

impl SolveStatus {
    /// Whether the distances are a proper optimum rather than a best effort.
    #[inline]
    pub fn is_converged(self) -> bool {
        self == SolveStatus::Converged
    }
}

/// Diagnostics for one solve.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolveReport {
    /// How the solve ended.
    pub status: SolveStatus,
    /// The lower bound the distances were held to.
    pub lower_bound: f64,
    /// The distance between the anchors.
    pub chord: f64,
    /// The maximum absolute curvature of the resulting curve.
    pub value: f64,
    /// Number of maximum-curvature searches run.
    pub outer_evaluations: usize,
    /// Total curvature evaluations across those searches.
    pub inner_evaluations: usize,
    /// How many of those searches hit their iteration cap.
    pub inner_unconverged: usize,
}

/// Control distances together with the report of the solve that chose
/// them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Solution {
    /// The chosen distances.
    pub distances: ControlDistances,
    /// How they were found.
    pub report: SolveReport,
}

/// Choose the control distances of the connector between two anchors.
///
/// The distances minimize the maximum absolute curvature along the curve,
/// each kept at or above [`SolveOptions::lower_bound`]. The search is a
/// bounded Nelder–Mead over the two distances, started from
/// `initial_guess_fraction × chord` on both arms; each evaluation of the
/// objective is a [`max_curvature`] search.
///
/// Only malformed input, or anchors too far apart for the distance between
/// them to be represented, is an error. Running out of budget, coincident
/// anchors and numerical breakdown all still produce usable distances, with
/// the details in [`Solution::report`].
///
/// ```
/// use thorn::{solve, AnchorPose, SolveOptions, SolveStatus};
///
/// let start = AnchorPose::from_degrees(0.0, 0.0, 0.0);
/// let end = AnchorPose::from_degrees(100.0, 0.0, 180.0);
/// let solution = solve(&start, &end, &SolveOptions::default()).unwrap();
/// // A straight connector needs no bending at all.
/// assert_eq!(solution.report.status, SolveStatus::Converged);
/// assert_eq!(solution.report.value, 0.0);
/// ```
pub fn solve(start: &AnchorPose, end: &AnchorPose, options: &SolveOptions) -> Result<Solution> {
    solve_observed(start, end, options, &mut ())
}

/// Like [`solve`], reporting progress to an observer.
pub fn solve_observed(
    start: &AnchorPose,
    end: &AnchorPose,
    options: &SolveOptions,
    observer: &mut impl SolveObserver,
) -> Result<Solution> {
    start.validate(AnchorRole::Start)?;
    end.validate(AnchorRole::End)?;
    options.validate()?;

    let frame = ConnectorFrame::new(start, end);
    let chord = frame.chord();
    let lower = options.lower_bound(chord);
    if !lower.is_finite() {
        return Err(Error::AnchorsTooFar {
            chord,
            lower_bound: lower,
        });
    }

    observer.solve_started(start, end);

    let mut outer_evaluations = 0;
    let mut inner_evaluations = 0;
    let mut inner_unconverged = 0;
    let mut objective = |d: ControlDistances| {
        observer.inner_started(d);
        let result = max_curvature(&frame, d, &options.max_curvature);
        observer.inner_finished(&result);
        outer_evaluations += 1;
        inner_evaluations += result.evaluations;
        if !result.converged {
            inner_unconverged += 1;
        }
        result.value
    };

    let (distances, value, status) = if chord < options.min_lower_bound {
        tracing::debug!(chord, "anchors coincide, skipping connector solve");
        let d = ControlDistances::splat(lower);
        (d, objective(d), SolveStatus::Degenerate)
    } else {
        let upper = match options.max_distance_fraction {
            Some(fraction) => (fraction * chord).max(lower),
            None => f64::INFINITY,
        };
        let x0 = (options.initial_guess_fraction * chord).clamp(lower, upper);
        let simplex = SimplexOptions {
            initial_step: options.initial_step_fraction * chord,
            xtol: options.xtol_fraction * chord,
            max_evaluations: options.max_evaluations,
        };
        let min = minimize_nelder_mead(
            |d| objective(ControlDistances::from_array(d)),
            [x0; 2],
            [lower; 2],
            [upper; 2],
            &simplex,
        );
        let d = ControlDistances::from_array(min.x);
        let in_bounds = |x: f64| x >= lower && x <= upper;
        if d.is_finite() && in_bounds(d.d0) && in_bounds(d.d1) && min.value.is_finite() {
            let status = if min.converged {
                SolveStatus::Converged
            } else {
                SolveStatus::BudgetExhausted
            };
            (d, min.value, status)
        } else {
            let d = ControlDistances::splat(lower);
            (d, objective(d), SolveStatus::Fallback)
        }
    };

    let report = SolveReport {
        status,
        lower_bound: lower,
        chord,
        value,
        outer_evaluations,
        inner_evaluations,
        inner_unconverged,
    };
    match status {
        SolveStatus::BudgetExhausted => tracing::warn!(
            chord,
            evaluations = outer_evaluations,
            "connector solve ran out of budget"
        ),
        SolveStatus::Fallback => tracing::warn!(
            chord,
            "connector solve produced unusable distances, using the lower bound"
        ),
        SolveStatus::Converged | SolveStatus::Degenerate => {}
    }
    if inner_unconverged > 0 {
        tracing::warn!(
            inner_unconverged,
            "maximum curvature searches hit their iteration cap"
        );
    }
    tracing::debug!(
        chord,
        d0 = distances.d0,
        d1 = distances.d1,
        value,
        outer_evaluations,
        inner_evaluations,
        "connector solved"
    );
    observer.solve_finished(&report);
    Ok(Solution { distances, report })
}

#[cfg(test)]
mod tests {
    use core::f64::consts::{FRAC_PI_2, PI};

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::{solve, SolveOptions, SolveStatus};
    use crate::curvature::ConnectorFrame;
    use crate::error::{AnchorRole, Error};
    use crate::max_curvature::max_curvature;
    use crate::{AnchorPose, Angle, ControlDistances};

    fn pose(x: f64, y: f64, radians: f64) -> AnchorPose {
        AnchorPose::new((x, y), Angle::from_radians(radians))
    }

    #[test]
    fn worked_example_beats_naive_guess() {
        let start = pose(0.0, 0.0, 0.5_f64.atan());
        let end = pose(1000.0, 1000.0, -FRAC_PI_2 - 0.5_f64.atan());
        let options = SolveOptions::default();
        let solution = solve(&start, &end, &options).unwrap();
        let d = solution.distances;
        assert!(d.is_finite() && d.d0 > 0.0 && d.d1 > 0.0, "got {d:?}");
        assert_eq!(solution.report.status, SolveStatus::Converged);

        let frame = ConnectorFrame::new(&start, &end);
        let naive = ControlDistances::splat(0.5 * frame.chord());
        let naive_value = max_curvature(&frame, naive, &options.max_curvature).value;
        assert!(
            solution.report.value < naive_value,
            "{} not below {naive_value}",
            solution.report.value
        );
        // Roughly half of the naive guess.
        assert!(solution.report.value < 0.6 * naive_value);
    }

    #[test]
    fn collinear_is_straight() {
        for (x, y) in [(100.0, 0.0), (-30.0, 40.0), (0.0, -7.5), (1e4, 2e4)] {
            let chord_angle = Angle::of_vec((x, y).into());
            let start = AnchorPose::new((0.0, 0.0), chord_angle);
            let end = AnchorPose::new((x, y), chord_angle.reversed());
            let solution = solve(&start, &end, &SolveOptions::default()).unwrap();
            let chord = solution.report.chord;
            assert_eq!(solution.report.value, 0.0);
            for d in [solution.distances.d0, solution.distances.d1] {
                assert!((d - chord / 3.0).abs() < 0.05 * chord, "got {d} for {chord}");
            }
        }
    }

    #[test]
    fn landmarks_order() {
        let end = pose(100.0, 0.0, PI);
        let value = |offset: f64| {
            solve(&pose(0.0, 0.0, offset), &end, &SolveOptions::default())
                .unwrap()
                .report
                .value
        };
        let straight = value(0.0);
        let right_angle = value(FRAC_PI_2);
        let sharp = value(0.75 * PI);
        assert_eq!(straight, 0.0);
        assert!(straight <= right_angle);
        assert!(right_angle <= sharp, "{right_angle} > {sharp}");
    }

    #[test]
    fn swapping_anchors_is_symmetric() {
        let cases = [
            (pose(0.0, 0.0, 0.4), pose(200.0, 50.0, 2.0)),
            (pose(0.0, 0.0, 0.5_f64.atan()), pose(1000.0, 1000.0, -FRAC_PI_2 - 0.5_f64.atan())),
            (pose(-20.0, 10.0, FRAC_PI_2), pose(80.0, 10.0, FRAC_PI_2)),
        ];
        for (start, end) in cases {
            let options = SolveOptions::default();
            let there = solve(&start, &end, &options).unwrap();
            let back = solve(&end, &start, &options).unwrap();
            assert_eq!(there.report.status, SolveStatus::Converged);
            assert_eq!(back.report.status, SolveStatus::Converged);
            let (a, b) = (there.report.value, back.report.value);
            assert!((a - b).abs() <= 1e-6 * a.max(b), "{a} vs {b}");
        }
    }

    #[test]
    fn deterministic() {
        let start = pose(3.0, 4.0, 1.0);
        let end = pose(150.0, -60.0, -2.5);
        let options = SolveOptions::default();
        let a = solve(&start, &end, &options).unwrap();
        let b = solve(&start, &end, &options).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn coincident_anchors() {
        let start = pose(5.0, 5.0, 0.3);
        let end = pose(5.0, 5.0, 2.0);
        let solution = solve(&start, &end, &SolveOptions::default()).unwrap();
        assert_eq!(solution.report.status, SolveStatus::Degenerate);
        assert_eq!(solution.distances, ControlDistances::splat(1e-6));
        assert_eq!(solution.report.lower_bound, 1e-6);
        assert!(solution.report.value.is_finite());
        assert_eq!(solution.report.outer_evaluations, 1);
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let ok = pose(0.0, 0.0, 0.0);
        let err = solve(&pose(f64::NAN, 0.0, 0.0), &ok, &SolveOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::NonFinitePosition {
                role: AnchorRole::Start,
                ..
            }
        ));
        let err = solve(&ok, &pose(1.0, 1.0, f64::INFINITY), &SolveOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::NonFiniteAngle {
                role: AnchorRole::End,
                ..
            }
        ));
    }

    #[test]
    fn huge_coordinates_stay_finite() {
        let start = pose(0.0, 0.0, 0.3);
        let end = pose(1e200, 1e200, -2.0);
        let solution = solve(&start, &end, &SolveOptions::default()).unwrap();
        let report = solution.report;
        let d = solution.distances;
        assert!(report.chord.is_finite() && report.lower_bound.is_finite());
        assert!(d.is_finite() && report.value.is_finite(), "got {solution:?}");
        assert!(d.d0 >= report.lower_bound && d.d1 >= report.lower_bound);
        let curve = ConnectorFrame::new(&start, &end).cubic(d);
        assert!(curve.is_finite(), "got {curve:?}");
    }

    #[test]
    fn overflowing_chord_is_rejected() {
        let start = pose(-1e308, 0.0, 0.0);
        let end = pose(1e308, 0.0, PI);
        assert!(matches!(
            solve(&start, &end, &SolveOptions::default()),
            Err(Error::AnchorsTooFar { chord, .. }) if chord == f64::INFINITY
        ));
        // A finite chord can still overflow the lower bound.
        let options = SolveOptions::default().with_lower_bound_fraction(1e300);
        let err = solve(&pose(0.0, 0.0, 0.0), &pose(1e10, 0.0, PI), &options).unwrap_err();
        assert!(matches!(err, Error::AnchorsTooFar { chord, .. } if chord == 1e10));
    }

    #[test]
    fn invalid_options_are_rejected() {
        let start = pose(0.0, 0.0, 0.0);
        let end = pose(10.0, 0.0, 0.0);
        let bad = [
            SolveOptions::default().with_lower_bound_fraction(-0.1),
            SolveOptions::default().with_min_lower_bound(0.0),
            SolveOptions::default().with_initial_guess_fraction(f64::NAN),
            SolveOptions::default().with_initial_step_fraction(0.0),
            SolveOptions::default().with_xtol_fraction(f64::INFINITY),
            SolveOptions::default().with_max_evaluations(2),
            SolveOptions::default().with_max_distance_fraction(Some(-1.0)),
            SolveOptions::default()
                .with_max_curvature(crate::MaxCurvatureOptions::default().with_grid_intervals(0)),
        ];
        for options in bad {
            assert!(
                matches!(solve(&start, &end, &options), Err(Error::InvalidOptions(_))),
                "{options:?} accepted"
            );
        }
    }

    #[test]
    fn budget_is_honoured() {
        let start = pose(0.0, 0.0, 0.4);
        let end = pose(200.0, 50.0, 2.0);
        let options = SolveOptions::default()
            .with_xtol_fraction(1e-9)
            .with_max_evaluations(25);
        let solution = solve(&start, &end, &options).unwrap();
        assert_eq!(solution.report.status, SolveStatus::BudgetExhausted);
        // One iteration can overshoot the budget by at most three evaluations.
        assert!(solution.report.outer_evaluations <= 25 + 3);
        assert!(solution.distances.d0 >= solution.report.lower_bound);
        assert!(solution.distances.d1 >= solution.report.lower_bound);
    }

    #[test]
    fn upper_bound_is_honoured() {
        // Both thorns splay outwards: the longer the arms, the flatter the
        // connector, so an unbounded search only stops at its budget.
        let start = pose(0.0, 0.0, 0.75 * PI);
        let end = pose(100.0, 0.0, 0.25 * PI);
        let runaway = solve(&start, &end, &SolveOptions::default()).unwrap();
        assert_eq!(runaway.report.status, SolveStatus::BudgetExhausted);
        assert!(runaway.distances.d0 > 1e3 * runaway.report.chord);

        let options = SolveOptions::default().with_max_distance_fraction(Some(0.5));
        let solution = solve(&start, &end, &options).unwrap();
        assert_eq!(solution.report.status, SolveStatus::Converged);
        let chord = solution.report.chord;
        for d in [solution.distances.d0, solution.distances.d1] {
            assert!(d <= 0.5 * chord, "got {d}");
            assert!(d >= solution.report.lower_bound);
        }
    }

    #[test]
    fn random_anchors_respect_lower_bound() {
        let mut rng = StdRng::seed_from_u64(0x7407);
        let options = SolveOptions::default();
        for _ in 0..40 {
            let start = pose(
                rng.random_range(-500.0..500.0),
                rng.random_range(-500.0..500.0),
                rng.random_range(-PI..PI),
            );
            let end = pose(
                rng.random_range(-500.0..500.0),
                rng.random_range(-500.0..500.0),
                rng.random_range(-PI..PI),
            );
            let solution = solve(&start, &end, &options).unwrap();
            let report = solution.report;
            let d = solution.distances;
            assert!(d.is_finite() && report.value.is_finite());
            assert!(d.d0 >= report.lower_bound && d.d1 >= report.lower_bound);
            assert!(report.outer_evaluations <= options.max_evaluations + 3);
            assert_ne!(report.status, SolveStatus::Fallback);
        }
    }
}
