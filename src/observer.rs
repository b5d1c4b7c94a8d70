// Copyright 2026 the Thorn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hooks for watching a solve from the outside.

use crate::{AnchorPose, ControlDistances, MaxCurvature, SolveReport};

/// Receives callbacks as a connector is solved.
///
/// Every method has an empty default, so an observer only implements what
/// it cares about. `()` is the observer that ignores everything.
///
/// The inner callbacks fire once per objective evaluation of the outer
/// search, which is hundreds of times per solve; keep them cheap.
pub trait SolveObserver {
    /// A solve for these anchors is about to start.
    fn solve_started(&mut self, start: &AnchorPose, end: &AnchorPose) {
        let _ = (start, end);
    }

    /// A solve has finished, successfully or not.
    fn solve_finished(&mut self, report: &SolveReport) {
        let _ = report;
    }

    /// The maximum curvature is about to be computed for trial distances.
    fn inner_started(&mut self, distances: ControlDistances) {
        let _ = distances;
    }

    /// The maximum curvature for the last trial distances is known.
    fn inner_finished(&mut self, result: &MaxCurvature) {
        let _ = result;
    }
}

impl SolveObserver for () {}

impl<O: SolveObserver + ?Sized> SolveObserver for &mut O {
    #[inline]
    fn solve_started(&mut self, start: &AnchorPose, end: &AnchorPose) {
        (**self).solve_started(start, end);
    }

    #[inline]
    fn solve_finished(&mut self, report: &SolveReport) {
        (**self).solve_finished(report);
    }

    #[inline]
    fn inner_started(&mut self, distances: ControlDistances) {
        (**self).inner_started(distances);
    }

    #[inline]
    fn inner_finished(&mut self, result: &MaxCurvature) {
        (**self).inner_finished(result);
    }
}

#[cfg(feature = "std")]
pub use timer::SolveTimer;

#[cfg(feature = "std")]
mod timer {
    use std::time::{Duration, Instant};

    use super::SolveObserver;
    use crate::{AnchorPose, ControlDistances, MaxCurvature, SolveReport};

    /// A [`SolveObserver`] that accumulates wall-clock time spent at each
    /// level of the solve.
    ///
    /// One timer can be shared across any number of solves.
    ///
    /// ```
    /// use thorn::{AnchorPose, ConnectorBuilder, SolveTimer};
    ///
    /// let mut timer = SolveTimer::new();
    /// let start = AnchorPose::from_degrees(0.0, 0.0, 0.0);
    /// let end = AnchorPose::from_degrees(100.0, 100.0, 180.0);
    /// ConnectorBuilder::new()
    ///     .build_observed(&start, &end, &mut timer)
    ///     .unwrap();
    /// assert_eq!(timer.solves(), 1);
    /// assert!(timer.inner_calls() > 0);
    /// assert!(timer.inner_time() <= timer.solve_time());
    /// ```
    #[derive(Clone, Debug, Default)]
    pub struct SolveTimer {
        solves: usize,
        solve_time: Duration,
        solve_started: Option<Instant>,
        inner_calls: usize,
        inner_time: Duration,
        inner_started: Option<Instant>,
    }

    impl SolveTimer {
        /// A timer with nothing recorded.
        pub fn new() -> SolveTimer {
            SolveTimer::default()
        }

        /// Number of finished solves.
        pub fn solves(&self) -> usize {
            self.solves
        }

        /// Total time spent in finished solves.
        pub fn solve_time(&self) -> Duration {
            self.solve_time
        }

        /// Number of finished maximum-curvature searches.
        pub fn inner_calls(&self) -> usize {
            self.inner_calls
        }

        /// Total time spent in maximum-curvature searches.
        pub fn inner_time(&self) -> Duration {
            self.inner_time
        }

        /// Forget everything recorded so far.
        pub fn reset(&mut self) {
            *self = SolveTimer::default();
        }
    }

    impl SolveObserver for SolveTimer {
        fn solve_started(&mut self, _start: &AnchorPose, _end: &AnchorPose) {
            self.solve_started = Some(Instant::now());
        }

        fn solve_finished(&mut self, _report: &SolveReport) {
            if let Some(started) = self.solve_started.take() {
                self.solves += 1;
                self.solve_time += started.elapsed();
            }
        }

        fn inner_started(&mut self, _distances: ControlDistances) {
            self.inner_started = Some(Instant::now());
        }

        fn inner_finished(&mut self, _result: &MaxCurvature) {
            if let Some(started) = self.inner_started.take() {
                self.inner_calls += 1;
                self.inner_time += started.elapsed();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SolveObserver;
    use crate::{solve_observed, AnchorPose, ControlDistances, MaxCurvature, SolveOptions, SolveReport};

    #[derive(Default)]
    struct Counts {
        started: usize,
        finished: usize,
        inner_started: usize,
        inner_finished: usize,
        inner_evaluations: usize,
        reported: Option<SolveReport>,
    }

    impl SolveObserver for Counts {
        fn solve_started(&mut self, _start: &AnchorPose, _end: &AnchorPose) {
            self.started += 1;
        }

        fn solve_finished(&mut self, report: &SolveReport) {
            self.finished += 1;
            self.reported = Some(*report);
        }

        fn inner_started(&mut self, _distances: ControlDistances) {
            self.inner_started += 1;
        }

        fn inner_finished(&mut self, result: &MaxCurvature) {
            self.inner_finished += 1;
            self.inner_evaluations += result.evaluations;
        }
    }

    #[test]
    fn callbacks_match_report() {
        let start = AnchorPose::from_degrees(0.0, 0.0, 30.0);
        let end = AnchorPose::from_degrees(200.0, 50.0, 120.0);
        let mut counts = Counts::default();
        let solution = solve_observed(&start, &end, &SolveOptions::default(), &mut counts).unwrap();
        assert_eq!(counts.started, 1);
        assert_eq!(counts.finished, 1);
        assert_eq!(counts.inner_started, counts.inner_finished);
        assert_eq!(counts.inner_finished, solution.report.outer_evaluations);
        assert_eq!(counts.inner_evaluations, solution.report.inner_evaluations);
        assert_eq!(counts.reported, Some(solution.report));
    }

    #[test]
    fn rejected_input_is_not_observed() {
        let start = AnchorPose::from_degrees(f64::NAN, 0.0, 0.0);
        let end = AnchorPose::from_degrees(1.0, 0.0, 0.0);
        let mut counts = Counts::default();
        assert!(solve_observed(&start, &end, &SolveOptions::default(), &mut counts).is_err());
        assert_eq!(counts.started, 0);
        assert_eq!(counts.finished, 0);
    }

    #[cfg(feature = "std")]
    #[test]
    fn timer_accumulates() {
        use super::SolveTimer;

        let start = AnchorPose::from_degrees(0.0, 0.0, 0.0);
        let end = AnchorPose::from_degrees(100.0, 40.0, 90.0);
        let mut timer = SolveTimer::new();
        for _ in 0..2 {
            solve_observed(&start, &end, &SolveOptions::default(), &mut timer).unwrap();
        }
        assert_eq!(timer.solves(), 2);
        assert!(timer.inner_calls() >= 2 * 3);
        timer.reset();
        assert_eq!(timer.solves(), 0);
        assert_eq!(timer.inner_calls(), 0);
    }
}
