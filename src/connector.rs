// Copyright 2026 the Thorn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Building connector curves from anchor poses.

use crate::curvature::ConnectorFrame;
use crate::error::Result;
use crate::solve::{solve_observed, SolveOptions, SolveReport};
use crate::{AnchorPose, Angle, ControlDistances, CubicBez, Point, SolveObserver};

/// Turns pairs of anchor poses into connector curves.
///
/// ```
/// use thorn::{AnchorPose, ConnectorBuilder, ParamCurve};
///
/// let start = AnchorPose::from_degrees(0.0, 0.0, 26.565);
/// let end = AnchorPose::from_degrees(1000.0, 1000.0, -116.565);
/// let connector = ConnectorBuilder::new().build(&start, &end).unwrap();
/// assert_eq!(connector.curve.start(), start.position);
/// assert_eq!(connector.curve.end(), end.position);
/// assert!(connector.distances.d0 > 0.0 && connector.distances.d1 > 0.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ConnectorBuilder {
    options: SolveOptions,
}

/// A solved connector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectorCurve {
    /// The curve, from the start anchor to the end anchor.
    pub curve: CubicBez,
    /// The control arm lengths it was built from.
    pub distances: ControlDistances,
    /// Diagnostics of the solve.
    pub report: SolveReport,
}

impl ConnectorBuilder {
    /// A builder with the default [`SolveOptions`].
    pub fn new() -> ConnectorBuilder {
        ConnectorBuilder::default()
    }

    /// Use the given options for every solve.
    ///
    /// The options are checked when a curve is built.
    #[must_use]
    pub fn with_options(mut self, options: SolveOptions) -> ConnectorBuilder {
        self.options = options;
        self
    }

    /// The options used for every solve.
    pub fn options(&self) -> &SolveOptions {
        &self.options
    }

    /// Build the connector between two anchors.
    pub fn build(&self, start: &AnchorPose, end: &AnchorPose) -> Result<ConnectorCurve> {
        self.build_observed(start, end, &mut ())
    }

    /// Build the connector between two anchors, reporting progress to an
    /// observer.
    pub fn build_observed(
        &self,
        start: &AnchorPose,
        end: &AnchorPose,
        observer: &mut impl SolveObserver,
    ) -> Result<ConnectorCurve> {
        let solution = solve_observed(start, end, &self.options, observer)?;
        let curve = ConnectorFrame::new(start, end).cubic(solution.distances);
        Ok(ConnectorCurve {
            curve,
            distances: solution.distances,
            report: solution.report,
        })
    }
}

/// A connector that keeps its curve in step with its anchors.
///
/// Moving an anchor does not solve anything; it only drops the cached curve.
/// The next call to [`curve`](Connector::curve) solves again, so a burst of
/// updates (say, every mouse move of a drag) costs a single solve when the
/// curve is next drawn.
///
/// ```
/// use thorn::{AnchorPose, Connector, Point};
///
/// let mut connector = Connector::new(
///     AnchorPose::from_degrees(0.0, 0.0, 0.0),
///     AnchorPose::from_degrees(100.0, 50.0, 90.0),
/// );
/// let before = connector.curve().unwrap().curve;
/// for x in 0..10 {
///     connector.set_end_position(Point::new(100.0 + f64::from(x), 50.0));
/// }
/// assert!(connector.is_dirty());
/// let after = connector.curve().unwrap().curve;
/// assert_eq!(after.p3, Point::new(109.0, 50.0));
/// assert_ne!(before, after);
/// ```
#[derive(Clone, Debug)]
pub struct Connector {
    start: AnchorPose,
    end: AnchorPose,
    builder: ConnectorBuilder,
    /// `None` when the anchors have changed since the last solve.
    cached: Option<ConnectorCurve>,
}

impl Connector {
    /// A connector between two anchors, using default options.
    ///
    /// Nothing is solved until the curve is first requested.
    pub fn new(start: AnchorPose, end: AnchorPose) -> Connector {
        Connector::with_builder(start, end, ConnectorBuilder::new())
    }

    /// A connector between two anchors, solved with the given builder.
    pub fn with_builder(start: AnchorPose, end: AnchorPose, builder: ConnectorBuilder) -> Connector {
        Connector {
            start,
            end,
            builder,
            cached: None,
        }
    }

    /// The start anchor.
    pub fn start(&self) -> AnchorPose {
        self.start
    }

    /// The end anchor.
    pub fn end(&self) -> AnchorPose {
        self.end
    }

    /// The builder used for solves.
    pub fn builder(&self) -> &ConnectorBuilder {
        &self.builder
    }

    /// Replace the start anchor.
    pub fn set_start(&mut self, pose: AnchorPose) {
        self.start = pose;
        self.invalidate();
    }

    /// Replace the end anchor.
    pub fn set_end(&mut self, pose: AnchorPose) {
        self.end = pose;
        self.invalidate();
    }

    /// Move the start anchor, keeping its thorn.
    pub fn set_start_position(&mut self, position: Point) {
        self.start.position = position;
        self.invalidate();
    }

    /// Move the end anchor, keeping its thorn.
    pub fn set_end_position(&mut self, position: Point) {
        self.end.position = position;
        self.invalidate();
    }

    /// Turn the start thorn.
    pub fn set_start_angle(&mut self, angle: Angle) {
        self.start.angle = angle;
        self.invalidate();
    }

    /// Turn the end thorn.
    pub fn set_end_angle(&mut self, angle: Angle) {
        self.end.angle = angle;
        self.invalidate();
    }

    /// Replace the builder. The curve is solved again on the next read.
    pub fn set_builder(&mut self, builder: ConnectorBuilder) {
        self.builder = builder;
        self.invalidate();
    }

    /// Whether the anchors changed since the curve was last solved.
    pub fn is_dirty(&self) -> bool {
        self.cached.is_none()
    }

    /// The curve for the current anchors, solving first if they changed.
    pub fn curve(&mut self) -> Result<&ConnectorCurve> {
        let curve = match self.cached.take() {
            Some(curve) => curve,
            None => {
                tracing::trace!(start = ?self.start, end = ?self.end, "rebuilding dirty connector");
                self.builder.build(&self.start, &self.end)?
            }
        };
        Ok(self.cached.insert(curve))
    }

    /// Solve again, even if nothing changed.
    pub fn rebuild(&mut self) -> Result<&ConnectorCurve> {
        self.cached = None;
        self.curve()
    }

    /// The last solved curve, unless the anchors changed since.
    pub fn cached(&self) -> Option<&ConnectorCurve> {
        self.cached.as_ref()
    }

    fn invalidate(&mut self) {
        self.cached = None;
    }
}
