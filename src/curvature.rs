// Copyright 2026 the Thorn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Curvature of a connector for trial control distances.

use crate::{AnchorPose, ControlDistances, CubicBez, ParamCurveCurvature, Point, Vec2};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// Curvature below this, relative to the size of the connector, is noise.
///
/// A straight connector built from `sin`/`cos` directions has a cross
/// product of order 1e-20 rather than zero. The outer search would chase
/// that noise, so it is reported as exact zero.
const NOISE_FLOOR: f64 = 1e-9;

/// The fixed part of a connector: both anchors with their thorn directions
/// resolved to unit vectors.
///
/// Everything the solver varies is a [`ControlDistances`], so the trig is
/// done once here rather than on every curvature evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectorFrame {
    p0: Point,
    p3: Point,
    dir0: Vec2,
    dir3: Vec2,
    chord: f64,
}

impl ConnectorFrame {
    /// Resolve two anchor poses.
    pub fn new(start: &AnchorPose, end: &AnchorPose) -> ConnectorFrame {
        let delta = end.position - start.position;
        ConnectorFrame {
            p0: start.position,
            p3: end.position,
            dir0: start.direction(),
            dir3: end.direction(),
            // `f64::hypot` stays finite where the squared length overflows.
            chord: delta.x.hypot(delta.y),
        }
    }

    /// The distance between the two anchors.
    ///
    /// This is infinite only when the coordinate differences themselves
    /// overflow.
    #[inline]
    pub fn chord(&self) -> f64 {
        self.chord
    }

    /// The connector curve for the given control distances.
    ///
    /// `p1` is `d0` along the start thorn and `p2` is `d1` along the end
    /// thorn.
    #[inline]
    pub fn cubic(&self, d: ControlDistances) -> CubicBez {
        CubicBez::new(
            self.p0,
            self.p0 + self.dir0 * d.d0,
            self.p3 + self.dir3 * d.d1,
            self.p3,
        )
    }

    /// The signed curvature of the connector at parameter `t`.
    ///
    /// See [`ParamCurveCurvature::curvature`] for the sign. Curvature that is
    /// negligible at the scale of the connector is returned as exactly `0.0`.
    pub fn curvature(&self, t: f64, d: ControlDistances) -> f64 {
        let k = self.cubic(d).curvature(t);
        let scale = self.chord + d.d0.abs() + d.d1.abs();
        if k.abs() * scale <= NOISE_FLOOR {
            0.0
        } else {
            k
        }
    }
}

/// The signed curvature at `t` of the connector between two anchors.
///
/// This is a convenience for one-off queries; build a [`ConnectorFrame`] to
/// evaluate many parameters or distances for the same anchors.
#[inline]
pub fn curvature(t: f64, d: ControlDistances, start: &AnchorPose, end: &AnchorPose) -> f64 {
    ConnectorFrame::new(start, end).curvature(t, d)
}

#[cfg(test)]
mod tests {
    use core::f64::consts::FRAC_PI_2;

    use super::{curvature, ConnectorFrame};
    use crate::{AnchorPose, Angle, ControlDistances, ParamCurve, Point};

    #[test]
    fn cubic_follows_thorns() {
        let start = AnchorPose::new((0.0, 0.0), Angle::from_radians(FRAC_PI_2));
        let end = AnchorPose::new((10.0, 0.0), Angle::from_radians(FRAC_PI_2));
        let frame = ConnectorFrame::new(&start, &end);
        assert_eq!(frame.chord(), 10.0);
        let c = frame.cubic(ControlDistances::new(2.0, 3.0));
        assert_eq!(c.start(), Point::new(0.0, 0.0));
        assert_eq!(c.end(), Point::new(10.0, 0.0));
        assert!((c.p1.y - 2.0).abs() < 1e-12 && c.p1.x.abs() < 1e-12);
        assert!((c.p2.y - 3.0).abs() < 1e-12 && (c.p2.x - 10.0).abs() < 1e-12);
    }

    #[test]
    fn straight_connector_is_flat() {
        // A diagonal chord, so the thorn vectors carry rounding error.
        let a = Angle::from_degrees(37.0);
        let start = AnchorPose::new((0.0, 0.0), a);
        let p3 = Point::new(0.0, 0.0) + a.unit_vec() * 250.0;
        let end = AnchorPose::new(p3, a.reversed());
        let frame = ConnectorFrame::new(&start, &end);
        for &d in &[1.0, 40.0, 83.0, 120.0] {
            for i in 0..=10 {
                let t = f64::from(i) / 10.0;
                assert_eq!(frame.curvature(t, ControlDistances::splat(d)), 0.0);
            }
        }
    }

    #[test]
    fn quarter_circle() {
        const K: f64 = 0.5522847498;
        let start = AnchorPose::new((1.0, 0.0), Angle::from_radians(FRAC_PI_2));
        let end = AnchorPose::new((0.0, 1.0), Angle::ZERO);
        for i in 0..=8 {
            let k = curvature(f64::from(i) / 8.0, ControlDistances::splat(K), &start, &end);
            assert!((k - 1.0).abs() < 0.03, "got {k}");
        }
    }

    #[test]
    fn turning_direction_sets_sign() {
        let start = AnchorPose::new((0.0, 0.0), Angle::from_radians(FRAC_PI_2));
        // Up, over and down to an anchor on the right is a right turn.
        let end = AnchorPose::new((10.0, 0.0), Angle::from_radians(FRAC_PI_2));
        let d = ControlDistances::splat(5.0);
        assert!(curvature(0.5, d, &start, &end) < 0.0);
        let mirrored = AnchorPose::new((-10.0, 0.0), Angle::from_radians(FRAC_PI_2));
        assert!(curvature(0.5, d, &start, &mirrored) > 0.0);
        // The same curve traversed backwards has the opposite sign.
        let there = curvature(0.3, d, &start, &end);
        let back = curvature(0.7, d, &end, &start);
        assert!((there + back).abs() < 1e-12 * there.abs().max(1.0));
    }

    #[test]
    fn coincident_anchors() {
        let start = AnchorPose::new((5.0, 5.0), Angle::ZERO);
        let end = AnchorPose::new((5.0, 5.0), Angle::ZERO);
        let frame = ConnectorFrame::new(&start, &end);
        assert_eq!(frame.chord(), 0.0);
        // Both arms on top of each other: the curve has no extent at all.
        for i in 0..=4 {
            let k = frame.curvature(f64::from(i) / 4.0, ControlDistances::splat(1e-6));
            assert!(k.is_finite());
        }
    }
}
