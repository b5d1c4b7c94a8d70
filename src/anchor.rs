// Copyright 2026 the Thorn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Connector endpoints and the distances of their control points.

use crate::error::{AnchorRole, Error, Result};
use crate::{Angle, Point};

/// One end of a connector: where the curve meets the anchor and the
/// direction of its thorn.
///
/// The angle is the direction from the anchor *towards its own control
/// point*. For the start anchor that is the direction the curve leaves in;
/// for the end anchor it is the reverse of the direction the curve arrives
/// in. Describing both ends the same way makes a connector symmetric: swap
/// the two poses and you get the same curve, traversed backwards.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnchorPose {
    /// The point the curve passes through.
    pub position: Point,
    /// The thorn direction.
    pub angle: Angle,
}

impl AnchorPose {
    /// Create a pose from a position and a thorn angle.
    #[inline]
    pub fn new(position: impl Into<Point>, angle: Angle) -> AnchorPose {
        AnchorPose {
            position: position.into(),
            angle,
        }
    }

    /// Create a pose with the thorn angle given in degrees.
    #[inline]
    pub fn from_degrees(x: f64, y: f64, degrees: f64) -> AnchorPose {
        AnchorPose::new((x, y), Angle::from_degrees(degrees))
    }

    /// Create a pose from screen coordinates.
    ///
    /// Screens put the origin top-left with y growing downwards, while
    /// angles in a diagram editor are usually measured counter-clockwise as
    /// seen on screen. Flipping the angle is enough to make the two agree:
    /// positions are used as given, and all curves come out in screen
    /// coordinates.
    ///
    /// ```
    /// use thorn::AnchorPose;
    ///
    /// // A thorn pointing "up" on screen points towards negative y.
    /// let pose = AnchorPose::from_screen_degrees(10.0, 20.0, 90.0);
    /// let dir = pose.direction();
    /// assert!(dir.x.abs() < 1e-12);
    /// assert!((dir.y + 1.0).abs() < 1e-12);
    /// ```
    #[inline]
    pub fn from_screen_degrees(x: f64, y: f64, degrees: f64) -> AnchorPose {
        AnchorPose::new((x, y), -Angle::from_degrees(degrees))
    }

    /// The unit vector of the thorn.
    #[inline]
    pub fn direction(&self) -> crate::Vec2 {
        self.angle.unit_vec()
    }

    /// The control point at distance `d` along the thorn.
    #[inline]
    pub fn control_point(&self, d: f64) -> Point {
        self.position + self.direction() * d
    }

    /// Is this pose free of NaN and infinities?
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.angle.is_finite()
    }

    /// Check that the pose can be fed to the solver.
    pub(crate) fn validate(&self, role: AnchorRole) -> Result<()> {
        if !self.position.is_finite() {
            return Err(Error::NonFinitePosition {
                role,
                position: self.position,
            });
        }
        if !self.angle.is_finite() {
            return Err(Error::NonFiniteAngle {
                role,
                radians: self.angle.radians(),
            });
        }
        Ok(())
    }
}

/// The lengths of the two control arms of a connector.
///
/// `d0` belongs to the start anchor, `d1` to the end anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlDistances {
    /// Distance of the first control point from the start anchor.
    pub d0: f64,
    /// Distance of the second control point from the end anchor.
    pub d1: f64,
}

impl ControlDistances {
    /// Create a new pair of distances.
    #[inline]
    pub const fn new(d0: f64, d1: f64) -> ControlDistances {
        ControlDistances { d0, d1 }
    }

    /// The same distance on both arms.
    #[inline]
    pub const fn splat(d: f64) -> ControlDistances {
        ControlDistances { d0: d, d1: d }
    }

    /// The distances with the arms swapped, as seen from the other end.
    #[inline]
    #[must_use]
    pub const fn swapped(self) -> ControlDistances {
        ControlDistances {
            d0: self.d1,
            d1: self.d0,
        }
    }

    /// Are both distances [finite]?
    ///
    /// [finite]: f64::is_finite
    #[inline]
    pub fn is_finite(self) -> bool {
        self.d0.is_finite() && self.d1.is_finite()
    }

    #[inline]
    pub(crate) fn from_array(d: [f64; 2]) -> ControlDistances {
        ControlDistances { d0: d[0], d1: d[1] }
    }
}
