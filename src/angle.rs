// Copyright 2026 the Thorn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directions in the plane.

use core::f64::consts::{FRAC_PI_2, PI, TAU};
use core::fmt;
use core::ops::{Add, Neg, Sub};

use crate::Vec2;

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// Tolerance, in radians, for the approximate comparisons on [`Angle`].
pub const ANGLE_EPSILON: f64 = 1e-12;

/// A direction, stored as a free (unbounded) value in radians.
///
/// Arithmetic works on the free value, so adding a full turn gives a
/// different `Angle` that points the same way. Comparisons and
/// [`signed_difference`](Angle::signed_difference) look at the normalized
/// forms instead.
///
/// `Angle` does not implement `PartialEq`: two angles a full
/// turn apart are the same direction but not the same value. Use
/// [`is_same_direction`](Angle::is_same_direction) or
/// [`is_parallel`](Angle::is_parallel).
#[derive(Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Angle {
    radians: f64,
}

impl Angle {
    /// The zero angle, pointing along the positive x axis.
    pub const ZERO: Angle = Angle::from_radians(0.0);

    /// Create an angle from a value in radians.
    #[inline]
    pub const fn from_radians(radians: f64) -> Angle {
        Angle { radians }
    }

    /// Create an angle from a value in degrees.
    #[inline]
    pub fn from_degrees(degrees: f64) -> Angle {
        Angle::from_radians(degrees.to_radians())
    }

    /// The angle pointing along `v`.
    ///
    /// The zero vector gives [`Angle::ZERO`].
    #[inline]
    pub fn of_vec(v: Vec2) -> Angle {
        Angle::from_radians(v.atan2())
    }

    /// The free value in radians, as constructed.
    #[inline]
    pub fn radians(self) -> f64 {
        self.radians
    }

    /// The value in radians, normalized into `[0, 2π)`.
    #[inline]
    pub fn normalized_0_2pi(self) -> f64 {
        let a = self.radians.rem_euclid(TAU);
        // rem_euclid can round up to exactly TAU for tiny negative inputs.
        if a >= TAU {
            0.0
        } else {
            a
        }
    }

    /// The value in radians, normalized into `(-π/2, π/2]`.
    ///
    /// This forgets the orientation: an angle and its reverse map to the
    /// same value. It is only meaningful for comparing undirected lines.
    #[inline]
    pub fn normalized_half_pi(self) -> f64 {
        let a = self.radians.rem_euclid(PI);
        if a > FRAC_PI_2 {
            a - PI
        } else {
            a
        }
    }

    /// The value in degrees, normalized into `[0, 360)`.
    #[inline]
    pub fn degrees_0_360(self) -> f64 {
        self.normalized_0_2pi().to_degrees()
    }

    /// The value in degrees, normalized into `(-90, 90]`.
    #[inline]
    pub fn degrees_half(self) -> f64 {
        self.normalized_half_pi().to_degrees()
    }

    /// The shortest signed rotation, in radians, that takes `other` to `self`.
    ///
    /// The result is in `(-π, π]`. Positive values are anti-clockwise in Y-up
    /// coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use thorn::Angle;
    ///
    /// let a = Angle::from_degrees(10.0);
    /// let b = Angle::from_degrees(350.0);
    /// assert!((a.signed_difference(b).to_degrees() - 20.0).abs() < 1e-9);
    /// assert!((b.signed_difference(a).to_degrees() + 20.0).abs() < 1e-9);
    /// ```
    pub fn signed_difference(self, other: Angle) -> f64 {
        let delta = self.normalized_0_2pi() - other.normalized_0_2pi();
        if delta > PI {
            delta - TAU
        } else if delta <= -PI {
            delta + TAU
        } else {
            delta
        }
    }

    /// Whether both angles point the same way, within [`ANGLE_EPSILON`].
    #[inline]
    pub fn is_same_direction(self, other: Angle) -> bool {
        self.signed_difference(other).abs() <= ANGLE_EPSILON
    }

    /// Whether both angles describe the same undirected line, within
    /// [`ANGLE_EPSILON`].
    ///
    /// An angle is parallel to its own reverse.
    pub fn is_parallel(self, other: Angle) -> bool {
        let delta = (self.normalized_half_pi() - other.normalized_half_pi()).abs();
        // The two ends of (-π/2, π/2] are the same line.
        delta.min(PI - delta) <= ANGLE_EPSILON
    }

    /// The opposite direction.
    #[inline]
    pub fn reversed(self) -> Angle {
        Angle::from_radians(self.radians + PI)
    }

    /// The unit vector pointing in this direction.
    #[inline]
    pub fn unit_vec(self) -> Vec2 {
        Vec2::from_angle(self.normalized_0_2pi())
    }

    /// Is the underlying value [finite]?
    ///
    /// [finite]: f64::is_finite
    #[inline]
    pub fn is_finite(self) -> bool {
        self.radians.is_finite()
    }
}

impl Add for Angle {
    type Output = Angle;

    #[inline]
    fn add(self, other: Angle) -> Angle {
        Angle::from_radians(self.radians + other.radians)
    }
}

/// Adds a value in radians.
impl Add<f64> for Angle {
    type Output = Angle;

    #[inline]
    fn add(self, other: f64) -> Angle {
        Angle::from_radians(self.radians + other)
    }
}

impl Sub for Angle {
    type Output = Angle;

    #[inline]
    fn sub(self, other: Angle) -> Angle {
        Angle::from_radians(self.radians - other.radians)
    }
}

/// Subtracts a value in radians.
impl Sub<f64> for Angle {
    type Output = Angle;

    #[inline]
    fn sub(self, other: f64) -> Angle {
        Angle::from_radians(self.radians - other)
    }
}

impl Neg for Angle {
    type Output = Angle;

    #[inline]
    fn neg(self) -> Angle {
        Angle::from_radians(-self.radians)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.degrees_0_360(), formatter)?;
        write!(formatter, "°")
    }
}
