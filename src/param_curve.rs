// Copyright 2026 the Thorn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Traits for curves parametrized by a scalar.

use crate::Point;

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// A curve parametrized by a scalar.
///
/// If the result is interpreted as a point, this represents a curve.
/// But the result can be interpreted as a vector as well, which is how
/// the derivatives of a curve are represented.
pub trait ParamCurve: Sized {
    /// Evaluate the curve at parameter `t`.
    ///
    /// Generally `t` is in the range [0..1].
    fn eval(&self, t: f64) -> Point;

    /// The start point.
    fn start(&self) -> Point {
        self.eval(0.0)
    }

    /// The end point.
    fn end(&self) -> Point {
        self.eval(1.0)
    }
}

/// A differentiable parametrized curve.
pub trait ParamCurveDeriv {
    /// The parametric curve obtained by taking the derivative of this one.
    type DerivResult: ParamCurve;

    /// The derivative of the curve.
    ///
    /// Note that the type of the return value is somewhat inaccurate, as
    /// the derivative of a curve (mapping of param to point) is a mapping
    /// of param to vector. We choose to accept this rather than have a
    /// more complex type scheme.
    fn deriv(&self) -> Self::DerivResult;
}

/// A parametrized curve that reports its curvature.
pub trait ParamCurveCurvature: ParamCurveDeriv
where
    Self::DerivResult: ParamCurveDeriv,
{
    /// Compute the signed curvature at parameter `t`.
    ///
    /// The sign follows `x'·y'' - y'·x''`: positive where the curve turns
    /// anti-clockwise in Y-up coordinates.
    ///
    /// A point where the curve has zero speed has no defined curvature; this
    /// returns `0.0` there. Values too large to represent are clamped to
    /// `±f64::MAX`, so the result is never NaN for a finite curve.
    #[inline]
    fn curvature(&self, t: f64) -> f64 {
        let deriv = self.deriv();
        let deriv2 = deriv.deriv();
        let d = deriv.eval(t).to_vec2();
        let d2 = deriv2.eval(t).to_vec2();
        let speed2 = d.hypot2();
        if speed2 == 0.0 {
            return 0.0;
        }
        let k = d.cross(d2) / (speed2 * speed2.sqrt());
        if k.is_nan() {
            // The speed cubed underflowed to zero.
            0.0
        } else {
            k.clamp(-f64::MAX, f64::MAX)
        }
    }
}
