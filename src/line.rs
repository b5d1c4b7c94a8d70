// Copyright 2026 the Thorn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lines.

use crate::{ParamCurve, ParamCurveDeriv, Point};

/// A single line.
///
/// In this crate lines mostly appear as the second derivative of a
/// [`CubicBez`](crate::CubicBez).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    /// The line's start point.
    pub p0: Point,
    /// The line's end point.
    pub p1: Point,
}

impl Line {
    /// Create a new line.
    #[inline(always)]
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>) -> Line {
        Line {
            p0: p0.into(),
            p1: p1.into(),
        }
    }

    /// The length of the line.
    #[inline]
    pub fn length(self) -> f64 {
        (self.p1 - self.p0).hypot()
    }
}

impl ParamCurve for Line {
    #[inline]
    fn eval(&self, t: f64) -> Point {
        self.p0 + (self.p1 - self.p0) * t
    }

    #[inline]
    fn start(&self) -> Point {
        self.p0
    }

    #[inline]
    fn end(&self) -> Point {
        self.p1
    }
}

impl ParamCurveDeriv for Line {
    type DerivResult = ConstPoint;

    #[inline]
    fn deriv(&self) -> ConstPoint {
        ConstPoint((self.p1 - self.p0).to_point())
    }
}

/// A trivial "curve" that is just a constant.
#[derive(Clone, Copy, Debug)]
pub struct ConstPoint(Point);

impl ConstPoint {
    /// The point value of the const curve.
    #[inline]
    pub fn eval(self) -> Point {
        self.0
    }
}

impl ParamCurve for ConstPoint {
    #[inline]
    fn eval(&self, _t: f64) -> Point {
        self.0
    }
}

impl ParamCurveDeriv for ConstPoint {
    type DerivResult = ConstPoint;

    #[inline]
    fn deriv(&self) -> ConstPoint {
        ConstPoint(Point::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Line, ParamCurve, ParamCurveDeriv, Point};

    #[test]
    fn line_eval() {
        let l = Line::new((1.0, 2.0), (5.0, -2.0));
        assert_eq!(l.eval(0.5), Point::new(3.0, 0.0));
        assert_eq!(l.start(), Point::new(1.0, 2.0));
        assert_eq!(l.end(), Point::new(5.0, -2.0));
        assert_eq!(Line::new((0.0, 0.0), (3.0, 4.0)).length(), 5.0);
    }

    #[test]
    fn line_deriv() {
        let l = Line::new((1.0, 2.0), (5.0, -2.0));
        let d = l.deriv();
        assert_eq!(d.eval(), Point::new(4.0, -4.0));
        assert_eq!(ParamCurve::eval(&d, 0.7), Point::new(4.0, -4.0));
        assert_eq!(d.deriv().eval(), Point::ZERO);
    }
}
