// Copyright 2026 the Thorn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported when a connector cannot be solved.

use core::fmt;

use crate::Point;

/// Which end of a connector an input belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnchorRole {
    /// The anchor the curve leaves from.
    Start,
    /// The anchor the curve arrives at.
    End,
}

impl fmt::Display for AnchorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AnchorRole::Start => "start",
            AnchorRole::End => "end",
        })
    }
}

/// The ways a solve request can be rejected.
///
/// Only malformed input is an error. Numerical trouble during a solve
/// (coincident anchors, an optimizer that runs out of budget) is reported
/// through [`SolveStatus`](crate::SolveStatus) instead.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An anchor position has a NaN or infinite coordinate.
    #[error("{role} anchor position is not finite: {position:?}")]
    NonFinitePosition {
        /// The offending anchor.
        role: AnchorRole,
        /// The position as given.
        position: Point,
    },
    /// An anchor angle is NaN or infinite.
    #[error("{role} anchor angle is not finite: {radians}")]
    NonFiniteAngle {
        /// The offending anchor.
        role: AnchorRole,
        /// The angle as given, in radians.
        radians: f64,
    },
    /// The anchors are so far apart that the distance between them, or the
    /// lower bound derived from it, is not a finite number.
    #[error("anchors too far apart to solve: distance {chord}, lower bound {lower_bound}")]
    AnchorsTooFar {
        /// The distance between the anchors.
        chord: f64,
        /// The lower bound on the control distances for that distance.
        lower_bound: f64,
    },
    /// A [`SolveOptions`](crate::SolveOptions) field is out of range.
    #[error("invalid solve options: {0}")]
    InvalidOptions(&'static str),
}

/// A `Result` with this crate's [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
