// Copyright 2026 the Thorn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Smooth connector curves between anchored endpoints.
//!
//! Diagram editors join boxes with curves that leave and arrive at fixed
//! "thorns": a position plus a direction at each end. Given two such anchors,
//! thorn builds the cubic Bézier that passes through both anchor positions
//! along their thorn directions and whose sharpest bend is as gentle as
//! possible.
//!
//! The only free parameters of such a cubic are the lengths of its two
//! control arms. They are chosen by a nested, derivative-free optimization:
//! for trial lengths the sharpest point of the curve is located (sampling
//! plus [Brent's method](common::minimize_bounded)), and the lengths are
//! varied by a bounded [Nelder–Mead](simplex::minimize_nelder_mead) search to
//! make that sharpest point as flat as possible.
//!
//! # Examples
//!
//! One-off connectors:
//! ```
//! use thorn::{AnchorPose, ConnectorBuilder, SolveStatus};
//!
//! // Leave the origin heading right, arrive at (200, 100) from below.
//! let start = AnchorPose::from_degrees(0.0, 0.0, 0.0);
//! let end = AnchorPose::from_degrees(200.0, 100.0, -90.0);
//! let connector = ConnectorBuilder::new().build(&start, &end).unwrap();
//!
//! assert_eq!(connector.report.status, SolveStatus::Converged);
//! let [p0, p1, p2, p3] = connector.curve.points();
//! assert_eq!((p0, p3), (start.position, end.position));
//! assert!(p1.x > p0.x && p2.y < p3.y);
//! ```
//!
//! A connector that follows its anchors as they are dragged around:
//! ```
//! use thorn::{AnchorPose, Connector, Point};
//!
//! let mut connector = Connector::new(
//!     AnchorPose::from_screen_degrees(10.0, 10.0, 0.0),
//!     AnchorPose::from_screen_degrees(300.0, 200.0, 90.0),
//! );
//! connector.set_end_position(Point::new(320.0, 180.0));
//! let curve = connector.curve().unwrap().curve;
//! assert_eq!(curve.p3, Point::new(320.0, 180.0));
//! ```
//!
//! # Conventions
//!
//! Each anchor's angle is the direction from the anchor towards its own
//! control point, for the start and the end alike. A straight connector
//! along the x axis therefore has a start thorn of 0° and an end thorn
//! of 180°.
//!
//! All computation happens in the coordinates the anchors are given in.
//! Angles are anti-clockwise in a Y-up frame; for Y-down screen coordinates
//! with on-screen anti-clockwise angles, use
//! [`AnchorPose::from_screen_degrees`].
//!
//! # Feature Flags
//!
//! The following crate [feature flags](https://doc.rust-lang.org/cargo/reference/features.html#dependency-features) are available:
//!
//! - `std` (enabled by default): Get floating point functions from the standard library
//!   (likely using your target's libc), and enable [`SolveTimer`].
//! - `libm`: Use floating point implementations from [libm][].
//!   This is useful for `no_std` environments.
//!   However, note that the `libm` crate is not as efficient as the standard library.
//! - `mint`: Enable `From`/`Into` conversion of [`Point`] and [`Vec2`] with [mint][] types.
//! - `serde`: Implement `serde::Deserialize` and `serde::Serialize` on the value and
//!   options types.
//! - `schemars`: Add best-effort support for using thorn types in JSON schemas using [schemars][].
//!
//! At least one of `std` and `libm` is required; `std` overrides `libm`.
//!
//! Solves log through [tracing]: finished solves at `debug`, best-effort
//! results at `warn`, and lazy connector rebuilds at `trace`.
//!
//! [libm]: https://docs.rs/libm
//! [mint]: https://docs.rs/mint
//! [schemars]: https://docs.rs/schemars
//! [tracing]: https://docs.rs/tracing

// LINEBENDER LINT SET - lib.rs - v1
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]
#![allow(
    clippy::unreadable_literal,
    clippy::many_single_char_names,
    clippy::excessive_precision
)]
#![allow(
    missing_debug_implementations,
    elided_lifetimes_in_paths,
    single_use_lifetimes,
    trivial_numeric_casts,
    unnameable_types,
    clippy::use_self,
    clippy::return_self_not_must_use,
    clippy::cast_possible_truncation,
    clippy::missing_assert_message,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::exhaustive_enums,
    clippy::exhaustive_structs,
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason
)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("thorn requires either the `std` or `libm` feature");

// Suppress the unused_crate_dependencies lint when both std and libm are specified.
#[cfg(all(feature = "std", feature = "libm"))]
use libm as _;

mod anchor;
mod angle;
pub mod common;
mod connector;
mod cubicbez;
mod curvature;
mod error;
mod line;
mod max_curvature;
mod observer;
mod param_curve;
mod point;
mod quadbez;
pub mod simplex;
mod solve;
mod vec2;

pub use crate::anchor::{AnchorPose, ControlDistances};
pub use crate::angle::{Angle, ANGLE_EPSILON};
pub use crate::connector::{Connector, ConnectorBuilder, ConnectorCurve};
pub use crate::cubicbez::CubicBez;
pub use crate::curvature::{curvature, ConnectorFrame};
pub use crate::error::{AnchorRole, Error, Result};
pub use crate::line::{ConstPoint, Line};
pub use crate::max_curvature::{max_curvature, MaxCurvature, MaxCurvatureOptions, MAX_CANDIDATES};
#[cfg(feature = "std")]
pub use crate::observer::SolveTimer;
pub use crate::observer::SolveObserver;
pub use crate::param_curve::{ParamCurve, ParamCurveCurvature, ParamCurveDeriv};
pub use crate::point::Point;
pub use crate::quadbez::QuadBez;
pub use crate::solve::{solve, solve_observed, Solution, SolveOptions, SolveReport, SolveStatus};
pub use crate::vec2::Vec2;
