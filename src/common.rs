// Copyright 2026 the Thorn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Common mathematical operations

#![allow(missing_docs)]

/// Defines a trait that chooses between libstd or libm implementations of float methods.
macro_rules! define_float_funcs {
    ($(
        fn $name:ident(self $(,$arg:ident: $arg_ty:ty)*) -> $ret:ty
        => $lname:ident;
    )+) => {
        #[cfg(not(feature = "std"))]
        pub(crate) trait FloatFuncs : Sized {
            /// Special implementation for rem_euclid, because libm doesn't have it.
            fn rem_euclid(self, rhs: Self) -> Self;

            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret;)+
        }

        #[cfg(not(feature = "std"))]
        impl FloatFuncs for f64 {
            #[inline]
            fn rem_euclid(self, rhs: f64) -> f64 {
                let r = self % rhs;
                if r < 0.0 {
                    r + rhs.abs()
                } else {
                    r
                }
            }

            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret {
                #[cfg(feature = "libm")]
                return libm::$lname(self $(,$arg as _)*);

                #[cfg(not(feature = "libm"))]
                compile_error!("thorn requires either the `std` or `libm` feature")
            })+
        }
    }
}

define_float_funcs! {
    fn atan2(self, other: Self) -> Self => atan2;
    fn hypot(self, other: Self) -> Self => hypot;
    fn sin_cos(self) -> (Self, Self) => sincos;
    fn sqrt(self) -> Self => sqrt;
}

/// The result of [`minimize_bounded`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalarMinimum {
    /// The abscissa of the best point found.
    pub x: f64,
    /// The function value at `x`.
    pub value: f64,
    /// Number of times the function was evaluated.
    pub evaluations: usize,
    /// Whether the bracket shrank below the requested tolerance before the
    /// evaluation budget ran out.
    pub converged: bool,
}

/// Minimize a scalar function on the closed interval `[a, b]`.
///
/// This is Brent's method: golden-section search, accelerated by successive
/// parabolic interpolation whenever the parabola's vertex falls well inside
/// the current bracket. It needs no derivatives and converges superlinearly
/// on smooth functions while never doing worse than golden section.
///
/// The search stops when the bracket around the best point is narrower than
/// about `xtol` (plus a relative term of `sqrt(ε)·|x|`), or after
/// `max_evaluations` evaluations of `f`, in which case the best point so far
/// is returned with `converged` set to `false`.
///
/// Only a local minimum is found. The interval endpoints themselves are never
/// evaluated, so a minimum sitting exactly on a bound is approached to within
/// the tolerance.
///
/// See: Richard P. Brent, *Algorithms for Minimization without Derivatives*,
/// chapter 5, and the `fminbound` routine of Forsythe, Malcolm and Moler.
pub fn minimize_bounded(
    mut f: impl FnMut(f64) -> f64,
    mut a: f64,
    mut b: f64,
    xtol: f64,
    max_evaluations: usize,
) -> ScalarMinimum {
    // (3 - sqrt(5)) / 2
    const GOLDEN: f64 = 0.3819660112501051;
    let sqrt_eps = f64::EPSILON.sqrt();
    if a > b {
        core::mem::swap(&mut a, &mut b);
    }
    // Invariant: xf is the best point so far, nfc the second best and fulc
    // the previous value of nfc.
    let mut fulc = a + GOLDEN * (b - a);
    let (mut nfc, mut xf) = (fulc, fulc);
    let mut rat: f64 = 0.0;
    let mut e: f64 = 0.0;
    let mut fx = f(xf);
    let mut evaluations = 1;
    let (mut ffulc, mut fnfc) = (fx, fx);
    let mut xm = 0.5 * (a + b);
    let mut tol1 = sqrt_eps * xf.abs() + xtol / 3.0;
    let mut tol2 = 2.0 * tol1;
    let mut converged = true;
    while (xf - xm).abs() > tol2 - 0.5 * (b - a) {
        if evaluations >= max_evaluations {
            converged = false;
            break;
        }
        let mut golden = true;
        if e.abs() > tol1 {
            golden = false;
            let mut r = (xf - nfc) * (fx - ffulc);
            let mut q = (xf - fulc) * (fx - fnfc);
            let mut p = (xf - fulc) * q - (xf - nfc) * r;
            q = 2.0 * (q - r);
            if q > 0.0 {
                p = -p;
            }
            q = q.abs();
            r = e;
            e = rat;
            if p.abs() < (0.5 * q * r).abs() && p > q * (a - xf) && p < q * (b - xf) {
                rat = p / q;
                let x = xf + rat;
                // Don't evaluate too close to the bracket ends.
                if x - a < tol2 || b - x < tol2 {
                    rat = if xm >= xf { tol1 } else { -tol1 };
                }
            } else {
                golden = true;
            }
        }
        if golden {
            e = if xf >= xm { a - xf } else { b - xf };
            rat = GOLDEN * e;
        }
        let step = rat.abs().max(tol1);
        let x = if rat >= 0.0 { xf + step } else { xf - step };
        let fu = f(x);
        evaluations += 1;
        if fu <= fx {
            if x >= xf {
                a = xf;
            } else {
                b = xf;
            }
            (fulc, ffulc) = (nfc, fnfc);
            (nfc, fnfc) = (xf, fx);
            (xf, fx) = (x, fu);
        } else {
            if x < xf {
                a = x;
            } else {
                b = x;
            }
            if fu <= fnfc || nfc == xf {
                (fulc, ffulc) = (nfc, fnfc);
                (nfc, fnfc) = (x, fu);
            } else if fu <= ffulc || fulc == xf || fulc == nfc {
                (fulc, ffulc) = (x, fu);
            }
        }
        xm = 0.5 * (a + b);
        tol1 = sqrt_eps * xf.abs() + xtol / 3.0;
        tol2 = 2.0 * tol1;
    }
    ScalarMinimum {
        x: xf,
        value: fx,
        evaluations,
        converged,
    }
}

#[cfg(test)]
mod tests {
    use super::minimize_bounded;

    #[test]
    fn bounded_parabola() {
        let min = minimize_bounded(|x| (x - 2.0) * (x - 2.0), 0.0, 5.0, 1e-8, 100);
        assert!(min.converged);
        assert!((min.x - 2.0).abs() < 1e-6, "got {min:?}");
        assert!(min.value < 1e-12);
    }

    #[test]
    fn minimum_on_bound() {
        // The unconstrained minimum is at -1, outside the interval.
        let min = minimize_bounded(|x| (x + 1.0) * (x + 1.0), 0.0, 5.0, 1e-8, 100);
        assert!(min.converged);
        assert!(min.x >= 0.0);
        assert!(min.x < 1e-6, "got {min:?}");
    }

    #[test]
    fn reversed_interval() {
        let min = minimize_bounded(|x| (x - 0.25).abs(), 1.0, 0.0, 1e-9, 200);
        assert!((min.x - 0.25).abs() < 1e-6, "got {min:?}");
    }

    #[test]
    fn non_smooth() {
        // A kink at the minimum defeats the parabolic steps, golden section
        // still gets there.
        let min = minimize_bounded(|x| (x - 0.7).abs() + 0.1, 0.0, 1.0, 1e-9, 500);
        assert!(min.converged);
        assert!((min.x - 0.7).abs() < 1e-6, "got {min:?}");
        assert!((min.value - 0.1).abs() < 1e-6);
    }

    #[test]
    fn budget_exhausted() {
        let mut calls = 0;
        let min = minimize_bounded(
            |x| {
                calls += 1;
                x.sin()
            },
            0.0,
            6.0,
            1e-12,
            5,
        );
        assert!(!min.converged);
        assert_eq!(min.evaluations, 5);
        assert_eq!(calls, 5);
    }
}
