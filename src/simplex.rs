// Copyright 2026 the Thorn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounded Nelder–Mead simplex minimization.

use core::cell::Cell;

use smallvec::SmallVec;

/// Parameters for [`minimize_nelder_mead`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimplexOptions {
    /// Offset of the initial simplex vertices from the starting point, along
    /// each coordinate axis.
    pub initial_step: f64,
    /// Convergence tolerance on the parameters.
    ///
    /// The search stops once every vertex is within `xtol` (in each
    /// coordinate) of the best vertex. There is no tolerance on
    /// function values.
    pub xtol: f64,
    /// Maximum number of function evaluations.
    ///
    /// This is checked once per iteration, and an iteration costs at most
    /// `N + 2` evaluations, so the actual count can overshoot slightly.
    pub max_evaluations: usize,
}

/// The result of [`minimize_nelder_mead`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimplexMinimum<const N: usize> {
    /// The best vertex found.
    pub x: [f64; N],
    /// The function value at `x`.
    pub value: f64,
    /// Number of function evaluations.
    pub evaluations: usize,
    /// Whether the simplex collapsed below `xtol` before the budget ran out.
    pub converged: bool,
}

#[derive(Clone, Copy, Debug)]
struct Vertex<const N: usize> {
    x: [f64; N],
    value: f64,
}

// Reflection, expansion, contraction and shrink coefficients.
const RHO: f64 = 1.0;
const CHI: f64 = 2.0;
const PSI: f64 = 0.5;
const SIGMA: f64 = 0.5;

/// Minimize a function of `N` variables inside an axis-aligned box.
///
/// This is the classic Nelder–Mead downhill simplex method. Bounds are
/// enforced by clipping every trial point into `[lower, upper]`; use
/// `f64::INFINITY` for an open upper side. `lower` must not exceed `upper`.
///
/// The initial simplex is `x0` plus one vertex offset by
/// `options.initial_step` along each axis. Vertices are kept sorted by a
/// stable sort, so among equally good vertices the older one stays best; on a
/// perfectly flat function the simplex shrinks onto `x0`.
///
/// NaN function values are treated as `+∞`.
pub fn minimize_nelder_mead<const N: usize>(
    mut f: impl FnMut([f64; N]) -> f64,
    x0: [f64; N],
    lower: [f64; N],
    upper: [f64; N],
    options: &SimplexOptions,
) -> SimplexMinimum<N> {
    let clip = |mut x: [f64; N]| {
        for k in 0..N {
            x[k] = x[k].max(lower[k]).min(upper[k]);
        }
        x
    };
    let evaluations = Cell::new(0);
    let mut eval = |x: [f64; N]| {
        evaluations.set(evaluations.get() + 1);
        let value = f(x);
        Vertex {
            x,
            value: if value.is_nan() { f64::INFINITY } else { value },
        }
    };

    let mut simplex: SmallVec<[Vertex<N>; 4]> = SmallVec::with_capacity(N + 1);
    simplex.push(eval(clip(x0)));
    for k in 0..N {
        let mut x = x0;
        x[k] += options.initial_step;
        simplex.push(eval(clip(x)));
    }
    simplex.sort_by(|a, b| a.value.total_cmp(&b.value));

    let mut converged = false;
    loop {
        let best = simplex[0].x;
        let size = simplex[1..]
            .iter()
            .flat_map(|v| (0..N).map(move |k| (v.x[k] - best[k]).abs()))
            .fold(0.0, f64::max);
        if size <= options.xtol {
            converged = true;
            break;
        }
        if evaluations.get() >= options.max_evaluations {
            break;
        }

        let worst = simplex[N];
        let mut centroid = [0.0; N];
        for v in &simplex[..N] {
            for k in 0..N {
                centroid[k] += v.x[k];
            }
        }
        for c in &mut centroid {
            *c /= N as f64;
        }
        // centroid + coeff * (centroid - worst)
        let along = |coeff: f64| {
            let mut x = [0.0; N];
            for k in 0..N {
                x[k] = centroid[k] + coeff * (centroid[k] - worst.x[k]);
            }
            clip(x)
        };

        let reflected = eval(along(RHO));
        let mut shrink = false;
        if reflected.value < simplex[0].value {
            let expanded = eval(along(RHO * CHI));
            simplex[N] = if expanded.value < reflected.value {
                expanded
            } else {
                reflected
            };
        } else if reflected.value < simplex[N - 1].value {
            simplex[N] = reflected;
        } else if reflected.value < worst.value {
            let contracted = eval(along(PSI * RHO));
            if contracted.value <= reflected.value {
                simplex[N] = contracted;
            } else {
                shrink = true;
            }
        } else {
            let contracted = eval(along(-PSI));
            if contracted.value < worst.value {
                simplex[N] = contracted;
            } else {
                shrink = true;
            }
        }
        if shrink {
            let best = simplex[0].x;
            for v in &mut simplex[1..] {
                let mut x = [0.0; N];
                for k in 0..N {
                    x[k] = best[k] + SIGMA * (v.x[k] - best[k]);
                }
                *v = eval(clip(x));
            }
        }
        simplex.sort_by(|a, b| a.value.total_cmp(&b.value));
    }

    let best = simplex[0];
    SimplexMinimum {
        x: best.x,
        value: best.value,
        evaluations: evaluations.get(),
        converged,
    }
}

#[cfg(test)]
mod tests {
    use super::{minimize_nelder_mead, SimplexOptions};

    #[test]
    fn rosenbrock() {
        let options = SimplexOptions {
            initial_step: 0.5,
            xtol: 1e-8,
            max_evaluations: 4000,
        };
        let min = minimize_nelder_mead(
            |p: [f64; 2]| (1.0 - p[0]).powi(2) + 100.0 * (p[1] - p[0] * p[0]).powi(2),
            [-1.2, 1.0],
            [-10.0; 2],
            [10.0; 2],
            &options,
        );
        assert!(min.converged, "got {min:?}");
        assert!((min.x[0] - 1.0).abs() < 1e-5, "got {min:?}");
        assert!((min.x[1] - 1.0).abs() < 1e-5, "got {min:?}");
    }

    #[test]
    fn active_lower_bound() {
        let options = SimplexOptions {
            initial_step: 1.0,
            xtol: 1e-9,
            max_evaluations: 1000,
        };
        let min = minimize_nelder_mead(
            |p: [f64; 2]| (p[0] + 1.0).powi(2) + (p[1] - 2.0).powi(2),
            [3.0, 3.0],
            [0.0; 2],
            [f64::INFINITY; 2],
            &options,
        );
        assert!(min.converged);
        assert_eq!(min.x[0], 0.0);
        assert!((min.x[1] - 2.0).abs() < 1e-6, "got {min:?}");
        assert!((min.value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn flat_function_stays_at_start() {
        let options = SimplexOptions {
            initial_step: 0.25,
            xtol: 0.1,
            max_evaluations: 100,
        };
        let min = minimize_nelder_mead(
            |_: [f64; 2]| 0.0,
            [0.3, 0.3],
            [0.01; 2],
            [f64::INFINITY; 2],
            &options,
        );
        assert!(min.converged);
        assert_eq!(min.x, [0.3, 0.3]);
    }

    #[test]
    fn nan_is_avoided() {
        let options = SimplexOptions {
            initial_step: 1.0,
            xtol: 1e-6,
            max_evaluations: 500,
        };
        let min = minimize_nelder_mead(
            |p: [f64; 1]| {
                if p[0] > 2.0 {
                    f64::NAN
                } else {
                    (p[0] - 1.5).powi(2)
                }
            },
            [0.0],
            [-5.0],
            [5.0],
            &options,
        );
        assert!(min.value.is_finite());
        assert!((min.x[0] - 1.5).abs() < 1e-4, "got {min:?}");
    }

    #[test]
    fn budget_exhausted() {
        let options = SimplexOptions {
            initial_step: 1.0,
            xtol: 1e-12,
            max_evaluations: 20,
        };
        let min = minimize_nelder_mead(
            |p: [f64; 2]| p[0] * p[0] + 10.0 * p[1] * p[1],
            [5.0, 5.0],
            [-100.0; 2],
            [100.0; 2],
            &options,
        );
        assert!(!min.converged);
        assert!(min.evaluations >= 20 && min.evaluations <= 20 + 4);
    }
}
