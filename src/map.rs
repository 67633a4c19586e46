//! Mapping between reference and physical coordinates.
//!
//! The forward map is the sum of node coordinates weighted by the
//! geometric basis (the Lagrange lattice basis of the order inferred
//! from the element's node count, or the radial mapping basis for the
//! infinite topologies). The inverse map solves for the reference
//! coordinates of a physical point: directly for affine elements, by
//! Newton iteration otherwise. Elements embedded in a higher-dimensional
//! space (a triangle in 3D, say) are handled through the normal
//! equations of the rectangular Jacobian.

use crate::basis::infinite;
use crate::basis::lagrange;
use crate::reference_element;
use crate::traits::Element;
use crate::types::{ElementTopology, EvalError};
use itertools::izip;
use log::{debug, trace};
use num::Float;
use num::ToPrimitive;
use rlst::RlstScalar;

/// Hard cap on the number of Newton iterations of the inverse map
pub const MAX_NEWTON_ITERATIONS: usize = 20;

/// Convergence tolerance of the inverse map.
///
/// The physical-space residual is compared against this value scaled by
/// the element diameter (at least 1, so tiny elements do not tighten the
/// test below floating precision); the reference-space Newton step is
/// compared against it directly.
pub const INVERSE_MAP_TOLERANCE: f64 = 1e-12;

fn no_map(cell: ElementTopology, nodes: usize) -> EvalError {
    EvalError::UnsupportedElement(format!(
        "no geometric map for a {cell:?} with {nodes} nodes"
    ))
}

/// The geometric map order of an element, inferred from its node count
pub fn map_order<E: Element>(element: &E) -> Result<usize, EvalError> {
    let cell = element.topology();
    for degree in [1, 2] {
        if reference_element::node_count(cell, degree) == Some(element.node_count()) {
            return Ok(degree);
        }
    }
    Err(no_map(cell, element.node_count()))
}

fn geom_shape<T: Float + RlstScalar<Real = T>>(
    cell: ElementTopology,
    degree: usize,
    i: usize,
    point: &[T],
) -> Option<T> {
    if cell.is_infinite() {
        if !infinite::ENABLED {
            return None;
        }
        infinite::shape(cell, degree, i, point)
    } else {
        lagrange::shape(cell, degree, i, point)
    }
}

fn geom_shape_deriv<T: Float + RlstScalar<Real = T>>(
    cell: ElementTopology,
    degree: usize,
    i: usize,
    j: usize,
    point: &[T],
) -> Option<T> {
    if cell.is_infinite() {
        if !infinite::ENABLED {
            return None;
        }
        infinite::shape_deriv(cell, degree, i, j, point)
    } else {
        lagrange::shape_deriv(cell, degree, i, j, point)
    }
}

/// Map a reference point to physical space
pub fn forward_map<T: Float + RlstScalar<Real = T>, E: Element<T = T>>(
    element: &E,
    point: &[T],
) -> Result<Vec<T>, EvalError> {
    let cell = element.topology();
    let tdim = reference_element::dim(cell);
    if point.len() != tdim {
        return Err(EvalError::DimensionMismatch {
            expected: tdim,
            found: point.len(),
        });
    }
    let degree = map_order(element)?;
    let mut mapped = vec![T::from(0.0).unwrap(); element.dim()];
    for i in 0..element.node_count() {
        let phi = geom_shape(cell, degree, i, point)
            .ok_or_else(|| no_map(cell, element.node_count()))?;
        for (component, coord) in izip!(mapped.iter_mut(), element.node(i).iter()) {
            *component += *coord * phi;
        }
    }
    Ok(mapped)
}

/// The Jacobian of the forward map at a reference point.
///
/// Entry `[td * gdim + gd]` is the derivative of physical coordinate
/// `gd` with respect to reference coordinate `td`.
pub fn jacobian<T: Float + RlstScalar<Real = T>, E: Element<T = T>>(
    element: &E,
    point: &[T],
) -> Result<Vec<T>, EvalError> {
    let cell = element.topology();
    let tdim = reference_element::dim(cell);
    let gdim = element.dim();
    if point.len() != tdim {
        return Err(EvalError::DimensionMismatch {
            expected: tdim,
            found: point.len(),
        });
    }
    let degree = map_order(element)?;
    let mut jac = vec![T::from(0.0).unwrap(); tdim * gdim];
    for i in 0..element.node_count() {
        let node = element.node(i);
        for td in 0..tdim {
            let dphi = geom_shape_deriv(cell, degree, i, td, point)
                .ok_or_else(|| no_map(cell, element.node_count()))?;
            for gd in 0..gdim {
                jac[td * gdim + gd] += node[gd] * dphi;
            }
        }
    }
    Ok(jac)
}

/// The diameter of an element: the largest distance between two of its
/// nodes
pub fn diameter<T: Float + RlstScalar<Real = T>, E: Element<T = T>>(element: &E) -> T {
    let mut result = T::from(0.0).unwrap();
    for i in 0..element.node_count() {
        for j in i + 1..element.node_count() {
            let mut dist2 = T::from(0.0).unwrap();
            for (a, b) in izip!(element.node(i).iter(), element.node(j).iter()) {
                let t = *a - *b;
                dist2 += t * t;
            }
            result = Float::max(result, Float::sqrt(dist2));
        }
    }
    result
}

/// Solve `(J^T J) delta = J^T r` by Cramer's rule. Returns `None` when
/// the system is singular, which signals a degenerate element.
fn solve_normal<T: Float + RlstScalar<Real = T>>(
    jac: &[T],
    r: &[T],
    tdim: usize,
    gdim: usize,
    scale: T,
) -> Option<Vec<T>> {
    let mut a = [[T::from(0.0).unwrap(); 3]; 3];
    let mut b = [T::from(0.0).unwrap(); 3];
    for td in 0..tdim {
        for sd in 0..tdim {
            for gd in 0..gdim {
                a[td][sd] += jac[td * gdim + gd] * jac[sd * gdim + gd];
            }
        }
        for gd in 0..gdim {
            b[td] += jac[td * gdim + gd] * r[gd];
        }
    }
    let singular = T::epsilon() * Float::powi(scale, 2 * tdim as i32);
    match tdim {
        1 => {
            let det = a[0][0];
            if Float::abs(det) <= singular {
                return None;
            }
            Some(vec![b[0] / det])
        }
        2 => {
            let det = a[0][0] * a[1][1] - a[0][1] * a[1][0];
            if Float::abs(det) <= singular {
                return None;
            }
            Some(vec![
                (b[0] * a[1][1] - b[1] * a[0][1]) / det,
                (a[0][0] * b[1] - a[1][0] * b[0]) / det,
            ])
        }
        3 => {
            let minor =
                |m: &[[T; 3]; 3], c: usize| match c {
                    0 => m[1][1] * m[2][2] - m[1][2] * m[2][1],
                    1 => m[1][0] * m[2][2] - m[1][2] * m[2][0],
                    _ => m[1][0] * m[2][1] - m[1][1] * m[2][0],
                };
            let det = a[0][0] * minor(&a, 0) - a[0][1] * minor(&a, 1) + a[0][2] * minor(&a, 2);
            if Float::abs(det) <= singular {
                return None;
            }
            let mut delta = vec![T::from(0.0).unwrap(); 3];
            for (c, entry) in delta.iter_mut().enumerate() {
                // replace column c by the right-hand side
                let mut m = a;
                for row in 0..3 {
                    m[row][c] = b[row];
                }
                let d = m[0][0] * minor(&m, 0) - m[0][1] * minor(&m, 1) + m[0][2] * minor(&m, 2);
                *entry = d / det;
            }
            Some(delta)
        }
        _ => None,
    }
}

fn norm<T: Float + RlstScalar<Real = T>>(v: &[T]) -> T {
    let mut total = T::from(0.0).unwrap();
    for x in v {
        total += *x * *x;
    }
    Float::sqrt(total)
}

/// Find the reference coordinates whose forward map is the given
/// physical point.
///
/// Affine elements (straight-sided simplices) are solved with a single
/// linear solve. Everything else runs Newton iteration from the
/// reference midpoint, converging when either the physical residual or
/// the reference-space step drops below tolerance. A singular map or a
/// solve that does not converge within [`MAX_NEWTON_ITERATIONS`] is
/// reported as [`EvalError::InverseMapDivergence`], never as a
/// best-effort guess. The result is not clamped to the reference
/// element; use `on_reference_element` to decide membership.
pub fn inverse_map<T: Float + RlstScalar<Real = T>, E: Element<T = T>>(
    element: &E,
    point: &[T],
) -> Result<Vec<T>, EvalError> {
    let cell = element.topology();
    let tdim = reference_element::dim(cell);
    let gdim = element.dim();
    if point.len() != gdim {
        return Err(EvalError::DimensionMismatch {
            expected: gdim,
            found: point.len(),
        });
    }
    if tdim == 0 {
        return Ok(vec![]);
    }
    let degree = map_order(element)?;
    let one = T::from(1.0).unwrap();
    let scale = Float::max(diameter(element), one);
    let tol = T::from(INVERSE_MAP_TOLERANCE).unwrap() * scale;
    let step_tol = T::from(INVERSE_MAP_TOLERANCE).unwrap();
    let mut xi = reference_element::midpoint::<T>(cell);

    // straight-sided simplices carry an affine map: one step is exact
    let affine = degree == 1 && reference_element::is_simplex(cell);
    let max_iterations = if affine { 1 } else { MAX_NEWTON_ITERATIONS };

    let mut residual_norm;
    for iteration in 0..max_iterations {
        let mapped = forward_map(element, &xi)?;
        let residual = izip!(point.iter(), mapped.iter())
            .map(|(p, m)| *p - *m)
            .collect::<Vec<_>>();
        residual_norm = norm(&residual);
        if !affine && residual_norm <= tol {
            trace!("inverse map converged in {iteration} iterations");
            return Ok(xi);
        }
        let jac = jacobian(element, &xi)?;
        let delta = solve_normal(&jac, &residual, tdim, gdim, scale).ok_or_else(|| {
            debug!("singular map on a {cell:?} at iteration {iteration}");
            EvalError::InverseMapDivergence {
                iterations: iteration,
                residual: residual_norm.to_f64().unwrap_or(f64::NAN),
            }
        })?;
        for (x, d) in izip!(xi.iter_mut(), delta.iter()) {
            *x += *d;
        }
        if !affine && norm(&delta) <= step_tol {
            trace!("inverse map stalled in reference space after {iteration} iterations");
            return Ok(xi);
        }
    }
    if affine {
        return Ok(xi);
    }
    // the loop ended on an un-checked iterate; accept it if the residual
    // is already small enough
    let mapped = forward_map(element, &xi)?;
    let residual = izip!(point.iter(), mapped.iter())
        .map(|(p, m)| *p - *m)
        .collect::<Vec<_>>();
    residual_norm = norm(&residual);
    if residual_norm <= tol {
        return Ok(xi);
    }
    debug!(
        "inverse map failed to converge on a {cell:?}: residual {:?}",
        residual_norm.to_f64()
    );
    Err(EvalError::InverseMapDivergence {
        iterations: max_iterations,
        residual: residual_norm.to_f64().unwrap_or(f64::NAN),
    })
}
