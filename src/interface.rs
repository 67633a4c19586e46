//! Dispatch of evaluation queries to the shape function families.
//!
//! Every public query takes a dimension, a descriptor and a topology
//! (or a live element) and routes to the right family implementation
//! with a single match over the family tag, so dispatch cost does not
//! depend on anything but the (small, fixed) family set. Adding a
//! family means adding a [`Family`](crate::types::Family) variant, one
//! module under `basis` and one arm in the matches here; no call site
//! changes.
//!
//! An unsupported `(family, order, topology)` tuple is always reported
//! as [`EvalError::UnsupportedElement`]; this is caller error and is
//! never silently defaulted.

use crate::basis::hierarchic;
use crate::basis::infinite;
use crate::basis::lagrange;
use crate::basis::monomial;
use crate::map;
use crate::reference_element;
use crate::traits::Element;
use crate::types::{ElementTopology, EvalError, Family, FeType};
use num::Float;
use rlst::RlstScalar;

fn check_dim(dim: usize, fe_t: FeType, cell: ElementTopology) -> Result<(), EvalError> {
    if dim != reference_element::dim(cell) {
        return Err(EvalError::unsupported(fe_t, cell, dim));
    }
    Ok(())
}

/// The dof count of a descriptor on a topology, or `None` when the
/// combination is unsupported. This is the single place where builds
/// without the `infinite` feature reject the unbounded topologies.
fn family_n_dofs(fe_t: FeType, cell: ElementTopology) -> Option<usize> {
    if cell.is_infinite() && !infinite::ENABLED {
        return None;
    }
    match fe_t.family() {
        Family::Lagrange => {
            if cell.is_infinite() {
                infinite::n_dofs(cell, fe_t.order())
            } else {
                lagrange::n_dofs(cell, fe_t.order())
            }
        }
        Family::Hierarchic => hierarchic::n_dofs(cell, fe_t.order()),
        Family::Monomial => monomial::n_dofs(cell, fe_t.order()),
    }
}

fn family_shape<T: Float + RlstScalar<Real = T>>(
    fe_t: FeType,
    cell: ElementTopology,
    i: usize,
    point: &[T],
) -> Option<T> {
    match fe_t.family() {
        Family::Lagrange => {
            if cell.is_infinite() {
                infinite::shape(cell, fe_t.order(), i, point)
            } else {
                lagrange::shape(cell, fe_t.order(), i, point)
            }
        }
        Family::Hierarchic => hierarchic::shape(cell, fe_t.order(), i, point),
        Family::Monomial => monomial::shape(cell, fe_t.order(), i, point),
    }
}

fn family_shape_deriv<T: Float + RlstScalar<Real = T>>(
    fe_t: FeType,
    cell: ElementTopology,
    i: usize,
    j: usize,
    point: &[T],
) -> Option<T> {
    match fe_t.family() {
        Family::Lagrange => {
            if cell.is_infinite() {
                infinite::shape_deriv(cell, fe_t.order(), i, j, point)
            } else {
                lagrange::shape_deriv(cell, fe_t.order(), i, j, point)
            }
        }
        Family::Hierarchic => hierarchic::shape_deriv(cell, fe_t.order(), i, j, point),
        Family::Monomial => monomial::shape_deriv(cell, fe_t.order(), i, j, point),
    }
}

/// The degree of the node lattice that carries the dofs of a descriptor
fn dof_node_order(fe_t: FeType) -> usize {
    match fe_t.family() {
        Family::Lagrange => fe_t.order(),
        Family::Hierarchic => usize::min(fe_t.order(), 2),
        Family::Monomial => 1,
    }
}

/// The number of shape functions of a finite element
pub fn n_shape_functions(
    dim: usize,
    fe_t: FeType,
    cell: ElementTopology,
) -> Result<usize, EvalError> {
    check_dim(dim, fe_t, cell)?;
    family_n_dofs(fe_t, cell).ok_or_else(|| EvalError::unsupported(fe_t, cell, dim))
}

/// The number of degrees of freedom of a finite element. This always
/// equals [`n_shape_functions`]: there is one basis function per dof.
pub fn n_dofs(dim: usize, fe_t: FeType, cell: ElementTopology) -> Result<usize, EvalError> {
    n_shape_functions(dim, fe_t, cell)
}

/// The number of nodes the dofs of a finite element are distributed
/// over. [`n_dofs_at_node`] accepts node indices below this count.
pub fn n_nodes(dim: usize, fe_t: FeType, cell: ElementTopology) -> Result<usize, EvalError> {
    check_dim(dim, fe_t, cell)?;
    family_n_dofs(fe_t, cell).ok_or_else(|| EvalError::unsupported(fe_t, cell, dim))?;
    reference_element::node_count(cell, dof_node_order(fe_t))
        .ok_or_else(|| EvalError::unsupported(fe_t, cell, dim))
}

/// The number of dofs attached to a node
pub fn n_dofs_at_node(
    dim: usize,
    fe_t: FeType,
    cell: ElementTopology,
    node: usize,
) -> Result<usize, EvalError> {
    let nodes = n_nodes(dim, fe_t, cell)?;
    if node >= nodes {
        return Err(EvalError::invalid_index("node", node, nodes));
    }
    match fe_t.family() {
        Family::Lagrange => Ok(1),
        Family::Hierarchic => hierarchic::n_dofs_at_node(cell, fe_t.order(), node)
            .ok_or_else(|| EvalError::unsupported(fe_t, cell, dim)),
        Family::Monomial => Ok(0),
    }
}

/// The number of dofs interior to the element, not attached to any node
pub fn n_dofs_per_elem(dim: usize, fe_t: FeType, cell: ElementTopology) -> Result<usize, EvalError> {
    let n = n_dofs(dim, fe_t, cell)?;
    match fe_t.family() {
        Family::Lagrange | Family::Hierarchic => Ok(0),
        Family::Monomial => Ok(n),
    }
}

/// The value of the `i`th shape function at a reference point
pub fn shape<T: Float + RlstScalar<Real = T>>(
    dim: usize,
    fe_t: FeType,
    cell: ElementTopology,
    i: usize,
    point: &[T],
) -> Result<T, EvalError> {
    let n = n_shape_functions(dim, fe_t, cell)?;
    if i >= n {
        return Err(EvalError::invalid_index("basis function", i, n));
    }
    if point.len() != reference_element::dim(cell) {
        return Err(EvalError::DimensionMismatch {
            expected: reference_element::dim(cell),
            found: point.len(),
        });
    }
    family_shape(fe_t, cell, i, point).ok_or_else(|| EvalError::unsupported(fe_t, cell, dim))
}

/// The value of the `i`th shape function of an element at a reference
/// point.
///
/// The current families evaluate in reference coordinates only, so this
/// forwards to [`shape`] with the element's topology; it is the entry
/// point through which geometry-dependent families receive the element.
pub fn shape_elem<T: Float + RlstScalar<Real = T>, E: Element<T = T>>(
    dim: usize,
    fe_t: FeType,
    element: &E,
    i: usize,
    point: &[T],
) -> Result<T, EvalError> {
    shape(dim, fe_t, element.topology(), i, point)
}

/// The derivative of the `i`th shape function with respect to the `j`th
/// reference coordinate
pub fn shape_deriv<T: Float + RlstScalar<Real = T>>(
    dim: usize,
    fe_t: FeType,
    cell: ElementTopology,
    i: usize,
    j: usize,
    point: &[T],
) -> Result<T, EvalError> {
    let n = n_shape_functions(dim, fe_t, cell)?;
    if i >= n {
        return Err(EvalError::invalid_index("basis function", i, n));
    }
    if j >= reference_element::dim(cell) {
        return Err(EvalError::invalid_index(
            "derivative direction",
            j,
            reference_element::dim(cell),
        ));
    }
    if point.len() != reference_element::dim(cell) {
        return Err(EvalError::DimensionMismatch {
            expected: reference_element::dim(cell),
            found: point.len(),
        });
    }
    family_shape_deriv(fe_t, cell, i, j, point)
        .ok_or_else(|| EvalError::unsupported(fe_t, cell, dim))
}

/// Interpolate an element solution at the plotting nodes.
///
/// `elem_soln` holds one coefficient per dof; the result holds one
/// value per node of the element's geometric lattice. For a nodal
/// family whose dofs sit on that same lattice the coefficients pass
/// through unchanged; otherwise the expansion is evaluated at each
/// plotting node, so a constant monomial field broadcasts its single
/// coefficient to every node.
pub fn nodal_soln<T: Float + RlstScalar<Real = T>, E: Element<T = T>>(
    dim: usize,
    fe_t: FeType,
    element: &E,
    elem_soln: &[T],
) -> Result<Vec<T>, EvalError> {
    let cell = element.topology();
    let n = n_dofs(dim, fe_t, cell)?;
    if elem_soln.len() != n {
        return Err(EvalError::DimensionMismatch {
            expected: n,
            found: elem_soln.len(),
        });
    }
    let plot_degree = map::map_order(element)?;
    if fe_t.family() == Family::Lagrange && dof_node_order(fe_t) == plot_degree {
        return Ok(elem_soln.to_vec());
    }
    let n_plot = reference_element::node_count(cell, plot_degree)
        .ok_or_else(|| EvalError::unsupported(fe_t, cell, dim))?;
    let mut result = Vec::with_capacity(n_plot);
    for node in 0..n_plot {
        let location = reference_element::node_location::<T>(cell, plot_degree, node)
            .ok_or_else(|| EvalError::unsupported(fe_t, cell, dim))?;
        let mut value = T::from(0.0).unwrap();
        for (i, coefficient) in elem_soln.iter().enumerate() {
            value += *coefficient
                * family_shape(fe_t, cell, i, &location)
                    .ok_or_else(|| EvalError::unsupported(fe_t, cell, dim))?;
        }
        result.push(value);
    }
    Ok(result)
}

/// The reference coordinates of a physical point. See
/// [`map::inverse_map`] for the solve itself; the descriptor is
/// validated here so that unsupported elements are rejected before any
/// arithmetic runs.
pub fn inverse_map<T: Float + RlstScalar<Real = T>, E: Element<T = T>>(
    dim: usize,
    fe_t: FeType,
    element: &E,
    point: &[T],
) -> Result<Vec<T>, EvalError> {
    let cell = element.topology();
    n_dofs(dim, fe_t, cell)?;
    map::inverse_map(element, point)
}

/// Test whether a reference point lies on the reference element of a
/// topology, with each domain constraint relaxed by `eps`
pub fn on_reference_element<T: Float + RlstScalar<Real = T>>(
    point: &[T],
    cell: ElementTopology,
    eps: T,
) -> Result<bool, EvalError> {
    if point.len() != reference_element::dim(cell) {
        return Err(EvalError::DimensionMismatch {
            expected: reference_element::dim(cell),
            found: point.len(),
        });
    }
    Ok(reference_element::on_reference_element(point, cell, eps))
}

/// Does this topology belong to the unbounded-domain families?
///
/// This is a capability query for callers that special-case assembly;
/// it answers for the topology regardless of whether the `infinite`
/// feature is enabled, while dispatch itself rejects the topologies in
/// builds without the feature.
pub fn is_infinite_elem(cell: ElementTopology) -> bool {
    cell.is_infinite()
}
