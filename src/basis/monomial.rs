//! Discontinuous monomial basis.
//!
//! The complete polynomial space of total degree `p` in the reference
//! coordinates, enumerated in graded lexicographic order
//! (1, x, y, x², xy, y², ...). There are no nodal dofs: every
//! coefficient is attached to the element interior, so the family can
//! be used on any bounded topology without continuity constraints.

use crate::reference_element;
use crate::types::ElementTopology;
use num::Float;
use rlst::RlstScalar;

/// The dimension of the complete polynomial space of total degree `degree`
pub fn n_dofs(cell: ElementTopology, degree: usize) -> Option<usize> {
    if cell.is_infinite() {
        return None;
    }
    match reference_element::dim(cell) {
        0 => Some(1),
        1 => Some(degree + 1),
        2 => Some((degree + 1) * (degree + 2) / 2),
        3 => Some((degree + 1) * (degree + 2) * (degree + 3) / 6),
        _ => None,
    }
}

/// The exponent triple of the `i`th monomial
fn exponents(tdim: usize, degree: usize, index: usize) -> Option<[usize; 3]> {
    let mut i = index;
    match tdim {
        0 => {
            if index == 0 {
                Some([0, 0, 0])
            } else {
                None
            }
        }
        1 => {
            if index <= degree {
                Some([index, 0, 0])
            } else {
                None
            }
        }
        2 => {
            for d in 0..=degree {
                for a in (0..=d).rev() {
                    if i == 0 {
                        return Some([a, d - a, 0]);
                    }
                    i -= 1;
                }
            }
            None
        }
        3 => {
            for d in 0..=degree {
                for a in (0..=d).rev() {
                    for b in (0..=d - a).rev() {
                        if i == 0 {
                            return Some([a, b, d - a - b]);
                        }
                        i -= 1;
                    }
                }
            }
            None
        }
        _ => None,
    }
}

/// The value of the `i`th monomial at a reference point
pub fn shape<T: Float + RlstScalar<Real = T>>(
    cell: ElementTopology,
    degree: usize,
    i: usize,
    point: &[T],
) -> Option<T> {
    n_dofs(cell, degree)?;
    let tdim = reference_element::dim(cell);
    let exp = exponents(tdim, degree, i)?;
    let mut value = T::from(1.0).unwrap();
    for d in 0..tdim {
        value *= Float::powi(point[d], exp[d] as i32);
    }
    Some(value)
}

/// The derivative of the `i`th monomial with respect to the `j`th
/// reference coordinate
pub fn shape_deriv<T: Float + RlstScalar<Real = T>>(
    cell: ElementTopology,
    degree: usize,
    i: usize,
    j: usize,
    point: &[T],
) -> Option<T> {
    n_dofs(cell, degree)?;
    let tdim = reference_element::dim(cell);
    if j >= tdim {
        return None;
    }
    let exp = exponents(tdim, degree, i)?;
    if exp[j] == 0 {
        return Some(T::from(0.0).unwrap());
    }
    let mut value = T::from(exp[j] as f64).unwrap();
    for d in 0..tdim {
        let e = if d == j { exp[d] - 1 } else { exp[d] };
        value *= Float::powi(point[d], e as i32);
    }
    Some(value)
}
