//! Mapped infinite element basis.
//!
//! Elements of the infinite topologies pair a bounded base (an interval
//! or a quadrilateral) with a radial coordinate `v` on `[0, 1)`. Basis
//! functions are products of a degree-1 Lagrange factor on the base and
//! one of two rational radial factors with nodes at `v = 0` (base) and
//! `v = 1/2` (outer). The second radial factor grows without bound as
//! `v` approaches the pole, which is what maps the outer nodes' physical
//! coordinates out to infinity through the geometric map.
//!
//! The module is always compiled; whether dispatch routes to it is
//! controlled by [`ENABLED`], set from the `infinite` cargo feature and
//! checked in one place in the dispatch layer.

use crate::basis::lagrange;
use crate::reference_element;
use crate::types::ElementTopology;
use num::Float;
use rlst::RlstScalar;

/// Whether unbounded-domain element families are available in this build
pub const ENABLED: bool = cfg!(feature = "infinite");

fn base_cell(cell: ElementTopology) -> Option<ElementTopology> {
    match cell {
        ElementTopology::InfiniteQuadrilateral => Some(ElementTopology::Interval),
        ElementTopology::InfiniteHexahedron => Some(ElementTopology::Quadrilateral),
        _ => None,
    }
}

/// The number of shape functions
pub fn n_dofs(cell: ElementTopology, degree: usize) -> Option<usize> {
    if degree != 1 {
        return None;
    }
    base_cell(cell).map(|base| 2 * reference_element::entity_counts(base)[0])
}

/// Radial factor for the base (`k = 0`) and outer (`k = 1`) node layers
fn radial<T: Float + RlstScalar<Real = T>>(k: usize, v: T) -> T {
    let one = T::from(1.0).unwrap();
    let two = T::from(2.0).unwrap();
    match k {
        0 => (one - two * v) / (one - v),
        _ => v / (one - v),
    }
}

fn radial_deriv<T: Float + RlstScalar<Real = T>>(k: usize, v: T) -> T {
    let one = T::from(1.0).unwrap();
    let w = one - v;
    match k {
        0 => -one / (w * w),
        _ => one / (w * w),
    }
}

/// The value of the `i`th shape function at a reference point
pub fn shape<T: Float + RlstScalar<Real = T>>(
    cell: ElementTopology,
    degree: usize,
    i: usize,
    point: &[T],
) -> Option<T> {
    let n = n_dofs(cell, degree)?;
    if i >= n {
        return None;
    }
    let base = base_cell(cell)?;
    let nb = n / 2;
    let tdim = reference_element::dim(cell);
    let v = point[tdim - 1];
    let value = lagrange::shape(base, 1, i % nb, &point[..tdim - 1])?;
    Some(value * radial(i / nb, v))
}

/// The derivative of the `i`th shape function with respect to the `j`th
/// reference coordinate
pub fn shape_deriv<T: Float + RlstScalar<Real = T>>(
    cell: ElementTopology,
    degree: usize,
    i: usize,
    j: usize,
    point: &[T],
) -> Option<T> {
    let n = n_dofs(cell, degree)?;
    if i >= n {
        return None;
    }
    let base = base_cell(cell)?;
    let nb = n / 2;
    let tdim = reference_element::dim(cell);
    if j >= tdim {
        return None;
    }
    let v = point[tdim - 1];
    if j == tdim - 1 {
        let value = lagrange::shape(base, 1, i % nb, &point[..tdim - 1])?;
        Some(value * radial_deriv(i / nb, v))
    } else {
        let dvalue = lagrange::shape_deriv(base, 1, i % nb, j, &point[..tdim - 1])?;
        Some(dvalue * radial(i / nb, v))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_counts() {
        assert_eq!(n_dofs(ElementTopology::InfiniteQuadrilateral, 1), Some(4));
        assert_eq!(n_dofs(ElementTopology::InfiniteHexahedron, 1), Some(8));
        assert_eq!(n_dofs(ElementTopology::InfiniteQuadrilateral, 2), None);
        assert_eq!(n_dofs(ElementTopology::Quadrilateral, 1), None);
    }

    #[test]
    fn test_interpolation() {
        for cell in [
            ElementTopology::InfiniteQuadrilateral,
            ElementTopology::InfiniteHexahedron,
        ] {
            let n = n_dofs(cell, 1).unwrap();
            let v = reference_element::vertices::<f64>(cell);
            assert_eq!(v.len(), n);
            for i in 0..n {
                for (j, vertex) in v.iter().enumerate() {
                    let value = shape(cell, 1, i, vertex).unwrap();
                    let expected = if i == j { 1.0 } else { 0.0 };
                    assert_relative_eq!(value, expected, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_partition_of_unity() {
        let cell = ElementTopology::InfiniteQuadrilateral;
        for p in [[0.3, 0.0], [0.5, 0.25], [0.9, 0.8]] {
            let mut total = 0.0;
            for i in 0..4 {
                total += shape(cell, 1, i, &p).unwrap();
            }
            assert_relative_eq!(total, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_outer_factor_grows_towards_pole() {
        // the outer-node functions dominate as v approaches 1
        let near = shape(ElementTopology::InfiniteQuadrilateral, 1, 2, &[0.0, 0.99]).unwrap();
        assert!(near > 50.0);
    }

    #[test]
    fn test_derivatives_match_finite_differences() {
        let h = 1e-7;
        let cell = ElementTopology::InfiniteHexahedron;
        let p = [0.3, 0.6, 0.4];
        for i in 0..8 {
            for j in 0..3 {
                let mut plus = p;
                plus[j] += h;
                let mut minus = p;
                minus[j] -= h;
                let fd = (shape(cell, 1, i, &plus).unwrap() - shape(cell, 1, i, &minus).unwrap())
                    / (2.0 * h);
                let exact = shape_deriv(cell, 1, i, j, &p).unwrap();
                assert_relative_eq!(exact, fd, epsilon = 1e-5);
            }
        }
    }
}
