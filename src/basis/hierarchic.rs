//! Hierarchic basis.
//!
//! Vertex functions are the degree-1 Lagrange functions; higher modes
//! are integrated Legendre polynomials, which vanish at both ends of
//! the interval. Quadrilaterals and hexahedra take tensor products of
//! the 1D ladder, so raising the order adds functions without changing
//! the ones already present. Simplex topologies are not supported.

use crate::reference_element;
use crate::types::ElementTopology;
use num::Float;
use rlst::RlstScalar;

const VERTEX_INDICES_2D: [[usize; 3]; 4] = [[0, 0, 0], [1, 0, 0], [0, 1, 0], [1, 1, 0]];
const VERTEX_INDICES_3D: [[usize; 3]; 8] = [
    [0, 0, 0],
    [1, 0, 0],
    [0, 1, 0],
    [1, 1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [0, 1, 1],
    [1, 1, 1],
];

/// For each hexahedron edge: the axis the edge runs along and the fixed
/// 1D indices of the two remaining axes
const HEX_EDGE_AXES: [(usize, usize, usize); 12] = [
    (0, 0, 0),
    (1, 0, 0),
    (2, 0, 0),
    (1, 1, 0),
    (2, 1, 0),
    (0, 1, 0),
    (2, 0, 1),
    (2, 1, 1),
    (0, 0, 1),
    (1, 0, 1),
    (1, 1, 1),
    (0, 1, 1),
];

/// For each hexahedron face: the axis normal to the face and its fixed
/// 1D index
const HEX_FACE_AXES: [(usize, usize); 6] = [(2, 0), (1, 0), (0, 0), (0, 1), (1, 1), (2, 1)];

/// The number of shape functions
pub fn n_dofs(cell: ElementTopology, degree: usize) -> Option<usize> {
    if degree == 0 {
        return None;
    }
    match cell {
        ElementTopology::Interval => Some(degree + 1),
        ElementTopology::Quadrilateral => Some((degree + 1) * (degree + 1)),
        ElementTopology::Hexahedron => Some((degree + 1) * (degree + 1) * (degree + 1)),
        _ => None,
    }
}

/// Legendre polynomial by the three-term recurrence
fn legendre<T: Float + RlstScalar<Real = T>>(n: usize, u: T) -> T {
    let one = T::from(1.0).unwrap();
    let mut p0 = one;
    let mut p1 = u;
    if n == 0 {
        return p0;
    }
    for k in 2..=n {
        let kf = T::from(k as f64).unwrap();
        let p2 = ((T::from(2.0).unwrap() * kf - one) * u * p1 - (kf - one) * p0) / kf;
        p0 = p1;
        p1 = p2;
    }
    p1
}

/// 1D hierarchic function: index 0 and 1 are the vertex functions,
/// index k >= 2 the integrated Legendre mode of degree k
fn h1d<T: Float + RlstScalar<Real = T>>(k: usize, x: T) -> T {
    let one = T::from(1.0).unwrap();
    let two = T::from(2.0).unwrap();
    match k {
        0 => one - x,
        1 => x,
        _ => {
            let u = two * x - one;
            (legendre(k, u) - legendre(k - 2, u)) / T::from((2 * k - 1) as f64).unwrap()
        }
    }
}

fn h1d_deriv<T: Float + RlstScalar<Real = T>>(k: usize, x: T) -> T {
    let one = T::from(1.0).unwrap();
    let two = T::from(2.0).unwrap();
    match k {
        0 => -one,
        1 => one,
        _ => two * legendre(k - 1, two * x - one),
    }
}

/// 1D function indices of the `i`th basis function: vertices first,
/// then edge modes in edge order, then face modes, then interior modes
fn tensor_indices(cell: ElementTopology, degree: usize, i: usize) -> Option<[usize; 3]> {
    let m = degree - 1;
    match cell {
        ElementTopology::Interval => {
            if i <= degree {
                Some([i, 0, 0])
            } else {
                None
            }
        }
        ElementTopology::Quadrilateral => {
            if i < 4 {
                Some(VERTEX_INDICES_2D[i])
            } else if i < 4 + 4 * m {
                let t = i - 4;
                let k = 2 + t % m;
                match t / m {
                    0 => Some([k, 0, 0]),
                    1 => Some([0, k, 0]),
                    2 => Some([1, k, 0]),
                    3 => Some([k, 1, 0]),
                    _ => None,
                }
            } else if i < (degree + 1) * (degree + 1) {
                let t = i - 4 - 4 * m;
                Some([2 + t / m, 2 + t % m, 0])
            } else {
                None
            }
        }
        ElementTopology::Hexahedron => {
            if i < 8 {
                return Some(VERTEX_INDICES_3D[i]);
            }
            let mut t = i - 8;
            if t < 12 * m {
                let (axis, a, b) = HEX_EDGE_AXES[t / m];
                let k = 2 + t % m;
                let mut idx = [0; 3];
                idx[axis] = k;
                let mut fixed = [a, b].into_iter();
                for (d, entry) in idx.iter_mut().enumerate() {
                    if d != axis {
                        *entry = fixed.next().unwrap();
                    }
                }
                return Some(idx);
            }
            t -= 12 * m;
            if t < 6 * m * m {
                let (axis, val) = HEX_FACE_AXES[t / (m * m)];
                let r = t % (m * m);
                let (k, l) = (2 + r / m, 2 + r % m);
                let mut idx = [0; 3];
                idx[axis] = val;
                let mut modes = [k, l].into_iter();
                for (d, entry) in idx.iter_mut().enumerate() {
                    if d != axis {
                        *entry = modes.next().unwrap();
                    }
                }
                return Some(idx);
            }
            t -= 6 * m * m;
            if t < m * m * m {
                Some([2 + t / (m * m), 2 + (t / m) % m, 2 + t % m])
            } else {
                None
            }
        }
        _ => None,
    }
}

/// The value of the `i`th shape function at a reference point
pub fn shape<T: Float + RlstScalar<Real = T>>(
    cell: ElementTopology,
    degree: usize,
    i: usize,
    point: &[T],
) -> Option<T> {
    n_dofs(cell, degree)?;
    let idx = tensor_indices(cell, degree, i)?;
    let mut value = T::from(1.0).unwrap();
    for d in 0..reference_element::dim(cell) {
        value *= h1d(idx[d], point[d]);
    }
    Some(value)
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
    n_dofs(cell, degree)?;
    if j >= reference_element::dim(cell) {
        return None;
    }
    let idx = tensor_indices(cell, degree, i)?;
    let mut value = T::from(1.0).unwrap();
    for d in 0..reference_element::dim(cell) {
        if d == j {
            value *= h1d_deriv(idx[d], point[d]);
        } else {
            value *= h1d(idx[d], point[d]);
        }
    }
    Some(value)
}

/// Dofs attached to a node of the degree-min(2, order) lattice:
/// vertices carry the vertex function, edge midnodes the edge modes,
/// face centres the face modes and the body centre the interior modes
pub fn n_dofs_at_node(cell: ElementTopology, degree: usize, node: usize) -> Option<usize> {
    n_dofs(cell, degree)?;
    let ec = reference_element::entity_counts(cell);
    if degree == 1 {
        return Some(usize::from(node < ec[0]));
    }
    let m = degree - 1;
    let quad_faces = reference_element::faces(cell)
        .iter()
        .filter(|f| f.len() == 4)
        .count();
    Some(if node < ec[0] {
        1
    } else if node < ec[0] + ec[1] {
        m
    } else if node < ec[0] + ec[1] + quad_faces {
        m * m
    } else {
        m * m * m
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use paste::paste;

    #[test]
    fn test_1d_mode_values() {
        // second mode is -2x(1-x)
        for x in [0.0, 0.25, 0.5, 1.0] {
            assert_relative_eq!(h1d(2, x), -2.0 * x * (1.0 - x), epsilon = 1e-14);
        }
        // all modes vanish at the interval ends
        for k in 2..8 {
            assert_relative_eq!(h1d(k, 0.0), 0.0, epsilon = 1e-14);
            assert_relative_eq!(h1d(k, 1.0), 0.0, epsilon = 1e-14);
        }
    }

    macro_rules! test_counts {

        ($(($cell:ident, $degree:expr)),+) => {

        $(
            paste! {

                #[test]
                fn [<test_counts_ $cell:lower _ $degree>]() {
                    let cell = ElementTopology::[<$cell>];
                    let n = n_dofs(cell, $degree).unwrap();
                    let lattice_degree = usize::min($degree, 2);
                    let nodes =
                        reference_element::node_count(cell, lattice_degree).unwrap();
                    let mut total = 0;
                    for node in 0..nodes {
                        total += n_dofs_at_node(cell, $degree, node).unwrap();
                    }
                    assert_eq!(total, n);
                    // every function has a well-defined index decomposition
                    for i in 0..n {
                        assert!(tensor_indices(cell, $degree, i).is_some());
                    }
                    assert!(tensor_indices(cell, $degree, n).is_none());
                }

            }
        )*
        };
    }

    test_counts!(
        (Interval, 1),
        (Interval, 2),
        (Interval, 5),
        (Quadrilateral, 1),
        (Quadrilateral, 2),
        (Quadrilateral, 4),
        (Hexahedron, 1),
        (Hexahedron, 2),
        (Hexahedron, 3)
    );

    #[test]
    fn test_vertex_functions_are_nodal() {
        for (cell, degree) in [
            (ElementTopology::Interval, 4),
            (ElementTopology::Quadrilateral, 3),
            (ElementTopology::Hexahedron, 2),
        ] {
            let v = reference_element::vertices::<f64>(cell);
            for i in 0..v.len() {
                for (j, vertex) in v.iter().enumerate() {
                    let value = shape(cell, degree, i, vertex).unwrap();
                    let expected = if i == j { 1.0 } else { 0.0 };
                    assert_relative_eq!(value, expected, epsilon = 1e-12);
                }
            }
            // higher modes vanish at every vertex
            for i in v.len()..n_dofs(cell, degree).unwrap() {
                for vertex in &v {
                    assert_relative_eq!(
                        shape(cell, degree, i, vertex).unwrap(),
                        0.0,
                        epsilon = 1e-12
                    );
                }
            }
        }
    }

    #[test]
    fn test_vertex_partition_of_unity() {
        for (cell, degree) in [
            (ElementTopology::Quadrilateral, 3),
            (ElementTopology::Hexahedron, 2),
        ] {
            let nv = reference_element::vertices::<f64>(cell).len();
            let p = reference_element::midpoint::<f64>(cell);
            let mut total = 0.0;
            for i in 0..nv {
                total += shape(cell, degree, i, &p).unwrap();
            }
            assert_relative_eq!(total, 1.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_derivatives_match_finite_differences() {
        let h = 1e-7;
        for (cell, degree) in [
            (ElementTopology::Interval, 5),
            (ElementTopology::Quadrilateral, 3),
            (ElementTopology::Hexahedron, 2),
        ] {
            let p = vec![0.37; reference_element::dim(cell)];
            for i in 0..n_dofs(cell, degree).unwrap() {
                for j in 0..reference_element::dim(cell) {
                    let mut plus = p.clone();
                    plus[j] += h;
                    let mut minus = p.clone();
                    minus[j] -= h;
                    let fd = (shape(cell, degree, i, &plus).unwrap()
                        - shape(cell, degree, i, &minus).unwrap())
                        / (2.0 * h);
                    let exact = shape_deriv(cell, degree, i, j, &p).unwrap();
                    assert_relative_eq!(exact, fd, epsilon = 1e-5);
                }
            }
        }
    }

    #[test]
    fn test_simplices_rejected() {
        assert!(n_dofs(ElementTopology::Triangle, 2).is_none());
        assert!(n_dofs(ElementTopology::Tetrahedron, 1).is_none());
        assert!(n_dofs(ElementTopology::Prism, 2).is_none());
        assert!(shape(ElementTopology::Triangle, 2, 0, &[0.1, 0.1]).is_none());
    }
}
