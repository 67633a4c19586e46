//! Nodal Lagrange basis.
//!
//! One basis function per node of the canonical lattice, equal to 1 at
//! its own node and 0 at every other node. Degrees 1 and 2 are
//! supported; tensor topologies use products of 1D factors, simplices
//! use barycentric formulas and the pyramid uses the rational degree-1
//! basis.

use crate::reference_element;
use crate::types::ElementTopology;
use num::Float;
use rlst::RlstScalar;

/// Guard radius around the pyramid apex plane, where the rational basis
/// is singular
const APEX_TOL: f64 = 1e-10;

const INTERVAL_LATTICE_1: [[usize; 3]; 2] = [[0, 0, 0], [1, 0, 0]];
const INTERVAL_LATTICE_2: [[usize; 3]; 3] = [[0, 0, 0], [1, 0, 0], [2, 0, 0]];
const QUAD_LATTICE_1: [[usize; 3]; 4] = [[0, 0, 0], [1, 0, 0], [0, 1, 0], [1, 1, 0]];
const QUAD_LATTICE_2: [[usize; 3]; 9] = [
    [0, 0, 0],
    [1, 0, 0],
    [0, 1, 0],
    [1, 1, 0],
    [2, 0, 0],
    [0, 2, 0],
    [1, 2, 0],
    [2, 1, 0],
    [2, 2, 0],
];
const HEX_LATTICE_1: [[usize; 3]; 8] = [
    [0, 0, 0],
    [1, 0, 0],
    [0, 1, 0],
    [1, 1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [0, 1, 1],
    [1, 1, 1],
];
const HEX_LATTICE_2: [[usize; 3]; 27] = [
    // vertices
    [0, 0, 0],
    [1, 0, 0],
    [0, 1, 0],
    [1, 1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [0, 1, 1],
    [1, 1, 1],
    // edge midpoints
    [2, 0, 0],
    [0, 2, 0],
    [0, 0, 2],
    [1, 2, 0],
    [1, 0, 2],
    [2, 1, 0],
    [0, 1, 2],
    [1, 1, 2],
    [2, 0, 1],
    [0, 2, 1],
    [1, 2, 1],
    [2, 1, 1],
    // face centres
    [2, 2, 0],
    [2, 0, 2],
    [0, 2, 2],
    [1, 2, 2],
    [2, 1, 2],
    [2, 2, 1],
    // body centre
    [2, 2, 2],
];

// (triangle node, 1D node along the axis) pairs for the prism lattice
const PRISM_NODES_1: [(usize, usize); 6] = [(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)];
const PRISM_NODES_2: [(usize, usize); 18] = [
    (0, 0),
    (1, 0),
    (2, 0),
    (0, 1),
    (1, 1),
    (2, 1),
    (5, 0),
    (4, 0),
    (0, 2),
    (3, 0),
    (1, 2),
    (2, 2),
    (5, 1),
    (4, 1),
    (3, 1),
    (5, 2),
    (4, 2),
    (3, 2),
];

/// The number of shape functions
pub fn n_dofs(cell: ElementTopology, degree: usize) -> Option<usize> {
    if cell.is_infinite() {
        return None;
    }
    reference_element::node_count(cell, degree)
}

fn lattice(cell: ElementTopology, degree: usize) -> Option<&'static [[usize; 3]]> {
    match (cell, degree) {
        (ElementTopology::Interval, 1) => Some(&INTERVAL_LATTICE_1),
        (ElementTopology::Interval, 2) => Some(&INTERVAL_LATTICE_2),
        (ElementTopology::Quadrilateral, 1) => Some(&QUAD_LATTICE_1),
        (ElementTopology::Quadrilateral, 2) => Some(&QUAD_LATTICE_2),
        (ElementTopology::Hexahedron, 1) => Some(&HEX_LATTICE_1),
        (ElementTopology::Hexahedron, 2) => Some(&HEX_LATTICE_2),
        _ => None,
    }
}

/// 1D Lagrange factor for the lattice node `k` (0 and 1 are the ends, 2
/// the midpoint)
fn factor<T: Float + RlstScalar<Real = T>>(degree: usize, k: usize, x: T) -> T {
    let one = T::from(1.0).unwrap();
    let two = T::from(2.0).unwrap();
    let four = T::from(4.0).unwrap();
    match (degree, k) {
        (1, 0) => one - x,
        (1, 1) => x,
        (2, 0) => (one - x) * (one - two * x),
        (2, 1) => x * (two * x - one),
        (2, 2) => four * x * (one - x),
        _ => panic!("Invalid 1D lattice node"),
    }
}

fn factor_deriv<T: Float + RlstScalar<Real = T>>(degree: usize, k: usize, x: T) -> T {
    let one = T::from(1.0).unwrap();
    let three = T::from(3.0).unwrap();
    let four = T::from(4.0).unwrap();
    match (degree, k) {
        (1, 0) => -one,
        (1, 1) => one,
        (2, 0) => four * x - three,
        (2, 1) => four * x - one,
        (2, 2) => four - T::from(8.0).unwrap() * x,
        _ => panic!("Invalid 1D lattice node"),
    }
}

fn tensor_shape<T: Float + RlstScalar<Real = T>>(
    cell: ElementTopology,
    degree: usize,
    i: usize,
    point: &[T],
) -> Option<T> {
    let idx = lattice(cell, degree)?.get(i)?;
    let one = T::from(1.0).unwrap();
    let mut value = one;
    for d in 0..reference_element::dim(cell) {
        value *= factor(degree, idx[d], point[d]);
    }
    Some(value)
}

fn tensor_deriv<T: Float + RlstScalar<Real = T>>(
    cell: ElementTopology,
    degree: usize,
    i: usize,
    j: usize,
    point: &[T],
) -> Option<T> {
    let idx = lattice(cell, degree)?.get(i)?;
    let one = T::from(1.0).unwrap();
    let mut value = one;
    for d in 0..reference_element::dim(cell) {
        if d == j {
            value *= factor_deriv(degree, idx[d], point[d]);
        } else {
            value *= factor(degree, idx[d], point[d]);
        }
    }
    Some(value)
}

/// Barycentric coordinates and their (constant) gradients
fn barycentric<T: Float + RlstScalar<Real = T>>(
    cell: ElementTopology,
    point: &[T],
) -> (Vec<T>, Vec<Vec<T>>) {
    let zero = T::from(0.0).unwrap();
    let one = T::from(1.0).unwrap();
    match cell {
        ElementTopology::Triangle => (
            vec![one - point[0] - point[1], point[0], point[1]],
            vec![
                vec![-one, -one],
                vec![one, zero],
                vec![zero, one],
            ],
        ),
        ElementTopology::Tetrahedron => (
            vec![
                one - point[0] - point[1] - point[2],
                point[0],
                point[1],
                point[2],
            ],
            vec![
                vec![-one, -one, -one],
                vec![one, zero, zero],
                vec![zero, one, zero],
                vec![zero, zero, one],
            ],
        ),
        _ => panic!("Not a simplex"),
    }
}

fn simplex_shape<T: Float + RlstScalar<Real = T>>(
    cell: ElementTopology,
    degree: usize,
    i: usize,
    point: &[T],
) -> Option<T> {
    let (l, _) = barycentric(cell, point);
    let one = T::from(1.0).unwrap();
    let two = T::from(2.0).unwrap();
    let four = T::from(4.0).unwrap();
    match degree {
        1 => l.get(i).copied(),
        2 => {
            if i < l.len() {
                Some(l[i] * (two * l[i] - one))
            } else {
                let e = reference_element::edges(cell);
                let pair = e.get(i - l.len())?;
                Some(four * l[pair[0]] * l[pair[1]])
            }
        }
        _ => None,
    }
}

fn simplex_deriv<T: Float + RlstScalar<Real = T>>(
    cell: ElementTopology,
    degree: usize,
    i: usize,
    j: usize,
    point: &[T],
) -> Option<T> {
    let (l, g) = barycentric(cell, point);
    let one = T::from(1.0).unwrap();
    let four = T::from(4.0).unwrap();
    match degree {
        1 => Some(g.get(i)?[j]),
        2 => {
            if i < l.len() {
                Some((four * l[i] - one) * g[i][j])
            } else {
                let e = reference_element::edges(cell);
                let pair = e.get(i - l.len())?;
                let (a, b) = (pair[0], pair[1]);
                Some(four * (g[a][j] * l[b] + l[a] * g[b][j]))
            }
        }
        _ => None,
    }
}

fn pyramid_shape<T: Float + RlstScalar<Real = T>>(i: usize, point: &[T]) -> Option<T> {
    let one = T::from(1.0).unwrap();
    let (x, y, z) = (point[0], point[1], point[2]);
    let w = one - z;
    if Float::abs(w) < T::from(APEX_TOL).unwrap() {
        // limit values on the apex plane
        let zero = T::from(0.0).unwrap();
        return match i {
            0..=3 => Some(zero),
            4 => Some(one),
            _ => None,
        };
    }
    match i {
        0 => Some((w - x) * (w - y) / w),
        1 => Some(x * (w - y) / w),
        2 => Some((w - x) * y / w),
        3 => Some(x * y / w),
        4 => Some(z),
        _ => None,
    }
}

fn pyramid_deriv<T: Float + RlstScalar<Real = T>>(i: usize, j: usize, point: &[T]) -> Option<T> {
    let zero = T::from(0.0).unwrap();
    let one = T::from(1.0).unwrap();
    let (x, y, z) = (point[0], point[1], point[2]);
    // the map derivative is singular on the apex plane; keep the
    // denominator away from zero
    let tol = T::from(APEX_TOL).unwrap();
    let mut w = one - z;
    if Float::abs(w) < tol {
        w = tol;
    }
    let value = match i {
        0 => [-one + y / w, -one + x / w, -one + x * y / (w * w)],
        1 => [one - y / w, -x / w, -x * y / (w * w)],
        2 => [-y / w, one - x / w, -x * y / (w * w)],
        3 => [y / w, x / w, x * y / (w * w)],
        4 => [zero, zero, one],
        _ => return None,
    };
    value.get(j).copied()
}

fn prism_nodes(degree: usize) -> Option<&'static [(usize, usize)]> {
    match degree {
        1 => Some(&PRISM_NODES_1),
        2 => Some(&PRISM_NODES_2),
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
    if i >= n_dofs(cell, degree)? {
        return None;
    }
    match cell {
        ElementTopology::Point => Some(T::from(1.0).unwrap()),
        ElementTopology::Interval | ElementTopology::Quadrilateral | ElementTopology::Hexahedron => {
            tensor_shape(cell, degree, i, point)
        }
        ElementTopology::Triangle | ElementTopology::Tetrahedron => {
            simplex_shape(cell, degree, i, point)
        }
        ElementTopology::Prism => {
            let (t, k) = prism_nodes(degree)?[i];
            let base = simplex_shape(ElementTopology::Triangle, degree, t, &point[..2])?;
            Some(base * factor(degree, k, point[2]))
        }
        ElementTopology::Pyramid => match degree {
            1 => pyramid_shape(i, point),
            _ => None,
        },
        _ => None,
    }
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
    if i >= n_dofs(cell, degree)? || j >= reference_element::dim(cell) {
        return None;
    }
    match cell {
        ElementTopology::Point => Some(T::from(0.0).unwrap()),
        ElementTopology::Interval | ElementTopology::Quadrilateral | ElementTopology::Hexahedron => {
            tensor_deriv(cell, degree, i, j, point)
        }
        ElementTopology::Triangle | ElementTopology::Tetrahedron => {
            simplex_deriv(cell, degree, i, j, point)
        }
        ElementTopology::Prism => {
            let (t, k) = prism_nodes(degree)?[i];
            if j < 2 {
                let dbase = simplex_deriv(ElementTopology::Triangle, degree, t, j, &point[..2])?;
                Some(dbase * factor(degree, k, point[2]))
            } else {
                let base = simplex_shape(ElementTopology::Triangle, degree, t, &point[..2])?;
                Some(base * factor_deriv(degree, k, point[2]))
            }
        }
        ElementTopology::Pyramid => match degree {
            1 => pyramid_deriv(i, j, point),
            _ => None,
        },
        _ => None,
    }
}
