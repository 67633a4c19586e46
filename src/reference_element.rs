//! Reference element definitions

use crate::types::ElementTopology;
use num::Float;
use rlst::RlstScalar;

/// Default tolerance for reference-domain containment tests
pub const REFERENCE_EPS: f64 = 1e-6;

/// The topological dimension of the element
pub fn dim(cell: ElementTopology) -> usize {
    match cell {
        ElementTopology::Point => 0,
        ElementTopology::Interval => 1,
        ElementTopology::Triangle => 2,
        ElementTopology::Quadrilateral => 2,
        ElementTopology::Tetrahedron => 3,
        ElementTopology::Hexahedron => 3,
        ElementTopology::Prism => 3,
        ElementTopology::Pyramid => 3,
        ElementTopology::InfiniteQuadrilateral => 2,
        ElementTopology::InfiniteHexahedron => 3,
    }
}

/// Is the element a simplex?
pub fn is_simplex(cell: ElementTopology) -> bool {
    match cell {
        ElementTopology::Point => true,
        ElementTopology::Interval => true,
        ElementTopology::Triangle => true,
        ElementTopology::Quadrilateral => false,
        ElementTopology::Tetrahedron => true,
        ElementTopology::Hexahedron => false,
        ElementTopology::Prism => false,
        ElementTopology::Pyramid => false,
        ElementTopology::InfiniteQuadrilateral => false,
        ElementTopology::InfiniteHexahedron => false,
    }
}

/// The vertices of the reference element.
///
/// For the infinite topologies the base vertices (radial coordinate 0)
/// come first, then the outer vertices at radial coordinate 1/2.
pub fn vertices<T: RlstScalar<Real = T>>(cell: ElementTopology) -> Vec<Vec<T>> {
    let zero = T::from(0.0).unwrap();
    let half = T::from(0.5).unwrap();
    let one = T::from(1.0).unwrap();
    match cell {
        ElementTopology::Point => vec![],
        ElementTopology::Interval => vec![vec![zero], vec![one]],
        ElementTopology::Triangle => vec![vec![zero, zero], vec![one, zero], vec![zero, one]],
        ElementTopology::Quadrilateral => vec![
            vec![zero, zero],
            vec![one, zero],
            vec![zero, one],
            vec![one, one],
        ],
        ElementTopology::Tetrahedron => vec![
            vec![zero, zero, zero],
            vec![one, zero, zero],
            vec![zero, one, zero],
            vec![zero, zero, one],
        ],
        ElementTopology::Hexahedron => vec![
            vec![zero, zero, zero],
            vec![one, zero, zero],
            vec![zero, one, zero],
            vec![one, one, zero],
            vec![zero, zero, one],
            vec![one, zero, one],
            vec![zero, one, one],
            vec![one, one, one],
        ],
        ElementTopology::Prism => vec![
            vec![zero, zero, zero],
            vec![one, zero, zero],
            vec![zero, one, zero],
            vec![zero, zero, one],
            vec![one, zero, one],
            vec![zero, one, one],
        ],
        ElementTopology::Pyramid => vec![
            vec![zero, zero, zero],
            vec![one, zero, zero],
            vec![zero, one, zero],
            vec![one, one, zero],
            vec![zero, zero, one],
        ],
        ElementTopology::InfiniteQuadrilateral => vec![
            vec![zero, zero],
            vec![one, zero],
            vec![zero, half],
            vec![one, half],
        ],
        ElementTopology::InfiniteHexahedron => vec![
            vec![zero, zero, zero],
            vec![one, zero, zero],
            vec![zero, one, zero],
            vec![one, one, zero],
            vec![zero, zero, half],
            vec![one, zero, half],
            vec![zero, one, half],
            vec![one, one, half],
        ],
    }
}

/// The midpoint of the reference element, used as the initial guess of
/// the inverse map
pub fn midpoint<T: RlstScalar<Real = T>>(cell: ElementTopology) -> Vec<T> {
    let half = T::from(0.5).unwrap();
    let quarter = T::from(0.25).unwrap();
    let third = T::from(1.0).unwrap() / T::from(3.0).unwrap();
    match cell {
        ElementTopology::Point => vec![],
        ElementTopology::Interval => vec![half],
        ElementTopology::Triangle => vec![third; 2],
        ElementTopology::Quadrilateral => vec![half; 2],
        ElementTopology::Tetrahedron => vec![T::from(0.25).unwrap(); 3],
        ElementTopology::Hexahedron => vec![half; 3],
        ElementTopology::Prism => vec![third, third, half],
        ElementTopology::Pyramid => vec![
            T::from(0.4).unwrap(),
            T::from(0.4).unwrap(),
            T::from(0.2).unwrap(),
        ],
        ElementTopology::InfiniteQuadrilateral => vec![half, quarter],
        ElementTopology::InfiniteHexahedron => vec![half, half, quarter],
    }
}

/// The edges of the reference element
pub fn edges(cell: ElementTopology) -> Vec<Vec<usize>> {
    match cell {
        ElementTopology::Point => vec![],
        ElementTopology::Interval => vec![vec![0, 1]],
        ElementTopology::Triangle => vec![vec![1, 2], vec![0, 2], vec![0, 1]],
        ElementTopology::Quadrilateral | ElementTopology::InfiniteQuadrilateral => {
            vec![vec![0, 1], vec![0, 2], vec![1, 3], vec![2, 3]]
        }
        ElementTopology::Tetrahedron => vec![
            vec![2, 3],
            vec![1, 3],
            vec![1, 2],
            vec![0, 3],
            vec![0, 2],
            vec![0, 1],
        ],
        ElementTopology::Hexahedron | ElementTopology::InfiniteHexahedron => vec![
            vec![0, 1],
            vec![0, 2],
            vec![0, 4],
            vec![1, 3],
            vec![1, 5],
            vec![2, 3],
            vec![2, 6],
            vec![3, 7],
            vec![4, 5],
            vec![4, 6],
            vec![5, 7],
            vec![6, 7],
        ],
        ElementTopology::Prism => vec![
            vec![0, 1],
            vec![0, 2],
            vec![0, 3],
            vec![1, 2],
            vec![1, 4],
            vec![2, 5],
            vec![3, 4],
            vec![3, 5],
            vec![4, 5],
        ],
        ElementTopology::Pyramid => vec![
            vec![0, 1],
            vec![0, 2],
            vec![0, 4],
            vec![1, 3],
            vec![1, 4],
            vec![2, 3],
            vec![2, 4],
            vec![3, 4],
        ],
    }
}

/// The faces of the reference element
pub fn faces(cell: ElementTopology) -> Vec<Vec<usize>> {
    match cell {
        ElementTopology::Point => vec![],
        ElementTopology::Interval => vec![],
        ElementTopology::Triangle => vec![vec![0, 1, 2]],
        ElementTopology::Quadrilateral | ElementTopology::InfiniteQuadrilateral => {
            vec![vec![0, 1, 2, 3]]
        }
        ElementTopology::Tetrahedron => {
            vec![vec![1, 2, 3], vec![0, 2, 3], vec![0, 1, 3], vec![0, 1, 2]]
        }
        ElementTopology::Hexahedron | ElementTopology::InfiniteHexahedron => vec![
            vec![0, 1, 2, 3],
            vec![0, 1, 4, 5],
            vec![0, 2, 4, 6],
            vec![1, 3, 5, 7],
            vec![2, 3, 6, 7],
            vec![4, 5, 6, 7],
        ],
        ElementTopology::Prism => vec![
            vec![0, 1, 2],
            vec![0, 1, 3, 4],
            vec![0, 2, 3, 5],
            vec![1, 2, 4, 5],
            vec![3, 4, 5],
        ],
        ElementTopology::Pyramid => vec![
            vec![0, 1, 2, 3],
            vec![0, 1, 4],
            vec![0, 2, 4],
            vec![1, 3, 4],
            vec![2, 3, 4],
        ],
    }
}

/// The number of subentities of each dimension
pub fn entity_counts(cell: ElementTopology) -> Vec<usize> {
    match cell {
        ElementTopology::Point => vec![1, 0, 0, 0],
        ElementTopology::Interval => vec![2, 1, 0, 0],
        ElementTopology::Triangle => vec![3, 3, 1, 0],
        ElementTopology::Quadrilateral | ElementTopology::InfiniteQuadrilateral => vec![4, 4, 1, 0],
        ElementTopology::Tetrahedron => vec![4, 6, 4, 1],
        ElementTopology::Hexahedron | ElementTopology::InfiniteHexahedron => vec![8, 12, 6, 1],
        ElementTopology::Prism => vec![6, 9, 5, 1],
        ElementTopology::Pyramid => vec![5, 8, 5, 1],
    }
}

/// The number of nodes in the canonical node lattice of the given degree.
///
/// The degree-1 lattice is the vertex set. The degree-2 lattice adds a
/// node on each edge midpoint, one at the centre of each quadrilateral
/// face, and (for the hexahedron) one at the body centre. `None` is
/// returned for lattices that are not defined.
pub fn node_count(cell: ElementTopology, degree: usize) -> Option<usize> {
    match (cell, degree) {
        (ElementTopology::Point, _) => Some(1),
        (_, 1) => Some(entity_counts(cell)[0]),
        (ElementTopology::Interval, 2) => Some(3),
        (ElementTopology::Triangle, 2) => Some(6),
        (ElementTopology::Quadrilateral, 2) => Some(9),
        (ElementTopology::Tetrahedron, 2) => Some(10),
        (ElementTopology::Hexahedron, 2) => Some(27),
        (ElementTopology::Prism, 2) => Some(18),
        _ => None,
    }
}

/// The reference coordinates of a node of the canonical lattice.
///
/// Lattice ordering is vertices, then edge midpoints in [`edges`] order,
/// then quadrilateral face centres in [`faces`] order, then the body
/// centre.
pub fn node_location<T: RlstScalar<Real = T>>(
    cell: ElementTopology,
    degree: usize,
    node: usize,
) -> Option<Vec<T>> {
    let count = node_count(cell, degree)?;
    if node >= count {
        return None;
    }
    if cell == ElementTopology::Point {
        return Some(vec![]);
    }
    let v = vertices::<T>(cell);
    if node < v.len() {
        return Some(v[node].clone());
    }
    let half = T::from(0.5).unwrap();
    let quarter = T::from(0.25).unwrap();
    let e = edges(cell);
    let mut index = node - v.len();
    if index < e.len() {
        let [a, b] = [e[index][0], e[index][1]];
        return Some(
            v[a].iter()
                .zip(v[b].iter())
                .map(|(&x, &y)| (x + y) * half)
                .collect(),
        );
    }
    index -= e.len();
    for face in faces(cell) {
        if face.len() != 4 {
            continue;
        }
        if index == 0 {
            let mut centre = vec![T::from(0.0).unwrap(); dim(cell)];
            for &fv in &face {
                for (c, x) in centre.iter_mut().zip(v[fv].iter()) {
                    *c += *x * quarter;
                }
            }
            return Some(centre);
        }
        index -= 1;
    }
    // only the hexahedron has a body-centre node
    Some(vec![half; 3])
}

/// Test whether a point lies on the reference element.
///
/// Each linear constraint defining the reference domain is relaxed by
/// `eps`, so the accepted region grows monotonically with `eps`. The
/// radial coordinate of the infinite topologies is bounded strictly
/// below 1: the pole is never inside, whatever the tolerance.
pub fn on_reference_element<T: Float + RlstScalar<Real = T>>(
    point: &[T],
    cell: ElementTopology,
    eps: T,
) -> bool {
    let one = T::from(1.0).unwrap();
    let lower = |x: T| x >= -eps;
    let upper = |x: T| x <= one + eps;
    match cell {
        ElementTopology::Point => true,
        ElementTopology::Interval => lower(point[0]) && upper(point[0]),
        ElementTopology::Triangle => {
            lower(point[0]) && lower(point[1]) && upper(point[0] + point[1])
        }
        ElementTopology::Quadrilateral => {
            lower(point[0]) && upper(point[0]) && lower(point[1]) && upper(point[1])
        }
        ElementTopology::Tetrahedron => {
            lower(point[0])
                && lower(point[1])
                && lower(point[2])
                && upper(point[0] + point[1] + point[2])
        }
        ElementTopology::Hexahedron => point.iter().all(|&x| lower(x) && upper(x)),
        ElementTopology::Prism => {
            lower(point[0])
                && lower(point[1])
                && upper(point[0] + point[1])
                && lower(point[2])
                && upper(point[2])
        }
        ElementTopology::Pyramid => {
            lower(point[0])
                && lower(point[1])
                && lower(point[2])
                && upper(point[2])
                && point[0] <= one - point[2] + eps
                && point[1] <= one - point[2] + eps
        }
        ElementTopology::InfiniteQuadrilateral => {
            lower(point[0]) && upper(point[0]) && lower(point[1]) && point[1] < one
        }
        ElementTopology::InfiniteHexahedron => {
            lower(point[0])
                && upper(point[0])
                && lower(point[1])
                && upper(point[1])
                && lower(point[2])
                && point[2] < one
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use paste::paste;

    macro_rules! test_cell {

        ($($cell:ident),+) => {

        $(
            paste! {

                #[test]
                fn [<test_ $cell:lower>]() {
                    let cell = ElementTopology::[<$cell>];
                    let v = vertices::<f64>(cell);
                    let d = dim(cell);
                    let ec = entity_counts(cell);
                    assert_eq!(ec[0], v.len());
                    for vertex in &v {
                        assert_eq!(vertex.len(), d);
                    }
                    assert_eq!(ec[1], edges(cell).len());
                    assert_eq!(ec[2], faces(cell).len());
                    assert_eq!(midpoint::<f64>(cell).len(), d);

                    let eps = REFERENCE_EPS;
                    assert!(on_reference_element(&midpoint::<f64>(cell), cell, eps));
                    for vertex in &v {
                        assert!(on_reference_element(vertex, cell, eps));
                    }
                    let outside = vec![-1.0; d];
                    if d > 0 {
                        assert!(!on_reference_element(&outside, cell, eps));
                    }
                }

            }
        )*
        };
    }

    test_cell!(
        Point,
        Interval,
        Triangle,
        Quadrilateral,
        Tetrahedron,
        Hexahedron,
        Prism,
        Pyramid,
        InfiniteQuadrilateral,
        InfiniteHexahedron
    );

    macro_rules! test_lattice {

        ($($cell:ident),+) => {

        $(
            paste! {

                #[test]
                fn [<test_lattice_ $cell:lower>]() {
                    let cell = ElementTopology::[<$cell>];
                    for degree in [1, 2] {
                        if let Some(count) = node_count(cell, degree) {
                            for node in 0..count {
                                let loc = node_location::<f64>(cell, degree, node).unwrap();
                                assert_eq!(loc.len(), dim(cell));
                                assert!(on_reference_element(&loc, cell, REFERENCE_EPS));
                            }
                            assert!(node_location::<f64>(cell, degree, count).is_none());
                        }
                    }
                }

            }
        )*
        };
    }

    test_lattice!(
        Interval,
        Triangle,
        Quadrilateral,
        Tetrahedron,
        Hexahedron,
        Prism,
        Pyramid
    );

    #[test]
    fn test_lattice_counts() {
        assert_eq!(node_count(ElementTopology::Interval, 2), Some(3));
        assert_eq!(node_count(ElementTopology::Triangle, 2), Some(6));
        assert_eq!(node_count(ElementTopology::Quadrilateral, 2), Some(9));
        assert_eq!(node_count(ElementTopology::Tetrahedron, 2), Some(10));
        assert_eq!(node_count(ElementTopology::Hexahedron, 2), Some(27));
        assert_eq!(node_count(ElementTopology::Prism, 2), Some(18));
        assert_eq!(node_count(ElementTopology::Pyramid, 2), None);
        assert_eq!(node_count(ElementTopology::InfiniteQuadrilateral, 1), Some(4));
        assert_eq!(node_count(ElementTopology::InfiniteQuadrilateral, 2), None);
        assert_eq!(node_count(ElementTopology::InfiniteHexahedron, 1), Some(8));
    }

    #[test]
    fn test_edge_midpoints() {
        // second triangle node after the vertices is the midpoint of edge [1, 2]
        let loc = node_location::<f64>(ElementTopology::Triangle, 2, 3).unwrap();
        assert_eq!(loc, vec![0.5, 0.5]);
        let loc = node_location::<f64>(ElementTopology::Triangle, 2, 4).unwrap();
        assert_eq!(loc, vec![0.0, 0.5]);
        let loc = node_location::<f64>(ElementTopology::Triangle, 2, 5).unwrap();
        assert_eq!(loc, vec![0.5, 0.0]);
        // last quadrilateral node is the face centre
        let loc = node_location::<f64>(ElementTopology::Quadrilateral, 2, 8).unwrap();
        assert_eq!(loc, vec![0.5, 0.5]);
        // last hexahedron node is the body centre
        let loc = node_location::<f64>(ElementTopology::Hexahedron, 2, 26).unwrap();
        assert_eq!(loc, vec![0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_containment_monotonicity() {
        let points = [
            vec![1.0 + 1e-8, 0.0],
            vec![0.5, 0.5 + 1e-8],
            vec![-1e-8, 0.3],
            vec![0.6, 0.7],
        ];
        for p in &points {
            for cell in [ElementTopology::Triangle, ElementTopology::Quadrilateral] {
                let mut accepted = false;
                for eps in [0.0, 1e-10, 1e-6, 1e-2, 1.0] {
                    let now = on_reference_element(&p[..], cell, eps);
                    // once accepted at a smaller eps, stays accepted
                    assert!(!accepted || now);
                    accepted = now;
                }
            }
        }
    }

    #[test]
    fn test_infinite_pole_excluded() {
        // the pole is outside for any tolerance
        assert!(!on_reference_element(
            &[0.5, 1.0],
            ElementTopology::InfiniteQuadrilateral,
            1.0
        ));
        assert!(on_reference_element(
            &[0.5, 0.999],
            ElementTopology::InfiniteQuadrilateral,
            REFERENCE_EPS
        ));
        assert!(!on_reference_element(
            &[0.5, 0.5, 1.0],
            ElementTopology::InfiniteHexahedron,
            1.0
        ));
    }
}
