//! Definition of simple elements for tests and examples

use crate::reference_element;
use crate::traits::Element;
use crate::types::ElementTopology;
use num::Float;
use rlst::RlstScalar;

/// An element that owns its node coordinates.
///
/// This is the smallest useful implementation of [`Element`]; mesh
/// libraries will normally implement the trait on their own cell types
/// instead.
pub struct SimpleElement<T: Float + RlstScalar<Real = T>> {
    topology: ElementTopology,
    dim: usize,
    nodes: Vec<T>,
}

impl<T: Float + RlstScalar<Real = T>> SimpleElement<T> {
    /// Create an element from a flat node coordinate array.
    ///
    /// `nodes` holds the coordinates of one node after another, `dim`
    /// entries each, in the canonical node ordering of `topology`.
    pub fn new(topology: ElementTopology, dim: usize, nodes: Vec<T>) -> Self {
        assert!(dim > 0 && nodes.len() % dim == 0);
        Self {
            topology,
            dim,
            nodes,
        }
    }

    /// The reference element itself as an element: node coordinates are
    /// the canonical lattice of the given degree
    pub fn reference(topology: ElementTopology, degree: usize) -> Option<Self> {
        let dim = reference_element::dim(topology);
        if dim == 0 {
            return None;
        }
        let count = reference_element::node_count(topology, degree)?;
        let mut nodes = Vec::with_capacity(count * dim);
        for i in 0..count {
            nodes.extend(reference_element::node_location::<T>(topology, degree, i)?);
        }
        Some(Self::new(topology, dim, nodes))
    }
}

impl<T: Float + RlstScalar<Real = T>> Element for SimpleElement<T> {
    type T = T;

    fn topology(&self) -> ElementTopology {
        self.topology
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn node_count(&self) -> usize {
        self.nodes.len() / self.dim
    }

    fn node(&self, index: usize) -> &[T] {
        &self.nodes[index * self.dim..(index + 1) * self.dim]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_reference_elements() {
        for (cell, degree, nodes) in [
            (ElementTopology::Interval, 1, 2),
            (ElementTopology::Triangle, 2, 6),
            (ElementTopology::Quadrilateral, 1, 4),
            (ElementTopology::Hexahedron, 2, 27),
        ] {
            let e = SimpleElement::<f64>::reference(cell, degree).unwrap();
            assert_eq!(e.topology(), cell);
            assert_eq!(e.node_count(), nodes);
            assert_eq!(e.dim(), reference_element::dim(cell));
        }
        assert!(SimpleElement::<f64>::reference(ElementTopology::Pyramid, 2).is_none());
    }

    #[test]
    fn test_node_access() {
        let e = SimpleElement::new(
            ElementTopology::Triangle,
            2,
            vec![0.0, 0.0, 2.0, 0.0, 0.0, 3.0],
        );
        assert_eq!(e.node_count(), 3);
        assert_eq!(e.node(1), &[2.0, 0.0]);
        assert_eq!(e.node(2), &[0.0, 3.0]);
    }
}
