//! Trait definitions

use crate::types::ElementTopology;
use num::Float;
use rlst::RlstScalar;

/// An element of a mesh: a topology tag together with an ordered
/// sequence of node coordinates in physical space.
///
/// The evaluation layer borrows an element for the duration of a single
/// call and never retains or mutates it. Node ordering must follow the
/// canonical lattice of the element's topology (vertices first, then
/// edge midpoints, face centres and the body centre).
pub trait Element {
    /// Scalar type of the coordinates
    type T: Float + RlstScalar<Real = Self::T>;

    /// The element topology
    fn topology(&self) -> ElementTopology;

    /// The geometric dimension of the space the element is embedded in
    fn dim(&self) -> usize;

    /// The number of nodes
    fn node_count(&self) -> usize;

    /// The physical coordinates of a local node
    fn node(&self, index: usize) -> &[Self::T];
}
