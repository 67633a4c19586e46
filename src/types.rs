//! General type definitions

use thiserror::Error;

/// The shape of an element, independent of the order of its geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementTopology {
    /// A point
    Point,
    /// An interval
    Interval,
    /// A triangle
    Triangle,
    /// A quadrilateral
    Quadrilateral,
    /// A tetrahedron
    Tetrahedron,
    /// A hexahedron
    Hexahedron,
    /// A triangular prism
    Prism,
    /// A pyramid with a quadrilateral base
    Pyramid,
    /// An unbounded element with an interval base and one radial direction
    InfiniteQuadrilateral,
    /// An unbounded element with a quadrilateral base and one radial direction
    InfiniteHexahedron,
}

impl ElementTopology {
    /// Is this an unbounded-domain topology?
    pub fn is_infinite(&self) -> bool {
        matches!(
            self,
            ElementTopology::InfiniteQuadrilateral | ElementTopology::InfiniteHexahedron
        )
    }
}

/// Shape function families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Nodal Lagrange basis
    Lagrange,
    /// Vertex functions plus integrated Legendre modes
    Hierarchic,
    /// Discontinuous complete polynomial basis
    Monomial,
}

/// A finite element descriptor: a family together with a polynomial order.
///
/// Descriptors are validated on construction; an order outside the
/// family's supported range is rejected, never coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeType {
    family: Family,
    order: usize,
}

impl FeType {
    /// Create a descriptor, checking the family-dependent order range
    pub fn new(family: Family, order: usize) -> Result<Self, EvalError> {
        let valid = match family {
            Family::Lagrange => (1..=2).contains(&order),
            Family::Hierarchic => order >= 1,
            Family::Monomial => true,
        };
        if valid {
            Ok(Self { family, order })
        } else {
            Err(EvalError::UnsupportedElement(format!(
                "{family:?} elements of order {order} are not supported"
            )))
        }
    }

    /// The basis family
    pub fn family(&self) -> Family {
        self.family
    }

    /// The polynomial order
    pub fn order(&self) -> usize {
        self.order
    }
}

/// Errors produced by the evaluation layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Descriptor/topology combination not recognized by dispatch
    #[error("unsupported element: {0}")]
    UnsupportedElement(String),
    /// Basis, dof or node index outside its valid range
    #[error("invalid index: {0}")]
    InvalidIndex(String),
    /// Coefficient vector length does not match the expected count
    #[error("dimension mismatch: expected {expected} entries, found {found}")]
    DimensionMismatch {
        /// Expected number of entries
        expected: usize,
        /// Number of entries supplied
        found: usize,
    },
    /// The iterative inverse-map solve failed to converge
    #[error("inverse map diverged: residual {residual:e} after {iterations} iterations")]
    InverseMapDivergence {
        /// Number of Newton iterations performed
        iterations: usize,
        /// Physical-space residual at the last iterate
        residual: f64,
    },
}

impl EvalError {
    pub(crate) fn unsupported(fe_t: FeType, topology: ElementTopology, dim: usize) -> Self {
        EvalError::UnsupportedElement(format!(
            "{:?} of order {} on {:?} in {}D",
            fe_t.family(),
            fe_t.order(),
            topology,
            dim
        ))
    }

    pub(crate) fn invalid_index(what: &str, index: usize, count: usize) -> Self {
        EvalError::InvalidIndex(format!("{what} index {index} out of range (count {count})"))
    }
}
