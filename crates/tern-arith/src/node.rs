use std::fmt;

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use tern_core::Precision;

use crate::dyadic::Dyadic;
use crate::interval::Interval;

/// A canonical width-2 interval code `[code, code+2] / 2^scale`.
///
/// One vertex of the infinite ternary refinement tree. Each node has three
/// children one level down (left, mid and right), each again of width 2 at
/// the finer scale. The mid child overlaps both halves; this redundancy is
/// what lets every real be represented without an a-priori sign decision at
/// dyadic boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    code: BigInt,
    scale: Precision,
}

impl Node {
    /// Creates a node from its left endpoint code and scale.
    pub fn new(code: impl Into<BigInt>, scale: Precision) -> Self {
        Self {
            code: code.into(),
            scale,
        }
    }

    /// Reads a dyadic as the left endpoint of the node at its scale.
    pub fn from_dyadic(left: &Dyadic) -> Self {
        Self::new(left.num().clone(), left.scale())
    }

    /// Returns the left endpoint code.
    pub fn code(&self) -> &BigInt {
        &self.code
    }

    /// Returns the precision level of the node.
    pub fn precision(&self) -> Precision {
        self.scale
    }

    /// The left endpoint as a dyadic rational.
    pub fn left_endpoint(&self) -> Dyadic {
        Dyadic::new(self.code.clone(), self.scale)
    }

    /// The right endpoint as a dyadic rational.
    pub fn right_endpoint(&self) -> Dyadic {
        Dyadic::new(&self.code + 2, self.scale)
    }

    /// The general-interval view `[code, code+2]`.
    pub fn as_interval(&self) -> Interval {
        Interval::new(self.code.clone(), &self.code + 2, self.scale)
    }

    /// The left child `[2k, 2k+2]` one level down.
    pub fn refine_left(&self) -> Self {
        Self::new(&self.code * 2, self.scale + 1)
    }

    /// The mid child `[2k+1, 2k+3]` one level down, overlapping both halves.
    pub fn refine_mid(&self) -> Self {
        Self::new(&self.code * 2 + 1, self.scale + 1)
    }

    /// The right child `[2k+2, 2k+4]` one level down.
    pub fn refine_right(&self) -> Self {
        Self::new(&self.code * 2 + 2, self.scale + 1)
    }

    /// The leftmost descendant `n` levels down.
    pub fn refine_left_by(&self, n: Precision) -> Self {
        Self::from_dyadic(&self.left_endpoint().refine_left(n))
    }

    /// The rightmost descendant `n` levels down.
    pub fn refine_right_by(&self, n: Precision) -> Self {
        Self::from_dyadic(&self.left_endpoint().refine_right(n))
    }

    /// The ancestor `n` levels up (floor coarsening of the left endpoint).
    pub fn coarsen(&self, n: Precision) -> Self {
        Self::from_dyadic(&self.left_endpoint().coarsen(n))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]@{}", self.code, &self.code + 2, self.scale)
    }
}

/// Enumerates the canonical grid of width-2 nodes at precision `delta`
/// spanning the compact interval `domain`.
///
/// Codes step by 2 from the leftmost to the rightmost descendant of the
/// canonicalized domain, so consecutive grid nodes abut without gaps. When
/// `delta` is at or above the domain's own precision the domain node itself
/// is the whole grid.
pub fn discretize(domain: &Interval, delta: Precision) -> Vec<Node> {
    let initial = domain.canonicalize();
    if delta <= initial.precision() {
        return vec![initial];
    }
    let steps = delta - initial.precision();
    let mut current = initial.refine_left_by(steps).code().clone();
    let end = initial.refine_right_by(steps).code().clone();
    let mut grid = Vec::new();
    while current <= end {
        grid.push(Node::new(current.clone(), delta));
        current += 2;
    }
    grid
}
