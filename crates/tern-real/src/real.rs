use std::fmt;
use std::sync::Arc;

use num_bigint::BigInt;
use num_integer::Integer;
use tern_arith::{Dyadic, Interval, Node};
use tern_core::Precision;

use crate::function::FunctionCode;

/// A computable real: a total map from precision levels to node codes.
///
/// `approx(p)` returns the left endpoint code of a width-2 node at level `p`
/// containing the real, so every query pins the value down to `2 / 2^p`.
/// Queries at different levels are independent; the encoding is redundant,
/// and nothing requires the answers to be nested, only that each one
/// individually contains the value.
///
/// Cloning is cheap (the underlying closure is shared).
#[derive(Clone)]
pub struct Real {
    approx: Arc<dyn Fn(Precision) -> BigInt + Send + Sync>,
}

impl Real {
    /// Wraps a precision-to-code map.
    ///
    /// The map must be deterministic and must return, for each level `p`,
    /// the left endpoint code of a node `[k, k+2] / 2^p` containing the
    /// denoted value.
    pub fn from_fn(approx: impl Fn(Precision) -> BigInt + Send + Sync + 'static) -> Self {
        Self {
            approx: Arc::new(approx),
        }
    }

    /// Wraps a map that produces whole nodes, possibly finer than asked.
    ///
    /// The map must return a node at precision at least the requested level;
    /// the node is then coarsened back to exactly the requested level.
    pub fn from_node_fn(node_at: impl Fn(Precision) -> Node + Send + Sync + 'static) -> Self {
        Self::from_fn(move |p| {
            let node = node_at(p);
            node.coarsen(node.precision() - p).code().clone()
        })
    }

    /// The integer `n` as a computable real.
    pub fn from_int(n: i64) -> Self {
        Self::from_dyadic(&Dyadic::from_int(n))
    }

    /// A dyadic rational as a computable real.
    ///
    /// Finer queries descend the left spine below the point; coarser queries
    /// floor-coarsen, so every answer is a node containing the point.
    pub fn from_dyadic(value: &Dyadic) -> Self {
        let value = value.clone();
        Self::from_fn(move |p| {
            if p >= value.scale() {
                value.refine_left(p - value.scale()).num().clone()
            } else {
                value.coarsen(value.scale() - p).num().clone()
            }
        })
    }

    /// The left endpoint of a node as a computable real.
    pub fn from_node(node: &Node) -> Self {
        Self::from_dyadic(&node.left_endpoint())
    }

    /// The node code at level `p`.
    pub fn approx(&self, p: Precision) -> BigInt {
        (self.approx)(p)
    }

    /// The containing node at level `p`.
    pub fn node_at(&self, p: Precision) -> Node {
        Node::new(self.approx(p), p)
    }

    /// The containing node at level `p` as a general interval.
    pub fn interval_at(&self, p: Precision) -> Interval {
        self.node_at(p).as_interval()
    }

    /// The left endpoint of the level-`p` node.
    pub fn lower(&self, p: Precision) -> Dyadic {
        self.node_at(p).left_endpoint()
    }

    /// The right endpoint of the level-`p` node.
    pub fn upper(&self, p: Precision) -> Dyadic {
        self.node_at(p).right_endpoint()
    }

    /// Lossy rendering of the level-`p` lower bound.
    pub fn to_f64(&self, p: Precision) -> f64 {
        self.lower(p).to_f64()
    }

    /// Exact decimal rendering of the level-`p` lower bound.
    pub fn to_decimal_string(&self, p: Precision) -> String {
        self.lower(p).to_decimal_string()
    }

    /// Negation.
    pub fn neg(&self) -> Real {
        FunctionCode::negate().eval_unchecked(vec![self.clone()])
    }

    /// Absolute value.
    pub fn abs(&self) -> Real {
        FunctionCode::absolute().eval_unchecked(vec![self.clone()])
    }

    /// Sum.
    pub fn add(&self, other: &Real) -> Real {
        FunctionCode::add().eval_unchecked(vec![self.clone(), other.clone()])
    }

    /// Difference.
    pub fn sub(&self, other: &Real) -> Real {
        self.add(&other.neg())
    }

    /// Product.
    pub fn mul(&self, other: &Real) -> Real {
        FunctionCode::multiply().eval_unchecked(vec![self.clone(), other.clone()])
    }

    /// Quotient; see [`Real::inverse`] for the divisor-near-zero caveat.
    pub fn div(&self, other: &Real) -> Real {
        self.mul(&other.inverse())
    }

    /// Multiplicative inverse.
    ///
    /// Each query raises its working precision until the queried node is
    /// bounded away from zero and tight enough that the reciprocal of the
    /// whole node fits inside one output node. A query on an exact zero
    /// never resolves (the sign of a real is only semidecidable), so callers
    /// must not invert a real they cannot bound away from zero.
    pub fn inverse(&self) -> Real {
        let inner = self.clone();
        Real::from_node_fn(move |prec| {
            let out = prec.max(0);
            let mut p = out + 1;
            loop {
                let left = inner.approx(p);
                let right: BigInt = &left + 2;
                // Positive product means the node excludes zero; the size
                // bound makes the reciprocal range narrower than one output
                // step, so a single node at level `out` covers it.
                let product = &left * &right;
                let threshold = BigInt::from(1) << (p + out + 1) as usize;
                if product >= threshold {
                    let numer = BigInt::from(1) << (p + out) as usize;
                    return Node::new(numer.div_floor(&right), out);
                }
                p += 1;
            }
        })
    }
}

impl fmt::Debug for Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Real").finish_non_exhaustive()
    }
}

impl std::ops::Neg for Real {
    type Output = Real;

    fn neg(self) -> Real {
        Real::neg(&self)
    }
}

impl std::ops::Add for Real {
    type Output = Real;

    fn add(self, rhs: Real) -> Real {
        Real::add(&self, &rhs)
    }
}

impl std::ops::Sub for Real {
    type Output = Real;

    fn sub(self, rhs: Real) -> Real {
        Real::sub(&self, &rhs)
    }
}

impl std::ops::Mul for Real {
    type Output = Real;

    fn mul(self, rhs: Real) -> Real {
        Real::mul(&self, &rhs)
    }
}

impl std::ops::Div for Real {
    type Output = Real;

    fn div(self, rhs: Real) -> Real {
        Real::div(&self, &rhs)
    }
}
