use std::fmt;

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};
use tern_core::Precision;

use crate::dyadic::Dyadic;
use crate::node::Node;

/// A general binary interval code `[left, right] / 2^scale`.
///
/// Unlike [`Node`], the endpoints are unconstrained, so this is the type
/// that function approximators produce: widths grow under arithmetic and are
/// only folded back into the canonical tree by [`Interval::canonicalize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    left: BigInt,
    right: BigInt,
    scale: Precision,
}

impl Interval {
    /// Creates an interval code from its endpoint codes and scale.
    pub fn new(left: impl Into<BigInt>, right: impl Into<BigInt>, scale: Precision) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            scale,
        }
    }

    /// Returns the left endpoint code.
    pub fn left_code(&self) -> &BigInt {
        &self.left
    }

    /// Returns the right endpoint code.
    pub fn right_code(&self) -> &BigInt {
        &self.right
    }

    /// Returns the precision (binary scale) of the endpoint codes.
    pub fn precision(&self) -> Precision {
        self.scale
    }

    /// The left endpoint as a dyadic rational.
    pub fn left_endpoint(&self) -> Dyadic {
        Dyadic::new(self.left.clone(), self.scale)
    }

    /// The right endpoint as a dyadic rational.
    pub fn right_endpoint(&self) -> Dyadic {
        Dyadic::new(self.right.clone(), self.scale)
    }

    /// `[a,b] -> [-b,-a]`.
    pub fn neg(&self) -> Self {
        Self::new(-&self.right, -&self.left, self.scale)
    }

    /// Interval absolute value.
    pub fn abs(&self) -> Self {
        if self.left.is_negative() {
            if self.right.is_negative() {
                self.neg()
            } else {
                Self::new(BigInt::zero(), self.right.clone(), self.scale)
            }
        } else {
            self.clone()
        }
    }

    /// Interval sum `[a,b] + [c,d] = [a+c, b+d]`, scales aligned to the finer.
    pub fn add(&self, other: &Interval) -> Self {
        if self.scale == other.scale {
            Self::new(&self.left + &other.left, &self.right + &other.right, self.scale)
        } else {
            let scale = self.scale.max(other.scale);
            let (a, b) = self.codes_at(scale);
            let (c, d) = other.codes_at(scale);
            Self::new(a + c, b + d, scale)
        }
    }

    /// Interval product: min/max of the four corner products.
    ///
    /// The endpoint signs are unconstrained, so all four corners matter. The
    /// result scale is the sum of the operand scales (codes multiply, so the
    /// denominators multiply too).
    pub fn mul(&self, other: &Interval) -> Self {
        let ac = &self.left * &other.left;
        let ad = &self.left * &other.right;
        let bc = &self.right * &other.left;
        let bd = &self.right * &other.right;
        let lo = ac.clone().min(ad.clone()).min(bc.clone()).min(bd.clone());
        let hi = ac.max(ad).max(bc).max(bd);
        Self::new(lo, hi, self.scale + other.scale)
    }

    /// Re-expresses this interval at a finer scale `self.precision() + n`.
    pub fn rescale(&self, n: Precision) -> Self {
        if n <= 0 {
            self.clone()
        } else {
            Self::new(
                &self.left << n as usize,
                &self.right << n as usize,
                self.scale + n,
            )
        }
    }

    /// The smallest canonical node containing this interval, obtained by
    /// coarsening the left endpoint until the node covers the right endpoint.
    ///
    /// `bitlength(right - left) - 2` is a lower bound on the coarsening
    /// count (any fewer steps and the node is narrower than the interval);
    /// depending on where the left endpoint sits inside its coarse cell, up
    /// to two further steps can be needed before the right endpoint is
    /// covered. A node canonicalizes to itself.
    pub fn canonicalize(&self) -> Node {
        let width: BigInt = &self.right - &self.left;
        let mut steps = (width.bits() as Precision - 2).max(0);
        loop {
            let coarse = self.left_endpoint().coarsen(steps);
            let covered = ((coarse.num() + 2) << steps as usize) >= self.right;
            if covered {
                return Node::from_dyadic(&coarse);
            }
            steps += 1;
        }
    }

    /// Interval domination: `a.eclipses(b)` holds when, at a common scale,
    /// every value representable by `a` is less than or equal to every value
    /// representable by `b` (`right(a) <= left(b)`, non-strict).
    ///
    /// This is the pruning oracle of the optimization engine: when some
    /// candidate's image eclipses another's, the eclipsed candidate cannot
    /// contain the minimum as long as the eclipsing one survives.
    pub fn eclipses(&self, other: &Interval) -> bool {
        let scale = self.scale.max(other.scale);
        let (_, b) = self.codes_at(scale);
        let (c, _) = other.codes_at(scale);
        b <= c
    }

    /// True when this interval spans strictly more than `other` at a common
    /// scale. Used by the derivative-guided ordering: among candidates of
    /// equal input width, a wider image means a steeper function.
    pub fn wider_than(&self, other: &Interval) -> bool {
        let scale = self.scale.max(other.scale);
        let (a, b) = self.codes_at(scale);
        let (c, d) = other.codes_at(scale);
        (b - a) > (d - c)
    }

    /// True when the two intervals overlap at a common scale.
    pub fn intersects(&self, other: &Interval) -> bool {
        let scale = self.scale.max(other.scale);
        let (a, b) = self.codes_at(scale);
        let (c, d) = other.codes_at(scale);
        !(b < c || d < a)
    }

    fn codes_at(&self, scale: Precision) -> (BigInt, BigInt) {
        let shift = (scale - self.scale).max(0) as usize;
        (&self.left << shift, &self.right << shift)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.left, self.right, self.scale)
    }
}
