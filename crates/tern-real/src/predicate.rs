use std::fmt;
use std::sync::Arc;

use tern_core::Precision;

use crate::real::Real;

/// A decidable property of computable reals paired with its continuity
/// level `delta`.
///
/// The test inspects its argument only through approximations at level
/// `delta`, so its verdict is constant on every width-`2/2^delta` node.
/// That is what lets a search engine test one grid node per candidate and
/// speak for all the points inside it.
#[derive(Clone)]
pub struct Predicate {
    test: Arc<dyn Fn(&Real) -> bool + Send + Sync>,
    delta: Precision,
}

impl Predicate {
    /// Packs a test and its continuity level into a predicate.
    pub fn new(delta: Precision, test: impl Fn(&Real) -> bool + Send + Sync + 'static) -> Self {
        Self {
            test: Arc::new(test),
            delta,
        }
    }

    /// The level below which the test cannot distinguish reals.
    pub fn delta(&self) -> Precision {
        self.delta
    }

    /// Runs the test.
    pub fn holds(&self, x: &Real) -> bool {
        (self.test)(x)
    }

    /// Equality with `target` up to the tolerance of level `delta`: holds
    /// when the level-`delta` nodes of the two reals overlap.
    pub fn eq(target: Real, delta: Precision) -> Self {
        Self::new(delta, move |x| {
            x.interval_at(delta).intersects(&target.interval_at(delta))
        })
    }

    /// `x >= bound` up to the tolerance of level `delta`, decided on the
    /// level-`delta` node codes.
    pub fn geq(bound: Real, delta: Precision) -> Self {
        Self::new(delta, move |x| x.approx(delta) >= bound.approx(delta))
    }

    /// `x <= bound` up to the tolerance of level `delta`.
    pub fn leq(bound: Real, delta: Precision) -> Self {
        Self::new(delta, move |x| x.approx(delta) <= bound.approx(delta))
    }

    /// Logical negation; the continuity level is unchanged.
    pub fn not(&self) -> Predicate {
        let test = Arc::clone(&self.test);
        Predicate::new(self.delta, move |x| !test(x))
    }

    /// Conjunction; continuity levels combine by maximum.
    pub fn and(&self, other: &Predicate) -> Predicate {
        let lhs = Arc::clone(&self.test);
        let rhs = Arc::clone(&other.test);
        Predicate::new(self.delta.max(other.delta), move |x| lhs(x) && rhs(x))
    }

    /// Disjunction; continuity levels combine by maximum.
    pub fn or(&self, other: &Predicate) -> Predicate {
        let lhs = Arc::clone(&self.test);
        let rhs = Arc::clone(&other.test);
        Predicate::new(self.delta.max(other.delta), move |x| lhs(x) || rhs(x))
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("delta", &self.delta)
            .finish_non_exhaustive()
    }
}
