use std::fmt;
use std::sync::Arc;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};
use tern_arith::{Interval, Node};
use tern_core::{ErrorInfo, Precision, TernError};

use crate::real::Real;

/// Interval transfer function of a computable map.
///
/// Given interval approximations of the arguments, produces an interval
/// guaranteed to contain every value the map can take on them. Soundness of
/// everything downstream (evaluation, search pruning) rests on this
/// containment, so implementations must always round outward.
pub trait Approximator: Send + Sync {
    /// Applies the map to interval approximations of the arguments.
    fn approximate(&self, args: &[Interval]) -> Interval;
}

impl<F> Approximator for F
where
    F: Fn(&[Interval]) -> Interval + Send + Sync,
{
    fn approximate(&self, args: &[Interval]) -> Interval {
        self(args)
    }
}

/// Continuity modulus of a computable map.
///
/// For a target output level and the actual arguments, reports how finely
/// each argument must be approximated so the transferred interval
/// canonicalizes to at least the target level.
pub trait ContinuityOracle: Send + Sync {
    /// Input precision required per argument for the given output target.
    fn required_precisions(&self, args: &[Real], target: Precision) -> Vec<Precision>;
}

impl<F> ContinuityOracle for F
where
    F: Fn(&[Real], Precision) -> Vec<Precision> + Send + Sync,
{
    fn required_precisions(&self, args: &[Real], target: Precision) -> Vec<Precision> {
        self(args, target)
    }
}

/// A computable function: an interval transfer function paired with its
/// continuity oracle.
///
/// Applying the code to computable reals yields another computable real
/// whose queries drive the oracle-then-transfer pipeline; composing codes
/// chains both halves. Cloning shares the underlying closures.
#[derive(Clone)]
pub struct FunctionCode {
    arity: usize,
    approximator: Arc<dyn Approximator>,
    oracle: Arc<dyn ContinuityOracle>,
}

impl FunctionCode {
    /// Packs a transfer function and an oracle into a function code.
    pub fn new(
        arity: usize,
        approximator: impl Approximator + 'static,
        oracle: impl ContinuityOracle + 'static,
    ) -> Self {
        Self {
            arity,
            approximator: Arc::new(approximator),
            oracle: Arc::new(oracle),
        }
    }

    /// Number of arguments the function takes.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Projection onto argument `index` of an `arity`-tuple.
    pub fn proj(arity: usize, index: usize) -> Result<FunctionCode, TernError> {
        if index >= arity {
            return Err(TernError::Function(
                ErrorInfo::new("function.index_out_of_range", "projection index exceeds arity")
                    .with_context("arity", arity.to_string())
                    .with_context("index", index.to_string()),
            ));
        }
        Ok(Self::projection(arity, index))
    }

    fn projection(arity: usize, index: usize) -> FunctionCode {
        Self::new(
            arity,
            move |args: &[Interval]| args[index].clone(),
            move |_args: &[Real], target: Precision| {
                let mut precs = vec![0; arity];
                precs[index] = target;
                precs
            },
        )
    }

    /// The constant function returning `value`, ignoring the argument
    /// values. The output precision is read off the first argument's, so the
    /// arity must be at least one; the oracle echoes the target to every
    /// slot.
    pub fn constant(arity: usize, value: Real) -> Result<FunctionCode, TernError> {
        if arity == 0 {
            return Err(TernError::Function(
                ErrorInfo::new("function.nullary", "a constant function needs at least one argument")
                    .with_hint("use a Real directly for an argument-free value"),
            ));
        }
        Ok(Self::constant_code(arity, value))
    }

    fn constant_code(arity: usize, value: Real) -> FunctionCode {
        Self::new(
            arity,
            move |args: &[Interval]| {
                let p = args.first().map(Interval::precision).unwrap_or(0);
                value.node_at(p).as_interval()
            },
            move |_args: &[Real], target: Precision| vec![target; arity],
        )
    }

    /// Unary negation.
    pub fn negate() -> FunctionCode {
        Self::new(
            1,
            |args: &[Interval]| args[0].neg(),
            |_args: &[Real], target: Precision| vec![target],
        )
    }

    /// Unary absolute value.
    pub fn absolute() -> FunctionCode {
        Self::new(
            1,
            |args: &[Interval]| args[0].abs(),
            |_args: &[Real], target: Precision| vec![target],
        )
    }

    /// Binary addition. Each operand contributes half an output step, so
    /// both are queried one level finer than the target.
    pub fn add() -> FunctionCode {
        Self::new(
            2,
            |args: &[Interval]| args[0].add(&args[1]),
            |_args: &[Real], target: Precision| vec![target + 1, target + 1],
        )
    }

    /// Binary multiplication.
    ///
    /// The output error scales with the operand magnitudes, so the oracle
    /// samples both arguments at the target level and widens by half the
    /// bit length of their combined magnitude.
    pub fn multiply() -> FunctionCode {
        Self::new(
            2,
            |args: &[Interval]| args[0].mul(&args[1]),
            |args: &[Real], target: Precision| {
                let magnitude: BigInt =
                    args[0].approx(target).abs() + args[1].approx(target).abs() + 1;
                let p = target + (magnitude.bits() as Precision) / 2;
                vec![p, p]
            },
        )
    }

    /// Multiplication by a fixed real.
    ///
    /// One factor is pinned, so the modulus stays additive in the operand
    /// magnitudes: the required input precision is the bit length of the
    /// combined code magnitudes at the target scale, less two, floored at
    /// the target itself. [`FunctionCode::multiply`] must assume both
    /// factors vary and widens much more aggressively.
    pub fn constant_mul(coefficient: Real) -> FunctionCode {
        let sampled = coefficient.clone();
        Self::new(
            1,
            move |args: &[Interval]| {
                let p = args[0].precision();
                args[0].mul(&coefficient.node_at(p).as_interval())
            },
            move |args: &[Real], target: Precision| {
                let magnitude: BigInt =
                    (args[0].approx(target).abs() + sampled.approx(target).abs() + 1) * 2;
                vec![(magnitude.bits() as Precision - 2).max(target)]
            },
        )
    }

    /// Unary multiplicative inverse.
    ///
    /// The oracle raises the argument precision until the argument's node
    /// is bounded away from zero and tight enough that the reciprocal spans
    /// at most one code at the target level, so evaluating the inverse of
    /// an exactly-zero real diverges. The raw transfer of a zero-touching
    /// interval answers with an enclosure far too coarse to certify any
    /// level, which keeps the evaluation loop refining instead of accepting
    /// a bogus node.
    pub fn inverse() -> FunctionCode {
        Self::new(
            1,
            |args: &[Interval]| {
                let iv = if args[0].precision() < 0 {
                    args[0].rescale(-args[0].precision())
                } else {
                    args[0].clone()
                };
                let p = iv.precision();
                let (l, r) = (iv.left_code(), iv.right_code());
                if l.is_zero() || r.is_zero() || l.sign() != r.sign() {
                    // The reciprocal of a zero-touching interval is unbounded.
                    let span = BigInt::from(1) << (2 * p + 2) as usize;
                    return Interval::new(-&span, span, p);
                }
                // 1/[l,r] = [4^p/r, 4^p/l] at the same scale, rounded outward.
                let numer = BigInt::from(1) << (2 * p) as usize;
                Interval::new(numer.div_floor(r), numer.div_ceil(l), p)
            },
            |args: &[Real], target: Precision| {
                let out = target.max(0);
                let mut p = out + 1;
                loop {
                    let left = args[0].approx(p);
                    if &left * (&left + 2) >= BigInt::from(1) << (p + out + 1) as usize {
                        return vec![p];
                    }
                    p += 1;
                }
            },
        )
    }

    /// Composition `outer(inner[0](xs), ..., inner[k-1](xs))`.
    ///
    /// The inner codes must all share one arity and there must be exactly
    /// one per outer argument.
    pub fn compose(outer: FunctionCode, inner: Vec<FunctionCode>) -> Result<FunctionCode, TernError> {
        if inner.len() != outer.arity {
            return Err(TernError::Function(
                ErrorInfo::new("function.compose_shape", "inner function count does not match outer arity")
                    .with_context("outer_arity", outer.arity.to_string())
                    .with_context("inner_count", inner.len().to_string()),
            ));
        }
        let arity = inner.first().map(|g| g.arity).unwrap_or(0);
        if inner.iter().any(|g| g.arity != arity) {
            return Err(TernError::Function(
                ErrorInfo::new("function.compose_shape", "inner functions disagree on arity")
                    .with_context("arity", arity.to_string()),
            ));
        }
        Ok(Self::composed(arity, outer, inner))
    }

    fn composed(arity: usize, outer: FunctionCode, inner: Vec<FunctionCode>) -> FunctionCode {
        let transfer_outer = outer.clone();
        let transfer_inner = inner.clone();
        Self::new(
            arity,
            move |args: &[Interval]| {
                let mids: Vec<Interval> = transfer_inner
                    .iter()
                    .map(|g| g.approximator.approximate(args))
                    .collect();
                transfer_outer.approximator.approximate(&mids)
            },
            move |args: &[Real], target: Precision| {
                let mids: Vec<Real> = inner.iter().map(|g| g.eval_unchecked(args.to_vec())).collect();
                let outer_precs = outer.oracle.required_precisions(&mids, target);
                // Each argument must be fine enough for every inner branch.
                let mut precs = vec![Precision::MIN; arity];
                for (g, &branch_target) in inner.iter().zip(&outer_precs) {
                    let branch = g.oracle.required_precisions(args, branch_target);
                    for (slot, p) in precs.iter_mut().zip(branch) {
                        *slot = (*slot).max(p);
                    }
                }
                precs
            },
        )
    }

    /// Binary subtraction, `x - y`.
    pub fn subtract() -> FunctionCode {
        let negated = Self::composed(2, Self::negate(), vec![Self::projection(2, 1)]);
        Self::composed(2, Self::add(), vec![Self::projection(2, 0), negated])
    }

    /// Binary division, `x / y`; the divisor caveat of
    /// [`FunctionCode::inverse`] applies.
    pub fn divide() -> FunctionCode {
        let inverted = Self::composed(2, Self::inverse(), vec![Self::projection(2, 1)]);
        Self::composed(2, Self::multiply(), vec![Self::projection(2, 0), inverted])
    }

    /// The unary power `x^n` by balanced repeated squaring; `x^0` is the
    /// constant one and `x^1` the identity.
    pub fn pow(n: u32) -> FunctionCode {
        match n {
            0 => Self::constant_code(1, Real::from_int(1)),
            1 => Self::projection(1, 0),
            _ => Self::composed(
                1,
                Self::multiply(),
                vec![Self::pow(n / 2), Self::pow(n - n / 2)],
            ),
        }
    }

    /// The pointwise sum of a non-empty family of codes of equal arity,
    /// combined as a balanced tree so oracle targets grow logarithmically
    /// in the number of terms.
    pub fn sum(terms: Vec<FunctionCode>) -> Result<FunctionCode, TernError> {
        let arity = match terms.first() {
            Some(first) => first.arity,
            None => {
                return Err(TernError::Function(ErrorInfo::new(
                    "function.empty_sum",
                    "a sum needs at least one term",
                )))
            }
        };
        if terms.iter().any(|t| t.arity != arity) {
            return Err(TernError::Function(
                ErrorInfo::new("function.compose_shape", "sum terms disagree on arity")
                    .with_context("arity", arity.to_string()),
            ));
        }
        Ok(Self::sum_balanced(&terms))
    }

    fn sum_balanced(terms: &[FunctionCode]) -> FunctionCode {
        if terms.len() == 1 {
            return terms[0].clone();
        }
        let mid = terms.len() / 2;
        Self::composed(
            terms[0].arity,
            Self::add(),
            vec![
                Self::sum_balanced(&terms[..mid]),
                Self::sum_balanced(&terms[mid..]),
            ],
        )
    }

    /// The monomial `coefficient * x_index^exponent` in `arity` variables.
    pub fn monomial(
        arity: usize,
        coefficient: Real,
        index: usize,
        exponent: u32,
    ) -> Result<FunctionCode, TernError> {
        let var = Self::proj(arity, index)?;
        let powered = Self::composed(arity, Self::pow(exponent), vec![var]);
        Ok(Self::composed(arity, Self::constant_mul(coefficient), vec![powered]))
    }

    /// A polynomial in `arity` variables given as
    /// `(coefficient, variable index, exponent)` monomials. An empty term
    /// list is the zero polynomial.
    pub fn polynomial(
        arity: usize,
        terms: Vec<(Real, usize, u32)>,
    ) -> Result<FunctionCode, TernError> {
        if terms.is_empty() {
            return Self::constant(arity, Real::from_int(0));
        }
        let monomials = terms
            .into_iter()
            .map(|(coefficient, index, exponent)| Self::monomial(arity, coefficient, index, exponent))
            .collect::<Result<Vec<_>, _>>()?;
        Self::sum(monomials)
    }

    /// A polynomial in one variable given as `(coefficient, exponent)` terms.
    pub fn unary_polynomial(terms: Vec<(Real, u32)>) -> Result<FunctionCode, TernError> {
        Self::polynomial(
            1,
            terms
                .into_iter()
                .map(|(coefficient, exponent)| (coefficient, 0, exponent))
                .collect(),
        )
    }

    /// Applies the interval transfer function directly.
    ///
    /// The result contains every value the function takes on the argument
    /// boxes. This is the branch-and-bound entry point: an optimizer feeds
    /// candidate nodes through it and compares the resulting enclosures.
    pub fn transfer(&self, args: &[Interval]) -> Result<Interval, TernError> {
        if args.len() != self.arity {
            return Err(TernError::Function(
                ErrorInfo::new("function.arity_mismatch", "argument count does not match the function arity")
                    .with_context("arity", self.arity.to_string())
                    .with_context("supplied", args.len().to_string()),
            ));
        }
        Ok(self.approximator.approximate(args))
    }

    /// Applies the function to computable reals, yielding a computable real.
    ///
    /// Each query on the result asks the oracle for per-argument precisions,
    /// transfers the argument nodes through the approximator and
    /// canonicalizes. If the canonical node falls short of the requested
    /// level (the oracle is a heuristic, not a proof), the target is raised
    /// and the query re-run; transferred widths shrink as targets grow, so
    /// the loop resolves.
    pub fn evaluate(&self, args: &[Real]) -> Result<Real, TernError> {
        if self.arity == 0 {
            return Err(TernError::Function(ErrorInfo::new(
                "function.nullary",
                "evaluation requires at least one argument",
            )));
        }
        if args.len() != self.arity {
            return Err(TernError::Function(
                ErrorInfo::new("function.arity_mismatch", "argument count does not match the function arity")
                    .with_context("arity", self.arity.to_string())
                    .with_context("supplied", args.len().to_string()),
            ));
        }
        Ok(self.eval_unchecked(args.to_vec()))
    }

    pub(crate) fn eval_unchecked(&self, args: Vec<Real>) -> Real {
        let f = self.clone();
        Real::from_node_fn(move |n| {
            let mut target = n;
            loop {
                let precs = f.oracle.required_precisions(&args, target);
                let approx: Vec<Interval> = args
                    .iter()
                    .zip(&precs)
                    .map(|(x, &p)| x.interval_at(p))
                    .collect();
                let node = f.approximator.approximate(&approx).canonicalize();
                if node.precision() >= n {
                    return node;
                }
                target += n - node.precision();
            }
        })
    }

    /// Applies a unary function using one precision for the whole of
    /// `domain` per query, instead of a per-point one.
    ///
    /// The uniform precision comes from [`FunctionCode::uniform_required_precision`];
    /// this is what lets a search engine test one grid node at a time while
    /// still speaking for every point inside it.
    pub fn evaluate_uniform(&self, arg: &Real, domain: &Node) -> Result<Real, TernError> {
        self.require_unary()?;
        let f = self.clone();
        let arg = arg.clone();
        let domain = domain.clone();
        Ok(Real::from_node_fn(move |n| {
            let mut target = n;
            loop {
                let p = f.uniform_target(&domain, target);
                let node = f
                    .approximator
                    .approximate(&[arg.interval_at(p)])
                    .canonicalize();
                if node.precision() >= n {
                    return node;
                }
                target += n - node.precision();
            }
        }))
    }

    /// One input precision sufficient for every point of `domain` to reach
    /// the target output level.
    ///
    /// The oracle is sampled at the leftmost and rightmost descendants of
    /// the domain node at the target depth; argument magnitudes peak at the
    /// endpoints, so the larger of the two answers covers the interior.
    pub fn uniform_required_precision(
        &self,
        domain: &Node,
        target: Precision,
    ) -> Result<Precision, TernError> {
        self.require_unary()?;
        Ok(self.uniform_target(domain, target))
    }

    fn uniform_target(&self, domain: &Node, target: Precision) -> Precision {
        let depth = target - domain.precision();
        let left = Real::from_node(&domain.refine_left_by(depth));
        let right = Real::from_node(&domain.refine_right_by(depth));
        let at_left = self.oracle.required_precisions(&[left], target);
        let at_right = self.oracle.required_precisions(&[right], target);
        at_left
            .into_iter()
            .chain(at_right)
            .max()
            .unwrap_or(target)
    }

    /// The divided-difference approximation of the derivative of a unary
    /// function, `x -> (f(x + epsilon) - f(x)) / epsilon`.
    pub fn derivative(&self, epsilon: &Real) -> Result<impl Fn(&Real) -> Real, TernError> {
        self.require_unary()?;
        let f = self.clone();
        let epsilon = epsilon.clone();
        Ok(move |x: &Real| {
            let shifted = f.eval_unchecked(vec![x.add(&epsilon)]);
            let base = f.eval_unchecked(vec![x.clone()]);
            shifted.sub(&base).div(&epsilon)
        })
    }

    fn require_unary(&self) -> Result<(), TernError> {
        if self.arity != 1 {
            return Err(TernError::Function(
                ErrorInfo::new("function.not_unary", "operation requires a unary function")
                    .with_context("arity", self.arity.to_string()),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for FunctionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionCode")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}
