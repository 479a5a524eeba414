#![deny(missing_docs)]
#![doc = "Computable reals, computable functions and continuous predicates over ternary interval codes."]

mod function;
mod predicate;
mod real;

pub use function::{Approximator, ContinuityOracle, FunctionCode};
pub use predicate::Predicate;
pub use real::Real;
