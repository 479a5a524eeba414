#![deny(missing_docs)]
#![doc = "Shared types for the tern exact-real engine: the canonical error type, the deterministic RNG handle, and the precision index."]

pub mod errors;
pub mod rng;

pub use errors::{ErrorInfo, TernError};
pub use rng::{derive_substream_seed, RngHandle};

/// Precision index into the ternary refinement tree.
///
/// A value `p` selects the level whose canonical intervals have width
/// `2 / 2^p`. Negative levels are legal and denote intervals wider than 2.
pub type Precision = i64;
