#![deny(missing_docs)]
#![doc = "Dyadic rationals and binary interval codes for the tern exact-real engine."]

//! Three views of the same encoding, leaves first:
//!
//! * [`Dyadic`]: an exact binary rational `num / 2^scale` with the tree
//!   navigation operators (`refine_left`, `refine_right`, `coarsen`) that
//!   move between precision levels.
//! * [`Interval`]: a general interval code `[left, right] / 2^scale` with
//!   sound interval arithmetic and the `eclipses` domination relation used
//!   to prune search frontiers.
//! * [`Node`]: a canonical width-2 code `[k, k+2] / 2^scale`, one vertex of
//!   the infinite ternary refinement tree. Each node has three overlapping
//!   children, which is what lets the encoding represent every real without
//!   committing to a sign decision at dyadic boundaries.

mod dyadic;
mod interval;
mod node;

pub use dyadic::Dyadic;
pub use interval::Interval;
pub use node::{discretize, Node};
