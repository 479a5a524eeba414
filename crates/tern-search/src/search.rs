use std::collections::VecDeque;
use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tern_arith::{discretize, Interval, Node};
use tern_core::{RngHandle, TernError};
use tern_real::{FunctionCode, Predicate, Real};

use crate::report::RunReport;

/// Order in which candidates are taken off the frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrontierOrdering {
    /// Deterministic order: grid scans run left to right, the tree search
    /// expands depth first toward the left.
    InOrder,
    /// Shuffle candidates once as they are produced (the whole grid, or
    /// each expansion's children), then proceed in order.
    ShuffleOnce,
    /// Pick a uniformly random frontier element at every step. On a fixed
    /// grid this reduces to [`FrontierOrdering::ShuffleOnce`].
    ShufflePerStep,
}

/// Search engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Frontier ordering policy.
    pub ordering: FrontierOrdering,
    /// Master seed for the randomized orderings.
    pub seed: u64,
    /// Maximum number of candidates to check before giving up.
    pub budget: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            ordering: FrontierOrdering::InOrder,
            seed: 0,
            budget: None,
        }
    }
}

/// What a search run concluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchOutcome {
    /// A candidate node whose image satisfies the predicate.
    Found(Node),
    /// Every candidate was checked and none satisfied the predicate.
    Exhausted,
    /// The budget ran out with candidates still unchecked.
    OutOfBudget,
}

/// A search outcome together with its execution statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// What the run concluded.
    pub outcome: SearchOutcome,
    /// Execution statistics.
    pub report: RunReport,
}

/// Searches the compact `domain` for a point whose image under `function`
/// satisfies `predicate`.
///
/// The domain's node hull is discretized at the precision the function
/// needs uniformly over the hull to feed the predicate at its own level, so
/// checking one grid node speaks for every point inside it: when the scan
/// exhausts the grid, no point of the hull satisfies the predicate (up to
/// its tolerance).
pub fn search(
    function: &FunctionCode,
    predicate: &Predicate,
    domain: &Interval,
    config: &SearchConfig,
) -> Result<SearchResult, TernError> {
    let start = Instant::now();
    let hull = domain.canonicalize();
    let delta = function.uniform_required_precision(&hull, predicate.delta())?;
    let mut grid = discretize(domain, delta);
    let mut report = RunReport::default();
    report.observe_frontier(grid.len());
    match config.ordering {
        FrontierOrdering::InOrder => {}
        FrontierOrdering::ShuffleOnce | FrontierOrdering::ShufflePerStep => {
            let mut rng = RngHandle::from_seed(config.seed);
            grid.shuffle(rng.inner_mut());
        }
    }
    for node in grid {
        if config.budget.map_or(false, |b| report.intervals_checked >= b) {
            report.elapsed = start.elapsed();
            return Ok(SearchResult {
                outcome: SearchOutcome::OutOfBudget,
                report,
            });
        }
        report.intervals_checked += 1;
        let image = function.evaluate_uniform(&Real::from_node(&node), &hull)?;
        if predicate.holds(&image) {
            report.answers_recorded = 1;
            report.elapsed = start.elapsed();
            return Ok(SearchResult {
                outcome: SearchOutcome::Found(node),
                report,
            });
        }
    }
    report.elapsed = start.elapsed();
    Ok(SearchResult {
        outcome: SearchOutcome::Exhausted,
        report,
    })
}

/// Searches the refinement tree below `root` for a node satisfying
/// `predicate`, steered by a semi-predicate.
///
/// Every popped node is tested against the full predicate; a hit is
/// definitive. A miss always splits into the node's three children, but
/// `promising`, an approximate test allowed to report false negatives,
/// decides where they go: children of promising nodes join the front of
/// the worklist (depth-first pursuit), the rest join the back.
///
/// The refinement never bottoms out, so on an unsatisfiable predicate this
/// runs forever. That is inherent to semidecidability; bound it with
/// [`SearchConfig::budget`] (the caller's responsibility, not enforced
/// here).
pub fn search_semidecidable(
    predicate: &Predicate,
    promising: &Predicate,
    root: &Node,
    config: &SearchConfig,
) -> SearchResult {
    let start = Instant::now();
    let mut report = RunReport::default();
    let mut rng = RngHandle::from_seed(config.seed);
    let mut frontier: VecDeque<Node> = VecDeque::new();
    frontier.push_back(root.clone());
    loop {
        report.observe_frontier(frontier.len());
        if config.budget.map_or(false, |b| report.intervals_checked >= b) {
            report.elapsed = start.elapsed();
            return SearchResult {
                outcome: SearchOutcome::OutOfBudget,
                report,
            };
        }
        let index = match config.ordering {
            FrontierOrdering::ShufflePerStep if frontier.len() > 1 => {
                rng.gen_range(0..frontier.len())
            }
            _ => 0,
        };
        let node = match frontier.remove(index) {
            Some(node) => node,
            None => {
                report.elapsed = start.elapsed();
                return SearchResult {
                    outcome: SearchOutcome::Exhausted,
                    report,
                };
            }
        };
        report.intervals_checked += 1;
        let anchor = Real::from_node(&node);
        if predicate.holds(&anchor) {
            report.answers_recorded = 1;
            report.elapsed = start.elapsed();
            return SearchResult {
                outcome: SearchOutcome::Found(node),
                report,
            };
        }
        let mut children = [node.refine_left(), node.refine_mid(), node.refine_right()];
        if matches!(config.ordering, FrontierOrdering::ShuffleOnce) {
            children.shuffle(rng.inner_mut());
        }
        if promising.holds(&anchor) {
            // Depth-first pursuit: the leftmost child pops next.
            for child in children.into_iter().rev() {
                frontier.push_front(child);
            }
        } else {
            frontier.extend(children);
        }
    }
}
