use std::collections::HashSet;
use std::time::Instant;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tern_arith::{discretize, Interval, Node};
use tern_core::{ErrorInfo, Precision, RngHandle, TernError};
use tern_real::FunctionCode;

use crate::report::RunReport;

/// How the next candidate is chosen from the frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionPolicy {
    /// Oldest candidate first (breadth-first refinement).
    FirstIn,
    /// Uniformly random candidate, driven by the configured seed.
    UniformRandom,
    /// The candidate with the widest image enclosure. A wide image means
    /// the function is least pinned down there, so refining it sharpens the
    /// pruning bound fastest.
    WidestImage,
}

/// How the initial frontier is formed from the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitPolicy {
    /// Start from the domain's node hull alone.
    Root,
    /// Start from the grid of descendants this many levels below the hull.
    Grid(Precision),
}

/// Optimization engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizeConfig {
    /// Candidate selection policy.
    pub selection: SelectionPolicy,
    /// Initial frontier policy.
    pub init: InitPolicy,
    /// Master seed for the randomized selection.
    pub seed: u64,
    /// Maximum number of candidate images to compute before giving up.
    pub budget: Option<u64>,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            selection: SelectionPolicy::FirstIn,
            init: InitPolicy::Root,
            seed: 0,
            budget: None,
        }
    }
}

/// What an optimization run concluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizeOutcome {
    /// A candidate reached a refinement target.
    Found {
        /// The candidate's input node; its left-endpoint real is the
        /// extremum witness.
        point: Node,
        /// The canonical node of the candidate's image enclosure.
        image: Node,
    },
    /// The budget ran out; `best` is the earliest surviving terminal
    /// candidate, if any was recorded before the cutoff.
    OutOfBudget {
        /// Earliest surviving `(point, image)` pair, if any.
        best: Option<(Node, Node)>,
    },
    /// The frontier emptied without any terminal candidate surviving. The
    /// refinement tree below the hull is finite, so this cannot normally
    /// happen; it is an explicit outcome rather than a panic.
    Exhausted,
}

/// An optimization outcome together with its execution statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizeResult {
    /// What the run concluded.
    pub outcome: OptimizeOutcome,
    /// Execution statistics.
    pub report: RunReport,
}

/// Minimizes a unary `function` over the compact `domain` by branch and
/// bound on the refinement tree, to output accuracy `epsilon`.
///
/// The input refinement depth `delta` is derived from the function's
/// uniform continuity oracle over the domain's node hull at `epsilon`, so
/// a candidate is terminal once its input node reaches `delta` or its image
/// enclosure canonicalizes at `epsilon`, whichever comes first. A hull
/// that is already terminal returns immediately.
///
/// Non-terminal candidates split into their two half children. Eclipse
/// pruning does the bounding: a candidate whose image enclosure lies
/// entirely at or above another's cannot contain the minimum and is
/// dropped, from the frontier and from the recorded answers alike. Earlier
/// candidates win mutual eclipses, so of two candidates with identical
/// images exactly one survives.
///
/// When the frontier empties, the earliest recorded answer is the result;
/// its image enclosure contains the global minimum of the hull.
pub fn minimize(
    function: &FunctionCode,
    domain: &Interval,
    epsilon: Precision,
    config: &OptimizeConfig,
) -> Result<OptimizeResult, TernError> {
    if function.arity() != 1 {
        return Err(TernError::Optimize(
            ErrorInfo::new("optimize.not_unary", "optimization requires a unary function")
                .with_context("arity", function.arity().to_string()),
        ));
    }
    let start = Instant::now();
    let mut rng = RngHandle::from_seed(config.seed);
    let mut report = RunReport::default();
    let hull = domain.canonicalize();
    let delta = function.uniform_required_precision(&hull, epsilon)?;
    let terminal = |node: &Node, image: &Interval| {
        node.precision() >= delta || image.canonicalize().precision() >= epsilon
    };

    let hull_image = function.transfer(&[hull.as_interval()])?;
    report.intervals_checked += 1;
    if terminal(&hull, &hull_image) {
        report.answers_recorded = 1;
        report.elapsed = start.elapsed();
        return Ok(OptimizeResult {
            outcome: OptimizeOutcome::Found {
                point: hull,
                image: hull_image.canonicalize(),
            },
            report,
        });
    }

    let initial = match config.init {
        InitPolicy::Root => vec![(hull.clone(), hull_image)],
        InitPolicy::Grid(depth) => {
            let mut seeded = Vec::new();
            for node in discretize(domain, hull.precision() + depth.max(0)) {
                let image = function.transfer(&[node.as_interval()])?;
                report.intervals_checked += 1;
                seeded.push((node, image));
            }
            seeded
        }
    };
    let mut history: HashSet<Node> = HashSet::new();
    let mut frontier: Vec<(Node, Interval)> = Vec::with_capacity(initial.len());
    let mut answers: Vec<(Node, Interval)> = Vec::new();
    for (node, image) in initial {
        history.insert(node.clone());
        if terminal(&node, &image) {
            answers.push((node, image));
        } else {
            frontier.push((node, image));
        }
    }

    loop {
        report.observe_frontier(frontier.len());
        if frontier.is_empty() {
            report.answers_recorded = answers.len() as u64;
            report.elapsed = start.elapsed();
            let outcome = match answers.into_iter().next() {
                Some((node, image)) => OptimizeOutcome::Found {
                    point: node,
                    image: image.canonicalize(),
                },
                None => OptimizeOutcome::Exhausted,
            };
            return Ok(OptimizeResult { outcome, report });
        }
        if config.budget.map_or(false, |b| report.intervals_checked >= b) {
            report.answers_recorded = answers.len() as u64;
            report.elapsed = start.elapsed();
            let best = answers
                .into_iter()
                .next()
                .map(|(node, image)| (node, image.canonicalize()));
            return Ok(OptimizeResult {
                outcome: OptimizeOutcome::OutOfBudget { best },
                report,
            });
        }

        let index = match config.selection {
            SelectionPolicy::FirstIn => 0,
            SelectionPolicy::UniformRandom => rng.gen_range(0..frontier.len()),
            SelectionPolicy::WidestImage => widest(&frontier),
        };
        let (node, _image) = frontier.remove(index);

        // Split, guard the siblings against each other, then let the
        // survivors prune the rest of the pool. Earlier entries win mutual
        // eclipses throughout.
        let mut survivors: Vec<(Node, Interval)> = Vec::new();
        for child in [node.refine_left(), node.refine_right()] {
            if !history.insert(child.clone()) {
                continue;
            }
            let child_image = function.transfer(&[child.as_interval()])?;
            report.intervals_checked += 1;
            if survivors.iter().any(|(_, kept)| kept.eclipses(&child_image)) {
                continue;
            }
            survivors.retain(|(_, kept)| !child_image.eclipses(kept));
            survivors.push((child, child_image));
        }
        for (child, child_image) in survivors {
            let dominated = frontier
                .iter()
                .chain(answers.iter())
                .any(|(_, kept)| kept.eclipses(&child_image));
            if dominated {
                continue;
            }
            frontier.retain(|(_, kept)| !child_image.eclipses(kept));
            answers.retain(|(_, kept)| !child_image.eclipses(kept));
            if terminal(&child, &child_image) {
                answers.push((child, child_image));
            } else {
                frontier.push((child, child_image));
            }
        }
    }
}

/// Maximizes a unary `function` over the compact `domain` by minimizing its
/// negation; recorded images are negated back to the original function.
pub fn maximize(
    function: &FunctionCode,
    domain: &Interval,
    epsilon: Precision,
    config: &OptimizeConfig,
) -> Result<OptimizeResult, TernError> {
    let negated = FunctionCode::compose(FunctionCode::negate(), vec![function.clone()])?;
    let result = minimize(&negated, domain, epsilon, config)?;
    let outcome = match result.outcome {
        OptimizeOutcome::Found { point, image } => OptimizeOutcome::Found {
            point,
            image: image.as_interval().neg().canonicalize(),
        },
        OptimizeOutcome::OutOfBudget { best } => OptimizeOutcome::OutOfBudget {
            best: best.map(|(node, image)| (node, image.as_interval().neg().canonicalize())),
        },
        OptimizeOutcome::Exhausted => OptimizeOutcome::Exhausted,
    };
    Ok(OptimizeResult {
        outcome,
        report: result.report,
    })
}

fn widest(frontier: &[(Node, Interval)]) -> usize {
    let mut index = 0;
    for (i, (_, image)) in frontier.iter().enumerate().skip(1) {
        if image.wider_than(&frontier[index].1) {
            index = i;
        }
    }
    index
}
