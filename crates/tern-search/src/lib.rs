#![deny(missing_docs)]
#![doc = "Search and optimization engines over computable functions: grid search against continuous predicates, semidecidable tree search, and branch-and-bound minimization with eclipse pruning."]

mod optimize;
mod report;
mod search;

pub use optimize::{
    maximize, minimize, InitPolicy, OptimizeConfig, OptimizeOutcome, OptimizeResult,
    SelectionPolicy,
};
pub use report::RunReport;
pub use search::{search, search_semidecidable, FrontierOrdering, SearchConfig, SearchOutcome, SearchResult};
