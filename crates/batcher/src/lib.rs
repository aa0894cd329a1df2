//! # Testforge Batcher
//!
//! Token-aware batch planning for extracted block records, plus the ordered
//! dispatch surface toward the external generation service.
//!
//! ```text
//! Vec<BlockRecord>
//!     │
//!     ├──> TokenEstimator (cl100k, word-count fallback)
//!     │
//!     ├──> BatchPlanner (greedy, order-preserving, hard ceiling)
//!     │
//!     └──> Dispatcher (external collaborator, strictly in order)
//! ```

mod dispatch;
mod estimator;
mod planner;

pub use dispatch::{
    dispatch_all, test_artifact_name, DispatchError, DispatchReport, Dispatcher, GeneratedText,
};
pub use estimator::TokenEstimator;
pub use planner::{Batch, BatchPlanner, PlannerConfig};
