//! Hit association and anomaly analysis.

mod analyzer;
mod association;
mod context;
mod judgement;
mod perfectness;
mod report;
pub mod stats;

pub use analyzer::*;
pub use association::*;
pub use context::*;
pub use judgement::*;
pub use perfectness::*;
pub use report::*;
