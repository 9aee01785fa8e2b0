//! Per-stage state containers and selection policy.

pub mod leaf;
pub mod selection;
pub mod state;

pub use leaf::LeafState;
pub use selection::DefaultSelection;
pub use state::{SelectOutcome, StageState, StageStatus};
