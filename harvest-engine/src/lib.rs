pub mod pipeline;
pub mod subsystems;

pub use pipeline::{run_pipeline, RecoveryReport, RecoveryResult};
