pub mod machine;
pub mod stages;

pub use machine::{ConversionWorkflow, SubmitInput, WorkflowEvent, WorkflowState};
pub use stages::{FixedDelayPacer, ImmediatePacer, StagePacer};
