pub mod collaborators;
pub mod jobs;
pub mod monitor;
pub mod registry;
pub mod router;
pub mod step;
pub mod store;
pub mod testing;

pub use jobs::{MentionInput, Pipeline};
pub use registry::{JobKind, JobRecord, JobRegistry, JobStatus, JobStep, StepStatus};
pub use step::StepOutcome;
pub use store::MentionStore;
