mod workflow;

pub use workflow::{Completion, LessonLoopService, SubmitOutcome};
