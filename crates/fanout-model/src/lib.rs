mod domain;
pub use domain::{Env, Flag, KeyValue, KeyValues, Target, TargetLabel, TargetSet};
pub use domain::{PALETTE, RESET};

mod error;
pub use error::{ModelError, ModelResult};

mod outcome;
pub use outcome::{FailureCause, Outcome, TaskReport, TaskStatus};

mod summary;
pub use summary::RunSummary;

mod document;
pub use document::ConfigDocument;
