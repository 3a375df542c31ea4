use serde::Serialize;
use strum::{Display, EnumIter};

/// Hook points a plugin can participate in, in pipeline order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Display,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LifecycleStage {
    VerifyConditions,
    AnalyzeCommits,
    VerifyRelease,
    GenerateNotes,
    Prepare,
    Publish,
    Success,
    Fail,
}

impl LifecycleStage {
    /// Name used for environment variables and configuration keys.
    pub fn env_name(&self) -> String {
        self.to_string().to_uppercase()
    }
}
