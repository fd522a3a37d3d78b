use serde::{Deserialize, Serialize};

/// Configuration for the scheduling module.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulingConfig {
    /// How a duplicate logical assignment (same staff, date and slot from
    /// two sources) is resolved when merging without server arbitration.
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,
}

/// Resolution order for conflicting records of the same logical
/// assignment. The remote service does not define one, so it is
/// configurable; first-write-wins is the safe default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    #[default]
    FirstWriteWins,
    LastWriteWins,
}
