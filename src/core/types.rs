//! Shared value types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a concrete operator scans its matrices.
///
/// The chaining core is always sequential; this marker only selects the
/// strategy inside operators that support row-parallel processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionModel {
    /// Split work across the rayon thread pool.
    Parallel,
    /// Process on the calling thread.
    #[default]
    Sequential,
}

impl ExecutionModel {
    /// Get the display name for this model.
    pub fn display_name(&self) -> &'static str {
        match self {
            ExecutionModel::Parallel => "parallel",
            ExecutionModel::Sequential => "sequential",
        }
    }

    /// Whether work should be split across threads.
    pub fn is_parallel(&self) -> bool {
        matches!(self, ExecutionModel::Parallel)
    }
}

impl fmt::Display for ExecutionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ExecutionModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "parallel" | "par" => Ok(ExecutionModel::Parallel),
            "sequential" | "seq" => Ok(ExecutionModel::Sequential),
            other => Err(format!("unknown execution model '{}'", other)),
        }
    }
}
