//! Fault types: the lookup table used to classify appointments.

use serde::{Deserialize, Serialize};

/// A named category of vehicle problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultType {
  pub id:          i64,
  /// Unique across all fault types.
  pub name:        String,
  pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFaultType {
  pub name:        String,
  pub description: Option<String>,
}

/// Sparse update; only `Some` fields are written. `description:
/// Some(None)` clears the stored description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaultTypePatch {
  pub name:        Option<String>,
  pub description: Option<Option<String>>,
}

impl FaultTypePatch {
  pub fn is_empty(&self) -> bool { *self == Self::default() }
}
