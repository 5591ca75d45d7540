//! NMR-STAR dictionary versions.

use crate::error::StarError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported NMR-STAR dictionary version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DictVersion {
    /// The legacy v2.1 dictionary (flat tag names, no category prefix).
    #[serde(rename = "2.1")]
    V2_1,
    /// The current v3.1 dictionary (`_Category.Tag` names).
    #[default]
    #[serde(rename = "3.1")]
    V3_1,
}

impl DictVersion {
    /// All supported versions.
    pub const ALL: [DictVersion; 2] = [DictVersion::V2_1, DictVersion::V3_1];

    /// The version string, e.g. `"3.1"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DictVersion::V2_1 => "2.1",
            DictVersion::V3_1 => "3.1",
        }
    }
}

impl fmt::Display for DictVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DictVersion {
    type Err = StarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "2.1" => Ok(DictVersion::V2_1),
            "3.1" => Ok(DictVersion::V3_1),
            other => Err(StarError::Dictionary(format!(
                "unsupported NMR-STAR version '{other}', expected one of 2.1, 3.1"
            ))),
        }
    }
}
