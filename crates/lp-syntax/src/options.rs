//! Parser options.

use serde::{Deserialize, Serialize};

/// Knobs for [`parse_with`](crate::parse_with) and re-parsing.
///
/// Deserialises from a partial table: missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Reuse the old tree on edits. When false every edit re-parses fully.
    pub incremental: bool,
    /// Keep at most this many errors (the first ones by position).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_errors: Option<usize>,
    /// Re-parse from scratch once discarded arena entries exceed this share
    /// of the arena, in percent.
    pub max_dead_percent: u8,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            incremental: true,
            max_errors: None,
            max_dead_percent: 50,
        }
    }
}
