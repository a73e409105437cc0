// Chunk: docs/chunks/incremental_lexing - Highlighter tuning knobs

//! Highlighter configuration.
//!
//! Editors load this from their settings file; every field has a default so a
//! partial (or empty) table is valid.

use serde::{Deserialize, Serialize};

/// Number of intervals to step back from the edited one before looking for
/// an `INITIAL` checkpoint.
pub const DEFAULT_RESYNC_MARGIN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlighterConfig {
    /// Intervals to step back before searching for a resync point. Larger
    /// values relex more on each edit; lexers whose tokens look ahead past
    /// their own end may need more than the default.
    pub resync_margin: usize,
}

impl Default for HighlighterConfig {
    fn default() -> Self {
        Self {
            resync_margin: DEFAULT_RESYNC_MARGIN,
        }
    }
}
