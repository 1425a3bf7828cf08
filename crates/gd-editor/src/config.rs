//! Editor configuration.

use crate::history::{DEFAULT_DEBOUNCE_MS, DEFAULT_DEPTH};
use crate::storage::{DEFAULT_EXPORT_FILENAME, DEFAULT_STORAGE_KEY};
use gd_core::scene::{CLONE_OFFSET, MIRROR_CLONE_OFFSET};

/// Tunables for an `Editor` session.
///
/// Defaults reproduce the stock designer: 50 undo steps, a 300 ms commit
/// debounce, clones 20 units down-right, mirror clones 100 units right.
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Maximum undo depth. Oldest checkpoints are evicted first.
    pub history_depth: usize,

    /// Quiet period before a burst of transform edits becomes one undo step.
    pub commit_debounce_ms: f64,

    /// Zone-space offset (both axes) for `clone_selected`.
    pub clone_offset: f32,

    /// Horizontal zone-space offset for `mirror_clone_selected`.
    pub mirror_clone_offset: f32,

    /// Arrow-key step in zone units. Shift multiplies by 10.
    pub nudge_step: f32,

    /// Storage key for the saved layout.
    pub storage_key: String,

    /// File name offered on export.
    pub export_filename: String,

    /// Parse imported files before writing them to storage. When `false`
    /// the raw file text is stored first and then loaded, so a malformed
    /// file replaces the previously saved layout even though loading it
    /// fails. Default: **false**.
    pub validate_imports: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: DEFAULT_DEPTH,
            commit_debounce_ms: DEFAULT_DEBOUNCE_MS,
            clone_offset: CLONE_OFFSET,
            mirror_clone_offset: MIRROR_CLONE_OFFSET,
            nudge_step: 1.0,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            export_filename: DEFAULT_EXPORT_FILENAME.to_string(),
            validate_imports: false,
        }
    }
}
