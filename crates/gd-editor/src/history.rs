//! Undo/redo over full-scene snapshots.
//!
//! The manager keeps a **baseline**: the last committed snapshot. A commit
//! that differs from the baseline pushes the old baseline onto the undo
//! stack and becomes the new baseline, so undo always steps back to the
//! previous committed state. Identical commits are dropped.
//!
//! Continuous edits (slider drags, key repeats) go through a pending
//! commit: each event pushes the deadline out by the debounce window and
//! the commit fires once input has been quiet for that long.

use gd_core::{Scene, Snapshot};

/// Default undo depth.
pub const DEFAULT_DEPTH: usize = 50;

/// Default quiescence window for debounced commits, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: f64 = 300.0;

/// Linear undo/redo history with a debounced commit timer.
pub struct History {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    /// The most recent committed state.
    baseline: Snapshot,
    /// Maximum undo depth.
    max_depth: usize,
    debounce_ms: f64,
    /// Deadline (caller clock, ms) of the pending debounced commit.
    pending_at: Option<f64>,
}

impl History {
    /// Start a history whose baseline is `scene`'s current state.
    pub fn new(scene: &Scene, max_depth: usize, debounce_ms: f64) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth.min(64)),
            redo_stack: Vec::new(),
            baseline: scene.snapshot(),
            max_depth: max_depth.max(1),
            debounce_ms,
            pending_at: None,
        }
    }

    /// Record `scene` as a checkpoint. Returns `false` when it equals the
    /// last checkpoint (nothing pushed).
    pub fn commit(&mut self, scene: &Scene) -> bool {
        self.pending_at = None;
        let snapshot = scene.snapshot();
        if snapshot == self.baseline {
            return false;
        }
        let previous = std::mem::replace(&mut self.baseline, snapshot);
        self.undo_stack.push(previous);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
        log::debug!(
            "commit: {} undo / {} redo",
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        true
    }

    /// Step back one checkpoint. Returns `false` if there is nothing to undo.
    pub fn undo(&mut self, scene: &mut Scene) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            return false;
        };
        self.pending_at = None;
        self.redo_stack.push(scene.snapshot());
        scene.restore(&previous);
        self.baseline = previous;
        log::debug!("undo: {} left", self.undo_stack.len());
        true
    }

    /// Step forward one checkpoint. Returns `false` if there is nothing to redo.
    pub fn redo(&mut self, scene: &mut Scene) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        self.pending_at = None;
        self.undo_stack.push(scene.snapshot());
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
        scene.restore(&next);
        self.baseline = next;
        log::debug!("redo: {} left", self.redo_stack.len());
        true
    }

    // ─── Debounce ────────────────────────────────────────────────────────

    /// (Re)arm the pending commit to fire `debounce_ms` after `now_ms`.
    pub fn schedule(&mut self, now_ms: f64) {
        self.pending_at = Some(now_ms + self.debounce_ms);
    }

    /// Drop the pending commit without firing it.
    pub fn cancel(&mut self) {
        self.pending_at = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending_at.is_some()
    }

    /// Fire the pending commit if its deadline has passed.
    /// Returns `true` if a snapshot was pushed.
    pub fn poll(&mut self, now_ms: f64, scene: &Scene) -> bool {
        match self.pending_at {
            Some(due) if now_ms >= due => self.commit(scene),
            _ => false,
        }
    }

    /// Fire the pending commit immediately, if any.
    pub fn flush(&mut self, scene: &Scene) -> bool {
        if self.pending_at.is_some() {
            self.commit(scene)
        } else {
            false
        }
    }

    // ─── Inspection ──────────────────────────────────────────────────────

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// The last committed snapshot.
    pub fn baseline(&self) -> &Snapshot {
        &self.baseline
    }

    /// Forget all history; `scene` becomes the new baseline.
    pub fn clear(&mut self, scene: &Scene) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.pending_at = None;
        self.baseline = scene.snapshot();
    }
}
