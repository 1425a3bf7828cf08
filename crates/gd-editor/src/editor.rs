//! The editor session: one explicit state object for the whole designer.
//!
//! `Editor` owns the scene, the selection and the control values bound to
//! it, the undo history, and any in-flight drag. Hosts forward input
//! events to it and read back the scene; nothing is global. Time is passed
//! in by the caller (`now_ms`) so debounced commits need no timers.

use crate::config::EditorConfig;
use crate::drag::DragGesture;
use crate::history::History;
use crate::selection::{ControlValues, PointerTarget, Selection};
use crate::shortcuts::{Focus, ShortcutAction, ShortcutMap};
use crate::storage::{ExportFile, LayoutStore, Notice, PersistError};
use gd_core::codec;
use gd_core::{Color, FontWeight, InstanceId, Scene, TransformInput, Zone};

/// Shift+arrow moves this many steps at once.
const FAR_NUDGE: f32 = 10.0;

/// Application state of one designer session.
pub struct Editor {
    scene: Scene,
    selection: Selection,
    /// Values shown in the editing controls. Kept even with no selection,
    /// like a slider that keeps its position.
    controls: ControlValues,
    history: History,
    drag: Option<DragGesture>,
    config: EditorConfig,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Zone::default(), EditorConfig::default())
    }
}

impl Editor {
    /// Start an empty session over `zone`.
    pub fn new(zone: Zone, config: EditorConfig) -> Self {
        let scene = Scene::new(zone);
        let history = History::new(&scene, config.history_depth, config.commit_debounce_ms);
        Self {
            scene,
            selection: Selection::new(),
            controls: ControlValues::default(),
            history,
            drag: None,
            config,
        }
    }

    // ─── Inspection ──────────────────────────────────────────────────────

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected(&self) -> Option<InstanceId> {
        self.selection.primary()
    }

    pub fn controls(&self) -> ControlValues {
        self.controls
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    // ─── Zone & symmetry ─────────────────────────────────────────────────

    pub fn symmetry(&self) -> bool {
        self.scene.symmetry
    }

    /// Turn symmetry on or off. Affects future placements and which edits
    /// propagate; existing links are kept either way.
    pub fn set_symmetry(&mut self, enabled: bool) {
        self.scene.symmetry = enabled;
        // Partner marks follow the flag.
        if let Some(id) = self.selection.primary() {
            self.select(id);
        }
    }

    /// Set the zoom factor used to convert viewport input. Ignores
    /// non-finite or non-positive values.
    pub fn set_zoom(&mut self, zoom: f32) -> bool {
        if !zoom.is_finite() || zoom <= 0.0 {
            return false;
        }
        self.scene.zone.zoom = zoom;
        true
    }

    /// Record where the zone's top-left corner sits in the viewport.
    pub fn set_zone_origin(&mut self, left: f32, top: f32) {
        self.scene.zone.left = left;
        self.scene.zone.top = top;
    }

    /// Change the zone size. Stored positions are kept as they are; only
    /// later moves and reflections see the new bounds.
    pub fn resize_zone(&mut self, width: f32, height: f32) -> bool {
        if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
            return false;
        }
        self.scene.zone.width = width;
        self.scene.zone.height = height;
        true
    }

    // ─── Pointer input ───────────────────────────────────────────────────

    /// Drop `glyph` from the palette at viewport `(x, y)`. The new glyph is
    /// selected and the drop is committed.
    pub fn drop_glyph(&mut self, glyph: char, x: f32, y: f32) -> InstanceId {
        self.history.flush(&self.scene);
        let id = self.scene.place(glyph, x, y);
        self.select(id);
        self.history.commit(&self.scene);
        log::debug!("dropped {glyph:?} as {id}");
        id
    }

    /// Pointer-down at viewport `(x, y)` on `target`. Landing on an
    /// instance selects it and starts a drag; landing on the background
    /// deselects. Returns `true` if the selection changed.
    pub fn pointer_down(&mut self, target: PointerTarget, x: f32, y: f32) -> bool {
        self.drag = None;
        match target {
            PointerTarget::Instance(id) => {
                let changed = self.selection.primary() != Some(id);
                if self.select(id).is_none() {
                    return false;
                }
                self.history.flush(&self.scene);
                self.drag = DragGesture::begin(&self.scene, id, x, y);
                changed
            }
            _ => self.selection.handle_pointer_down(target),
        }
    }

    /// Pointer moved to viewport `(x, y)` during a drag.
    pub fn drag_move(&mut self, x: f32, y: f32) -> bool {
        match self.drag.as_mut() {
            Some(drag) => !drag.update(&mut self.scene, x, y).is_empty(),
            None => false,
        }
    }

    /// Pointer released. Commits when a drag was in progress.
    pub fn drag_end(&mut self) -> bool {
        match self.drag.take() {
            Some(drag) => {
                log::trace!("drag of {} ended (moved: {})", drag.id, drag.moved());
                self.history.commit(&self.scene)
            }
            None => false,
        }
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Handle a key event. Returns the action that fired, if any.
    ///
    /// `Save` is only resolved here: persisting needs the host's store, so
    /// the caller follows up with `save_layout`.
    #[allow(clippy::too_many_arguments)]
    pub fn key_down(
        &mut self,
        focus: Focus,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
        now_ms: f64,
    ) -> Option<ShortcutAction> {
        let action = ShortcutMap::resolve_focused(focus, key, ctrl, shift, alt, meta)?;
        self.apply_shortcut(action, now_ms);
        Some(action)
    }

    /// Perform `action`. Returns `true` if the scene or selection changed.
    pub fn apply_shortcut(&mut self, action: ShortcutAction, now_ms: f64) -> bool {
        match action {
            ShortcutAction::Nudge(direction) => {
                let (dx, dy) = direction.delta();
                self.nudge(dx, dy, now_ms)
            }
            ShortcutAction::NudgeFar(direction) => {
                let (dx, dy) = direction.delta();
                self.nudge(dx * FAR_NUDGE, dy * FAR_NUDGE, now_ms)
            }
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Delete => self.delete_selected(),
            ShortcutAction::Clone => self.clone_selected().is_some(),
            ShortcutAction::MirrorClone => self.mirror_clone_selected().is_some(),
            ShortcutAction::FlipHorizontal => self.flip_horizontal(now_ms),
            ShortcutAction::FlipVertical => self.flip_vertical(now_ms),
            ShortcutAction::BringToFront => self.bring_to_front(),
            ShortcutAction::SendToBack => self.send_to_back(),
            ShortcutAction::Deselect => self.deselect(),
            ShortcutAction::Save => false,
        }
    }

    /// Move the selection by `(dx, dy)` nudge steps.
    pub fn nudge(&mut self, dx: f32, dy: f32, now_ms: f64) -> bool {
        let Some(id) = self.selection.primary() else {
            return false;
        };
        let step = self.config.nudge_step;
        let moved = self.scene.nudge(id, dx * step, dy * step);
        if moved.is_empty() {
            return false;
        }
        self.history.schedule(now_ms);
        true
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Select `id` and load its values into the controls.
    pub fn select(&mut self, id: InstanceId) -> Option<ControlValues> {
        let values = self.selection.select(&self.scene, id)?;
        self.controls = values;
        Some(values)
    }

    /// Clear the selection. Returns `true` if something was selected.
    pub fn deselect(&mut self) -> bool {
        let had = self.selection.primary().is_some();
        self.selection.deselect();
        had
    }

    // ─── Controls (debounced commits) ────────────────────────────────────

    pub fn set_rotation(&mut self, degrees: f32, now_ms: f64) -> bool {
        self.controls.rotation = degrees;
        self.apply_controls(now_ms)
    }

    pub fn set_scale_x(&mut self, scale: f32, now_ms: f64) -> bool {
        self.controls.scale_x = scale;
        self.apply_controls(now_ms)
    }

    pub fn set_scale_y(&mut self, scale: f32, now_ms: f64) -> bool {
        self.controls.scale_y = scale;
        self.apply_controls(now_ms)
    }

    /// Set all three transform controls at once.
    pub fn set_transform(&mut self, input: TransformInput, now_ms: f64) -> bool {
        self.controls.rotation = input.rotation;
        self.controls.scale_x = input.scale_x;
        self.controls.scale_y = input.scale_y;
        self.apply_controls(now_ms)
    }

    fn apply_controls(&mut self, now_ms: f64) -> bool {
        let Some(id) = self.selection.primary() else {
            return false;
        };
        let input = TransformInput {
            rotation: self.controls.rotation,
            scale_x: self.controls.scale_x,
            scale_y: self.controls.scale_y,
        };
        if self.scene.set_transform(id, input).is_empty() {
            return false;
        }
        self.history.schedule(now_ms);
        true
    }

    pub fn set_color(&mut self, color: Color, now_ms: f64) -> bool {
        self.controls.color = color;
        let Some(id) = self.selection.primary() else {
            return false;
        };
        if self.scene.set_color(id, color).is_empty() {
            return false;
        }
        self.history.schedule(now_ms);
        true
    }

    pub fn set_weight(&mut self, weight: FontWeight, now_ms: f64) -> bool {
        self.controls.weight = weight;
        let Some(id) = self.selection.primary() else {
            return false;
        };
        if self.scene.set_weight(id, weight).is_empty() {
            return false;
        }
        self.history.schedule(now_ms);
        true
    }

    pub fn flip_horizontal(&mut self, now_ms: f64) -> bool {
        self.flip(now_ms, Scene::toggle_mirror_x)
    }

    pub fn flip_vertical(&mut self, now_ms: f64) -> bool {
        self.flip(now_ms, Scene::toggle_mirror_y)
    }

    fn flip(
        &mut self,
        now_ms: f64,
        toggle: fn(&mut Scene, InstanceId) -> gd_core::Affected,
    ) -> bool {
        let Some(id) = self.selection.primary() else {
            return false;
        };
        if toggle(&mut self.scene, id).is_empty() {
            return false;
        }
        self.select(id);
        self.history.schedule(now_ms);
        true
    }

    // ─── Structure (immediate commits) ───────────────────────────────────

    /// Delete the selection (and, with symmetry on, its partner).
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selection.primary() else {
            return false;
        };
        self.history.flush(&self.scene);
        let removed = self.scene.remove(id);
        if removed.is_empty() {
            return false;
        }
        self.selection.forget(&removed);
        self.history.commit(&self.scene);
        log::debug!("deleted {removed:?}");
        true
    }

    /// Duplicate the selection down-right and select the copy.
    pub fn clone_selected(&mut self) -> Option<InstanceId> {
        let id = self.selection.primary()?;
        self.history.flush(&self.scene);
        let offset = self.config.clone_offset;
        let copy = self.scene.clone_with_offset(id, offset, offset)?;
        self.select(copy);
        self.history.commit(&self.scene);
        log::debug!("cloned {id} as {copy}");
        Some(copy)
    }

    /// Mirror-duplicate the selection to the right and select the copy.
    pub fn mirror_clone_selected(&mut self) -> Option<InstanceId> {
        let id = self.selection.primary()?;
        self.history.flush(&self.scene);
        let copy = self
            .scene
            .mirror_clone_with_offset(id, self.config.mirror_clone_offset)?;
        self.select(copy);
        self.history.commit(&self.scene);
        log::debug!("mirror-cloned {id} as {copy}");
        Some(copy)
    }

    pub fn bring_to_front(&mut self) -> bool {
        self.reorder(Scene::bring_to_front)
    }

    pub fn send_to_back(&mut self) -> bool {
        self.reorder(Scene::send_to_back)
    }

    fn reorder(&mut self, op: fn(&mut Scene, InstanceId) -> gd_core::Affected) -> bool {
        let Some(id) = self.selection.primary() else {
            return false;
        };
        self.history.flush(&self.scene);
        if op(&mut self.scene, id).is_empty() {
            return false;
        }
        self.history.commit(&self.scene);
        true
    }

    /// Remove every glyph. Undoable.
    pub fn reset(&mut self) -> bool {
        self.history.flush(&self.scene);
        self.drag = None;
        self.selection.deselect();
        if self.scene.is_empty() {
            return false;
        }
        self.scene.reset();
        self.history.commit(&self.scene);
        log::debug!("scene reset");
        true
    }

    // ─── History ─────────────────────────────────────────────────────────

    /// Advance the clock: fires the debounced commit once input has been
    /// quiet long enough. Returns `true` if a checkpoint was recorded.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.history.poll(now_ms, &self.scene)
    }

    pub fn undo(&mut self) -> bool {
        self.history.flush(&self.scene);
        self.drag = None;
        if !self.history.undo(&mut self.scene) {
            return false;
        }
        self.after_restore();
        true
    }

    pub fn redo(&mut self) -> bool {
        self.history.flush(&self.scene);
        self.drag = None;
        if !self.history.redo(&mut self.scene) {
            return false;
        }
        self.after_restore();
        true
    }

    fn after_restore(&mut self) {
        if let Some(values) = self.selection.reselect_after_restore(&self.scene) {
            self.controls = values;
        }
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Write the current layout to `store`.
    pub fn save_layout(&mut self, store: &mut dyn LayoutStore) -> Result<Notice, PersistError> {
        self.history.flush(&self.scene);
        let json = codec::scene_to_json(&self.scene).map_err(PersistError::Malformed)?;
        store
            .set(&self.config.storage_key, &json)
            .map_err(PersistError::Storage)?;
        log::debug!("saved {} characters under {:?}", self.scene.len(), self.config.storage_key);
        Ok(Notice::Saved)
    }

    /// Replace the scene with the layout saved in `store`. The symmetry
    /// flag comes from the document; loaded glyphs are never linked. The
    /// scene is untouched when nothing is saved or the document is bad.
    pub fn load_layout(&mut self, store: &dyn LayoutStore) -> Result<Notice, PersistError> {
        let json = store
            .get(&self.config.storage_key)
            .map_err(PersistError::Storage)?
            .ok_or(PersistError::NothingSaved)?;
        let doc = codec::from_json(&json).map_err(PersistError::Malformed)?;

        self.history.flush(&self.scene);
        self.drag = None;
        self.selection.deselect();
        self.scene = codec::deserialize(&doc, self.scene.zone);
        self.history.commit(&self.scene);
        log::debug!("loaded {} characters", self.scene.len());
        Ok(Notice::Loaded)
    }

    /// The stored layout, packaged as a download. Exports what was last
    /// saved, not unsaved edits.
    pub fn export_layout(&self, store: &dyn LayoutStore) -> Result<ExportFile, PersistError> {
        let contents = store
            .get(&self.config.storage_key)
            .map_err(PersistError::Storage)?
            .ok_or(PersistError::NothingToExport)?;
        Ok(ExportFile {
            filename: self.config.export_filename.clone(),
            mime_type: "application/json",
            contents,
        })
    }

    /// Store the text of an imported file and load it.
    ///
    /// Unless `validate_imports` is set, the text is written before it is
    /// parsed, so a malformed file still replaces the saved layout.
    pub fn import_layout(
        &mut self,
        store: &mut dyn LayoutStore,
        text: &str,
    ) -> Result<Notice, PersistError> {
        if self.config.validate_imports {
            codec::from_json(text).map_err(PersistError::Malformed)?;
        }
        store
            .set(&self.config.storage_key, text)
            .map_err(PersistError::Storage)?;
        log::debug!("imported {} bytes", text.len());
        self.load_layout(&*store)
    }
}
