//! WASM bridge for GD: exposes the editor session to the designer page.
//!
//! Compiled via `wasm-pack build --target web`. The page owns the DOM: it
//! forwards pointer, key, and control events here and redraws from
//! `instances_json()` whenever a call reports a change. Timestamps come
//! from `performance.now()` so debounced commits fire from `tick`.

mod local_store;

pub use local_store::LocalStore;

use gd_core::css::parse_color;
use gd_core::{FontWeight, InstanceId, Zone};
use gd_editor::{
    Editor, EditorConfig, Focus, LayoutStore, PersistError, PointerTarget, ShortcutAction,
    ShortcutMap,
};
use wasm_bindgen::prelude::*;

/// The WASM-facing designer controller.
#[wasm_bindgen]
pub struct GlyphDesigner {
    editor: Editor,
    store: Box<dyn LayoutStore>,
}

#[wasm_bindgen]
impl GlyphDesigner {
    /// Create a designer over a `width × height` zone, saving to
    /// `localStorage`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Self {
        console_error_panic_hook_setup();
        Self::with_store(width, height, Box::new(LocalStore))
    }

    // ─── Zone ────────────────────────────────────────────────────────────

    pub fn set_zoom(&mut self, zoom: f32) -> bool {
        self.editor.set_zoom(zoom)
    }

    /// Where the zone's top-left corner is in client coordinates.
    pub fn set_zone_origin(&mut self, left: f32, top: f32) {
        self.editor.set_zone_origin(left, top);
    }

    pub fn resize_zone(&mut self, width: f32, height: f32) -> bool {
        self.editor.resize_zone(width, height)
    }

    pub fn set_symmetry(&mut self, enabled: bool) {
        self.editor.set_symmetry(enabled);
    }

    pub fn symmetry(&self) -> bool {
        self.editor.symmetry()
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    /// Drop a palette glyph at client `(x, y)`. Returns the new instance
    /// id, or an empty string unless `glyph` is exactly one character.
    pub fn drop_glyph(&mut self, glyph: &str, x: f32, y: f32) -> String {
        let mut chars = glyph.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.editor.drop_glyph(c, x, y).as_str().to_string(),
            _ => String::new(),
        }
    }

    /// Pointer-down. `kind` is `"instance"` (with `instance_id`),
    /// `"controls"`, `"swatch"`, or anything else for the background.
    /// Returns true if the selection changed.
    pub fn handle_pointer_down(&mut self, kind: &str, instance_id: &str, x: f32, y: f32) -> bool {
        let target = match kind {
            "instance" => PointerTarget::Instance(InstanceId::intern(instance_id)),
            "controls" => PointerTarget::Controls,
            "swatch" => PointerTarget::ColorSwatch,
            _ => PointerTarget::Background,
        };
        self.editor.pointer_down(target, x, y)
    }

    /// Pointer-move. Returns true if a glyph moved.
    pub fn handle_pointer_move(&mut self, x: f32, y: f32) -> bool {
        self.editor.drag_move(x, y)
    }

    /// Pointer-up. Returns true if a checkpoint was recorded.
    pub fn handle_pointer_up(&mut self) -> bool {
        self.editor.drag_end()
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Handle a keyboard event. `focus` is `"text"`, `"slider"`, or anything
    /// else for the canvas. Returns a JSON string:
    /// `{"changed":bool, "action":"<action_name>", "notice":"<text>"}`
    #[allow(clippy::too_many_arguments)]
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
        focus: &str,
        now_ms: f64,
    ) -> String {
        let focus = match focus {
            "text" => Focus::TextInput,
            "slider" => Focus::Slider,
            _ => Focus::Canvas,
        };
        let Some(action) = ShortcutMap::resolve_focused(focus, key, ctrl, shift, alt, meta) else {
            return serde_json::json!({ "changed": false, "action": "none", "notice": "" })
                .to_string();
        };
        let (changed, notice) = match action {
            ShortcutAction::Save => (false, self.save()),
            _ => (self.editor.apply_shortcut(action, now_ms), String::new()),
        };
        serde_json::json!({
            "changed": changed,
            "action": action_to_name(action),
            "notice": notice,
        })
        .to_string()
    }

    // ─── Controls ────────────────────────────────────────────────────────

    pub fn set_rotation(&mut self, degrees: f32, now_ms: f64) -> bool {
        self.editor.set_rotation(degrees, now_ms)
    }

    pub fn set_scale_x(&mut self, scale: f32, now_ms: f64) -> bool {
        self.editor.set_scale_x(scale, now_ms)
    }

    pub fn set_scale_y(&mut self, scale: f32, now_ms: f64) -> bool {
        self.editor.set_scale_y(scale, now_ms)
    }

    /// Set the color from any CSS color the picker produces (`#rrggbb`,
    /// `rgb(...)`). Returns false for unparseable input.
    pub fn set_color(&mut self, css: &str, now_ms: f64) -> bool {
        match parse_color(css) {
            Ok(color) => self.editor.set_color(color, now_ms),
            Err(e) => {
                log::warn!("ignoring color {css:?}: {e}");
                false
            }
        }
    }

    pub fn set_weight(&mut self, weight: u16, now_ms: f64) -> bool {
        self.editor.set_weight(FontWeight::new(weight), now_ms)
    }

    pub fn flip_horizontal(&mut self, now_ms: f64) -> bool {
        self.editor.flip_horizontal(now_ms)
    }

    pub fn flip_vertical(&mut self, now_ms: f64) -> bool {
        self.editor.flip_vertical(now_ms)
    }

    // ─── Commands ────────────────────────────────────────────────────────

    pub fn delete_selected(&mut self) -> bool {
        self.editor.delete_selected()
    }

    pub fn clone_selected(&mut self) -> bool {
        self.editor.clone_selected().is_some()
    }

    pub fn mirror_clone_selected(&mut self) -> bool {
        self.editor.mirror_clone_selected().is_some()
    }

    pub fn bring_to_front(&mut self) -> bool {
        self.editor.bring_to_front()
    }

    pub fn send_to_back(&mut self) -> bool {
        self.editor.send_to_back()
    }

    pub fn reset(&mut self) -> bool {
        self.editor.reset()
    }

    pub fn deselect(&mut self) -> bool {
        self.editor.deselect()
    }

    // ─── History ─────────────────────────────────────────────────────────

    /// Fire a due debounced commit. Call from `requestAnimationFrame` or a
    /// short interval.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.editor.tick(now_ms)
    }

    pub fn undo(&mut self) -> bool {
        self.editor.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.editor.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.editor.history().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.editor.history().can_redo()
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Save to storage. Returns the notice to show the user.
    pub fn save(&mut self) -> String {
        notice_text(self.editor.save_layout(&mut *self.store))
    }

    /// Load from storage. Returns the notice to show the user.
    pub fn load(&mut self) -> String {
        notice_text(self.editor.load_layout(&*self.store))
    }

    /// The saved layout as a download. Returns JSON:
    /// `{"ok":true,"filename":"..","mimeType":"..","contents":".."}` or
    /// `{"ok":false,"notice":".."}`.
    pub fn export_layout(&self) -> String {
        match self.editor.export_layout(&*self.store) {
            Ok(file) => serde_json::json!({
                "ok": true,
                "filename": file.filename,
                "mimeType": file.mime_type,
                "contents": file.contents,
            }),
            Err(e) => serde_json::json!({ "ok": false, "notice": e.to_string() }),
        }
        .to_string()
    }

    /// Import the text of a picked file. Returns the notice to show.
    pub fn import_layout(&mut self, text: &str) -> String {
        notice_text(self.editor.import_layout(&mut *self.store, text))
    }

    // ─── State for rendering ─────────────────────────────────────────────

    /// All instances in paint order, as a JSON array.
    pub fn instances_json(&self) -> String {
        serde_json::to_string(&self.editor.view()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Current control values, as a JSON object.
    pub fn controls_json(&self) -> String {
        serde_json::to_string(&self.editor.controls()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Id of the selected instance, or an empty string.
    pub fn get_selected_id(&self) -> String {
        self.editor
            .selected()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }
}

impl GlyphDesigner {
    /// Create a designer persisting to `store`.
    pub fn with_store(width: f32, height: f32, store: Box<dyn LayoutStore>) -> Self {
        Self {
            editor: Editor::new(Zone::new(width, height), EditorConfig::default()),
            store,
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }
}

fn notice_text<N: ToString>(result: Result<N, PersistError>) -> String {
    match result {
        Ok(notice) => notice.to_string(),
        Err(e) => {
            log::warn!("{e}");
            e.to_string()
        }
    }
}

fn action_to_name(action: ShortcutAction) -> &'static str {
    match action {
        ShortcutAction::Nudge(_) => "nudge",
        ShortcutAction::NudgeFar(_) => "nudge_far",
        ShortcutAction::Undo => "undo",
        ShortcutAction::Redo => "redo",
        ShortcutAction::Delete => "delete",
        ShortcutAction::Clone => "clone",
        ShortcutAction::MirrorClone => "mirror_clone",
        ShortcutAction::FlipHorizontal => "flip_horizontal",
        ShortcutAction::FlipVertical => "flip_vertical",
        ShortcutAction::Save => "save",
        ShortcutAction::BringToFront => "bring_to_front",
        ShortcutAction::SendToBack => "send_to_back",
        ShortcutAction::Deselect => "deselect",
    }
}

/// Set up a panic hook that logs to the browser console.
fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("GD WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
