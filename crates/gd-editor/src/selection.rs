//! Single-instance selection and the editing controls bound to it.
//!
//! Exactly one instance is editable at a time. With symmetry on, its
//! partner is marked as selected too, but edits always go through the
//! primary and reach the partner via the symmetry engine.

use gd_core::{Color, FontWeight, InstanceId, Scene};
use serde::{Serialize, Serializer};

/// Values shown in the rotation / scale / color / weight controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlValues {
    pub rotation: f32,
    /// Magnitude only; flips are shown by the mirror toggles.
    pub scale_x: f32,
    pub scale_y: f32,
    /// Reported as `#rrggbb`, the form color inputs take.
    #[serde(serialize_with = "color_as_hex")]
    pub color: Color,
    pub weight: FontWeight,
}

fn color_as_hex<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&color.to_hex())
}

impl Default for ControlValues {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            color: Color::BLACK,
            weight: FontWeight::NORMAL,
        }
    }
}

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Instance(InstanceId),
    /// Anywhere inside the control panel.
    Controls,
    /// A recent-color swatch.
    ColorSwatch,
    /// Empty zone or page background.
    Background,
}

/// Identity used to find the selection again after a snapshot swap:
/// glyph plus position at the moment of selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionKey {
    pub glyph: char,
    pub cx: f32,
    pub cy: f32,
}

/// Tracks the primary selection and which instances render as selected.
#[derive(Debug, Default)]
pub struct Selection {
    primary: Option<InstanceId>,
    /// Partner marked alongside the primary (symmetry on).
    partner: Option<InstanceId>,
    last_key: Option<SelectionKey>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primary(&self) -> Option<InstanceId> {
        self.primary
    }

    /// Whether `id` should render as selected.
    pub fn is_marked(&self, id: InstanceId) -> bool {
        self.primary == Some(id) || self.partner == Some(id)
    }

    pub fn last_key(&self) -> Option<SelectionKey> {
        self.last_key
    }

    /// Select `id`, replacing any previous selection and its partner mark.
    /// Returns the values to load into the controls, or `None` if `id` is
    /// not in the scene, leaving the current selection untouched.
    pub fn select(&mut self, scene: &Scene, id: InstanceId) -> Option<ControlValues> {
        let inst = scene.get(id)?;
        self.clear_marks();
        self.primary = Some(id);
        self.partner = scene.active_partner(id);
        self.last_key = Some(SelectionKey {
            glyph: inst.glyph,
            cx: inst.cx,
            cy: inst.cy,
        });
        Some(ControlValues {
            rotation: inst.rotation,
            scale_x: inst.scale_x.abs(),
            scale_y: inst.scale_y.abs(),
            color: inst.color,
            weight: inst.font_weight,
        })
    }

    /// Clear the selection but remember the key for undo/redo.
    pub fn clear_marks(&mut self) {
        self.primary = None;
        self.partner = None;
    }

    /// Clear the selection and forget the key.
    pub fn deselect(&mut self) {
        self.clear_marks();
        self.last_key = None;
    }

    /// Apply the background-click rule: only a pointer-down outside every
    /// instance, the control panel, and color swatches deselects.
    /// Returns `true` if the selection was cleared.
    pub fn handle_pointer_down(&mut self, target: PointerTarget) -> bool {
        match target {
            PointerTarget::Background => {
                let had = self.primary.is_some();
                self.deselect();
                had
            }
            PointerTarget::Instance(_) | PointerTarget::Controls | PointerTarget::ColorSwatch => false,
        }
    }

    /// Forget `ids` if they were selected or marked (after a delete).
    pub fn forget(&mut self, ids: &[InstanceId]) {
        if self.primary.is_some_and(|p| ids.contains(&p)) {
            self.deselect();
        } else if self.partner.is_some_and(|p| ids.contains(&p)) {
            self.partner = None;
        }
    }

    /// After a snapshot restore, try to select the instance matching the
    /// remembered key. Best effort: a move since selection changes the key,
    /// and duplicates at the same spot resolve to the first in document
    /// order. Returns the control values when something was re-selected.
    pub fn reselect_after_restore(&mut self, scene: &Scene) -> Option<ControlValues> {
        self.clear_marks();
        let key = self.last_key?;
        let id = scene
            .iter()
            .find(|inst| inst.glyph == key.glyph && inst.cx == key.cx && inst.cy == key.cy)
            .map(|inst| inst.id)?;
        self.select(scene, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gd_core::Zone;
    use pretty_assertions::assert_eq;

    fn scene() -> Scene {
        Scene::new(Zone::new(400.0, 300.0))
    }

    #[test]
    fn select_loads_controls() {
        let mut s = scene();
        let id = s.place_at('R', 10.0, 20.0);
        s.set_color(id, Color::rgb(0, 128, 255));
        let mut sel = Selection::new();
        let values = sel.select(&s, id).unwrap();
        assert_eq!(values.color.to_hex(), "#0080ff");
        assert_eq!(values.scale_x, 1.0);
        assert_eq!(sel.primary(), Some(id));
        assert!(sel.is_marked(id));
    }

    #[test]
    fn selecting_a_missing_id_keeps_the_selection() {
        let mut s = scene();
        let a = s.place_at('A', 10.0, 20.0);
        let gone = s.place_at('B', 30.0, 40.0);
        s.remove(gone);

        let mut sel = Selection::new();
        sel.select(&s, a);
        assert_eq!(sel.select(&s, gone), None);
        assert_eq!(sel.primary(), Some(a));
        assert!(sel.is_marked(a));
    }

    #[test]
    fn select_marks_partner_and_replaces_previous() {
        let mut s = scene();
        s.symmetry = true;
        let a = s.place_at('A', 10.0, 20.0);
        let partner = s.partner(a).unwrap();
        s.symmetry = false;
        let b = s.place_at('B', 50.0, 50.0);
        s.symmetry = true;

        let mut sel = Selection::new();
        sel.select(&s, a);
        assert!(sel.is_marked(partner));
        sel.select(&s, b);
        assert!(!sel.is_marked(a));
        assert!(!sel.is_marked(partner));
    }

    #[test]
    fn only_background_deselects() {
        let mut s = scene();
        let id = s.place_at('A', 1.0, 1.0);
        let mut sel = Selection::new();
        sel.select(&s, id);
        assert!(!sel.handle_pointer_down(PointerTarget::Controls));
        assert!(!sel.handle_pointer_down(PointerTarget::ColorSwatch));
        assert_eq!(sel.primary(), Some(id));
        assert!(sel.handle_pointer_down(PointerTarget::Background));
        assert_eq!(sel.primary(), None);
        assert_eq!(sel.last_key(), None);
    }

    #[test]
    fn reselect_by_key() {
        let mut s = scene();
        let id = s.place_at('A', 30.0, 40.0);
        let mut sel = Selection::new();
        sel.select(&s, id);

        let snap = s.snapshot();
        s.reset();
        s.restore(&snap);
        assert!(sel.reselect_after_restore(&s).is_some());
        assert_eq!(sel.primary(), Some(id));
    }

    #[test]
    fn reselect_fails_after_move() {
        let mut s = scene();
        let id = s.place_at('A', 30.0, 40.0);
        let mut sel = Selection::new();
        sel.select(&s, id);
        s.move_to(id, 31.0, 40.0);
        assert!(sel.reselect_after_restore(&s).is_none());
        assert_eq!(sel.primary(), None);
    }

    #[test]
    fn forgetting_deleted_primary() {
        let mut s = scene();
        let id = s.place_at('A', 30.0, 40.0);
        let mut sel = Selection::new();
        sel.select(&s, id);
        sel.forget(&[id]);
        assert_eq!(sel.primary(), None);
    }
}
