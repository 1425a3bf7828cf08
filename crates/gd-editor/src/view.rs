//! Flat, render-ready description of the scene for hosts.
//!
//! Hosts draw glyphs as absolutely positioned text: each view carries the
//! zone-space center, the CSS transform, and the resolved styles, in paint
//! order.

use crate::editor::Editor;
use gd_core::{Instance, compute_transform};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceView {
    pub id: String,
    pub glyph: char,
    pub cx: f32,
    pub cy: f32,
    /// CSS `transform`, rotate then scale.
    pub transform: String,
    /// CSS `color`.
    pub color: String,
    pub font_weight: u16,
    pub font_size: f32,
    pub z_index: i32,
    pub selected: bool,
}

impl InstanceView {
    fn new(inst: &Instance, selected: bool) -> Self {
        Self {
            id: inst.id.as_str().to_string(),
            glyph: inst.glyph,
            cx: inst.cx,
            cy: inst.cy,
            transform: compute_transform(inst).to_css(),
            color: inst.color.to_css(),
            font_weight: inst.font_weight.value(),
            font_size: inst.font_size,
            z_index: inst.z_index,
            selected,
        }
    }
}

impl Editor {
    /// Every instance in paint order (z-index, then document order).
    pub fn view(&self) -> Vec<InstanceView> {
        self.scene()
            .iter_by_z()
            .into_iter()
            .map(|inst| InstanceView::new(inst, self.selection().is_marked(inst.id)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::EditorConfig;
    use crate::editor::Editor;
    use gd_core::Zone;
    use pretty_assertions::assert_eq;

    #[test]
    fn view_is_in_paint_order_with_marks() {
        let mut ed = Editor::new(Zone::new(400.0, 300.0), EditorConfig::default());
        ed.set_symmetry(true);
        let a = ed.drop_glyph('A', 100.0, 100.0);
        ed.set_symmetry(false);
        let b = ed.drop_glyph('B', 50.0, 50.0);
        ed.select(a);
        ed.set_symmetry(true);
        ed.send_to_back();

        let view = ed.view();
        assert_eq!(view.len(), 3);
        assert_eq!(view.iter().filter(|v| v.selected).count(), 2);
        assert_eq!(view.last().map(|v| v.id.clone()), Some(b.as_str().to_string()));

        let mirror = view.iter().find(|v| v.cx == 300.0).unwrap();
        assert_eq!(mirror.transform, "rotate(0deg) scale(-1, 1)");
        assert_eq!(mirror.color, "rgb(0, 0, 0)");
    }
}
