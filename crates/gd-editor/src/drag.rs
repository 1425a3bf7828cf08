//! Pointer drag of a placed glyph.
//!
//! A gesture is bounded by pointer-down and pointer-up. Each move sets the
//! position from the start position plus the pointer delta, so rounding
//! never accumulates across events.

use gd_core::{Affected, InstanceId, Scene};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGesture {
    pub id: InstanceId,
    /// Pointer position at pointer-down (viewport coordinates).
    start_x: f32,
    start_y: f32,
    /// Instance position at pointer-down (zone space).
    start_cx: f32,
    start_cy: f32,
    moved: bool,
}

impl DragGesture {
    /// Start dragging `id` from viewport point `(x, y)`.
    pub fn begin(scene: &Scene, id: InstanceId, x: f32, y: f32) -> Option<Self> {
        let inst = scene.get(id)?;
        Some(Self {
            id,
            start_x: x,
            start_y: y,
            start_cx: inst.cx,
            start_cy: inst.cy,
            moved: false,
        })
    }

    /// Follow the pointer to `(x, y)`. The viewport delta is divided by the
    /// zoom so the glyph stays under the pointer at any zoom level.
    pub fn update(&mut self, scene: &mut Scene, x: f32, y: f32) -> Affected {
        let zoom = scene.zone.zoom;
        let cx = self.start_cx + (x - self.start_x) / zoom;
        let cy = self.start_cy + (y - self.start_y) / zoom;
        let moved = scene.move_to(self.id, cx, cy);
        self.moved |= !moved.is_empty();
        moved
    }

    /// Whether any move event was applied.
    pub fn moved(&self) -> bool {
        self.moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gd_core::Zone;

    #[test]
    fn drag_by_delta() {
        let mut scene = Scene::new(Zone::new(400.0, 300.0));
        let id = scene.place_at('A', 100.0, 100.0);
        let mut drag = DragGesture::begin(&scene, id, 500.0, 500.0).unwrap();
        drag.update(&mut scene, 510.0, 500.0);
        drag.update(&mut scene, 530.0, 490.0);
        let inst = scene.get(id).unwrap();
        assert_eq!((inst.cx, inst.cy), (130.0, 90.0));
        assert!(drag.moved());
    }

    #[test]
    fn drag_delta_scales_with_zoom() {
        let mut scene = Scene::new(Zone {
            zoom: 2.0,
            ..Zone::new(400.0, 300.0)
        });
        let id = scene.place_at('A', 100.0, 100.0);
        let mut drag = DragGesture::begin(&scene, id, 0.0, 0.0).unwrap();
        drag.update(&mut scene, 40.0, -20.0);
        let inst = scene.get(id).unwrap();
        assert_eq!((inst.cx, inst.cy), (120.0, 90.0));
    }

    #[test]
    fn drag_is_clamped() {
        let mut scene = Scene::new(Zone::new(120.0, 95.0));
        let id = scene.place_at('A', 100.0, 90.0);
        let mut drag = DragGesture::begin(&scene, id, 0.0, 0.0).unwrap();
        drag.update(&mut scene, 30.0, 10.0);
        let inst = scene.get(id).unwrap();
        assert_eq!((inst.cx, inst.cy), (120.0, 95.0));
    }
}
