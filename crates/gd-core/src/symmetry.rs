//! Symmetry engine: links two instances and mirrors edits across the link.
//!
//! Links are graph edges, so partner lookup is O(1) and a node can hold at
//! most one link. Propagation only happens while the scene's symmetry flag
//! is on; with it off, linked instances are edited independently.

use crate::id::{InstanceId, PairId};
use crate::model::{Color, FontWeight, Instance};
use crate::scene::{Affected, Scene};
use crate::transform::{
    TransformInput, apply_transform, compute_transform, mirror_transform, store_transform,
};
use petgraph::visit::EdgeRef;

impl Scene {
    /// The instance linked to `id`, regardless of the symmetry flag.
    pub fn partner(&self, id: InstanceId) -> Option<InstanceId> {
        let idx = *self.id_index.get(&id)?;
        self.graph.neighbors(idx).next().map(|n| self.graph[n].id)
    }

    /// The partner edits should propagate to: `None` while symmetry is off.
    pub fn active_partner(&self, id: InstanceId) -> Option<InstanceId> {
        if self.symmetry { self.partner(id) } else { None }
    }

    /// Link `a` and `b` under a fresh pair id. Refuses (returns `None`) if
    /// they are the same instance, either is unknown, or either is already
    /// linked. Pairs never grow into triples.
    pub fn link(&mut self, a: InstanceId, b: InstanceId) -> Option<PairId> {
        self.link_with(a, b, PairId::fresh())
    }

    pub(crate) fn link_with(&mut self, a: InstanceId, b: InstanceId, pair: PairId) -> Option<PairId> {
        if a == b {
            return None;
        }
        let ia = *self.id_index.get(&a)?;
        let ib = *self.id_index.get(&b)?;
        if self.graph.neighbors(ia).next().is_some() || self.graph.neighbors(ib).next().is_some() {
            return None;
        }
        self.graph.add_edge(ia, ib, pair);
        self.graph[ia].pair = Some(pair);
        self.graph[ib].pair = Some(pair);
        Some(pair)
    }

    /// Break the link on `id`. Returns the former partner.
    pub fn unlink(&mut self, id: InstanceId) -> Option<InstanceId> {
        let idx = *self.id_index.get(&id)?;
        let (edge, other) = {
            let mut edges = self.graph.edges(idx);
            let edge = edges.next()?;
            let other = if edge.source() == idx { edge.target() } else { edge.source() };
            (edge.id(), other)
        };
        self.graph.remove_edge(edge);
        self.graph[idx].pair = None;
        self.graph[other].pair = None;
        Some(self.graph[other].id)
    }

    /// Set rotation and scale magnitudes on `id`. The active partner
    /// receives the mirrored transform.
    pub fn set_transform(&mut self, id: InstanceId, input: TransformInput) -> Affected {
        let mut touched = Affected::new();
        let Some(inst) = self.get_mut(id) else {
            return touched;
        };
        apply_transform(inst, input);
        touched.push(id);
        touched.extend(self.sync_partner_transform(id));
        touched
    }

    /// Toggle the horizontal flip on `id`, then re-mirror the partner.
    pub fn toggle_mirror_x(&mut self, id: InstanceId) -> Affected {
        self.toggle_mirror(id, true)
    }

    /// Toggle the vertical flip on `id`, then re-mirror the partner.
    pub fn toggle_mirror_y(&mut self, id: InstanceId) -> Affected {
        self.toggle_mirror(id, false)
    }

    fn toggle_mirror(&mut self, id: InstanceId, horizontal: bool) -> Affected {
        let mut touched = Affected::new();
        let Some(inst) = self.get_mut(id) else {
            return touched;
        };
        if horizontal {
            inst.mirror_x = !inst.mirror_x;
        } else {
            inst.mirror_y = !inst.mirror_y;
        }
        touched.push(id);
        touched.extend(self.sync_partner_transform(id));
        touched
    }

    /// Recompute the active partner's transform as a reflection of `id`.
    fn sync_partner_transform(&mut self, id: InstanceId) -> Option<InstanceId> {
        let partner = self.active_partner(id)?;
        let mirrored = mirror_transform(&compute_transform(self.get(id)?));
        let p = self.get_mut(partner)?;
        store_transform(p, &mirrored);
        Some(partner)
    }

    /// Set the color on `id` and, unchanged, on its active partner.
    pub fn set_color(&mut self, id: InstanceId, color: Color) -> Affected {
        self.update_style(id, |inst| inst.color = color)
    }

    /// Set the font weight on `id` and, unchanged, on its active partner.
    pub fn set_weight(&mut self, id: InstanceId, weight: FontWeight) -> Affected {
        self.update_style(id, |inst| inst.font_weight = weight)
    }

    fn update_style(&mut self, id: InstanceId, apply: impl Fn(&mut Instance)) -> Affected {
        let mut touched = Affected::new();
        if !self.contains(id) {
            return touched;
        }
        let partner = self.active_partner(id);
        for target in std::iter::once(id).chain(partner) {
            if let Some(inst) = self.get_mut(target) {
                apply(inst);
                touched.push(target);
            }
        }
        touched
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{Color, FontWeight, Zone};
    use crate::scene::Scene;
    use crate::transform::{TransformInput, compute_transform};
    use pretty_assertions::assert_eq;

    fn symmetric_scene() -> Scene {
        let mut s = Scene::new(Zone::new(400.0, 300.0));
        s.symmetry = true;
        s
    }

    #[test]
    fn link_refuses_triples() {
        let mut s = symmetric_scene();
        let a = s.place_at('A', 10.0, 10.0);
        s.symmetry = false;
        let lone = s.place_at('B', 20.0, 20.0);
        assert_eq!(s.link(a, lone), None);
        assert_eq!(s.link(lone, lone), None);
    }

    #[test]
    fn unlink_clears_both_sides() {
        let mut s = symmetric_scene();
        let a = s.place_at('A', 10.0, 10.0);
        let b = s.partner(a).unwrap();
        assert_eq!(s.unlink(a), Some(b));
        assert_eq!(s.get(a).unwrap().pair, None);
        assert_eq!(s.get(b).unwrap().pair, None);
        assert_eq!(s.partner(b), None);
        // Free again, so a new link is allowed.
        assert!(s.link(a, b).is_some());
    }

    #[test]
    fn transform_mirrors_onto_partner() {
        let mut s = symmetric_scene();
        let a = s.place_at('A', 10.0, 10.0);
        let b = s.partner(a).unwrap();
        let touched = s.set_transform(
            a,
            TransformInput {
                rotation: 30.0,
                scale_x: 2.0,
                scale_y: 1.5,
            },
        );
        assert_eq!(touched.as_slice(), &[a, b]);

        let ta = compute_transform(s.get(a).unwrap());
        let tb = compute_transform(s.get(b).unwrap());
        assert_eq!(tb.rotation, 330.0);
        assert_eq!(tb.scale_x, -ta.scale_x);
        assert_eq!(tb.scale_y, ta.scale_y);
    }

    #[test]
    fn flip_keeps_partner_mirrored() {
        let mut s = symmetric_scene();
        let a = s.place_at('A', 10.0, 10.0);
        let b = s.partner(a).unwrap();
        s.toggle_mirror_x(a);
        assert!(s.get(a).unwrap().mirror_x);
        assert!(!s.get(b).unwrap().mirror_x);
        s.toggle_mirror_y(a);
        assert!(s.get(b).unwrap().mirror_y, "vertical flip is copied, not inverted");
    }

    #[test]
    fn style_propagates_unchanged() {
        let mut s = symmetric_scene();
        let a = s.place_at('A', 10.0, 10.0);
        let b = s.partner(a).unwrap();
        s.set_color(a, Color::rgb(200, 10, 10));
        s.set_weight(a, FontWeight::new(800));
        assert_eq!(s.get(b).unwrap().color, Color::rgb(200, 10, 10));
        assert_eq!(s.get(b).unwrap().font_weight, FontWeight::new(800));
    }

    #[test]
    fn no_propagation_with_symmetry_off() {
        let mut s = symmetric_scene();
        let a = s.place_at('A', 10.0, 10.0);
        let b = s.partner(a).unwrap();
        s.symmetry = false;
        s.set_color(a, Color::rgb(1, 2, 3));
        s.move_to(a, 50.0, 50.0);
        assert_eq!(s.get(b).unwrap().color, Color::BLACK);
        assert_eq!(s.get(b).unwrap().cx, 390.0);
    }
}
