//! The scene: every placed glyph, its z-order, and its symmetry link.
//!
//! Instances live in a `petgraph` stable undirected graph. Nodes are
//! instances; an edge is a symmetry link carrying the shared `PairId`, so
//! finding a partner is a single neighbor lookup. Document order (the order
//! instances were added) is tracked separately because stable graphs reuse
//! vacated slots.

use crate::id::{InstanceId, PairId};
use crate::model::{Instance, Zone};
use crate::transform::mirror_clone_rotation;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableUnGraph;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Zone-space offset applied to both axes by `clone_instance`.
pub const CLONE_OFFSET: f32 = 20.0;

/// Horizontal zone-space offset applied by `mirror_clone`.
pub const MIRROR_CLONE_OFFSET: f32 = 100.0;

/// Ids touched by an operation: an instance and, when linked, its partner.
pub type Affected = SmallVec<[InstanceId; 2]>;

/// An immutable value copy of every instance, in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    instances: Vec<Instance>,
}

impl Snapshot {
    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// The set of placed glyphs plus the zone they live in.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Instances (nodes) and symmetry links (edges).
    pub(crate) graph: StableUnGraph<Instance, PairId>,

    /// Index from InstanceId → NodeIndex for fast lookup.
    pub(crate) id_index: HashMap<InstanceId, NodeIndex>,

    /// Document order.
    order: Vec<NodeIndex>,

    /// Bounds, viewport placement, and zoom of the zone.
    pub zone: Zone,

    /// Whether new placements are mirrored and edits propagate to partners.
    pub symmetry: bool,

    /// Next z-index handed out. Only grows.
    next_z: i32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Zone::default())
    }
}

impl Scene {
    #[must_use]
    pub fn new(zone: Zone) -> Self {
        Self {
            graph: StableUnGraph::default(),
            id_index: HashMap::new(),
            order: Vec::new(),
            zone,
            symmetry: false,
            next_z: 1,
        }
    }

    // ─── Storage ─────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: InstanceId) -> bool {
        self.id_index.contains_key(&id)
    }

    pub fn get(&self, id: InstanceId) -> Option<&Instance> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    pub(crate) fn get_mut(&mut self, id: InstanceId) -> Option<&mut Instance> {
        self.id_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    /// Instances in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Instance> + '_ {
        self.order.iter().map(|idx| &self.graph[*idx])
    }

    pub fn ids(&self) -> Vec<InstanceId> {
        self.iter().map(|inst| inst.id).collect()
    }

    /// Instances in paint order: ascending z, ties broken by document order.
    pub fn iter_by_z(&self) -> Vec<&Instance> {
        let mut out: Vec<&Instance> = self.iter().collect();
        out.sort_by_key(|inst| inst.z_index);
        out
    }

    /// The z-index the next placement will receive.
    pub fn next_z(&self) -> i32 {
        self.next_z
    }

    pub(crate) fn set_next_z(&mut self, z: i32) {
        self.next_z = z.max(1);
    }

    pub(crate) fn alloc_z(&mut self) -> i32 {
        let z = self.next_z;
        self.next_z = self.next_z.saturating_add(1);
        z
    }

    /// Add an instance as-is (no clamping, no linking). The `pair` field is
    /// cleared; links are only created through `link`.
    pub(crate) fn insert(&mut self, mut instance: Instance) -> InstanceId {
        instance.pair = None;
        let id = instance.id;
        let idx = self.graph.add_node(instance);
        self.id_index.insert(id, idx);
        self.order.push(idx);
        id
    }

    /// Remove one node, dropping any link edge with it.
    fn remove_one(&mut self, id: InstanceId) -> Option<Instance> {
        let idx = self.id_index.remove(&id)?;
        self.order.retain(|&i| i != idx);
        self.graph.remove_node(idx)
    }

    // ─── Placement ───────────────────────────────────────────────────────

    /// Place `glyph` at viewport coordinates `(x, y)`.
    ///
    /// The point is converted to zone-space with the current zoom and
    /// clamped. With symmetry on, a reflected partner is created and linked.
    /// Returns the primary instance.
    pub fn place(&mut self, glyph: char, x: f32, y: f32) -> InstanceId {
        let (cx, cy) = self.zone.to_zone(x, y);
        self.place_at(glyph, cx, cy)
    }

    /// Place `glyph` at zone-space `(cx, cy)`.
    pub fn place_at(&mut self, glyph: char, cx: f32, cy: f32) -> InstanceId {
        let (cx, cy) = self.zone.clamp(cx, cy);
        let z = self.alloc_z();
        let instance = Instance::new(InstanceId::fresh(), glyph, cx, cy, z);
        let mirror_source = instance.clone();
        let id = self.insert(instance);
        log::trace!("place {glyph:?} as {id} at ({cx}, {cy}) z={z}");

        if self.symmetry {
            let (mx, my) = self.zone.clamp(self.zone.reflect_x(cx), cy);
            let mirror = Instance {
                id: InstanceId::fresh(),
                cx: mx,
                cy: my,
                mirror_x: true,
                z_index: self.alloc_z(),
                ..mirror_source
            };
            let mirror_id = self.insert(mirror);
            self.link(id, mirror_id);
        }
        id
    }

    // ─── Geometry ────────────────────────────────────────────────────────

    /// Move to zone-space `(cx, cy)`, clamped. A linked partner (symmetry
    /// on) follows as the horizontal reflection through the zone center.
    /// Returns the ids that moved; empty if `id` is unknown.
    pub fn move_to(&mut self, id: InstanceId, cx: f32, cy: f32) -> Affected {
        let mut moved = Affected::new();
        let (cx, cy) = self.zone.clamp(cx, cy);
        let Some(inst) = self.get_mut(id) else {
            return moved;
        };
        inst.cx = cx;
        inst.cy = cy;
        moved.push(id);

        if let Some(partner) = self.active_partner(id) {
            let (mx, my) = self.zone.clamp(self.zone.reflect_x(cx), cy);
            if let Some(p) = self.get_mut(partner) {
                p.cx = mx;
                p.cy = my;
                moved.push(partner);
            }
        }
        moved
    }

    /// Shift by a zone-space delta (keyboard nudge).
    pub fn nudge(&mut self, id: InstanceId, dx: f32, dy: f32) -> Affected {
        match self.get(id) {
            Some(inst) => {
                let (cx, cy) = (inst.cx + dx, inst.cy + dy);
                self.move_to(id, cx, cy)
            }
            None => Affected::new(),
        }
    }

    // ─── Structure ───────────────────────────────────────────────────────

    /// Delete `id`. With symmetry on its partner goes too; with symmetry
    /// off the partner survives unlinked. Returns the removed ids.
    pub fn remove(&mut self, id: InstanceId) -> Affected {
        let mut removed = Affected::new();
        let partner = self.partner(id);
        if self.remove_one(id).is_none() {
            return removed;
        }
        removed.push(id);

        if let Some(partner) = partner {
            if self.symmetry {
                if self.remove_one(partner).is_some() {
                    removed.push(partner);
                }
            } else if let Some(p) = self.get_mut(partner) {
                p.pair = None;
            }
        }
        log::trace!("removed {removed:?}");
        removed
    }

    /// Remove every instance. The z allocator keeps counting.
    pub fn reset(&mut self) {
        self.graph.clear();
        self.id_index.clear();
        self.order.clear();
    }

    /// Duplicate `id` offset by `CLONE_OFFSET` on both axes.
    pub fn clone_instance(&mut self, id: InstanceId) -> Option<InstanceId> {
        self.clone_with_offset(id, CLONE_OFFSET, CLONE_OFFSET)
    }

    /// Duplicate `id` at a zone-space offset (clamped). The copy gets a new
    /// z-index on top and is never linked.
    pub fn clone_with_offset(&mut self, id: InstanceId, dx: f32, dy: f32) -> Option<InstanceId> {
        let source = self.get(id)?.clone();
        let (cx, cy) = self.zone.clamp(source.cx + dx, source.cy + dy);
        let copy = Instance {
            id: InstanceId::fresh(),
            cx,
            cy,
            z_index: self.alloc_z(),
            pair: None,
            ..source
        };
        Some(self.insert(copy))
    }

    /// Mirror-clone `id` `MIRROR_CLONE_OFFSET` to the right.
    pub fn mirror_clone(&mut self, id: InstanceId) -> Option<InstanceId> {
        self.mirror_clone_with_offset(id, MIRROR_CLONE_OFFSET)
    }

    /// Duplicate `id` shifted right by `dx` (not zone-centered), with the
    /// rotation reflected into `[0, 180]` and the horizontal flip inverted.
    pub fn mirror_clone_with_offset(&mut self, id: InstanceId, dx: f32) -> Option<InstanceId> {
        let source = self.get(id)?.clone();
        let (cx, cy) = self.zone.clamp(source.cx + dx, source.cy);
        let copy = Instance {
            id: InstanceId::fresh(),
            cx,
            cy,
            rotation: mirror_clone_rotation(source.rotation),
            mirror_x: !source.mirror_x,
            z_index: self.alloc_z(),
            pair: None,
            ..source
        };
        Some(self.insert(copy))
    }

    // ─── Z-order ─────────────────────────────────────────────────────────

    /// Put `id` (and its active partner) above everything placed so far.
    pub fn bring_to_front(&mut self, id: InstanceId) -> Affected {
        let mut touched = Affected::new();
        if !self.contains(id) {
            return touched;
        }
        let partner = self.active_partner(id);
        for target in std::iter::once(id).chain(partner) {
            let z = self.alloc_z();
            if let Some(inst) = self.get_mut(target) {
                inst.z_index = z;
                touched.push(target);
            }
        }
        touched
    }

    /// Drop `id` (and its active partner) to z-index 1.
    pub fn send_to_back(&mut self, id: InstanceId) -> Affected {
        let mut touched = Affected::new();
        if !self.contains(id) {
            return touched;
        }
        let partner = self.active_partner(id);
        for target in std::iter::once(id).chain(partner) {
            if let Some(inst) = self.get_mut(target) {
                inst.z_index = 1;
                touched.push(target);
            }
        }
        touched
    }

    // ─── Snapshots ───────────────────────────────────────────────────────

    /// Capture every instance by value.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            instances: self.iter().cloned().collect(),
        }
    }

    /// Replace every instance with the snapshot's. Links are rebuilt from
    /// the stored pair ids. Zone, symmetry flag, and z allocator are kept.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.reset();
        let mut pending: HashMap<PairId, InstanceId> = HashMap::new();
        for instance in &snapshot.instances {
            let pair = instance.pair;
            let id = self.insert(instance.clone());
            if let Some(pair) = pair {
                match pending.remove(&pair) {
                    Some(first) => {
                        self.link_with(first, id, pair);
                    }
                    None => {
                        pending.insert(pair, id);
                    }
                }
            }
        }
        let max_z = self.iter().map(|inst| inst.z_index).max().unwrap_or(0);
        if max_z >= self.next_z {
            self.next_z = max_z.saturating_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scene() -> Scene {
        Scene::new(Zone {
            left: 50.0,
            top: 50.0,
            ..Zone::new(400.0, 300.0)
        })
    }

    #[test]
    fn place_converts_viewport_to_zone() {
        let mut s = scene();
        let id = s.place('A', 150.0, 150.0);
        let inst = s.get(id).unwrap();
        assert_eq!((inst.cx, inst.cy), (100.0, 100.0));
        assert_eq!(inst.z_index, 1);
        assert_eq!(inst.rotation, 0.0);
        assert_eq!((inst.scale_x, inst.scale_y), (1.0, 1.0));
        assert!(!inst.mirror_x && !inst.mirror_y);
        assert_eq!(s.next_z(), 2);
    }

    #[test]
    fn place_clamps_to_zone() {
        let mut s = scene();
        let a = s.place('A', -1000.0, 10_000.0);
        let b = s.place('B', 10_000.0, -3.0);
        assert_eq!((s.get(a).unwrap().cx, s.get(a).unwrap().cy), (0.0, 300.0));
        assert_eq!((s.get(b).unwrap().cx, s.get(b).unwrap().cy), (400.0, 0.0));
    }

    #[test]
    fn drag_then_move() {
        let mut s = scene();
        let id = s.place('A', 150.0, 150.0);
        s.move_to(id, 130.0, 90.0);
        let inst = s.get(id).unwrap();
        assert_eq!((inst.cx, inst.cy), (130.0, 90.0));
    }

    #[test]
    fn symmetric_place_links_reflection() {
        let mut s = scene();
        s.symmetry = true;
        let id = s.place_at('K', 100.0, 40.0);
        assert_eq!(s.len(), 2);
        let partner = s.partner(id).expect("partner");
        let p = s.get(partner).unwrap();
        assert_eq!((p.cx, p.cy), (300.0, 40.0));
        assert!(p.mirror_x);
        assert_eq!(p.z_index, 2);
        assert_eq!(s.get(id).unwrap().pair, p.pair);
        assert_eq!(s.partner(partner), Some(id));
    }

    #[test]
    fn move_reflects_partner() {
        let mut s = scene();
        s.symmetry = true;
        let id = s.place_at('K', 100.0, 40.0);
        let partner = s.partner(id).unwrap();
        let moved = s.move_to(id, 50.0, 70.0);
        assert_eq!(moved.as_slice(), &[id, partner]);
        let p = s.get(partner).unwrap();
        assert_eq!((p.cx, p.cy), (350.0, 70.0));
    }

    #[test]
    fn move_unknown_is_noop() {
        let mut s = scene();
        assert!(s.move_to(InstanceId::intern("ghost"), 1.0, 1.0).is_empty());
        assert!(s.remove(InstanceId::intern("ghost")).is_empty());
        assert!(s.clone_instance(InstanceId::intern("ghost")).is_none());
    }

    #[test]
    fn remove_takes_partner_when_symmetric() {
        let mut s = scene();
        s.symmetry = true;
        let id = s.place_at('K', 100.0, 40.0);
        let removed = s.remove(id);
        assert_eq!(removed.len(), 2);
        assert!(s.is_empty());
    }

    #[test]
    fn remove_without_symmetry_unlinks_partner() {
        let mut s = scene();
        s.symmetry = true;
        let id = s.place_at('K', 100.0, 40.0);
        let partner = s.partner(id).unwrap();
        s.symmetry = false;
        assert_eq!(s.remove(id).as_slice(), &[id]);
        assert_eq!(s.len(), 1);
        assert_eq!(s.get(partner).unwrap().pair, None);
        assert_eq!(s.partner(partner), None);
    }

    #[test]
    fn clone_offsets_and_raises() {
        let mut s = scene();
        let id = s.place_at('A', 100.0, 100.0);
        let copy = s.clone_instance(id).unwrap();
        let c = s.get(copy).unwrap();
        assert_eq!((c.cx, c.cy), (120.0, 120.0));
        assert!(c.z_index > s.get(id).unwrap().z_index);
        assert_eq!(c.pair, None);
    }

    #[test]
    fn clone_of_linked_instance_is_unlinked() {
        let mut s = scene();
        s.symmetry = true;
        let id = s.place_at('A', 100.0, 100.0);
        let copy = s.clone_instance(id).unwrap();
        assert_eq!(s.partner(copy), None);
        assert_eq!(s.get(copy).unwrap().pair, None);
    }

    #[test]
    fn mirror_clone_example() {
        let mut s = scene();
        let id = s.place_at('A', 50.0, 50.0);
        s.get_mut(id).unwrap().rotation = 30.0;
        let copy = s.mirror_clone(id).unwrap();
        let c = s.get(copy).unwrap();
        assert_eq!((c.cx, c.cy), (150.0, 50.0));
        assert_eq!(c.rotation, 150.0);
        assert!(c.mirror_x);
        assert!(!c.mirror_y);
        assert_eq!(c.pair, None);
    }

    #[test]
    fn z_order_front_and_back() {
        let mut s = scene();
        let a = s.place_at('A', 10.0, 10.0);
        let b = s.place_at('B', 10.0, 10.0);
        s.bring_to_front(a);
        assert!(s.get(a).unwrap().z_index > s.get(b).unwrap().z_index);
        let order: Vec<char> = s.iter_by_z().iter().map(|i| i.glyph).collect();
        assert_eq!(order, vec!['B', 'A']);

        s.send_to_back(a);
        assert_eq!(s.get(a).unwrap().z_index, 1);
    }

    #[test]
    fn z_order_propagates_to_partner() {
        let mut s = scene();
        s.symmetry = true;
        let a = s.place_at('A', 10.0, 10.0);
        let partner = s.partner(a).unwrap();
        let touched = s.send_to_back(a);
        assert_eq!(touched.len(), 2);
        assert_eq!(s.get(partner).unwrap().z_index, 1);
    }

    #[test]
    fn snapshot_restore_relinks() {
        let mut s = scene();
        s.symmetry = true;
        let a = s.place_at('A', 10.0, 10.0);
        let snap = s.snapshot();
        s.reset();
        assert!(s.is_empty());

        s.restore(&snap);
        assert_eq!(s.snapshot(), snap);
        let partner = s.partner(a).expect("link rebuilt");
        assert_eq!(s.partner(partner), Some(a));
    }

    #[test]
    fn z_allocator_saturates_at_max() {
        let mut s = scene();
        let a = s.place_at('A', 10.0, 10.0);
        s.get_mut(a).unwrap().z_index = i32::MAX;
        let snap = s.snapshot();
        s.restore(&snap);
        assert_eq!(s.next_z(), i32::MAX);

        let b = s.place_at('B', 20.0, 20.0);
        s.bring_to_front(a);
        assert_eq!(s.get(b).unwrap().z_index, i32::MAX);
        assert_eq!(s.get(a).unwrap().z_index, i32::MAX);
        assert_eq!(s.next_z(), i32::MAX);
    }

    #[test]
    fn resizing_zone_affects_future_reflections_only() {
        let mut s = scene();
        s.symmetry = true;
        let a = s.place_at('A', 100.0, 10.0);
        let before = s.get(s.partner(a).unwrap()).unwrap().cx;
        s.zone.width = 200.0;
        assert_eq!(s.get(s.partner(a).unwrap()).unwrap().cx, before);
        let b = s.place_at('B', 50.0, 10.0);
        assert_eq!(s.get(s.partner(b).unwrap()).unwrap().cx, 150.0);
    }
}
