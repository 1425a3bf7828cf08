//! Layout document codec: `Scene` ⇄ JSON.
//!
//! The document is the same whether it sits in local storage or in an
//! exported `.json` file:
//!
//! ```json
//! { "symmetry": false,
//!   "characters": [ { "char": "A", "cx": 100, "cy": 100,
//!                     "color": "rgb(0, 0, 0)", "rotation": 0,
//!                     "scaleX": 1, "scaleY": 1, "fontWeight": "400",
//!                     "zIndex": 1, "mirrorX": false, "mirrorY": false } ] }
//! ```
//!
//! Symmetry links are not part of the document: loaded instances are never
//! linked, even when `symmetry` is true.

use crate::id::InstanceId;
use crate::model::{Color, FontWeight, Instance, Zone, wrap_degrees};
use crate::scene::Scene;
use serde::{Deserialize, Deserializer, Serialize};

/// A whole persisted layout.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutDocument {
    #[serde(default)]
    pub symmetry: bool,
    #[serde(default)]
    pub characters: Vec<CharacterRecord>,
}

/// One persisted instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    #[serde(rename = "char")]
    pub glyph: char,
    #[serde(deserialize_with = "lenient_f32")]
    pub cx: f32,
    #[serde(deserialize_with = "lenient_f32")]
    pub cy: f32,
    #[serde(default)]
    pub color: Color,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub rotation: f32,
    #[serde(default = "unit_scale")]
    pub scale_x: f32,
    #[serde(default = "unit_scale")]
    pub scale_y: f32,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default = "base_z")]
    pub z_index: i32,
    #[serde(default)]
    pub mirror_x: bool,
    #[serde(default)]
    pub mirror_y: bool,
}

fn unit_scale() -> f32 {
    1.0
}

fn base_z() -> i32 {
    1
}

/// Browsers write `NaN` coordinates as `null`; read those as 0.
fn lenient_f32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    Ok(Option::<f32>::deserialize(deserializer)?.unwrap_or(0.0))
}

impl From<&Instance> for CharacterRecord {
    fn from(inst: &Instance) -> Self {
        Self {
            glyph: inst.glyph,
            cx: inst.cx,
            cy: inst.cy,
            color: inst.color,
            rotation: inst.rotation,
            scale_x: inst.scale_x.abs(),
            scale_y: inst.scale_y.abs(),
            font_weight: inst.font_weight,
            z_index: inst.z_index,
            mirror_x: inst.mirror_x,
            mirror_y: inst.mirror_y,
        }
    }
}

/// Capture `scene` as a document, instances in document order.
pub fn serialize(scene: &Scene) -> LayoutDocument {
    LayoutDocument {
        symmetry: scene.symmetry,
        characters: scene.iter().map(CharacterRecord::from).collect(),
    }
}

/// Rebuild a scene from `doc` inside `zone`.
///
/// Every record becomes a fresh, unlinked instance in array order.
/// Positions are clamped to the zone, rotations wrapped, scales made
/// non-negative. The z allocator resumes at `max(zIndex) + 1`, saturating
/// at `i32::MAX`.
pub fn deserialize(doc: &LayoutDocument, zone: Zone) -> Scene {
    let mut scene = Scene::new(zone);
    scene.symmetry = doc.symmetry;

    for record in &doc.characters {
        let (cx, cy) = zone.clamp(record.cx, record.cy);
        let mut inst = Instance::new(InstanceId::fresh(), record.glyph, cx, cy, record.z_index);
        inst.rotation = wrap_degrees(record.rotation);
        inst.scale_x = finite_abs(record.scale_x);
        inst.scale_y = finite_abs(record.scale_y);
        inst.mirror_x = record.mirror_x;
        inst.mirror_y = record.mirror_y;
        inst.color = record.color;
        inst.font_weight = record.font_weight;
        scene.insert(inst);
    }

    let max_z = doc.characters.iter().map(|r| r.z_index).max().unwrap_or(0).max(0);
    scene.set_next_z(max_z.saturating_add(1));
    log::debug!(
        "deserialized {} characters (symmetry: {}, next z: {})",
        scene.len(),
        scene.symmetry,
        scene.next_z()
    );
    scene
}

fn finite_abs(v: f32) -> f32 {
    if v.is_finite() { v.abs() } else { 1.0 }
}

/// Encode a document as compact JSON.
pub fn to_json(doc: &LayoutDocument) -> Result<String, String> {
    serde_json::to_string(doc).map_err(|e| format!("Layout encode error: {e}"))
}

/// Decode a JSON document.
pub fn from_json(text: &str) -> Result<LayoutDocument, String> {
    serde_json::from_str(text).map_err(|e| format!("Layout parse error: {e}"))
}

/// `serialize` + `to_json`.
pub fn scene_to_json(scene: &Scene) -> Result<String, String> {
    to_json(&serialize(scene))
}

/// `from_json` + `deserialize`.
pub fn scene_from_json(text: &str, zone: Zone) -> Result<Scene, String> {
    Ok(deserialize(&from_json(text)?, zone))
}
