//! Transform model: rotation, scale magnitudes, and mirror flags → the
//! signed transform a renderer applies.
//!
//! Rendering order is "rotate, then scale". Mirroring only flips the sign
//! of an axis scale; it never touches the rotation.

use crate::model::{Instance, wrap_degrees};

/// The effective transform of one instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Signed horizontal scale (negative = flipped).
    pub scale_x: f32,
    /// Signed vertical scale (negative = flipped).
    pub scale_y: f32,
    /// Degrees in `[0, 360)`.
    pub rotation: f32,
}

impl Transform {
    /// CSS `transform` value: `rotate(..deg) scale(sx, sy)`.
    pub fn to_css(&self) -> String {
        format!(
            "rotate({}deg) scale({}, {})",
            self.rotation, self.scale_x, self.scale_y
        )
    }

    pub fn flipped_x(&self) -> bool {
        self.scale_x.is_sign_negative()
    }

    pub fn flipped_y(&self) -> bool {
        self.scale_y.is_sign_negative()
    }
}

/// Raw values coming from the rotation / scale controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformInput {
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl Default for TransformInput {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

/// Compute the signed transform for `instance`.
pub fn compute_transform(instance: &Instance) -> Transform {
    Transform {
        scale_x: signed(instance.scale_x, instance.mirror_x),
        scale_y: signed(instance.scale_y, instance.mirror_y),
        rotation: instance.rotation,
    }
}

fn signed(magnitude: f32, mirrored: bool) -> f32 {
    let m = magnitude.abs();
    if mirrored { -m } else { m }
}

/// Write control values into `instance`. Scales are stored as magnitudes;
/// the mirror flags are left alone.
pub fn apply_transform(instance: &mut Instance, input: TransformInput) {
    instance.rotation = wrap_degrees(input.rotation);
    instance.scale_x = sanitize_scale(input.scale_x);
    instance.scale_y = sanitize_scale(input.scale_y);
}

fn sanitize_scale(v: f32) -> f32 {
    if v.is_finite() { v.abs() } else { 1.0 }
}

/// The transform a symmetry partner must carry so it is a true reflection
/// of `source` across the vertical centerline: rotation negated, horizontal
/// scale sign negated, vertical scale unchanged.
pub fn mirror_transform(source: &Transform) -> Transform {
    Transform {
        scale_x: -source.scale_x,
        scale_y: source.scale_y,
        rotation: wrap_degrees(-source.rotation),
    }
}

/// Store a signed transform back onto an instance as magnitudes + flags.
pub fn store_transform(instance: &mut Instance, transform: &Transform) {
    instance.rotation = wrap_degrees(transform.rotation);
    instance.scale_x = transform.scale_x.abs();
    instance.scale_y = transform.scale_y.abs();
    instance.mirror_x = transform.flipped_x();
    instance.mirror_y = transform.flipped_y();
}

/// Rotation for a mirror-clone: `(180 − r) mod 360`, folded into `[0, 180]`.
pub fn mirror_clone_rotation(rotation: f32) -> f32 {
    let r = wrap_degrees(180.0 - rotation);
    if r > 180.0 { 360.0 - r } else { r }
}
