//! Core value structs shared between the simulation and the front end.
//!
//! Colors, vectors and part specifications are plain data: the renderer
//! receives them declaratively and the core never reads anything back.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{PartKind, Step};
use crate::ids::{PartId, SessionId};

// ---------------------------------------------------------------------------
// Rgb
// ---------------------------------------------------------------------------

/// Linear RGB color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Rgb {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
}

impl Rgb {
    /// Build a color from explicit channels.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a `0xRRGGBB` literal.
    pub fn from_hex(hex: u32) -> Self {
        let [_, r, g, b] = hex.to_be_bytes();
        Self {
            r: f32::from(r) / 255.0,
            g: f32::from(g) / 255.0,
            b: f32::from(b) / 255.0,
        }
    }

    /// Build a color from hue, saturation and lightness, all in `0.0..=1.0`.
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(1.0);
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);

        if s <= 0.0 {
            return Self::new(l, l, l);
        }

        let upper = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let lower = 2.0f32.mul_add(l, -upper);

        Self {
            r: hue_channel(lower, upper, h + 1.0 / 3.0),
            g: hue_channel(lower, upper, h),
            b: hue_channel(lower, upper, h - 1.0 / 3.0),
        }
    }

    /// Render as a `#rrggbb` string.
    pub fn to_hex_string(self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            channel_byte(self.r),
            channel_byte(self.g),
            channel_byte(self.b)
        )
    }
}

fn hue_channel(lower: f32, upper: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        (upper - lower).mul_add(6.0 * t, lower)
    } else if t < 0.5 {
        upper
    } else if t < 2.0 / 3.0 {
        (upper - lower).mul_add(6.0 * (2.0 / 3.0 - t), lower)
    } else {
        lower
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel_byte(value: f32) -> u8 {
    // Clamped to 0..=255 before the cast.
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A point or offset in scene space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Vec3 {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate (up).
    pub y: f32,
    /// Z coordinate.
    pub z: f32,
}

impl Vec3 {
    /// Build a vector from components.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Whole-plant transform applied by the renderer to the plant group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Transform {
    /// Per-axis scale.
    pub scale: Vec3,
    /// Translation of the group origin.
    pub position: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: Vec3::new(1.0, 1.0, 1.0),
            position: Vec3::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Scene parts
// ---------------------------------------------------------------------------

/// Declarative description of one mesh in the plant group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PartSpec {
    /// Handle the core uses to address this part later.
    pub id: PartId,
    /// What kind of mesh to build.
    pub kind: PartKind,
    /// Position relative to the plant group.
    pub position: Vec3,
    /// Rotation about the Y axis, in radians.
    pub yaw: f32,
    /// Initial material color.
    pub color: Rgb,
}

/// A declarative instruction for the renderer.
///
/// The core only ever sends these; nothing is read back from the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "op", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum SceneCommand {
    /// Build the plant group from its parts and add it to the field.
    BuildPlant {
        /// Stalk segments and leaves, in construction order.
        parts: Vec<PartSpec>,
    },
    /// Replace the plant group's transform.
    SetPlantTransform {
        /// The new transform.
        transform: Transform,
    },
    /// Recolor the listed parts' materials.
    Recolor {
        /// Parts to repaint.
        parts: Vec<PartId>,
        /// Target color.
        color: Rgb,
    },
    /// Attach additional parts (mature-crop cobs) to the plant group.
    AttachToPlant {
        /// Parts to add.
        parts: Vec<PartSpec>,
    },
}

// ---------------------------------------------------------------------------
// Session snapshot
// ---------------------------------------------------------------------------

/// Read-only view of a session, suitable for a status panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SessionSnapshot {
    /// The session this view belongs to.
    pub session_id: SessionId,
    /// Next legal step.
    pub current_step: Step,
    /// Seed has been planted.
    pub has_planted: bool,
    /// Plant has been watered.
    pub has_watered: bool,
    /// Fertilizer has been applied.
    pub has_fertilized: bool,
    /// Plant has been cured once.
    pub has_cured: bool,
    /// Plant is currently diseased.
    pub is_diseased: bool,
    /// Crop reached maturity.
    pub is_harvest_ready: bool,
    /// Growth counter.
    pub growth_stage: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn hex_colors_decode_per_channel() {
        let leaf = Rgb::from_hex(0x2e_cc_71);
        assert!(close(leaf.r, 46.0 / 255.0));
        assert!(close(leaf.g, 204.0 / 255.0));
        assert!(close(leaf.b, 113.0 / 255.0));
        assert_eq!(leaf.to_hex_string(), "#2ecc71");
    }

    #[test]
    fn hsl_grey_when_unsaturated() {
        let grey = Rgb::from_hsl(0.33, 0.0, 0.4);
        assert!(close(grey.r, 0.4));
        assert!(close(grey.g, 0.4));
        assert!(close(grey.b, 0.4));
    }

    #[test]
    fn hsl_primary_hues() {
        let red = Rgb::from_hsl(0.0, 1.0, 0.5);
        assert_eq!(red.to_hex_string(), "#ff0000");
        let green = Rgb::from_hsl(1.0 / 3.0, 1.0, 0.5);
        assert_eq!(green.to_hex_string(), "#00ff00");
    }

    #[test]
    fn hsl_stalk_green_is_green_dominant() {
        let stalk = Rgb::from_hsl(0.33, 0.8, 0.3);
        assert!(stalk.g > stalk.r);
        assert!(stalk.g > stalk.b);
    }

    #[test]
    fn scene_commands_are_tagged_by_op() {
        let command = SceneCommand::Recolor {
            parts: vec![PartId(1), PartId(2)],
            color: Rgb::new(1.0, 0.0, 0.0),
        };
        let json = serde_json::to_value(&command).unwrap_or_default();
        assert_eq!(json["op"], "recolor");
        assert_eq!(json["parts"][1], 2);
    }

    #[test]
    fn default_transform_is_identity() {
        let t = Transform::default();
        assert!(close(t.scale.y, 1.0));
        assert!(close(t.position.y, 0.0));
    }
}
