//! The corn plant entity: scene layout, growth transform, and the list of
//! paintable parts.
//!
//! The plant keeps its own list of part ids that carry a recolorable
//! material, so disease and cure effects repaint exactly those parts
//! instead of walking whatever the renderer happens to hold.

use std::f32::consts::PI;

use cornfield_types::{PartId, PartKind, PartSpec, Rgb, Transform, Vec3};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of stacked stalk segments.
pub const STALK_SEGMENTS: u8 = 10;

/// Height of a single stalk segment.
pub const SEGMENT_HEIGHT: f32 = 0.35;

/// Number of leaves, alternating left and right.
pub const LEAF_COUNT: u8 = 12;

/// Leaf material color.
pub const LEAF_COLOR: u32 = 0x2e_cc_71;

/// Cob material color.
pub const COB_COLOR: u32 = 0xff_e0_66;

/// Hue of the stalk gradient.
const STALK_HUE: f32 = 0.33;

/// Saturation of the stalk gradient.
const STALK_SATURATION: f32 = 0.8;

/// Lightness of the lowest segment; each segment above adds `STALK_LIGHTNESS_STEP`.
const STALK_BASE_LIGHTNESS: f32 = 0.3;

const STALK_LIGHTNESS_STEP: f32 = 0.04;

const LEAF_OFFSET_X: f32 = 0.3;
const LEAF_BASE_Y: f32 = 0.5;
const LEAF_SPACING_Y: f32 = 0.3;

/// Cob positions relative to the plant group.
const COB_POSITIONS: [Vec3; 2] = [Vec3::new(0.3, 4.5, 0.0), Vec3::new(-0.3, 4.3, 0.0)];

// ---------------------------------------------------------------------------
// Plant
// ---------------------------------------------------------------------------

/// A planted corn stalk.
#[derive(Debug, Clone, PartialEq)]
pub struct Plant {
    /// Parts whose material color may be changed.
    paintable: Vec<PartId>,
    /// Current group transform.
    transform: Transform,
    /// Next id to assign.
    next_part: u32,
    /// Whether mature cobs have been attached.
    has_cobs: bool,
}

impl Plant {
    /// Lay out a fresh plant.
    ///
    /// Returns the entity together with the part specs the renderer needs
    /// to build it: stalk segments first, then leaves.
    pub fn sprout() -> (Self, Vec<PartSpec>) {
        let mut plant = Self {
            paintable: Vec::new(),
            transform: Transform::default(),
            next_part: 0,
            has_cobs: false,
        };
        let mut parts = Vec::with_capacity(usize::from(STALK_SEGMENTS + LEAF_COUNT));

        for i in 0..STALK_SEGMENTS {
            let level = f32::from(i);
            let spec = PartSpec {
                id: plant.allocate(),
                kind: PartKind::StalkSegment,
                position: Vec3::new(0.0, SEGMENT_HEIGHT.mul_add(level, SEGMENT_HEIGHT / 2.0), 0.0),
                yaw: 0.0,
                color: Rgb::from_hsl(
                    STALK_HUE,
                    STALK_SATURATION,
                    STALK_LIGHTNESS_STEP.mul_add(level, STALK_BASE_LIGHTNESS),
                ),
            };
            plant.paintable.push(spec.id);
            parts.push(spec);
        }

        for i in 0..LEAF_COUNT {
            let side = if i % 2 == 0 { 1.0 } else { -1.0 };
            let spec = PartSpec {
                id: plant.allocate(),
                kind: PartKind::Leaf,
                position: Vec3::new(
                    side * LEAF_OFFSET_X,
                    LEAF_SPACING_Y.mul_add(f32::from(i), LEAF_BASE_Y),
                    0.0,
                ),
                yaw: side * PI / 2.5,
                color: Rgb::from_hex(LEAF_COLOR),
            };
            plant.paintable.push(spec.id);
            parts.push(spec);
        }

        (plant, parts)
    }

    /// Parts that disease and cure effects recolor.
    pub fn paintable_parts(&self) -> &[PartId] {
        &self.paintable
    }

    /// Current group transform.
    pub const fn transform(&self) -> Transform {
        self.transform
    }

    /// Whether the mature cobs are attached.
    pub const fn has_cobs(&self) -> bool {
        self.has_cobs
    }

    /// Apply one growth step: stretch on Y and lift the group. Deltas
    /// accumulate. Returns the new transform.
    pub fn grow(&mut self, scale_step: f32, lift_step: f32) -> Transform {
        self.transform.scale.y += scale_step;
        self.transform.position.y += lift_step;
        self.transform
    }

    /// Lay out the mature cobs.
    ///
    /// Returns `None` if they are already attached. Cobs are not paintable.
    pub fn attach_cobs(&mut self) -> Option<Vec<PartSpec>> {
        if self.has_cobs {
            return None;
        }
        self.has_cobs = true;
        let cobs = COB_POSITIONS
            .iter()
            .map(|&position| PartSpec {
                id: self.allocate(),
                kind: PartKind::Cob,
                position,
                yaw: 0.0,
                color: Rgb::from_hex(COB_COLOR),
            })
            .collect();
        Some(cobs)
    }

    fn allocate(&mut self) -> PartId {
        let id = PartId(self.next_part);
        self.next_part = self.next_part.saturating_add(1);
        id
    }
}
