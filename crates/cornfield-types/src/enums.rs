//! Enumeration types for the Cornfield simulation.
//!
//! Tools are what the player drops on the field, steps are what the
//! sequencer will accept next, and sound cues name the audio events the
//! front end plays.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Tools
// ---------------------------------------------------------------------------

/// A farming tool the player can activate on the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Tool {
    /// Plant a corn seed.
    Seed,
    /// Water the planted seed.
    Water,
    /// Feed the plant and start growth.
    Fertilizer,
    /// Treat a diseased plant.
    Cure,
}

impl Tool {
    /// All tools in toolbar order.
    pub const ALL: [Self; 4] = [Self::Seed, Self::Water, Self::Fertilizer, Self::Cure];

    /// Resolve a tool identifier as delivered by the input layer.
    ///
    /// Accepts the bare name (`seed`), the toolbar element id (`seedTool`)
    /// and the snake-case form (`seed_tool`), ignoring ASCII case and
    /// surrounding whitespace. Returns `None` for anything else.
    pub fn from_id(id: &str) -> Option<Self> {
        let normalized = id.trim().to_ascii_lowercase();
        let name = normalized
            .strip_suffix("_tool")
            .or_else(|| normalized.strip_suffix("tool"))
            .unwrap_or(&normalized);
        match name {
            "seed" => Some(Self::Seed),
            "water" => Some(Self::Water),
            "fertilizer" => Some(Self::Fertilizer),
            "cure" => Some(Self::Cure),
            _ => None,
        }
    }

    /// Canonical lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Seed => "seed",
            Self::Water => "water",
            Self::Fertilizer => "fertilizer",
            Self::Cure => "cure",
        }
    }
}

impl core::fmt::Display for Tool {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// The single action the sequencer will accept next.
///
/// `Cure` is only entered through disease onset, never through normal
/// progression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Step {
    /// Waiting for the seed.
    #[default]
    Seed,
    /// Waiting for water.
    Water,
    /// Waiting for fertilizer.
    Fertilizer,
    /// Growing; no tool is expected.
    Growth,
    /// Diseased; only the cure is accepted.
    Cure,
}

// ---------------------------------------------------------------------------
// Sound cues
// ---------------------------------------------------------------------------

/// A named audio event played by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum SoundCue {
    /// Seed planted.
    Plant,
    /// Plant watered.
    Water,
    /// Fertilizer applied.
    Fertilizer,
    /// Disease onset, or an action blocked by disease.
    Disease,
    /// Plant cured.
    Heal,
    /// Crop mature.
    Harvest,
}

impl SoundCue {
    /// Asset key used by the sound player (`sounds/{key}.wav` in the browser).
    pub const fn key(self) -> &'static str {
        match self {
            Self::Plant => "plant",
            Self::Water => "water",
            Self::Fertilizer => "fertilizer",
            Self::Disease => "disease",
            Self::Heal => "heal",
            Self::Harvest => "harvest",
        }
    }
}

// ---------------------------------------------------------------------------
// Scene parts
// ---------------------------------------------------------------------------

/// Kind of mesh making up the plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum PartKind {
    /// Cylindrical stalk segment.
    StalkSegment,
    /// Curved leaf plane.
    Leaf,
    /// Corn cob attached at maturity.
    Cob,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_ids_resolve_in_all_forms() {
        assert_eq!(Tool::from_id("seed"), Some(Tool::Seed));
        assert_eq!(Tool::from_id("seedTool"), Some(Tool::Seed));
        assert_eq!(Tool::from_id("water_tool"), Some(Tool::Water));
        assert_eq!(Tool::from_id("  FertilizerTool "), Some(Tool::Fertilizer));
        assert_eq!(Tool::from_id("cureTool"), Some(Tool::Cure));
    }

    #[test]
    fn unknown_tool_ids_are_rejected() {
        assert_eq!(Tool::from_id(""), None);
        assert_eq!(Tool::from_id("tool"), None);
        assert_eq!(Tool::from_id("harvestTool"), None);
        assert_eq!(Tool::from_id("seeds"), None);
    }

    #[test]
    fn tool_names_round_trip_through_from_id() {
        for tool in Tool::ALL {
            assert_eq!(Tool::from_id(tool.name()), Some(tool));
        }
    }

    #[test]
    fn step_defaults_to_seed() {
        assert_eq!(Step::default(), Step::Seed);
    }

    #[test]
    fn sound_cue_serializes_as_key() {
        let json = serde_json::to_string(&SoundCue::Harvest).unwrap_or_default();
        assert_eq!(json, "\"harvest\"");
        assert_eq!(SoundCue::Heal.key(), "heal");
    }
}
