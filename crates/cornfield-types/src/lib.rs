//! Shared type definitions for the Cornfield crop simulation.
//!
//! Everything that crosses the boundary between the sequencing core and a
//! front end lives here. Types flow to `TypeScript` via `ts-rs` so the
//! browser field view can consume tool names, sound cues and scene parts
//! without hand-written mirrors.
//!
//! # Modules
//!
//! - [`ids`] -- Session and plant-part identifiers
//! - [`enums`] -- Tools, steps, sound cues and part kinds
//! - [`structs`] -- Colors, geometry, part specs, scene commands and the
//!   session snapshot

pub mod enums;
pub mod ids;
pub mod structs;

pub use enums::{PartKind, SoundCue, Step, Tool};
pub use ids::{PartId, SessionId};
pub use structs::{PartSpec, Rgb, SceneCommand, SessionSnapshot, Transform, Vec3};
