//! Action sequencer, growth scheduler, and session loop for the Cornfield
//! simulation.
//!
//! This crate owns the rules of the field: which tool may be used next,
//! how the crop grows on a timer, when disease strikes, and when the crop
//! is ready. Rendering, audio and input are reached through the traits in
//! [`effects`].
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `cornfield-config.yaml` into
//!   strongly-typed structs.
//! - [`effects`] -- [`Renderer`], [`SoundPlayer`] and [`MessageDisplay`]
//!   boundaries plus recording implementations.
//! - [`growth`] -- Growth and flicker timer ownership and the per-tick rule.
//! - [`plant`] -- Plant layout, growth transform and paintable parts.
//! - [`rejection`] -- Why a tool activation was refused.
//! - [`runner`] -- Async loop mapping wall-clock time onto a session.
//! - [`scheduler`] -- Virtual clock and cancellable timer queue.
//! - [`sequencer`] -- The action gate that owns the session.
//! - [`session`] -- Per-session flags, step and growth stage.
//!
//! [`Renderer`]: effects::Renderer
//! [`SoundPlayer`]: effects::SoundPlayer
//! [`MessageDisplay`]: effects::MessageDisplay

pub mod config;
pub mod effects;
pub mod growth;
pub mod plant;
pub mod rejection;
pub mod runner;
pub mod scheduler;
pub mod sequencer;
pub mod session;

pub use config::{ConfigError, FieldConfig};
pub use rejection::Rejection;
pub use sequencer::{GrowthOutcome, Sequencer, SessionSummary, ToolOutcome};
pub use session::SessionState;
