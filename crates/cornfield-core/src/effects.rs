//! Output boundaries: renderer, sound player, and message display.
//!
//! The sequencer drives all three synchronously and never reads anything
//! back. Implementations decide what "render" and "play" mean: the browser
//! front end maps them to a 3D scene and audio elements, the engine binary
//! logs them, and the [`recording`] implementations capture them for tests.

use cornfield_types::{SceneCommand, SoundCue};

/// Accepts declarative scene instructions for the plant.
pub trait Renderer {
    /// Apply one instruction. Completes synchronously; errors are not modeled.
    fn apply(&mut self, command: SceneCommand);
}

/// Errors a sound player may report. Callers ignore them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SoundError {
    /// No asset is loaded for the cue.
    #[error("no sound loaded for cue {cue:?}")]
    Unavailable {
        /// The cue that could not be played.
        cue: SoundCue,
    },

    /// The platform refused playback (e.g. autoplay blocked).
    #[error("playback failed: {message}")]
    Playback {
        /// Description of the failure.
        message: String,
    },
}

/// Plays named sound cues.
pub trait SoundPlayer {
    /// Restart and play `cue` at `volume` (`0.0..=1.0`).
    ///
    /// # Errors
    ///
    /// Returns [`SoundError`] if playback fails. The sequencer swallows it.
    fn play(&mut self, cue: SoundCue, volume: f32) -> Result<(), SoundError>;
}

/// Shows the single current user-facing message.
pub trait MessageDisplay {
    /// Replace the current message.
    fn show(&mut self, message: &str);
}

/// In-memory implementations that record every call.
pub mod recording {
    use cornfield_types::{SceneCommand, SoundCue};

    use super::{MessageDisplay, Renderer, SoundError, SoundPlayer};

    /// Records scene commands in order.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingRenderer {
        /// Every command received.
        pub commands: Vec<SceneCommand>,
    }

    impl RecordingRenderer {
        /// Number of commands received.
        pub fn len(&self) -> usize {
            self.commands.len()
        }

        /// Whether nothing has been rendered.
        pub fn is_empty(&self) -> bool {
            self.commands.is_empty()
        }

        /// The last command received.
        pub fn last(&self) -> Option<&SceneCommand> {
            self.commands.last()
        }
    }

    impl Renderer for RecordingRenderer {
        fn apply(&mut self, command: SceneCommand) {
            self.commands.push(command);
        }
    }

    /// Records played cues; optionally fails every call.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingSoundPlayer {
        /// Cues in play order, including ones that failed.
        pub played: Vec<SoundCue>,
        /// When set, every call returns [`SoundError::Playback`].
        pub fail: bool,
    }

    impl RecordingSoundPlayer {
        /// A player whose every call fails.
        pub fn failing() -> Self {
            Self {
                played: Vec::new(),
                fail: true,
            }
        }
    }

    impl SoundPlayer for RecordingSoundPlayer {
        fn play(&mut self, cue: SoundCue, _volume: f32) -> Result<(), SoundError> {
            self.played.push(cue);
            if self.fail {
                return Err(SoundError::Playback {
                    message: "autoplay blocked".to_owned(),
                });
            }
            Ok(())
        }
    }

    /// Records every message shown.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingDisplay {
        /// Messages in display order.
        pub history: Vec<String>,
    }

    impl RecordingDisplay {
        /// The message currently on screen.
        pub fn current(&self) -> Option<&str> {
            self.history.last().map(String::as_str)
        }
    }

    impl MessageDisplay for RecordingDisplay {
        fn show(&mut self, message: &str) {
            self.history.push(message.to_owned());
        }
    }
}
