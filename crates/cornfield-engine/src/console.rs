//! Terminal implementations of the output boundaries.
//!
//! Scene commands are logged as JSON so a browser bridge tailing the log
//! could replay them; sounds are logged by cue and volume; messages go to
//! stdout, one line per message.

use std::io::Write as _;

use cornfield_core::effects::{MessageDisplay, Renderer, SoundError, SoundPlayer};
use cornfield_types::{SceneCommand, SoundCue};
use tracing::{debug, info, warn};

/// Logs every scene command at debug level.
#[derive(Debug, Default)]
pub struct LogRenderer {
    commands: u64,
}

impl Renderer for LogRenderer {
    fn apply(&mut self, command: SceneCommand) {
        self.commands = self.commands.saturating_add(1);
        match serde_json::to_string(&command) {
            Ok(json) => debug!(seq = self.commands, command = %json, "scene"),
            Err(e) => warn!(error = %e, "failed to encode scene command"),
        }
    }
}

/// "Plays" a cue by logging it. Muted cues report as unavailable.
#[derive(Debug, Default)]
pub struct LogSoundPlayer {
    muted: bool,
}

impl LogSoundPlayer {
    /// A player that refuses every cue, for running without audio.
    pub const fn muted() -> Self {
        Self { muted: true }
    }
}

impl SoundPlayer for LogSoundPlayer {
    fn play(&mut self, cue: SoundCue, volume: f32) -> Result<(), SoundError> {
        if self.muted {
            return Err(SoundError::Unavailable { cue });
        }
        info!(cue = cue.key(), volume = f64::from(volume), "sound");
        Ok(())
    }
}

/// Writes each message to stdout on its own line.
#[derive(Debug, Default)]
pub struct StdoutDisplay;

impl MessageDisplay for StdoutDisplay {
    fn show(&mut self, message: &str) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{message}").and_then(|()| out.flush()) {
            warn!(error = %e, "failed to write message");
        }
    }
}
