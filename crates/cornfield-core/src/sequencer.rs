//! The sequencer: the action gate and owner of all session state.
//!
//! Every tool activation and every timer tick goes through a
//! [`Sequencer`]. It checks the activation against the current step and
//! flags, applies the transition, and drives the renderer, sound player
//! and message display. Timer work (growth ticks, disease flicker, delayed
//! hints) runs from [`Sequencer::advance_to`], so a session is fully
//! deterministic for a given sequence of inputs and elapsed times.
//!
//! # Transition table
//!
//! | Tool       | Accepted when                      | Next step    |
//! |------------|------------------------------------|--------------|
//! | Seed       | step is Seed, not yet planted      | Water        |
//! | Water      | step is Water, not yet watered     | Fertilizer   |
//! | Fertilizer | step is Fertilizer, not fertilized | Growth       |
//! | Cure       | plant is diseased                  | Growth       |
//!
//! While the plant is diseased every tool except Cure is refused.

use chrono::{DateTime, Utc};
use cornfield_types::{SceneCommand, SessionId, SoundCue, Step, Tool};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::FieldConfig;
use crate::effects::{MessageDisplay, Renderer, SoundPlayer};
use crate::growth::{GrowthScheduler, TickPlan, plan_tick};
use crate::plant::Plant;
use crate::rejection::Rejection;
use crate::scheduler::{ScheduleError, Scheduler, TimerTask};
use crate::session::SessionState;

// ---------------------------------------------------------------------------
// Player-facing text
// ---------------------------------------------------------------------------

/// Shown when a session opens.
pub const WELCOME_MESSAGE: &str = "drag the seed onto the field to plant corn!";

const PLANTED_MESSAGE: &str = "seed planted! wait a few seconds...";
const PLANTED_HINT: &str = "now water the plant!";
const WATERED_MESSAGE: &str = "watering done! wait a moment...";
const WATERED_HINT: &str = "you can now add the fertilizer!";
const FERTILIZED_MESSAGE: &str = "fertilizer added! growth begins...";
const CURED_MESSAGE: &str = "treatment applied, the plant is healthy again!";
const CURED_FOLLOWUP: &str = "growth resumed...";
const DISEASE_MESSAGE: &str = "leaves are yellowing and reddening: apply the treatment!";
const HARVEST_MESSAGE: &str = "the corn is mature! you can harvest!";

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of a tool activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    /// The action was applied.
    Applied {
        /// The tool that was used.
        tool: Tool,
        /// The step the session moved to.
        next_step: Step,
    },
    /// The action was refused; the session is unchanged.
    Rejected(Rejection),
}

impl ToolOutcome {
    /// Whether the action was applied.
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// The rejection, if the action was refused.
    pub const fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Applied { .. } => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }
}

/// Result of a growth tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthOutcome {
    /// No growth timer is running; nothing happened.
    Idle,
    /// The plant was diseased; the growth timer stopped itself.
    Halted,
    /// The plant grew to `stage`.
    Grew {
        /// The new growth stage.
        stage: u32,
    },
    /// The plant grew to `stage` and fell ill; growth is paused.
    DiseaseOnset {
        /// The new growth stage.
        stage: u32,
    },
    /// The crop is mature; growth has stopped for good.
    HarvestReady,
}

/// End-of-session report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// The session.
    pub session_id: SessionId,
    /// When the session was created.
    pub started_at: DateTime<Utc>,
    /// Final growth stage.
    pub growth_stage: u32,
    /// Whether the crop reached maturity.
    pub is_harvest_ready: bool,
    /// Whether the session ended mid disease episode.
    pub is_diseased: bool,
    /// Tool activations applied.
    pub accepted_actions: u32,
    /// Tool activations refused.
    pub rejected_actions: u32,
    /// Virtual time elapsed, in milliseconds.
    pub elapsed_ms: u64,
}

// ---------------------------------------------------------------------------
// Sequencer
// ---------------------------------------------------------------------------

/// Finite-state controller for one field session.
#[derive(Debug)]
pub struct Sequencer<R, S, D> {
    state: SessionState,
    config: FieldConfig,
    clock: Scheduler,
    growth: GrowthScheduler,
    plant: Option<Plant>,
    renderer: R,
    sound: S,
    display: D,
    accepted: u32,
    rejected: u32,
}

impl<R, S, D> Sequencer<R, S, D>
where
    R: Renderer,
    S: SoundPlayer,
    D: MessageDisplay,
{
    /// Open a session with the given configuration and output boundaries.
    pub fn new(config: FieldConfig, renderer: R, sound: S, display: D) -> Self {
        let growth = GrowthScheduler::new(&config.growth, &config.disease);
        Self {
            state: SessionState::new(),
            config,
            clock: Scheduler::new(),
            growth,
            plant: None,
            renderer,
            sound,
            display,
            accepted: 0,
            rejected: 0,
        }
    }

    /// Show the opening instruction.
    pub fn welcome(&mut self) {
        self.display.show(WELCOME_MESSAGE);
    }

    /// Handle a tool activation from the input layer.
    ///
    /// Refusals are reported as [`ToolOutcome::Rejected`] after their
    /// message has been shown; they never surface as errors.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError`] only if a timer cannot be scheduled.
    pub fn handle_tool(&mut self, tool_id: &str) -> Result<ToolOutcome, ScheduleError> {
        let resolved = Tool::from_id(tool_id);
        let checked = if self.state.is_diseased() && resolved != Some(Tool::Cure) {
            Err(Rejection::DiseaseBlock { tool: resolved })
        } else {
            resolved
                .ok_or_else(|| Rejection::UnknownTool {
                    id: tool_id.to_owned(),
                })
                .and_then(|tool| self.check(tool).map(|()| tool))
        };

        let tool = match checked {
            Ok(tool) => tool,
            Err(rejection) => {
                self.rejected = self.rejected.saturating_add(1);
                if matches!(rejection, Rejection::DiseaseBlock { .. }) {
                    self.play(SoundCue::Disease);
                }
                self.display.show(&rejection.to_string());
                return Ok(ToolOutcome::Rejected(rejection));
            }
        };

        self.perform(tool)?;
        self.accepted = self.accepted.saturating_add(1);
        let next_step = self.state.current_step();
        info!(
            session_id = %self.state.id(),
            tool = tool.name(),
            next_step = ?next_step,
            "tool applied"
        );
        Ok(ToolOutcome::Applied { tool, next_step })
    }

    /// Run one growth tick.
    ///
    /// Does nothing unless the growth timer is running, so a stopped timer
    /// can never advance the stage.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError`] if the flicker timer cannot be scheduled.
    pub fn on_growth_tick(&mut self) -> Result<GrowthOutcome, ScheduleError> {
        if !self.growth.is_running(&self.clock) {
            return Ok(GrowthOutcome::Idle);
        }

        match plan_tick(&self.state, &self.config.growth) {
            TickPlan::Halt => {
                self.growth.stop(&mut self.clock);
                Ok(GrowthOutcome::Halted)
            }
            TickPlan::HarvestReady => {
                self.growth.stop(&mut self.clock);
                self.ripen();
                Ok(GrowthOutcome::HarvestReady)
            }
            TickPlan::Grow {
                stage,
                disease_onset,
            } => {
                if disease_onset {
                    self.growth.start_flicker(&mut self.clock)?;
                }
                let _ = self.state.advance_stage();
                self.apply_growth_delta();

                if disease_onset {
                    self.state.mark_diseased();
                    self.play(SoundCue::Disease);
                    self.display.show(DISEASE_MESSAGE);
                    self.growth.stop(&mut self.clock);
                    info!(session_id = %self.state.id(), stage, "disease onset, growth paused");
                    Ok(GrowthOutcome::DiseaseOnset { stage })
                } else {
                    let maturity = self.config.growth.maturity_stage;
                    self.display.show(&format!("growth: stage {stage}/{maturity}"));
                    debug!(session_id = %self.state.id(), stage, "plant grew");
                    Ok(GrowthOutcome::Grew { stage })
                }
            }
        }
    }

    /// Run one disease flicker tick.
    ///
    /// Returns the color applied, or `None` if the flicker stopped itself
    /// (or was not running).
    pub fn on_flicker_tick(&mut self) -> Option<cornfield_types::Rgb> {
        if !self.growth.is_flickering(&self.clock) {
            return None;
        }
        if !self.state.is_diseased() {
            self.growth.stop_flicker(&mut self.clock);
            debug!(session_id = %self.state.id(), "flicker stopped");
            return None;
        }
        let color = if self.growth.toggle_intensity() {
            self.config.disease.bright_hue
        } else {
            self.config.disease.dim_hue
        };
        self.recolor_plant(color);
        Some(color)
    }

    /// Advance virtual time by `elapsed_ms`, running every timer that
    /// comes due. Returns the outcome of each growth tick that ran.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError`] on clock overflow.
    pub fn advance_by(&mut self, elapsed_ms: u64) -> Result<Vec<GrowthOutcome>, ScheduleError> {
        let target = self
            .clock
            .now_ms()
            .checked_add(elapsed_ms)
            .ok_or(ScheduleError::ClockOverflow)?;
        self.advance_to(target)
    }

    /// Advance virtual time to `target_ms`, running every timer that comes
    /// due in deadline order. Earlier targets are a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError`] on clock overflow.
    pub fn advance_to(&mut self, target_ms: u64) -> Result<Vec<GrowthOutcome>, ScheduleError> {
        let mut outcomes = Vec::new();
        while let Some(fired) = self.clock.pop_due(target_ms)? {
            match fired.task {
                TimerTask::GrowthTick => {
                    if self.growth.is_growth_timer(fired.id) {
                        outcomes.push(self.on_growth_tick()?);
                    }
                }
                TimerTask::FlickerTick => {
                    if self.growth.is_flicker_timer(fired.id) {
                        let _ = self.on_flicker_tick();
                    }
                }
                TimerTask::ShowMessage(text) => self.display.show(&text),
            }
        }
        self.clock.settle(target_ms);
        Ok(outcomes)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The session state.
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// The configuration in use.
    pub const fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// The plant, once seeded.
    pub const fn plant(&self) -> Option<&Plant> {
        self.plant.as_ref()
    }

    /// The renderer.
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The sound player.
    pub const fn sound(&self) -> &S {
        &self.sound
    }

    /// The message display.
    pub const fn display(&self) -> &D {
        &self.display
    }

    /// Current virtual time in milliseconds.
    pub const fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Virtual time of the next pending timer, if any.
    pub fn next_timer_due_ms(&self) -> Option<u64> {
        self.clock.next_due_ms()
    }

    /// Whether the growth timer is running.
    pub fn is_growing(&self) -> bool {
        self.growth.is_running(&self.clock)
    }

    /// Whether the disease flicker is running.
    pub fn is_flickering(&self) -> bool {
        self.growth.is_flickering(&self.clock)
    }

    /// Report on the session so far.
    pub const fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.state.id(),
            started_at: self.state.started_at(),
            growth_stage: self.state.growth_stage(),
            is_harvest_ready: self.state.is_harvest_ready(),
            is_diseased: self.state.is_diseased(),
            accepted_actions: self.accepted,
            rejected_actions: self.rejected,
            elapsed_ms: self.clock.now_ms(),
        }
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Guard a resolved tool against the current state without touching
    /// it. The disease block is applied by the caller beforehand.
    fn check(&self, tool: Tool) -> Result<(), Rejection> {
        let state = &self.state;
        let (done, gate) = match tool {
            Tool::Seed => (state.has_planted(), Step::Seed),
            Tool::Water => (state.has_watered(), Step::Water),
            Tool::Fertilizer => (state.has_fertilized(), Step::Fertilizer),
            Tool::Cure => {
                return if state.is_diseased() {
                    Ok(())
                } else {
                    Err(Rejection::NotDiseased)
                };
            }
        };

        if done {
            return Err(Rejection::AlreadyDone { tool });
        }
        if state.current_step() != gate {
            return Err(Rejection::SequenceViolation {
                tool,
                expected: state.current_step(),
            });
        }
        Ok(())
    }

    /// Apply a tool that passed [`Self::check`]. Fallible scheduling runs
    /// before any state change.
    fn perform(&mut self, tool: Tool) -> Result<(), ScheduleError> {
        match tool {
            Tool::Seed => {
                self.clock.schedule_once(
                    self.config.messages.hint_delay_ms,
                    TimerTask::ShowMessage(PLANTED_HINT.to_owned()),
                )?;
                let (plant, parts) = Plant::sprout();
                self.renderer.apply(SceneCommand::BuildPlant { parts });
                self.plant = Some(plant);
                self.play(SoundCue::Plant);
                self.state.mark_planted();
                self.display.show(PLANTED_MESSAGE);
            }
            Tool::Water => {
                self.clock.schedule_once(
                    self.config.messages.hint_delay_ms,
                    TimerTask::ShowMessage(WATERED_HINT.to_owned()),
                )?;
                self.play(SoundCue::Water);
                self.state.mark_watered();
                self.display.show(WATERED_MESSAGE);
            }
            Tool::Fertilizer => {
                self.growth.start(&mut self.clock)?;
                self.play(SoundCue::Fertilizer);
                self.state.mark_fertilized();
                self.display.show(FERTILIZED_MESSAGE);
            }
            Tool::Cure => {
                self.growth.start(&mut self.clock)?;
                self.clock.schedule_once(
                    self.config.messages.cure_followup_delay_ms,
                    TimerTask::ShowMessage(CURED_FOLLOWUP.to_owned()),
                )?;
                self.play(SoundCue::Heal);
                self.recolor_plant(self.config.disease.healthy_color);
                self.state.mark_cured();
                self.display.show(CURED_MESSAGE);
            }
        }
        Ok(())
    }

    /// Terminal tick: attach cobs, announce, mark ready.
    fn ripen(&mut self) {
        if let Some(cobs) = self.plant.as_mut().and_then(Plant::attach_cobs) {
            self.renderer.apply(SceneCommand::AttachToPlant { parts: cobs });
        }
        self.play(SoundCue::Harvest);
        self.display.show(HARVEST_MESSAGE);
        self.state.mark_harvest_ready();
        info!(
            session_id = %self.state.id(),
            stage = self.state.growth_stage(),
            "crop mature, growth stopped"
        );
    }

    fn apply_growth_delta(&mut self) {
        let growth = &self.config.growth;
        if let Some(plant) = self.plant.as_mut() {
            let transform = plant.grow(growth.scale_step, growth.lift_step);
            self.renderer.apply(SceneCommand::SetPlantTransform { transform });
        }
    }

    fn recolor_plant(&mut self, color: cornfield_types::Rgb) {
        if let Some(plant) = self.plant.as_ref() {
            self.renderer.apply(SceneCommand::Recolor {
                parts: plant.paintable_parts().to_vec(),
                color,
            });
        }
    }

    /// Play a cue at its configured volume. Failures are logged and dropped.
    fn play(&mut self, cue: SoundCue) {
        let volume = self.config.sounds.volume(cue);
        if let Err(err) = self.sound.play(cue, volume) {
            debug!(cue = cue.key(), error = %err, "sound playback failed");
        }
    }
}
