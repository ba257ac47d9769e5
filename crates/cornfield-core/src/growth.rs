//! Growth scheduler: the periodic growth timer, the disease flicker timer,
//! and the per-tick growth rule.
//!
//! The scheduler owns at most one growth timer and at most one flicker
//! timer. Starting either one cancels any previous instance first, so a
//! Fertilizer followed later by a Cure can never leave two growth timers
//! running.

use tracing::debug;

use crate::config::{DiseaseConfig, GrowthConfig};
use crate::scheduler::{ScheduleError, Scheduler, TimerId, TimerTask};
use crate::session::SessionState;

/// What a growth tick should do, decided from the session alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickPlan {
    /// The plant is diseased: stop the growth timer and do nothing else.
    Halt,
    /// The crop reached maturity: harvest-ready and stop for good.
    HarvestReady,
    /// Grow to `stage`; `disease_onset` is set when that stage makes an
    /// uncured plant ill.
    Grow {
        /// The stage after this tick.
        stage: u32,
        /// Whether this tick triggers the disease episode.
        disease_onset: bool,
    },
}

/// Decide the outcome of one growth tick.
pub const fn plan_tick(state: &SessionState, config: &GrowthConfig) -> TickPlan {
    if state.is_diseased() {
        return TickPlan::Halt;
    }
    if state.growth_stage() >= config.maturity_stage {
        return TickPlan::HarvestReady;
    }
    let stage = state.growth_stage().saturating_add(1);
    TickPlan::Grow {
        stage,
        disease_onset: stage == config.disease_stage && !state.has_cured(),
    }
}

/// Owner of the growth and flicker timer handles.
#[derive(Debug, Clone)]
pub struct GrowthScheduler {
    period_ms: u64,
    flicker_period_ms: u64,
    growth_timer: Option<TimerId>,
    flicker_timer: Option<TimerId>,
    /// Which diseased hue the next flicker tick shows.
    flicker_bright: bool,
}

impl GrowthScheduler {
    /// Create a stopped scheduler.
    pub const fn new(growth: &GrowthConfig, disease: &DiseaseConfig) -> Self {
        Self {
            period_ms: growth.period_ms,
            flicker_period_ms: disease.flicker_period_ms,
            growth_timer: None,
            flicker_timer: None,
            flicker_bright: false,
        }
    }

    /// Start (or restart) the growth timer, cancelling any running one.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError`] if the timer cannot be scheduled.
    pub fn start(&mut self, clock: &mut Scheduler) -> Result<TimerId, ScheduleError> {
        self.stop(clock);
        let id = clock.schedule_repeating(self.period_ms, TimerTask::GrowthTick)?;
        debug!(timer = %id, period_ms = self.period_ms, "growth timer started");
        self.growth_timer = Some(id);
        Ok(id)
    }

    /// Stop the growth timer. Returns `true` if one was running.
    pub fn stop(&mut self, clock: &mut Scheduler) -> bool {
        let Some(id) = self.growth_timer.take() else {
            return false;
        };
        let cancelled = clock.cancel(id);
        if cancelled {
            debug!(timer = %id, "growth timer stopped");
        }
        cancelled
    }

    /// Whether the growth timer is installed and still pending.
    pub fn is_running(&self, clock: &Scheduler) -> bool {
        self.growth_timer.is_some_and(|id| clock.is_active(id))
    }

    /// Whether `id` is the current growth timer.
    pub fn is_growth_timer(&self, id: TimerId) -> bool {
        self.growth_timer == Some(id)
    }

    /// Start the flicker timer, cancelling any running one.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError`] if the timer cannot be scheduled.
    pub fn start_flicker(&mut self, clock: &mut Scheduler) -> Result<TimerId, ScheduleError> {
        self.stop_flicker(clock);
        let id = clock.schedule_repeating(self.flicker_period_ms, TimerTask::FlickerTick)?;
        debug!(timer = %id, period_ms = self.flicker_period_ms, "flicker started");
        self.flicker_timer = Some(id);
        self.flicker_bright = false;
        Ok(id)
    }

    /// Stop the flicker timer. Returns `true` if one was running.
    pub fn stop_flicker(&mut self, clock: &mut Scheduler) -> bool {
        let Some(id) = self.flicker_timer.take() else {
            return false;
        };
        clock.cancel(id)
    }

    /// Whether the flicker timer is installed and still pending.
    pub fn is_flickering(&self, clock: &Scheduler) -> bool {
        self.flicker_timer.is_some_and(|id| clock.is_active(id))
    }

    /// Whether `id` is the current flicker timer.
    pub fn is_flicker_timer(&self, id: TimerId) -> bool {
        self.flicker_timer == Some(id)
    }

    /// Toggle the intensity bit. Returns `true` for the bright hue.
    pub const fn toggle_intensity(&mut self) -> bool {
        self.flicker_bright = !self.flicker_bright;
        self.flicker_bright
    }
}
