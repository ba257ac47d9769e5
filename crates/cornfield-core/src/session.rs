//! Per-session farming state.
//!
//! One [`SessionState`] exists per field session and is owned by the
//! sequencer. Progress flags only ever go from `false` to `true`; the
//! mutators below are the only way to change them and they encode the
//! step each transition leads to, so flags and step cannot drift apart.

use chrono::{DateTime, Utc};
use cornfield_types::{SessionId, SessionSnapshot, Step};

/// Mutable state of one simulation session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    id: SessionId,
    started_at: DateTime<Utc>,
    current_step: Step,
    has_planted: bool,
    has_watered: bool,
    has_fertilized: bool,
    has_cured: bool,
    is_diseased: bool,
    is_harvest_ready: bool,
    growth_stage: u32,
}

impl SessionState {
    /// Fresh session: nothing planted, stage 0, waiting for the seed.
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            started_at: Utc::now(),
            current_step: Step::Seed,
            has_planted: false,
            has_watered: false,
            has_fertilized: false,
            has_cured: false,
            is_diseased: false,
            is_harvest_ready: false,
            growth_stage: 0,
        }
    }

    /// Session identifier.
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Wall-clock time the session was created.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The only step currently accepted.
    pub const fn current_step(&self) -> Step {
        self.current_step
    }

    /// Seed planted.
    pub const fn has_planted(&self) -> bool {
        self.has_planted
    }

    /// Plant watered.
    pub const fn has_watered(&self) -> bool {
        self.has_watered
    }

    /// Fertilizer applied.
    pub const fn has_fertilized(&self) -> bool {
        self.has_fertilized
    }

    /// Cured at least once.
    pub const fn has_cured(&self) -> bool {
        self.has_cured
    }

    /// Currently diseased.
    pub const fn is_diseased(&self) -> bool {
        self.is_diseased
    }

    /// Crop reached maturity.
    pub const fn is_harvest_ready(&self) -> bool {
        self.is_harvest_ready
    }

    /// Growth counter.
    pub const fn growth_stage(&self) -> u32 {
        self.growth_stage
    }

    /// Serializable view for front ends.
    pub const fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            current_step: self.current_step,
            has_planted: self.has_planted,
            has_watered: self.has_watered,
            has_fertilized: self.has_fertilized,
            has_cured: self.has_cured,
            is_diseased: self.is_diseased,
            is_harvest_ready: self.is_harvest_ready,
            growth_stage: self.growth_stage,
        }
    }

    pub(crate) const fn mark_planted(&mut self) {
        self.has_planted = true;
        self.current_step = Step::Water;
    }

    pub(crate) const fn mark_watered(&mut self) {
        self.has_watered = true;
        self.current_step = Step::Fertilizer;
    }

    pub(crate) const fn mark_fertilized(&mut self) {
        self.has_fertilized = true;
        self.current_step = Step::Growth;
    }

    pub(crate) const fn mark_diseased(&mut self) {
        self.is_diseased = true;
        self.current_step = Step::Cure;
    }

    pub(crate) const fn mark_cured(&mut self) {
        self.is_diseased = false;
        self.has_cured = true;
        self.current_step = Step::Growth;
    }

    pub(crate) const fn mark_harvest_ready(&mut self) {
        self.is_harvest_ready = true;
    }

    /// Increment the growth stage. Returns the new stage.
    pub(crate) const fn advance_stage(&mut self) -> u32 {
        self.growth_stage = self.growth_stage.saturating_add(1);
        self.growth_stage
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_blank() {
        let state = SessionState::new();
        assert_eq!(state.current_step(), Step::Seed);
        assert!(!state.has_planted());
        assert!(!state.has_watered());
        assert!(!state.has_fertilized());
        assert!(!state.has_cured());
        assert!(!state.is_diseased());
        assert!(!state.is_harvest_ready());
        assert_eq!(state.growth_stage(), 0);
    }

    #[test]
    fn transitions_set_flag_and_step_together() {
        let mut state = SessionState::new();
        state.mark_planted();
        assert!(state.has_planted());
        assert_eq!(state.current_step(), Step::Water);
        state.mark_watered();
        assert_eq!(state.current_step(), Step::Fertilizer);
        state.mark_fertilized();
        assert_eq!(state.current_step(), Step::Growth);
        state.mark_diseased();
        assert!(state.is_diseased());
        assert_eq!(state.current_step(), Step::Cure);
        state.mark_cured();
        assert!(!state.is_diseased());
        assert!(state.has_cured());
        assert_eq!(state.current_step(), Step::Growth);
    }

    #[test]
    fn snapshot_mirrors_state() {
        let mut state = SessionState::new();
        state.mark_planted();
        let _ = state.advance_stage();
        let snap = state.snapshot();
        assert_eq!(snap.session_id, state.id());
        assert!(snap.has_planted);
        assert_eq!(snap.current_step, Step::Water);
        assert_eq!(snap.growth_stage, 1);
    }
}
