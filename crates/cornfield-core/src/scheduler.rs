//! Virtual clock and timer queue for a field session.
//!
//! The scheduler is the single source of truth for time inside a session.
//! Nothing here reads the wall clock: callers move time forward explicitly
//! with [`Scheduler::pop_due`] and [`Scheduler::settle`], which makes growth
//! timing reproducible in tests and lets the async runner map real time
//! onto the same queue.
//!
//! # Design Principles
//!
//! - All time arithmetic is checked; overflow is an error, never a wrap.
//! - Timers due at the same instant fire in the order they were scheduled.
//! - A repeating timer keeps its [`TimerId`] across firings, so cancelling
//!   it from inside its own tick handler removes the re-armed entry.

use std::collections::BTreeMap;

/// Errors that can occur during scheduler operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// A deadline would exceed `u64::MAX` milliseconds.
    #[error("virtual clock overflow: cannot schedule beyond u64::MAX ms")]
    ClockOverflow,

    /// A repeating timer was requested with a zero period.
    #[error("repeating timer period must be at least 1ms")]
    ZeroPeriod,
}

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl core::fmt::Display for TimerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// What a timer does when it fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerTask {
    /// Advance the crop by one growth stage.
    GrowthTick,
    /// Toggle the diseased color of the plant.
    FlickerTick,
    /// Show a delayed message.
    ShowMessage(String),
}

/// A timer that came due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired {
    /// The timer's handle.
    pub id: TimerId,
    /// Virtual time at which it fired.
    pub at_ms: u64,
    /// The work to perform.
    pub task: TimerTask,
}

#[derive(Debug, Clone)]
struct Entry {
    id: TimerId,
    period_ms: Option<u64>,
    task: TimerTask,
}

/// Ordering key: due time first, then insertion sequence.
type SlotKey = (u64, u64);

/// Virtual-time timer queue.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    /// Current virtual time in milliseconds since session start.
    now_ms: u64,
    /// Next insertion sequence number (breaks ties between equal deadlines).
    next_seq: u64,
    /// Next timer id to hand out.
    next_id: u64,
    /// Pending entries ordered by deadline.
    queue: BTreeMap<SlotKey, Entry>,
    /// Reverse index for cancellation.
    slots: BTreeMap<TimerId, SlotKey>,
}

impl Scheduler {
    /// Create an empty scheduler at virtual time 0.
    pub const fn new() -> Self {
        Self {
            now_ms: 0,
            next_seq: 0,
            next_id: 0,
            queue: BTreeMap::new(),
            slots: BTreeMap::new(),
        }
    }

    /// Current virtual time in milliseconds.
    pub const fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule a one-shot task `delay_ms` from now.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::ClockOverflow`] if the deadline overflows.
    pub fn schedule_once(&mut self, delay_ms: u64, task: TimerTask) -> Result<TimerId, ScheduleError> {
        self.insert(delay_ms, None, task)
    }

    /// Schedule a task that fires every `period_ms`, first after one period.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::ZeroPeriod`] for a zero period, or
    /// [`ScheduleError::ClockOverflow`] if the deadline overflows.
    pub fn schedule_repeating(
        &mut self,
        period_ms: u64,
        task: TimerTask,
    ) -> Result<TimerId, ScheduleError> {
        if period_ms == 0 {
            return Err(ScheduleError::ZeroPeriod);
        }
        self.insert(period_ms, Some(period_ms), task)
    }

    /// Cancel a timer. Returns `false` if it had already fired (one-shot)
    /// or was already cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.slots
            .remove(&id)
            .and_then(|slot| self.queue.remove(&slot))
            .is_some()
    }

    /// Whether a timer is still pending.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Number of pending timers.
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Virtual time of the earliest pending timer.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.queue.keys().next().map(|&(due, _)| due)
    }

    /// Pop the earliest timer due at or before `until_ms`.
    ///
    /// Moves the clock to the timer's deadline. A repeating timer is re-armed
    /// one period later under the same id before it is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::ClockOverflow`] if re-arming overflows.
    pub fn pop_due(&mut self, until_ms: u64) -> Result<Option<Fired>, ScheduleError> {
        let Some((&slot, _)) = self.queue.first_key_value() else {
            return Ok(None);
        };
        let (due, _) = slot;
        if due > until_ms {
            return Ok(None);
        }
        let Some(entry) = self.queue.remove(&slot) else {
            return Ok(None);
        };
        self.slots.remove(&entry.id);
        self.now_ms = self.now_ms.max(due);

        if let Some(period) = entry.period_ms {
            let next_due = due.checked_add(period).ok_or(ScheduleError::ClockOverflow)?;
            let key = (next_due, self.bump_seq());
            self.slots.insert(entry.id, key);
            self.queue.insert(key, entry.clone());
        }

        Ok(Some(Fired {
            id: entry.id,
            at_ms: due,
            task: entry.task,
        }))
    }

    /// Move the clock forward to `target_ms` once every due timer has been
    /// popped. Never moves time backwards.
    pub fn settle(&mut self, target_ms: u64) {
        self.now_ms = self.now_ms.max(target_ms);
    }

    fn insert(
        &mut self,
        delay_ms: u64,
        period_ms: Option<u64>,
        task: TimerTask,
    ) -> Result<TimerId, ScheduleError> {
        let due = self
            .now_ms
            .checked_add(delay_ms)
            .ok_or(ScheduleError::ClockOverflow)?;
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        let key = (due, self.bump_seq());
        self.slots.insert(id, key);
        self.queue.insert(
            key,
            Entry {
                id,
                period_ms,
                task,
            },
        );
        Ok(id)
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.saturating_add(1);
        seq
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Pop everything due up to `until`, then settle there.
    fn drain(scheduler: &mut Scheduler, until: u64) -> Vec<Fired> {
        let mut fired = Vec::new();
        while let Some(f) = scheduler.pop_due(until).unwrap() {
            fired.push(f);
        }
        scheduler.settle(until);
        fired
    }

    #[test]
    fn scheduler_starts_at_zero() {
        let scheduler = Scheduler::new();
        assert_eq!(scheduler.now_ms(), 0);
        assert_eq!(scheduler.next_due_ms(), None);
    }

    #[test]
    fn one_shot_fires_once() {
        let mut scheduler = Scheduler::new();
        let id = scheduler
            .schedule_once(3000, TimerTask::ShowMessage("hint".to_owned()))
            .unwrap();
        assert!(scheduler.is_active(id));

        assert!(drain(&mut scheduler, 2999).is_empty());
        let fired = drain(&mut scheduler, 3000);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired.first().map(|f| f.at_ms), Some(3000));
        assert!(!scheduler.is_active(id));
        assert!(drain(&mut scheduler, 10_000).is_empty());
    }

    #[test]
    fn repeating_timer_rearms_with_same_id() {
        let mut scheduler = Scheduler::new();
        let id = scheduler
            .schedule_repeating(5000, TimerTask::GrowthTick)
            .unwrap();

        let fired = drain(&mut scheduler, 15_000);
        assert_eq!(fired.len(), 3);
        assert!(fired.iter().all(|f| f.id == id));
        let times: Vec<u64> = fired.iter().map(|f| f.at_ms).collect();
        assert_eq!(times, vec![5000, 10_000, 15_000]);
        assert!(scheduler.is_active(id));
        assert_eq!(scheduler.next_due_ms(), Some(20_000));
    }

    #[test]
    fn cancel_removes_rearmed_entry() {
        let mut scheduler = Scheduler::new();
        let id = scheduler
            .schedule_repeating(500, TimerTask::FlickerTick)
            .unwrap();
        let first = scheduler.pop_due(500).unwrap();
        assert!(first.is_some());
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn ties_fire_in_scheduling_order() {
        let mut scheduler = Scheduler::new();
        let a = scheduler
            .schedule_once(1000, TimerTask::ShowMessage("a".to_owned()))
            .unwrap();
        let b = scheduler
            .schedule_once(1000, TimerTask::ShowMessage("b".to_owned()))
            .unwrap();
        let fired = drain(&mut scheduler, 1000);
        let ids: Vec<TimerId> = fired.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn settle_never_moves_backwards() {
        let mut scheduler = Scheduler::new();
        scheduler.settle(4000);
        scheduler.settle(1000);
        assert_eq!(scheduler.now_ms(), 4000);
    }

    #[test]
    fn delays_are_relative_to_now() {
        let mut scheduler = Scheduler::new();
        scheduler.settle(7000);
        let _ = scheduler
            .schedule_once(2000, TimerTask::ShowMessage("later".to_owned()))
            .unwrap();
        assert_eq!(scheduler.next_due_ms(), Some(9000));
    }

    #[test]
    fn zero_period_is_rejected() {
        let mut scheduler = Scheduler::new();
        let result = scheduler.schedule_repeating(0, TimerTask::GrowthTick);
        assert_eq!(result, Err(ScheduleError::ZeroPeriod));
    }

    #[test]
    fn overflowing_deadline_is_rejected() {
        let mut scheduler = Scheduler::new();
        scheduler.settle(u64::MAX);
        let result = scheduler.schedule_once(1, TimerTask::GrowthTick);
        assert_eq!(result, Err(ScheduleError::ClockOverflow));
    }
}
