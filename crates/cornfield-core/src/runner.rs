//! Real-time session loop.
//!
//! [`run_session`] drives a [`Sequencer`] from an async channel of tool
//! identifiers, mapping elapsed wall-clock time onto the sequencer's
//! virtual clock. Tool events and timer deadlines are multiplexed on one
//! task, so handlers still run one at a time and to completion.
//!
//! The session ends when:
//!
//! - **the crop is mature**: the harvest-ready tick is terminal, or
//! - **input closes while nothing is growing**: no further progress is
//!   possible without the player.

use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};
use tracing::info;

use crate::effects::{MessageDisplay, Renderer, SoundPlayer};
use crate::scheduler::ScheduleError;
use crate::sequencer::{Sequencer, SessionSummary};

/// Errors that can occur during a session run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A timer could not be scheduled or advanced.
    #[error("schedule error: {source}")]
    Schedule {
        /// The underlying scheduler error.
        #[from]
        source: ScheduleError,
    },
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEndReason {
    /// The crop reached maturity.
    Harvested,
    /// Input closed and no growth timer was running.
    InputClosed,
}

/// Result of a session run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResult {
    /// Why the session ended.
    pub end_reason: SessionEndReason,
    /// Final report.
    pub summary: SessionSummary,
}

/// Run a session until it is harvested or input closes with nothing
/// growing.
///
/// # Errors
///
/// Returns [`RunnerError`] if the sequencer's clock fails.
pub async fn run_session<R, S, D>(
    sequencer: &mut Sequencer<R, S, D>,
    tools: &mut mpsc::Receiver<String>,
) -> Result<SessionResult, RunnerError>
where
    R: Renderer,
    S: SoundPlayer,
    D: MessageDisplay,
{
    let origin = Instant::now();
    let base_ms = sequencer.now_ms();
    let mut input_open = true;

    info!(session_id = %sequencer.state().id(), "Session starting");

    let end_reason = loop {
        if sequencer.state().is_harvest_ready() {
            break SessionEndReason::Harvested;
        }
        if !input_open && !sequencer.is_growing() {
            break SessionEndReason::InputClosed;
        }

        let wake = sequencer.next_timer_due_ms().and_then(|due| {
            origin.checked_add(Duration::from_millis(due.saturating_sub(base_ms)))
        });
        // Never polled when `wake` is `None`.
        let sleep_at = wake.unwrap_or(origin);

        tokio::select! {
            received = tools.recv(), if input_open => {
                catch_up(sequencer, origin, base_ms)?;
                match received {
                    Some(tool_id) => {
                        let _ = sequencer.handle_tool(&tool_id)?;
                    }
                    None => {
                        input_open = false;
                        info!("Input closed");
                    }
                }
            }
            () = tokio::time::sleep_until(sleep_at), if wake.is_some() => {
                catch_up(sequencer, origin, base_ms)?;
            }
            else => break SessionEndReason::InputClosed,
        }
    };

    let summary = sequencer.summary();
    info!(
        session_id = %summary.session_id,
        reason = ?end_reason,
        growth_stage = summary.growth_stage,
        accepted = summary.accepted_actions,
        rejected = summary.rejected_actions,
        elapsed_ms = summary.elapsed_ms,
        "Session ended"
    );

    Ok(SessionResult {
        end_reason,
        summary,
    })
}

/// Run every timer that came due while the loop was waiting.
fn catch_up<R, S, D>(
    sequencer: &mut Sequencer<R, S, D>,
    origin: Instant,
    base_ms: u64,
) -> Result<(), ScheduleError>
where
    R: Renderer,
    S: SoundPlayer,
    D: MessageDisplay,
{
    let elapsed = u64::try_from(origin.elapsed().as_millis()).unwrap_or(u64::MAX);
    let _ = sequencer.advance_to(base_ms.saturating_add(elapsed))?;
    Ok(())
}
