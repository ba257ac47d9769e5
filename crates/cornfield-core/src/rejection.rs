//! Why a tool activation was refused.
//!
//! Rejections are expected user input, not faults: the sequencer shows the
//! `Display` text to the player and leaves the session untouched.

use cornfield_types::{Step, Tool};

/// A refused tool activation. `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// The tool is valid but not the current step.
    #[error("{}", not_yet_message(.tool))]
    SequenceViolation {
        /// The tool that was used.
        tool: Tool,
        /// The step the session is waiting for.
        expected: Step,
    },

    /// The tool's action has already been performed this session.
    #[error("{}", already_done_message(.tool))]
    AlreadyDone {
        /// The tool that was used.
        tool: Tool,
    },

    /// Anything but the cure was used on a diseased plant.
    #[error("plant is diseased, cure required")]
    DiseaseBlock {
        /// The tool that was used, or `None` for an unrecognised id.
        tool: Option<Tool>,
    },

    /// The cure was used on a healthy plant.
    #[error("no sign of disease for now")]
    NotDiseased,

    /// The identifier does not name a tool.
    #[error("unknown tool")]
    UnknownTool {
        /// The identifier as received.
        id: String,
    },
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn not_yet_message(tool: &Tool) -> &'static str {
    match tool {
        Tool::Seed => "it is not time to sow yet",
        Tool::Water => "it is not time to water yet",
        Tool::Fertilizer => "fertilizer cannot be added yet",
        Tool::Cure => "no sign of disease for now",
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn already_done_message(tool: &Tool) -> &'static str {
    match tool {
        Tool::Seed => "the corn is already planted",
        Tool::Water => "the plant has already been watered",
        Tool::Fertilizer => "fertilizer has already been added",
        Tool::Cure => "the plant has already been treated",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_tool_specific() {
        let seed = Rejection::SequenceViolation {
            tool: Tool::Seed,
            expected: Step::Water,
        };
        let water = Rejection::SequenceViolation {
            tool: Tool::Water,
            expected: Step::Seed,
        };
        assert_eq!(seed.to_string(), "it is not time to sow yet");
        assert_eq!(water.to_string(), "it is not time to water yet");
        assert_eq!(
            Rejection::AlreadyDone { tool: Tool::Seed }.to_string(),
            "the corn is already planted"
        );
    }

    #[test]
    fn disease_block_message() {
        let r = Rejection::DiseaseBlock {
            tool: Some(Tool::Water),
        };
        assert_eq!(r.to_string(), "plant is diseased, cure required");
    }

    #[test]
    fn unknown_tool_message_is_generic() {
        let r = Rejection::UnknownTool {
            id: "sickle".to_owned(),
        };
        assert_eq!(r.to_string(), "unknown tool");
    }
}
