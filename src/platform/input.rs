//! Raw input to command mapping
//!
//! Kept free of browser types so the mapping is testable natively; the
//! wasm listeners pass the event's strings and button numbers through.

use crate::sim::tick::Command;

/// Primary mouse button as reported by `PointerEvent.button`
const PRIMARY_BUTTON: i16 = 0;

/// Map a `KeyboardEvent.code` to a command
pub fn command_for_key(code: &str) -> Option<Command> {
    match code {
        "Space" => Some(Command::Activate),
        _ => None,
    }
}

/// Key that shows or hides the FPS readout
pub fn is_fps_toggle(code: &str) -> bool {
    code == "KeyF"
}

/// Map a pointer press to a command
///
/// Mice only activate on the primary button; touch and pen always do.
pub fn command_for_pointer(pointer_type: &str, button: i16) -> Option<Command> {
    match pointer_type {
        "mouse" if button != PRIMARY_BUTTON => None,
        _ => Some(Command::Activate),
    }
}

/// Map a DOM button id to a command
pub fn command_for_button(id: &str) -> Option<Command> {
    match id {
        "startBtn" => Some(Command::StartRound),
        "restartBtn" => Some(Command::RestartRound),
        _ => None,
    }
}
