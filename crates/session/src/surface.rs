//! Where the session draws.

use crate::Turn;
use agent::Event;

/// A chat display.
pub trait Surface {
    /// Show a transcript turn.
    fn turn(&mut self, turn: &Turn);

    /// Show agent progress for the turn in flight.
    fn trace(&mut self, event: &Event);

    /// Show an informational notice.
    fn info(&mut self, message: &str);

    /// Show an error.
    fn error(&mut self, message: &str);
}
