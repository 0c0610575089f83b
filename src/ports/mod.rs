use crate::domain::playback::PlaybackEvent;
use std::time::Duration;

pub mod tree_renderer;

/// Identifies one repeating timer started by a [`Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Source of repeating ticks. The scheduler never calls back into the
/// controller itself; whoever drives the event loop delivers each fired
/// `TimerId` to `PlaybackController::tick`.
pub trait Scheduler {
    fn start_repeating(&mut self, interval: Duration) -> TimerId;
    fn cancel(&mut self, id: TimerId);
}

/// Receives everything playback wants the host to show.
pub trait PlaybackSink {
    fn emit(&mut self, event: PlaybackEvent);
}

impl PlaybackSink for Vec<PlaybackEvent> {
    fn emit(&mut self, event: PlaybackEvent) {
        self.push(event);
    }
}
