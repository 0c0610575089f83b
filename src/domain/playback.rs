//! Playback Controller
//!
//! Walks a [`StepSequence`] either on a repeating timer or by manual
//! stepping. The controller owns the only handle to its timer and always
//! cancels before starting, so at most one timer is live per controller.
//! Ticks carrying any other `TimerId` are dropped; that covers ticks that
//! were already queued when playback was stopped or the sequence replaced.

use crate::domain::sequence::{Step, StepSequence};
use crate::domain::symbol::Location;
use crate::ports::{PlaybackSink, Scheduler, TimerId};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
    Paused,
}

/// What playback asks the host to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// Expand, scroll to and select the step at `index`.
    Reveal { index: usize, location: Location },
    ClearHighlight,
    /// `play` was called on an empty sequence.
    NothingToPlay,
    /// The timer ran past the last step.
    Completed,
}

pub struct PlaybackController<S: Scheduler, K: PlaybackSink> {
    scheduler: S,
    sink: K,
    interval: Duration,
    sequence: StepSequence,
    position: usize,
    state: PlaybackState,
    timer: Option<TimerId>,
}

impl<S: Scheduler, K: PlaybackSink> PlaybackController<S, K> {
    pub fn new(scheduler: S, sink: K, interval: Duration) -> Self {
        Self {
            scheduler,
            sink,
            interval,
            sequence: StepSequence::default(),
            position: 0,
            state: PlaybackState::Idle,
            timer: None,
        }
    }

    /// Replace the sequence. Any running playback is stopped first.
    pub fn load(&mut self, sequence: StepSequence) {
        self.stop();
        self.sequence = sequence;
        self.position = 0;
        debug!(steps = self.sequence.len(), "playback sequence loaded");
    }

    pub fn play(&mut self) {
        if self.sequence.is_empty() {
            info!("nothing to play");
            self.sink.emit(PlaybackEvent::NothingToPlay);
            return;
        }
        if self.state == PlaybackState::Playing {
            return;
        }
        self.state = PlaybackState::Playing;
        self.surface();
        self.start_timer();
        info!(position = self.position, steps = self.sequence.len(), "playback started");
    }

    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.cancel_timer();
        self.state = PlaybackState::Paused;
        debug!(position = self.position, "playback paused");
    }

    pub fn stop(&mut self) {
        self.cancel_timer();
        self.state = PlaybackState::Idle;
        self.sink.emit(PlaybackEvent::ClearHighlight);
        debug!(position = self.position, "playback stopped");
    }

    pub fn next_step(&mut self) {
        match self.sequence.last_index() {
            Some(last) if self.position < last => {
                self.position += 1;
                self.surface();
            }
            _ => {}
        }
    }

    pub fn prev_step(&mut self) {
        if self.position > 0 && !self.sequence.is_empty() {
            self.position -= 1;
            self.surface();
        }
    }

    /// Advance one step for a fired timer.
    pub fn tick(&mut self, timer: TimerId) {
        if self.state != PlaybackState::Playing || self.timer != Some(timer) {
            debug!(?timer, active = ?self.timer, "ignoring stale tick");
            return;
        }
        match self.sequence.last_index() {
            Some(last) if self.position < last => {
                self.position += 1;
                self.surface();
            }
            _ => {
                self.cancel_timer();
                self.state = PlaybackState::Idle;
                self.position = 0;
                info!("trace complete");
                self.sink.emit(PlaybackEvent::Completed);
            }
        }
    }

    /// Change the tick interval; a running timer is restarted at the new rate.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
        if self.state == PlaybackState::Playing {
            self.start_timer();
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn sequence(&self) -> &StepSequence {
        &self.sequence
    }

    pub fn current(&self) -> Option<&Step> {
        self.sequence.get(self.position)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn active_timer(&self) -> Option<TimerId> {
        self.timer
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    fn surface(&mut self) {
        let Some(location) = self.current().and_then(|s| s.location.clone()) else {
            return;
        };
        self.sink.emit(PlaybackEvent::Reveal {
            index: self.position,
            location,
        });
    }

    fn start_timer(&mut self) {
        self.cancel_timer();
        self.timer = Some(self.scheduler.start_repeating(self.interval));
    }

    fn cancel_timer(&mut self) {
        if let Some(id) = self.timer.take() {
            self.scheduler.cancel(id);
        }
    }
}
