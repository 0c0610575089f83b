// Application usecase: wires the tree builder to the playback controller.

use crate::domain::playback::PlaybackController;
use crate::domain::sequence::{linearize, StepSequence};
use crate::domain::symbol::{CalleeResult, CallerResult, TraceResult};
use crate::domain::view_tree::CallTree;
use crate::ports::{PlaybackSink, Scheduler};
use tracing::info;

/// Result of showing a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowOutcome {
    Shown { steps: usize },
    /// The engine found nothing in that direction. Tree and playback are cleared.
    Empty,
}

/// One navigation view: the current call tree and its playback.
pub struct Navigator<S: Scheduler, K: PlaybackSink> {
    pub tree: CallTree,
    pub playback: PlaybackController<S, K>,
}

impl<S: Scheduler, K: PlaybackSink> Navigator<S, K> {
    pub fn new(tree: CallTree, playback: PlaybackController<S, K>) -> Self {
        Self { tree, playback }
    }

    pub fn show_callers(&mut self, result: Option<&CallerResult>) -> ShowOutcome {
        match result.filter(|r| !r.callers.is_empty()) {
            Some(result) => {
                self.tree.build_from_callers(result);
                self.reload("callers", &result.symbol.name)
            }
            None => self.clear("callers"),
        }
    }

    pub fn show_callees(&mut self, result: Option<&CalleeResult>) -> ShowOutcome {
        match result.filter(|r| !r.callees.is_empty()) {
            Some(result) => {
                self.tree.build_from_callees(result);
                self.reload("callees", &result.symbol.name)
            }
            None => self.clear("callees"),
        }
    }

    pub fn show_trace(&mut self, result: Option<&TraceResult>) -> ShowOutcome {
        match result.filter(|r| r.has_callers() || r.has_callees()) {
            Some(result) => {
                self.tree.build_from_trace(result);
                self.reload("trace", &result.start)
            }
            None => self.clear("trace"),
        }
    }

    pub fn play(&mut self) {
        self.playback.play();
    }

    pub fn pause(&mut self) {
        self.playback.pause();
    }

    pub fn stop(&mut self) {
        self.playback.stop();
    }

    pub fn next_step(&mut self) {
        self.playback.next_step();
    }

    pub fn prev_step(&mut self) {
        self.playback.prev_step();
    }

    pub fn sequence(&self) -> &StepSequence {
        self.playback.sequence()
    }

    fn reload(&mut self, query: &str, name: &str) -> ShowOutcome {
        let sequence = linearize(&self.tree);
        let steps = sequence.len();
        self.playback.load(sequence);
        info!(query, symbol = name, items = self.tree.len(), steps, "showing call tree");
        ShowOutcome::Shown { steps }
    }

    fn clear(&mut self, query: &str) -> ShowOutcome {
        self.playback.load(StepSequence::default());
        self.tree.clear();
        info!(query, "no results");
        ShowOutcome::Empty
    }
}
