use std::str::FromStr;
use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};
use crate::application::Navigator;
use crate::domain::playback::PlaybackEvent;
use crate::infrastructure::scheduler::TokioScheduler;
use crate::ports::tree_renderer::TreeRenderer;
use crate::ports::{PlaybackSink, Scheduler, TimerId};

/// Line commands understood by an interactive session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play,
    Pause,
    Stop,
    Next,
    Prev,
    Tree,
    Status,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "play" | "p" => Ok(Command::Play),
            "pause" | "space" => Ok(Command::Pause),
            "stop" | "s" => Ok(Command::Stop),
            "next" | "n" => Ok(Command::Next),
            "prev" | "b" => Ok(Command::Prev),
            "tree" | "t" => Ok(Command::Tree),
            "status" => Ok(Command::Status),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            other => anyhow::bail!("Unknown command: {}", other),
        }
    }
}

/// Prints playback events to stdout and remembers whether playback has run out.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    pub finished: bool,
}

impl PlaybackSink for ConsoleSink {
    fn emit(&mut self, event: PlaybackEvent) {
        match event {
            PlaybackEvent::Reveal { index, location } => {
                println!("[step {}] {}", index + 1, location);
            }
            PlaybackEvent::ClearHighlight => debug!("highlight cleared"),
            PlaybackEvent::NothingToPlay => {
                println!("Nothing to play. Show callers, callees or a trace first.");
                self.finished = true;
            }
            PlaybackEvent::Completed => {
                println!("Trace complete.");
                self.finished = true;
            }
        }
    }
}

/// Apply one command. Returns the text to print, if any.
pub fn apply<S: Scheduler, K: PlaybackSink>(nav: &mut Navigator<S, K>, command: Command) -> Option<String> {
    match command {
        Command::Play => nav.play(),
        Command::Pause => nav.pause(),
        Command::Stop => nav.stop(),
        Command::Next => nav.next_step(),
        Command::Prev => nav.prev_step(),
        Command::Tree => {
            let current = nav.playback.current().map(|s| s.item);
            return Some(TreeRenderer::render(&nav.tree, current));
        }
        Command::Status => {
            let label = nav.playback.current().map_or("-", |s| s.label.as_str());
            return Some(format!(
                "{:?} at step {}/{}: {}",
                nav.playback.state(),
                nav.playback.position() + 1,
                nav.sequence().len(),
                label
            ));
        }
        Command::Quit => {}
    }
    None
}

/// Drive a navigator from stdin commands and real timer ticks.
/// With `autoplay`, stdin is ignored and the session ends when playback finishes.
pub async fn run_session(
    mut nav: Navigator<TokioScheduler, ConsoleSink>,
    mut ticks: UnboundedReceiver<TimerId>,
    autoplay: bool,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if autoplay {
        nav.play();
    } else {
        println!("Commands: play, pause, stop, next, prev, tree, status, quit");
    }

    loop {
        if autoplay && nav.playback.sink().finished {
            break;
        }

        tokio::select! {
            Some(timer) = ticks.recv() => nav.playback.tick(timer),
            line = lines.next_line(), if !autoplay => {
                let Some(line) = line.context("Failed to read command")? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => {
                        if let Some(text) = apply(&mut nav, command) {
                            println!("{}", text);
                        }
                    }
                    Err(e) => warn!("{}", e),
                }
            }
            else => break,
        }
    }

    nav.stop();
    Ok(())
}
