// Command-line entry point for calltrace.

use anyhow::{Context, Result};
use calltrace::api::dto::TreeDto;
use calltrace::api::session::{run_session, ConsoleSink};
use calltrace::application::{Navigator, ShowOutcome};
use calltrace::domain::playback::PlaybackController;
use calltrace::domain::symbol::TreeNode;
use calltrace::domain::view_tree::{CallTree, ItemId};
use calltrace::infrastructure::{
    parse_callees, parse_callers, parse_find, parse_trace, NavigatorConfig, TokioScheduler,
};
use calltrace::ports::tree_renderer::TreeRenderer;
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Who calls the symbol
    Callers,
    /// What the symbol calls
    Callees,
    /// Callers and callees as nested trees
    Trace,
    /// List matching symbols
    Find,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Kind of engine result in the input file
    mode: Mode,

    /// JSON output of the call-graph engine for this query
    #[arg(short, long)]
    input: PathBuf,

    /// Config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Milliseconds between playback steps (overrides config)
    #[arg(long)]
    interval: Option<u64>,

    /// Maximum trace depth expected from the engine (overrides config)
    #[arg(long)]
    depth: Option<usize>,

    /// Print the tree as JSON and exit
    #[arg(long)]
    json: bool,

    /// Write the rendered tree to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Play the whole trace once and exit
    #[arg(long)]
    autoplay: bool,
}

fn max_depth(node: &TreeNode) -> usize {
    node.iter().map(|n| n.depth).max().unwrap_or(0)
}

fn load_config(cli: &Cli) -> Result<NavigatorConfig> {
    let mut config = match &cli.config {
        Some(path) => NavigatorConfig::load(path)?,
        None => NavigatorConfig::default(),
    };
    if let Some(ms) = cli.interval {
        config.playback.interval_ms = ms;
    }
    if let Some(depth) = cli.depth {
        config.trace.max_depth = depth;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "calltrace=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let json = fs::read_to_string(&cli.input)
        .with_context(|| format!("Cannot read input file: {}", cli.input.display()))?;

    let (scheduler, ticks) = TokioScheduler::new();
    let playback = PlaybackController::new(scheduler, ConsoleSink::default(), config.interval());
    let mut nav = Navigator::new(CallTree::new(), playback);

    let outcome = match cli.mode {
        Mode::Callers => nav.show_callers(parse_callers(&json)?.as_ref()),
        Mode::Callees => nav.show_callees(parse_callees(&json)?.as_ref()),
        Mode::Trace => {
            let trace = parse_trace(&json)?;
            let deepest = [&trace.callers, &trace.callees]
                .into_iter()
                .flatten()
                .map(max_depth)
                .max()
                .unwrap_or(0);
            if deepest > config.trace.max_depth {
                warn!(deepest, max_depth = config.trace.max_depth, "trace is deeper than configured");
            }
            nav.show_trace(Some(&trace))
        }
        Mode::Find => {
            let symbols = parse_find(&json)?;
            if symbols.is_empty() {
                println!("No matches.");
            }
            for symbol in symbols {
                println!("{} ({:?})", symbol.qualified_name, symbol.kind);
                println!("  {}", symbol.location());
            }
            return Ok(());
        }
    };

    if outcome == ShowOutcome::Empty {
        println!("No results found.");
        return Ok(());
    }

    if let Some(path) = &cli.output {
        TreeRenderer::export(&nav.tree, &path.to_string_lossy())
            .with_context(|| format!("Cannot write {}", path.display()))?;
        info!(path = %path.display(), "tree written");
    }

    if cli.json {
        let steps: Vec<ItemId> = nav.sequence().iter().map(|s| s.item).collect();
        let dto = TreeDto::from_tree(&nav.tree, &steps);
        println!("{}", serde_json::to_string_pretty(&dto)?);
        return Ok(());
    }

    println!("{}", TreeRenderer::render(&nav.tree, None));
    run_session(nav, ticks, cli.autoplay).await
}
