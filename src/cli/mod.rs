//! Command-line interface for pipeviz.
//!
//! Provides commands for playing scripted pipelines into a tracker and
//! rendering the projected graph, and for inspecting scripts, event types
//! and configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::config;
use crate::core::{Clock, EventTracker, ManualClock, SystemClock};
use crate::domain::{EventRecord, EventStatus, EventTypeConfig, TypeRegistry};
use crate::layout::{self, LayoutConfig, LayoutStrategy};
use crate::render::{self, RenderFormat, ViewFollow};
use crate::script::{Pacing, Script, ScriptPlayer};

/// pipeviz - Pipeline event tracker and graph projector
#[derive(Parser, Debug)]
#[command(name = "pipeviz")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play a script and render the resulting graph
    Run {
        /// Built-in script name or path to a script YAML file
        script: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: FormatArg,

        /// Layout strategy (overrides config)
        #[arg(short, long, value_enum)]
        strategy: Option<StrategyArg>,

        /// Playback speed multiplier
        #[arg(long, default_value = "1.0")]
        speed: f64,

        /// Apply all steps immediately instead of waiting
        #[arg(long)]
        instant: bool,

        /// Print a status line after every tracker update
        #[arg(long)]
        follow: bool,
    },

    /// List built-in scripts
    Scripts,

    /// List resolved event type definitions
    Types,

    /// Show resolved configuration (debug)
    Config,
}

/// Output format for CLI (maps to RenderFormat)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    /// Indented text tree
    Text,

    /// Graph as JSON
    Json,

    /// Graphviz DOT
    Dot,

    /// Mermaid flowchart
    Mermaid,
}

impl From<FormatArg> for RenderFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Text => RenderFormat::Text,
            FormatArg::Json => RenderFormat::Json,
            FormatArg::Dot => RenderFormat::Dot,
            FormatArg::Mermaid => RenderFormat::Mermaid,
        }
    }
}

/// Layout strategy for CLI (maps to LayoutStrategy)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    /// Pipelines stacked in first-seen order
    Flat,

    /// Pipelines sorted by id, each with a summary group node
    Grouped,
}

impl From<StrategyArg> for LayoutStrategy {
    fn from(s: StrategyArg) -> Self {
        match s {
            StrategyArg::Flat => LayoutStrategy::Flat,
            StrategyArg::Grouped => LayoutStrategy::Grouped,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Run {
                script,
                format,
                strategy,
                speed,
                instant,
                follow,
            } => {
                let options = RunOptions {
                    format: format.into(),
                    strategy: strategy.map(Into::into),
                    pacing: if instant {
                        Pacing::Instant
                    } else {
                        Pacing::Realtime { speed }
                    },
                    follow,
                };
                run_script(&script, options).await
            }
            Commands::Scripts => list_scripts(),
            Commands::Types => list_types(),
            Commands::Config => show_config(),
        }
    }
}

struct RunOptions {
    format: RenderFormat,
    strategy: Option<LayoutStrategy>,
    pacing: Pacing,
    follow: bool,
}

/// Play a script into a fresh tracker and print the projected graph
async fn run_script(name: &str, options: RunOptions) -> Result<()> {
    let cfg = config::config()?;
    let script = load_script(name)?;

    let types = layered_types(&script, &cfg.event_types);
    let mut layout_config = cfg.layout.clone();
    if let Some(strategy) = options.strategy {
        layout_config.strategy = strategy;
    }

    let (mut tracker, player) = match options.pacing {
        Pacing::Instant => {
            let clock = ManualClock::new(SystemClock.now_ms());
            let tracker = EventTracker::with_clock(types, Box::new(clock.clone()));
            (tracker, ScriptPlayer::instant().with_clock(clock))
        }
        pacing => (EventTracker::new(types), ScriptPlayer::new(pacing)),
    };

    let _subscription = options.follow.then(|| {
        let registry = tracker.type_registry().clone();
        let follow_config = layout_config.clone();
        let mut view = ViewFollow::default();

        tracker.on_update(move |events| {
            eprintln!("{}", status_line(events));

            let graph = layout::project(events, &follow_config, &registry);
            if let Some(fit) = view.observe(&graph) {
                eprintln!(
                    "  [fit view: padding {}, zoom {}-{}]",
                    fit.padding, fit.min_zoom, fit.max_zoom
                );
            }
        })
    });

    eprintln!("▶ Playing '{}' ({} steps)", script.name, script.steps.len());
    let report = player.play(&script, &mut tracker).await;

    let graph = layout::project(tracker.events(), &layout_config, tracker.type_registry());
    let output = render::render(&graph, options.format)?;
    print!("{}", output);

    eprintln!(
        "\n[Script '{}' finished: {} applied, {} ignored, {}ms]",
        script.name, report.applied, report.rejected, report.duration_ms
    );

    Ok(())
}

/// Load a script by built-in name or file path
fn load_script(name: &str) -> Result<Script> {
    let script = if Script::builtin_names().any(|builtin| builtin == name) {
        Script::builtin(name)?
    } else {
        let path = PathBuf::from(name);
        if !path.exists() {
            anyhow::bail!(
                "Script '{}' not found. Built-in scripts: {}",
                name,
                Script::builtin_names().collect::<Vec<_>>().join(", ")
            );
        }
        Script::from_file(&path)?
    };

    script
        .validate()
        .with_context(|| format!("Invalid script: {}", name))?;
    Ok(script)
}

/// Script types layered under the configured ones
fn layered_types(script: &Script, configured: &EventTypeConfig) -> EventTypeConfig {
    script
        .event_types
        .clone()
        .unwrap_or_default()
        .merged_with(configured.clone())
}

/// One-line summary of a snapshot
fn status_line(events: &[EventRecord]) -> String {
    let count = |status: EventStatus| events.iter().filter(|e| e.status == status).count();

    format!(
        "[{} events] running={} completed={} failed={}",
        events.len(),
        count(EventStatus::Running),
        count(EventStatus::Completed),
        count(EventStatus::Failed)
    )
}

/// List built-in scripts
fn list_scripts() -> Result<()> {
    println!("{:<12} {:<8} {:<10} DESCRIPTION", "NAME", "STEPS", "DURATION");
    println!("{}", "-".repeat(75));

    for name in Script::builtin_names() {
        let script = Script::builtin(name)?;
        println!(
            "{:<12} {:<8} {:<10} {}",
            script.name,
            script.steps.len(),
            format!("{}ms", script.duration_ms()),
            script.description
        );
    }

    Ok(())
}

/// List resolved event types
fn list_types() -> Result<()> {
    let cfg = config::config()?;
    let registry = TypeRegistry::new(cfg.event_types.clone());

    println!("{:<20} {:<20} {:<10} {:<10}", "TYPE", "NAME", "ICON", "COLOR");
    println!("{}", "-".repeat(65));

    for (key, definition) in registry.definitions() {
        let marker = if key == registry.default_type() { " (default)" } else { "" };
        println!(
            "{:<20} {:<20} {:<10} {:<10}{}",
            key,
            definition.name,
            definition.icon.name(),
            definition.color.primary,
            marker
        );
    }

    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config() -> Result<()> {
    let cfg = config::config()?;
    let defaults = LayoutConfig::default();

    println!("pipeviz configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Layout:");
    println!("  Strategy:         {:?}", cfg.layout.strategy);
    println!(
        "  Node spacing:     {} x {} (default {} x {})",
        cfg.layout.node_spacing.x,
        cfg.layout.node_spacing.y,
        defaults.node_spacing.x,
        defaults.node_spacing.y
    );
    println!("  Pipeline spacing: {}", cfg.layout.pipeline_spacing);
    println!("  Origin:           ({}, {})", cfg.layout.origin.x, cfg.layout.origin.y);
    println!();
    println!("Display:");
    println!("  Controls: {}", cfg.display.show_controls);
    println!("  Minimap:  {}", cfg.display.show_minimap);
    println!();
    println!("Event types:");
    if cfg.event_types.event_types.is_empty() {
        println!("  (using built-in defaults)");
    } else {
        for (key, spec) in &cfg.event_types.event_types {
            println!("  {}: {} [{}]", key, spec.name, spec.icon);
        }
    }
    if let Some(ref default_type) = cfg.event_types.default_event_type {
        println!("  Default: {}", default_type);
    }

    Ok(())
}
