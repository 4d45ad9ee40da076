//! flowmap terminal host.
//!
//! Loads a decision tree and drives the interactive map from line commands
//! on stdin. The dataset comes from the first argument, the `FLOWMAP_DATA`
//! environment variable, or the bundled plastic-identification demo.
//! `FLOWMAP_CONFIG` points at an optional TOML config and `FLOWMAP_LANG`
//! (or `LANG`) picks the interface language. Type `help` for commands.

mod commands;
mod render;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use commands::Outcome;
use flowmap_core::config::FlowConfig;
use flowmap_core::geometry::Rect;
use flowmap_core::text::Lang;
use flowmap_core::{FlowGraph, FlowMap, NodeId, Strings};

/// Size of the map viewport the host pretends to have.
const VIEWPORT: Rect = Rect::new(0.0, 0.0, 1200.0, 800.0);

const DEMO_DATA: &str = include_str!("../data/flow.json");

/// Pick the interface language from a locale string, defaulting when the
/// locale is absent or unsupported.
fn detect_language(locale: Option<&str>, default: Lang) -> Lang {
    locale
        .and_then(|l| Lang::from_code(&l.chars().take(2).collect::<String>()))
        .unwrap_or(default)
}

fn load_config() -> Result<FlowConfig> {
    match std::env::var_os("FLOWMAP_CONFIG") {
        Some(path) => {
            let path = PathBuf::from(path);
            FlowConfig::load(&path).with_context(|| format!("loading {}", path.display()))
        },
        None => Ok(FlowConfig::default()),
    }
}

fn load_graph(config: &FlowConfig) -> Result<FlowGraph> {
    let start = NodeId::new(config.start_node.clone());
    let data_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("FLOWMAP_DATA").ok());
    match data_path {
        Some(path) => {
            let path = PathBuf::from(path);
            log::info!("Loading dataset {}", path.display());
            FlowGraph::load(&path, &start).with_context(|| format!("loading {}", path.display()))
        },
        None => {
            log::info!("Using bundled demo dataset");
            Ok(FlowGraph::from_json(DEMO_DATA, &start)?)
        },
    }
}

fn print_lines(out: &mut impl Write, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    let locale = std::env::var("FLOWMAP_LANG")
        .or_else(|_| std::env::var("LANG"))
        .ok();
    let lang = detect_language(locale.as_deref(), config.default_language);
    let graph = load_graph(&config)?;

    let mut map = FlowMap::new(graph, config, Strings::builtin(), lang, VIEWPORT)?;
    log::info!("Starting flowmap ({lang})");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let scene = map.render();
    print_lines(&mut out, &render::scene_lines(&scene, map.view()))?;

    let stdin = io::stdin();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let outcome = match commands::parse(&line) {
            Ok(Some(cmd)) => commands::execute(cmd, &mut map),
            Ok(None) => continue,
            Err(e) => Err(e),
        };
        match outcome {
            Ok(Outcome::Redraw) => {
                let scene = map.render();
                if let Some(notice) = map.take_notice() {
                    writeln!(out, "!! {notice}")?;
                }
                print_lines(&mut out, &render::scene_lines(&scene, map.view()))?;
            },
            Ok(Outcome::ViewChanged) => writeln!(out, "{}", render::view_line(map.view()))?,
            Ok(Outcome::Message(msg)) => writeln!(out, "{msg}")?,
            Ok(Outcome::Quit) => break,
            Err(e) => writeln!(out, "error: {e:#}")?,
        }
    }

    log::info!("Shutting down");
    Ok(())
}
