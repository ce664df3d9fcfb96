// src/cli.rs
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use text_tree_builder::app::{start_build, AppState, BuildRequest, Language, Messages};
use text_tree_builder::config::{settings, AppConfig};
use text_tree_builder::core::{BuildEvent, ErrorKind, TreeGenerator};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// File containing the tree diagram (reads stdin when omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory to build the tree in (defaults to the last one used)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Message language: vi, en or ja
    #[arg(short, long)]
    pub lang: Option<Language>,

    /// Pause after each line, in milliseconds
    #[arg(short, long)]
    pub delay_ms: Option<u64>,

    /// Config file to use instead of the platform default
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the resulting directory tree when done
    #[arg(long)]
    pub show_tree: bool,
}

fn read_tree_text(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tree from {}", path.display())),
        None => {
            if io::stdin().is_terminal() {
                eprintln!("Paste the tree, then press Ctrl-D:");
            }
            io::read_to_string(io::stdin()).context("Failed to read tree from stdin")
        }
    }
}

pub async fn run(args: Args) -> Result<ExitCode> {
    let config_path = args.config.as_deref();
    let mut config = settings::load_config(config_path).unwrap_or_else(|e| {
        tracing::warn!("Using default config: {}", e);
        AppConfig::default()
    });
    if let Some(language) = args.lang {
        config.language = language;
    }
    if let Some(delay_ms) = args.delay_ms {
        config.line_delay_ms = delay_ms;
    }
    let messages = Messages::new(config.language);

    let output_dir = args
        .output
        .clone()
        .or_else(|| config.last_output_directory.clone())
        .unwrap_or_default();
    let request = BuildRequest::new(read_tree_text(args.input.as_deref())?, output_dir.clone());
    if let Err(e) = request.validate() {
        eprintln!("{}", messages.validation(&e));
        return Ok(ExitCode::from(2));
    }

    config.last_output_directory = Some(output_dir.clone());
    if let Err(e) = settings::save_config(&config, config_path) {
        tracing::warn!("Failed to remember output directory: {}", e);
    }

    let state = Arc::new(Mutex::new(AppState::new(config)));
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let stop = start_build(request, event_tx, state)
        .map_err(|e| anyhow::anyhow!(messages.start_error(&e)))?;

    let mut critical = false;
    loop {
        tokio::select! {
            event = event_rx.recv() => match event {
                Some(BuildEvent::Progress(progress)) => {
                    println!("[{:>3}%] {}", progress.percent, messages.progress(&progress.message));
                }
                Some(BuildEvent::Error(error)) => {
                    critical |= error.kind() == ErrorKind::Critical;
                    eprintln!("{}", messages.error(&error));
                }
                Some(BuildEvent::Complete) | None => break,
            },
            _ = tokio::signal::ctrl_c(), if !stop.is_stop_requested() => {
                stop.request_stop();
            }
        }
    }

    if args.show_tree && !critical {
        match TreeGenerator::render_directory(&output_dir) {
            Ok(tree) => print!("{tree}"),
            Err(e) => tracing::warn!("Could not render {:?}: {}", output_dir, e),
        }
    }

    Ok(if critical {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
