mod catalog;
mod config;
mod dispatch;
mod error;
mod launcher;
mod llm;
mod system;
mod terminal;
mod utils;

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::*;
use std::io::Read;
use std::path::PathBuf;

use crate::catalog::PromptCatalog;
use crate::config::Config;
use crate::dispatch::RequestDispatcher;
use crate::launcher::Launcher;
use crate::system::clipboard::{ClipboardSink, Ownership};
use crate::terminal::Terminal;

/// Rewrite text with a local or hosted language model
///
/// Without --transform an interactive prompt is started. With it, the text
/// (or stdin when no text is given) is transformed once and printed.
#[derive(Parser, Debug)]
#[command(name = "textty")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Transformation to apply once (Fix Grammar, More Casual, More Formal, Ask)
    #[arg(short, long)]
    transform: Option<String>,

    /// Model to use instead of the configured default
    #[arg(short, long, requires = "transform")]
    model: Option<String>,

    /// Extra system instruction appended to the configured one
    #[arg(short, long, requires = "transform")]
    system: Option<String>,

    /// Copy the answer to the clipboard
    #[arg(long, requires = "transform")]
    copy: bool,

    /// Text to transform
    text: Vec<String>,
}

/// The process exits right after copying, so the selection has to be held
/// until something pastes it.
fn one_shot_clipboard() -> ClipboardSink {
    ClipboardSink::new(Ownership::UntilPasted)
}

async fn run_once(dispatcher: &RequestDispatcher<'_>, args: &Cli, label: &str) -> Result<()> {
    let Some(entry) = PromptCatalog::find(label) else {
        let labels: Vec<&str> = PromptCatalog::entries().iter().map(|e| e.label).collect();
        bail!("Unknown transformation '{}', expected one of: {}", label, labels.join(", "));
    };

    let text = if args.text.is_empty() {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read text from stdin")?;
        input.trim_end().to_string()
    } else {
        args.text.join(" ")
    };

    let mut request = entry.build(&text);
    if let Some(model) = &args.model {
        request = request.with_model(model);
    }
    if let Some(system) = &args.system {
        request = request.with_system_instruction(system);
    }

    let result = dispatcher.dispatch(&request).await?;
    println!("{}", result.wrapped);

    if args.copy {
        let mut clipboard = one_shot_clipboard();
        if cfg!(target_os = "linux") {
            eprintln!("{}", "Waiting for the answer to be pasted...".dimmed());
        }
        clipboard.copy(&result.raw)?;
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    dotenv::dotenv().ok();

    let args = Cli::parse();
    let config = Config::load(args.config.as_deref())?;
    let dispatcher = RequestDispatcher::from_config(&config)?;

    match args.transform.as_deref() {
        Some(label) => run_once(&dispatcher, &args, label).await,
        None => {
            let launcher = Launcher::new(dispatcher);
            let mut terminal = Terminal::new()?;
            terminal.run(&launcher).await
        }
    }
}
