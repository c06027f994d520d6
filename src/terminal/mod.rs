use anyhow::{Context, Result};
use colored::*;
use log::{debug, warn};
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor, EditMode};
use std::path::{Path, PathBuf};

use crate::launcher::{Action, Launcher, ResultItem};
use crate::system::clipboard::{ClipboardSink, Ownership};

const MAX_HISTORY: usize = 500;

/// Interactive stand-in for a launcher window.
pub struct Terminal {
    editor: DefaultEditor,
    history_file: Option<PathBuf>,
    clipboard: ClipboardSink,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let history_file = dirs::home_dir().map(|home| home.join(".textty_history"));
        if history_file.is_none() {
            warn!("Could not determine home directory, history disabled");
        }

        Ok(Terminal {
            editor: build_editor(history_file.as_deref(), MAX_HISTORY)?,
            history_file,
            clipboard: ClipboardSink::new(Ownership::Held),
        })
    }

    /// `None` on Ctrl-D. Ctrl-C yields an empty line.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(anyhow::anyhow!("Error reading input: {}", err)),
        }
    }

    pub async fn run(&mut self, launcher: &Launcher<'_>) -> Result<()> {
        println!(
            "{} type {} followed by your text, {} to leave",
            "textty".bright_cyan().bold(),
            format!("{} <text>", launcher.keyword()).bright_yellow(),
            "exit".bright_yellow()
        );

        let prompt = format!("{} ", "❯".bright_purple());
        loop {
            let Some(line) = self.read_line(&prompt)? else {
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == "exit" || line == "quit" {
                break;
            }
            remember(&mut self.editor, self.history_file.as_deref(), line);

            let items = launcher.on_keyword_query(line);
            render_menu(&items);

            let Some(choice) = self.read_line(&format!("{} ", "select ❯".bright_blue()))? else {
                break;
            };
            let Some(item) = select(&items, &choice) else {
                println!("{}", "Cancelled".dimmed());
                continue;
            };

            if let Action::Dispatch(request) = &item.on_enter {
                println!("{}", "Thinking...".dimmed());
                let results = launcher.on_item_enter(request).await;
                self.activate_results(&results)?;
            }
        }

        Ok(())
    }

    fn activate_results(&mut self, results: &[ResultItem]) -> Result<()> {
        for item in results {
            match &item.on_enter {
                Action::CopyToClipboard(text) => {
                    println!("\n{}\n{}\n", item.name.bright_green().bold(), item.description);
                    let answer = self.read_line(&format!(
                        "{} ",
                        "Enter to copy, anything else to skip ❯".bright_blue()
                    ))?;
                    if answer.as_deref().map(str::trim) == Some("") {
                        match self.clipboard.copy(text) {
                            Ok(()) => println!("{}", "Copied to clipboard".green()),
                            Err(e) => eprintln!("{} {:#}", "Clipboard error:".red(), e),
                        }
                    }
                }
                _ => println!("\n{}\n{}\n", item.name.red().bold(), item.description),
            }
        }
        Ok(())
    }
}

/// Line editor with bounded, de-duplicated history loaded from `history_file`.
fn build_editor(history_file: Option<&Path>, max_history: usize) -> Result<DefaultEditor> {
    let config = Config::builder()
        .edit_mode(EditMode::Emacs)
        .auto_add_history(false)
        .max_history_size(max_history)?
        .history_ignore_dups(true)?
        .build();

    let mut editor =
        DefaultEditor::with_config(config).context("Failed to initialize line editor")?;

    if let Some(path) = history_file.filter(|path| path.exists()) {
        if let Err(e) = editor.load_history(path) {
            warn!("Failed to load history from {:?}: {}", path, e);
        }
    }

    Ok(editor)
}

/// History problems never end the session.
fn remember(editor: &mut DefaultEditor, history_file: Option<&Path>, line: &str) {
    match editor.add_history_entry(line) {
        Ok(true) => {}
        Ok(false) => {
            debug!("Skipped repeated history entry");
            return;
        }
        Err(e) => {
            warn!("Failed to add history entry: {}", e);
            return;
        }
    }

    if let Some(path) = history_file {
        if let Err(e) = editor.append_history(path) {
            warn!("Failed to save history to {:?}: {}", path, e);
        }
    }
}

fn render_menu(items: &[ResultItem]) {
    for (index, item) in items.iter().enumerate() {
        println!(
            "  {} {}  {}",
            format!("{}.", index + 1).bright_yellow(),
            item.name.bold(),
            item.description.dimmed()
        );
    }
}

/// Picks an item by its 1-based menu number.
fn select<'i>(items: &'i [ResultItem], choice: &str) -> Option<&'i ResultItem> {
    let index = choice.trim().parse::<usize>().ok()?;
    index.checked_sub(1).and_then(|i| items.get(i))
}
