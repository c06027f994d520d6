use anyhow::{Context, Result};
use arboard::Clipboard;
use log::debug;

/// How long the copied text must outlive the call that set it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// The sink is kept alive by a long-running caller (the interactive loop).
    Held,
    /// The process is about to exit, so block until another client takes
    /// the selection. Only Linux needs this; elsewhere the OS keeps a copy.
    UntilPasted,
}

/// On X11 and Wayland the copied text is only served while its owner is
/// alive, so the handle is cached for the lifetime of the sink.
pub struct ClipboardSink {
    clipboard: Option<Clipboard>,
    ownership: Ownership,
}

impl ClipboardSink {
    pub fn new(ownership: Ownership) -> Self {
        ClipboardSink {
            clipboard: None,
            ownership,
        }
    }

    pub fn ownership(&self) -> Ownership {
        self.ownership
    }

    pub fn copy(&mut self, text: &str) -> Result<()> {
        if self.clipboard.is_none() {
            self.clipboard = Some(Clipboard::new().context("Failed to open clipboard")?);
        }

        if let Some(clipboard) = self.clipboard.as_mut() {
            match self.ownership {
                Ownership::Held => clipboard.set_text(text),
                Ownership::UntilPasted => set_text_and_wait(clipboard, text),
            }
            .context("Failed to copy text to clipboard")?;
            debug!("Copied {} bytes to clipboard", text.len());
        }

        Ok(())
    }
}

#[cfg(target_os = "linux")]
fn set_text_and_wait(clipboard: &mut Clipboard, text: &str) -> Result<(), arboard::Error> {
    use arboard::SetExtLinux;

    debug!("Holding clipboard selection until it is pasted");
    clipboard.set().wait().text(text)
}

#[cfg(not(target_os = "linux"))]
fn set_text_and_wait(clipboard: &mut Clipboard, text: &str) -> Result<(), arboard::Error> {
    clipboard.set_text(text)
}
