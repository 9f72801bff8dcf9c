//! Clipboard port used by the copy action.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::io::Write;

use crate::{CodeformError, Result};

/// Somewhere generated code can be copied to.
pub trait Clipboard {
    /// Replace the clipboard contents with `text`. Synchronous.
    fn copy(&mut self, text: &str) -> Result<()>;
}

/// Copies through the terminal using the OSC 52 escape sequence.
///
/// Works over SSH and inside tmux (with `set-clipboard on`) without any native
/// clipboard library.
#[derive(Debug)]
pub struct Osc52Clipboard<W: Write> {
    out: W,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl Osc52Clipboard<std::io::Stderr> {
    /// Write the sequence to stderr so stdout stays clean for piping.
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    fn copy(&mut self, text: &str) -> Result<()> {
        let payload = STANDARD.encode(text.as_bytes());
        write!(self.out, "\x1b]52;c;{}\x07", payload)
            .and_then(|_| self.out.flush())
            .map_err(|e| CodeformError::Clipboard(e.to_string()))
    }
}

/// Keeps the copied text in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}
