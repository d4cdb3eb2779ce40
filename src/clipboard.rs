//! Clipboard backends for the dashboard's copy action.

use std::io::Write;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::{AcademyError, Result};

/// Destination for copied text.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<()>;
}

/// Clipboard kept in memory. Clones share contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        *self
            .contents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(text.to_string());
        Ok(())
    }
}

/// A clipboard that always refuses, like a browser without permission.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableClipboard;

#[async_trait]
impl Clipboard for UnavailableClipboard {
    async fn write_text(&self, _text: &str) -> Result<()> {
        Err(AcademyError::Clipboard(
            "clipboard access is not available".to_string(),
        ))
    }
}

/// Terminal clipboard using the OSC 52 escape sequence.
///
/// Supporting terminals copy the payload to the system clipboard; others
/// ignore the sequence.
#[derive(Debug)]
pub struct Osc52Clipboard<W> {
    writer: Mutex<W>,
}

impl Osc52Clipboard<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> Osc52Clipboard<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// The OSC 52 "set clipboard" sequence for `text`.
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

#[async_trait]
impl<W: Write + Send> Clipboard for Osc52Clipboard<W> {
    async fn write_text(&self, text: &str) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| AcademyError::Clipboard("terminal writer lock poisoned".to_string()))?;
        writer
            .write_all(osc52_sequence(text).as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|err| AcademyError::Clipboard(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_clipboard_shares_contents_between_clones() {
        let clipboard = MemoryClipboard::new();
        let view = clipboard.clone();
        clipboard.write_text("ya29.token").await.unwrap();
        assert_eq!(view.contents().as_deref(), Some("ya29.token"));
    }

    #[tokio::test]
    async fn unavailable_clipboard_fails() {
        let err = UnavailableClipboard.write_text("x").await.unwrap_err();
        assert!(matches!(err, AcademyError::Clipboard(_)));
    }

    #[tokio::test]
    async fn osc52_writes_base64_payload() {
        let clipboard = Osc52Clipboard::new(Vec::new());
        clipboard.write_text("hello").await.unwrap();
        let written = String::from_utf8(clipboard.into_inner()).unwrap();
        assert_eq!(written, "\x1b]52;c;aGVsbG8=\x07");
    }
}
