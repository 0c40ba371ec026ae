//! Clipboard access.
//!
//! The system clipboard can be missing (headless sessions, some Wayland
//! setups), so the system implementation keeps an internal copy and falls
//! back to it.

pub trait Clipboard {
    fn get_text(&mut self) -> Option<String>;
    fn set_text(&mut self, text: &str);
}

/// OS clipboard through arboard.
#[derive(Default)]
pub struct SystemClipboard {
    /// Internal clipboard fallback, always works
    internal: String,
}

impl Clipboard for SystemClipboard {
    fn get_text(&mut self) -> Option<String> {
        // Fresh handle each time; a long-lived one goes stale on some platforms
        match arboard::Clipboard::new().and_then(|mut cb| cb.get_text()) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::debug!("system clipboard unavailable: {}", e);
                (!self.internal.is_empty()).then(|| self.internal.clone())
            }
        }
    }

    fn set_text(&mut self, text: &str) {
        self.internal = text.to_string();
        if let Err(e) = arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text)) {
            tracing::debug!("system clipboard unavailable: {}", e);
        }
    }
}

/// Process-local clipboard for tests.
#[cfg(test)]
#[derive(Default, Debug, Clone)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
}

#[cfg(test)]
impl Clipboard for MemoryClipboard {
    fn get_text(&mut self) -> Option<String> {
        self.contents.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.contents = Some(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard() {
        let mut cb = MemoryClipboard::default();
        assert_eq!(cb.get_text(), None);
        cb.set_text("copied");
        assert_eq!(cb.get_text().as_deref(), Some("copied"));
    }
}
