//! Display surfaces.
//!
//! A surface shows one string at a time; every writer replaces the whole
//! text and the most recent write wins.

use std::sync::Mutex;

/// Somewhere a credential can be rendered.
pub trait DisplaySurface: Send + Sync {
    fn render(&self, text: &str);
}

/// Surface that keeps the rendered text in memory.
#[derive(Debug, Default)]
pub struct MemoryDisplay {
    state: Mutex<MemoryDisplayState>,
}

#[derive(Debug, Default)]
struct MemoryDisplayState {
    text: String,
    renders: usize,
}

impl MemoryDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text currently shown.
    pub fn text(&self) -> String {
        self.state
            .lock()
            .map(|s| s.text.clone())
            .unwrap_or_else(|p| p.into_inner().text.clone())
    }

    /// How many times the surface has been written.
    pub fn render_count(&self) -> usize {
        self.state
            .lock()
            .map(|s| s.renders)
            .unwrap_or_else(|p| p.into_inner().renders)
    }
}

impl DisplaySurface for MemoryDisplay {
    fn render(&self, text: &str) {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        state.text.clear();
        state.text.push_str(text);
        state.renders += 1;
    }
}
