//! Render target for the detected-objects list.
//!
//! The list is replaced wholesale on every successful poll; a failed poll
//! leaves the previous entries on screen untouched.

use std::io::{self, Write};

use crate::objects::DetectedObject;

/// Anything that can display the current object list.
pub trait RenderTarget: Send {
    /// Replace all entries with a new set, in order. An empty slice clears
    /// the list.
    fn replace(&mut self, objects: &[DetectedObject]);
}

/// Terminal renderer: clears the screen and reprints the full list.
pub struct TerminalList {
    heading: String,
    entries: Vec<String>,
}

impl TerminalList {
    pub fn new(heading: &str) -> Self {
        Self {
            heading: heading.to_string(),
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    fn redraw(&self) {
        let mut out = io::stdout().lock();
        // Clear screen, cursor to home
        let _ = write!(out, "\x1b[2J\x1b[H");
        let _ = writeln!(out, "{}", self.heading);
        let _ = writeln!(out, "{}", "-".repeat(self.heading.len()));
        for entry in &self.entries {
            let _ = writeln!(out, "  * {entry}");
        }
        let _ = out.flush();
    }
}

impl RenderTarget for TerminalList {
    fn replace(&mut self, objects: &[DetectedObject]) {
        self.entries = objects.iter().map(DetectedObject::display_line).collect();
        self.redraw();
    }
}
