use std::collections::BTreeMap;
use std::io::{self, Write};

use super::{Region, Surface, compose_screen};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Surface that redraws the whole dashboard on stdout at every flush
#[derive(Debug)]
pub struct TerminalSurface {
    regions: BTreeMap<Region, String>,
    clear: bool,
    footer: Option<String>,
}

impl TerminalSurface {
    /// `clear` controls whether each redraw wipes the screen first. It should
    /// only be set when stdout is a terminal.
    pub fn new(clear: bool) -> Self {
        Self {
            regions: BTreeMap::new(),
            clear,
            footer: None,
        }
    }

    /// Line printed under every redraw, e.g. a command hint
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }
}

impl Surface for TerminalSurface {
    fn paint(&mut self, region: Region, content: String) {
        self.regions.insert(region, content);
    }

    fn flush(&mut self) {
        let mut screen = String::new();
        if self.clear {
            screen.push_str(CLEAR_SCREEN);
        }
        screen.push_str(&compose_screen(&self.regions));
        if let Some(footer) = &self.footer {
            screen.push('\n');
            screen.push_str(footer);
            screen.push('\n');
        }

        let mut stdout = io::stdout().lock();
        if let Err(e) = stdout
            .write_all(screen.as_bytes())
            .and_then(|()| stdout.flush())
        {
            tracing::warn!("failed to draw dashboard: {e}");
        }
    }
}
