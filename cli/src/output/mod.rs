//! Terminal output for `create`: marked progress lines plus raw subprocess
//! output.

pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::{OwoColorize as _, Style};
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Where progress messages go and how they look.
pub struct OutputContext {
    pub styles: Styles,
    /// Suppress everything except raw subprocess output.
    pub quiet: bool,
}

impl OutputContext {
    /// Colors are used only on a TTY, and never with `--no-color` or `NO_COLOR`.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let colored =
            !no_color && std::env::var_os("NO_COLOR").is_none() && Term::stdout().is_term();
        Self {
            styles: if colored {
                Styles::colored()
            } else {
                Styles::default()
            },
            quiet,
        }
    }

    fn marked(&self, mark: &str, style: Style, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", mark.style(style));
        }
    }

    pub fn success(&self, msg: &str) {
        self.marked("✓", self.styles.success, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.marked("⚠", self.styles.warning, msg);
    }

    pub fn info(&self, msg: &str) {
        self.marked("ℹ", self.styles.info, msg);
    }

    /// A provisioning step is starting.
    pub fn step(&self, msg: &str) {
        self.marked("→", self.styles.step, msg);
    }

    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Print subprocess output unchanged, even when quiet: during a long
    /// apply it is the only sign of progress.
    pub fn raw(&self, line: &str) {
        println!("{line}");
    }
}
