//! Terminal output for `esx` commands.
//!
//! Diagnostics go through `tracing`; this module only prints what the user
//! asked to see.

pub mod progress;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::{OwoColorize as _, Style};
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Colors, TTY detection and `--quiet` for one invocation.
pub struct OutputContext {
    pub styles: Styles,
    pub is_tty: bool,
    pub quiet: bool,
}

/// `NO_COLOR` counts only when set to a non-empty value (no-color.org).
fn no_color_env() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty())
}

impl OutputContext {
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let mut styles = Styles::default();
        if is_tty && !no_color && !no_color_env() {
            styles.colorize();
        }
        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Spinners only make sense on an interactive, non-quiet stdout.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    fn line(&self, symbol: &str, style: Style, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", symbol.style(style));
        }
    }

    pub fn success(&self, msg: &str) {
        self.line("✓", self.styles.success, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.line("⚠", self.styles.warning, msg);
    }

    pub fn info(&self, msg: &str) {
        self.line("ℹ", self.styles.info, msg);
    }

    /// Goes to stderr and ignores `--quiet`.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("  {}", title.style(self.styles.header));
        }
    }

    /// One `config show` row: dimmed key column, then the value.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {:<20} {value}", key.style(self.styles.dim));
        }
    }
}
