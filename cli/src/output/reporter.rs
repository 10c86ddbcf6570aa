//! `TerminalReporter` Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use std::cell::Cell;
use std::io::Write as _;

use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::OutputContext;

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `step()` prints `"  → {message}"`
/// - `success()` prints `"  ✓ {message}"`
/// - `warn()` prints `"  ! {message}"`
/// - `tick()` prints `.` on the current line
///
/// All of them are suppressed when `ctx.quiet`. A pending line of dots is
/// terminated before the next message.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    dots: Cell<bool>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            dots: Cell::new(false),
        }
    }

    fn end_dots(&self) {
        if self.dots.replace(false) {
            println!();
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if !self.ctx.quiet {
            self.end_dots();
            println!("  {} {}", "→".style(self.ctx.styles.step), message.style(self.ctx.styles.step));
        }
    }

    fn success(&self, message: &str) {
        if !self.ctx.quiet {
            self.end_dots();
            println!("  {} {message}", "✓".style(self.ctx.styles.success));
        }
    }

    fn warn(&self, message: &str) {
        if !self.ctx.quiet {
            self.end_dots();
            println!("  {} {message}", "!".style(self.ctx.styles.warning));
        }
    }

    fn tick(&self) {
        if !self.ctx.quiet {
            if !self.dots.replace(true) {
                print!("  ");
            }
            print!(".");
            let _ = std::io::stdout().flush();
        }
    }
}

impl Drop for TerminalReporter<'_> {
    fn drop(&mut self) {
        self.end_dots();
    }
}
