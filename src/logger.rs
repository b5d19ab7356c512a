//! Logging utilities with colored output and progress display.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro, printing only with `--verbose`
//! - `ProgressLine` for single-line progress display with counters
//!
//! # Example
//!
//! ```ignore
//! log!("serve"; "http://{}", addr);
//!
//! let progress = ProgressLine::new("compile", &[("resources", 12)]);
//! progress.inc("resources");
//! progress.finish();
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// A [`ProgressLine`] currently owns the last terminal line.
static PROGRESS_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Last rendered progress line, redrawn after interleaved log messages.
static PROGRESS_TEXT: Mutex<Option<String>> = Mutex::new(None);

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

/// Print `message` under a colored `[module]` prefix.
///
/// While a [`ProgressLine`] is active the message is printed above it and
/// the progress line is redrawn below.
#[inline]
pub fn log(module: &str, message: &str) {
    let mut out = stdout().lock();
    let progress_active = PROGRESS_ACTIVE.load(Ordering::SeqCst);
    if progress_active {
        execute!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
    } else {
        execute!(out, Clear(ClearType::UntilNewLine)).ok();
    }
    writeln!(out, "{} {message}", colorize_prefix(module)).ok();
    out.flush().ok();
    drop(out);

    if progress_active && let Some(line) = PROGRESS_TEXT.lock().as_deref() {
        redraw(line, false);
    }
}

/// `[module]`, colored by module kind.
fn colorize_prefix(module: &str) -> String {
    let prefix = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "serve" => prefix.bright_blue().bold().to_string(),
        "compile" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

/// Overwrite the current terminal line with `line`.
fn redraw(line: &str, newline: bool) {
    let mut out = stdout().lock();
    execute!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
    if newline {
        writeln!(out, "{line}").ok();
    } else {
        write!(out, "{line}").ok();
    }
    out.flush().ok();
}

// ============================================================================
// Progress Line (single-line counters)
// ============================================================================

/// Single-line progress display with multiple counters
///
/// Displays: `[compile] resources(4/12)`
///
/// Counters are atomic, so workers can call [`inc`](Self::inc) from any
/// thread. Redraws use `try_lock`: a worker never waits on the terminal.
pub struct ProgressLine {
    module: &'static str,
    counters: Vec<Counter>,
}

struct Counter {
    name: &'static str,
    total: usize,
    current: AtomicUsize,
}

impl ProgressLine {
    /// Start a progress display under the `module` prefix.
    ///
    /// Counters with a zero total are not shown.
    pub fn new(module: &'static str, items: &[(&'static str, usize)]) -> Self {
        let counters = items
            .iter()
            .filter(|(_, total)| *total > 0)
            .map(|&(name, total)| Counter {
                name,
                total,
                current: AtomicUsize::new(0),
            })
            .collect();

        let progress = Self { module, counters };
        PROGRESS_ACTIVE.store(true, Ordering::SeqCst);
        progress.refresh();
        progress
    }

    /// Count one finished item for counter `name`.
    #[inline]
    pub fn inc(&self, name: &str) {
        if let Some(counter) = self.counters.iter().find(|c| c.name == name) {
            counter.current.fetch_add(1, Ordering::Relaxed);
            self.refresh();
        }
    }

    /// `name(current/total)` for every counter.
    fn line(&self) -> String {
        self.counters
            .iter()
            .map(|c| format!("{}({}/{})", c.name, c.current.load(Ordering::Relaxed), c.total))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn refresh(&self) {
        let Some(mut text) = PROGRESS_TEXT.try_lock() else {
            return;
        };
        let line = format!("{} {}", colorize_prefix(self.module), self.line());
        redraw(&line, false);
        *text = Some(line);
    }

    /// Leave the final counts on screen and move to the next line.
    pub fn finish(self) {
        let line = format!("{} {}", colorize_prefix(self.module), self.line());
        self.clear_state();
        redraw(&line, true);
        std::mem::forget(self);
    }

    fn clear_state(&self) {
        PROGRESS_ACTIVE.store(false, Ordering::SeqCst);
        *PROGRESS_TEXT.lock() = None;
    }
}

impl Drop for ProgressLine {
    fn drop(&mut self) {
        self.clear_state();
        redraw("", false);
    }
}

// ============================================================================
// Tests
// ============================================================================
