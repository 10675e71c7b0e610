//! Terminal rendition of the UI capabilities: toasts, loading, list output.

use std::io::{self, IsTerminal, Write};

use hemolog_core::{ListItem, LoadingIndicator, Navigator, Notifier, Toast, ToastStyle};
use unicode_width::UnicodeWidthStr;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const FG_GREEN: &str = "\x1b[32m";
const FG_RED: &str = "\x1b[31m";

const ICON_OK: &str = "✅";
const ICON_ERR: &str = "❌";

/// Toasts go to stderr, list output to stdout.
#[derive(Debug)]
pub struct TerminalUi {
    activity: &'static str,
    failures: usize,
    spinner_shown: bool,
}

impl TerminalUi {
    /// `activity` names what the spinner is waiting on.
    pub fn new(activity: &'static str) -> Self {
        Self {
            activity,
            failures: 0,
            spinner_shown: false,
        }
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    fn spinner_line(&self) -> String {
        format!("⏳ {}…", self.activity)
    }
}

pub fn format_toast(toast: &Toast) -> String {
    let (color, icon) = match toast.style {
        ToastStyle::Success => (FG_GREEN, ICON_OK),
        ToastStyle::Failure => (FG_RED, ICON_ERR),
    };
    match &toast.message {
        Some(message) => format!("{color}{BOLD}{icon} {}{RESET} ({message})", toast.title),
        None => format!("{color}{BOLD}{icon} {}{RESET}", toast.title),
    }
}

impl Notifier for TerminalUi {
    fn notify(&mut self, toast: Toast) {
        if toast.style == ToastStyle::Failure {
            self.failures += 1;
        }
        eprintln!("{}", format_toast(&toast));
    }
}

impl Navigator for TerminalUi {
    // A one-shot command has no view stack to unwind.
    fn pop_to_root(&mut self) {}
}

impl LoadingIndicator for TerminalUi {
    fn set_loading(&mut self, loading: bool) {
        let mut stderr = io::stderr();
        if !stderr.is_terminal() {
            return;
        }
        if loading {
            let _ = write!(stderr, "{}\r", self.spinner_line());
            self.spinner_shown = true;
        } else if self.spinner_shown {
            // Erase the spinner line.
            let _ = write!(stderr, "\x1b[2K\r");
            self.spinner_shown = false;
        }
        let _ = stderr.flush();
    }
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(UnicodeWidthStr::width(text));
    format!("{text}{}", " ".repeat(fill))
}

/// Aligned rows: icon, type, subtitle, date.
pub fn render_list(items: &[ListItem]) -> String {
    if items.is_empty() {
        return "No records.\n".to_string();
    }
    let title_width = items.iter().map(|i| i.title.width()).max().unwrap_or(0);
    let subtitle_width = items.iter().map(|i| i.subtitle.width()).max().unwrap_or(0);

    let mut out = String::new();
    for item in items {
        let line = format!(
            "{} {}  {}  {}",
            item.icon.glyph(),
            pad(&item.title, title_width),
            pad(&item.subtitle, subtitle_width),
            item.accessory
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
