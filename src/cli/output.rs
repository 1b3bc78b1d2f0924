//! Output formatting utilities for CLI commands

use is_terminal::IsTerminal;
use std::io::{self, Write};
use std::path::Path;

/// Wrap text in an ANSI color code when stdout is a terminal.
pub fn color(code: &str, text: &str) -> String {
    if io::stdout().is_terminal() {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Green check mark.
pub fn ok_mark() -> String {
    color("32", "✓")
}

/// Section heading.
pub fn heading(text: &str) -> String {
    color("1;33", text)
}

/// Write output to file or stdout
pub fn write_output(content: &str, path: Option<&Path>) -> Result<(), String> {
    if let Some(path) = path {
        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write to {}: {}", path.display(), e))?;
    } else {
        print!("{}", content);
        io::stdout()
            .flush()
            .map_err(|e| format!("Failed to flush stdout: {}", e))?;
    }
    Ok(())
}

/// Format a score for tables.
pub fn format_score(score: f64) -> String {
    format!("{:.4}", score)
}
