use crossterm::style::Stylize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::time::Duration;

const KB: u64 = 1024;
const MB: u64 = KB * 1024;

/// `999 bytes`, `2 KB` (truncated), `5.00 MB`.
pub fn format_size(bytes: u64) -> String {
    if bytes < KB {
        format!("{bytes} bytes")
    } else if bytes < MB {
        format!("{} KB", bytes / KB)
    } else {
        #[allow(clippy::cast_precision_loss)]
        let mb = bytes as f64 / MB as f64;
        format!("{mb:.2} MB")
    }
}

pub fn success(out: &mut dyn Write, msg: &str) -> io::Result<()> {
    writeln!(out, "{} {msg}", "✓".green())
}

pub fn warn(out: &mut dyn Write, msg: &str) -> io::Result<()> {
    writeln!(out, "{} {msg}", "⚠".yellow())
}

pub fn error(out: &mut dyn Write, msg: &str) -> io::Result<()> {
    writeln!(out, "{} {msg}", "✗".red())
}

/// Asks a yes/no question and reads one line.
///
/// Only `y` or `yes` (any case) confirms. Anything else, including end of
/// input, is a no. There is no re-prompt.
pub fn confirm(input: &mut dyn BufRead, out: &mut dyn Write, question: &str) -> io::Result<bool> {
    writeln!(out, "{question}")?;
    writeln!(out, "Answer with Yes[y] or No[n].")?;
    out.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Ok(false);
    }
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Prints a numbered list and reads the chosen index.
/// Returns `None` for anything that is not a valid index.
pub fn select(
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    header: &str,
    options: &[String],
) -> io::Result<Option<usize>> {
    writeln!(out, "{header}")?;
    for (i, option) in options.iter().enumerate() {
        writeln!(out, "{i}: {option}")?;
    }
    writeln!(out, "\nSelect one from above list:")?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|&i| i < options.len()))
}

/// Spinner shown on stderr while the distfiles tree is walked.
pub fn scan_spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg} {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message("Checking old packages...");
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
