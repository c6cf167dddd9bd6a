use std::io::Write;
use std::path::Path;

use owo_colors::OwoColorize;
use serde::Serialize;

use paperfile_ingest::{Extraction, PaperMetadata, ProgressEvent, RunStats};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// One-line description of a progress event, or `None` for events that
/// are only reflected in the progress bar.
pub fn format_progress(event: &ProgressEvent, dry_run: bool, color: ColorMode) -> Option<String> {
    let line = match event {
        ProgressEvent::Discovered { .. } => return None,
        ProgressEvent::Filed {
            index,
            total,
            source,
            destination,
            processed,
            ..
        } => {
            let verb = if dry_run { "WOULD FILE" } else { "FILED" };
            let verb = if color.enabled() {
                verb.green().to_string()
            } else {
                verb.to_string()
            };
            let mut line = format!(
                "[{}/{}] {} {} -> {}",
                index + 1,
                total,
                verb,
                display_name(source),
                display_name(destination)
            );
            if processed.is_none() && !dry_run {
                line.push_str(" (original kept)");
            }
            line
        }
        ProgressEvent::Duplicate { index, total, path } => {
            let verb = if color.enabled() {
                "DUPLICATE".yellow().to_string()
            } else {
                "DUPLICATE".to_string()
            };
            format!("[{}/{}] {} {}", index + 1, total, verb, display_name(path))
        }
        ProgressEvent::Failed {
            index,
            total,
            path,
            error,
        } => {
            let verb = if color.enabled() {
                "FAILED".red().to_string()
            } else {
                "FAILED".to_string()
            };
            format!(
                "[{}/{}] {} {}: {}",
                index + 1,
                total,
                verb,
                display_name(path),
                error
            )
        }
    };
    Some(line)
}

/// Print the end-of-run counters.
pub fn print_summary(
    w: &mut dyn Write,
    stats: &RunStats,
    dry_run: bool,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w)?;
    let heading = if dry_run { "SUMMARY (dry run)" } else { "SUMMARY" };
    if color.enabled() {
        writeln!(w, "{}", heading.bold())?;
    } else {
        writeln!(w, "{}", heading)?;
    }
    writeln!(w, "  Found:      {}", stats.found)?;

    if color.enabled() {
        writeln!(w, "  Filed:      {}", stats.filed.green())?;
        writeln!(w, "  Moved:      {}", stats.moved)?;
        writeln!(w, "  Duplicates: {}", stats.duplicates.yellow())?;
        if stats.failed > 0 {
            writeln!(w, "  Failed:     {}", stats.failed.red())?;
        } else {
            writeln!(w, "  Failed:     {}", stats.failed)?;
        }
    } else {
        writeln!(w, "  Filed:      {}", stats.filed)?;
        writeln!(w, "  Moved:      {}", stats.moved)?;
        writeln!(w, "  Duplicates: {}", stats.duplicates)?;
        writeln!(w, "  Failed:     {}", stats.failed)?;
    }

    if stats.cancelled {
        let msg = "Run cancelled; documents already filed were kept.";
        if color.enabled() {
            writeln!(w, "{}", msg.yellow())?;
        } else {
            writeln!(w, "{}", msg)?;
        }
    }
    Ok(())
}

/// JSON shape of `paperfile inspect --json`.
#[derive(Debug, Serialize)]
pub struct InspectReport<'a> {
    pub file: String,
    #[serde(flatten)]
    pub extraction: &'a Extraction,
    pub full_title: &'a str,
    pub filename: String,
}

/// Print a human-readable inspection of one document.
pub fn print_inspection(
    w: &mut dyn Write,
    path: &Path,
    extraction: &Extraction,
    paper: &PaperMetadata,
    filename: &str,
    color: ColorMode,
) -> std::io::Result<()> {
    let source = |s: String| {
        if color.enabled() {
            format!("({})", s).dimmed().to_string()
        } else {
            format!("({})", s)
        }
    };

    if color.enabled() {
        writeln!(w, "{}", display_name(path).bold())?;
    } else {
        writeln!(w, "{}", display_name(path))?;
    }
    writeln!(
        w,
        "  Title:    {} {}",
        extraction.title.title,
        source(extraction.title.source.to_string())
    )?;
    if let Some(ref subtitle) = extraction.title.subtitle {
        writeln!(w, "  Subtitle: {}", subtitle)?;
    }
    writeln!(
        w,
        "  Author:   {} {}",
        paper.author,
        source(extraction.author.source.to_string())
    )?;
    if color.enabled() {
        writeln!(w, "  File as:  {}", filename.cyan())?;
    } else {
        writeln!(w, "  File as:  {}", filename)?;
    }
    Ok(())
}
