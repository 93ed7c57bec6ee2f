use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use chrono::{DateTime, Local};
use anyhow::Result;

pub fn log_error(path: impl AsRef<Path>, category: &str, message: &str) -> Result<()> {
    log_message(path.as_ref(), "ERROR", category, message)
}

pub fn log_info(path: impl AsRef<Path>, category: &str, message: &str) -> Result<()> {
    log_message(path.as_ref(), "INFO", category, message)
}

fn log_message(path: &Path, level: &str, category: &str, message: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    writeln!(file, "{}", format_line(Local::now(), level, category, message))?;

    Ok(())
}

fn format_line(at: DateTime<Local>, level: &str, category: &str, message: &str) -> String {
    format!(
        "[{}] {} - {}: {}",
        at.format("%Y-%m-%d %H:%M:%S"),
        level,
        category,
        message
    )
}
