use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use crate::delays::LoadOutcome;

/// Credential store: one `username|password|appId` record per line.
pub const ACCOUNTS_FILE: &str = "accounts.txt";
/// Proxy store: one URL per line, position-aligned with the accounts.
pub const PROXIES_FILE: &str = "proxies.txt";
/// Claim-token store: one opaque token per line.
pub const TOKENS_FILE: &str = "tokens.txt";
/// Custom prompt store: one prompt per line.
pub const PROMPTS_FILE: &str = "prompts.txt";
/// Delay config record.
pub const DELAYS_FILE: &str = "delays.toml";

/// Load a newline-delimited store: trims each line and drops blanks.
///
/// Line positions among the returned entries define record order; callers
/// that need file positions should enumerate the result.
pub fn load_lines(path: &Path) -> LoadOutcome<Vec<String>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return LoadOutcome::Missing,
        Err(err) => return LoadOutcome::Invalid(format!("read failed: {err}")),
    };

    let lines = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    LoadOutcome::Loaded(lines)
}

/// Append records to a newline-delimited store, creating it if needed.
///
/// Entries are trimmed; blank entries are dropped.
pub fn append_lines(path: &Path, entries: &[String]) -> Result<usize> {
    let entries: Vec<&str> = entries
        .iter()
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .collect();

    if entries.is_empty() {
        return Ok(0);
    }

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open store: {}", path.display()))?;

    for entry in &entries {
        writeln!(file, "{entry}")
            .with_context(|| format!("Failed to append to store: {}", path.display()))?;
    }

    Ok(entries.len())
}
