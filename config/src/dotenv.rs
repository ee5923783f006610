//! `.env` parsing. Values are returned, never applied here.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// `.env` in `dir`, or in the current directory.
fn dotenv_path(dir: Option<&Path>) -> Option<PathBuf> {
    let dir = dir
        .map(Path::to_path_buf)
        .or_else(|| std::env::current_dir().ok())?;
    let path = dir.join(".env");
    path.is_file().then_some(path)
}

/// Parses `KEY=VALUE` lines.
///
/// * Blank lines and lines starting with `#` are skipped, as are lines without `=`.
/// * An optional leading `export ` is accepted.
/// * Double-quoted values support `\"`, `\\` and `\n`; single-quoted values are literal.
/// * In unquoted values, ` #` starts a trailing comment.
/// * A key that appears twice keeps its last value.
pub fn parse(content: &str) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, raw)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        out.insert(key.to_string(), value(raw.trim()));
    }
    out
}

fn value(raw: &str) -> String {
    if let Some(inner) = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
    {
        let mut s = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                s.push(c);
                continue;
            }
            match chars.next() {
                Some('n') => s.push('\n'),
                Some(other) => s.push(other),
                None => s.push('\\'),
            }
        }
        return s;
    }
    if let Some(inner) = raw
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
    {
        return inner.to_string();
    }
    match raw.find(" #") {
        Some(i) => raw[..i].trim_end().to_string(),
        None => raw.to_string(),
    }
}

/// Loads `.env` from `dir` (or the current directory). A missing file is an empty map.
pub fn load(dir: Option<&Path>) -> std::io::Result<BTreeMap<String, String>> {
    match dotenv_path(dir) {
        Some(path) => Ok(parse(&std::fs::read_to_string(path)?)),
        None => Ok(BTreeMap::new()),
    }
}
