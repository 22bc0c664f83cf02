//! JSON input for the subcommands: an explicit `--input` path wins, piped
//! stdin is the fallback, and `None` means the caller should use its flags.

use serde::de::DeserializeOwned;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

type InputResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Load a typed record from `--input`, else from piped stdin.
pub fn load<T: DeserializeOwned>(path: Option<&str>) -> InputResult<Option<T>> {
    if let Some(path) = path {
        return read_json(path).map(Some);
    }
    match read_stdin()? {
        Some(raw) => {
            let value: T = serde_json::from_str(&raw)
                .map_err(|e| format!("Failed to parse stdin: {}", e))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> InputResult<T> {
    let resolved = resolve_path(path)?;
    let contents = fs::read_to_string(&resolved)
        .map_err(|e| format!("Failed to read '{}': {}", resolved.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", resolved.display(), e))?;
    Ok(value)
}

/// Raw piped stdin, or `None` when stdin is a TTY or empty.
fn read_stdin() -> InputResult<Option<String>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(trimmed.to_string()))
}

fn resolve_path(path: &str) -> InputResult<PathBuf> {
    let p = Path::new(path);
    let resolved = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !resolved.is_file() {
        return Err(format!("Input file not found: {}", resolved.display()).into());
    }
    Ok(resolved)
}
