//! Filesystem helpers for scripting sessions.
//!
//! Paths resolve against the current working directory. The `try_*` functions
//! return classified errors; the plain ones log them at the configured trace
//! level and return `None`.
use crate::config::Config;
use crate::error::ConnectError;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Resolve `path` against the current working directory.
pub fn resolve_path(path: &Path) -> Result<PathBuf, ConnectError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir()
        .map_err(|err| io_failure(path, "resolve current directory", &err))?;
    Ok(cwd.join(path))
}

pub fn try_read_json(path: &Path) -> Result<Value, ConnectError> {
    let path = existing(path)?;
    let bytes = fs::read(&path).map_err(|err| io_failure(&path, "read", &err))?;
    serde_json::from_slice(&bytes).map_err(|err| io_failure(&path, "parse JSON", &err))
}

pub fn try_read_text(path: &Path) -> Result<String, ConnectError> {
    let path = existing(path)?;
    fs::read_to_string(&path).map_err(|err| io_failure(&path, "read", &err))
}

/// Entry names under `path`, in the order the filesystem yields them.
pub fn try_list_dir(path: &Path) -> Result<Vec<String>, ConnectError> {
    let path = existing(path)?;
    let entries = fs::read_dir(&path).map_err(|err| io_failure(&path, "read dir", &err))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| io_failure(&path, "read dir entry", &err))?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}

/// Write `value` as indented JSON; the parent directory must already exist.
///
/// Strings are written JSON-quoted like any other value. The file is replaced
/// atomically via a temp file in the same directory. Symlinks are written
/// through, an existing file keeps its permissions, and new files get the
/// umask default.
pub fn try_write_json<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<PathBuf, ConnectError> {
    let path = resolve_path(path)?;
    let target = write_target(&path)?;
    let parent = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !parent.is_dir() {
        return Err(ConnectError::MissingPath { path: parent });
    }

    let text = serde_json::to_string_pretty(value)
        .map_err(|err| io_failure(&path, "serialize JSON", &err))?;
    let mut tmp = temp_file_builder()
        .tempfile_in(&parent)
        .map_err(|err| io_failure(&path, "create temp file", &err))?;
    if let Ok(metadata) = fs::metadata(&target) {
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(|err| io_failure(&path, "copy permissions", &err))?;
    }
    tmp.write_all(text.as_bytes())
        .map_err(|err| io_failure(&path, "write", &err))?;
    tmp.persist(&target)
        .map_err(|err| io_failure(&path, "publish", &err.error))?;

    tracing::debug!(
        path = %path.display(),
        target = %target.display(),
        bytes = text.len(),
        "wrote JSON"
    );
    Ok(path)
}

/// File the write lands in: `path` itself, or what a symlink at `path` names.
fn write_target(path: &Path) -> Result<PathBuf, ConnectError> {
    let is_symlink = fs::symlink_metadata(path)
        .map(|metadata| metadata.file_type().is_symlink())
        .unwrap_or(false);
    if !is_symlink {
        return Ok(path.to_path_buf());
    }
    if path.exists() {
        return fs::canonicalize(path).map_err(|err| io_failure(path, "resolve symlink", &err));
    }
    // Dangling link: create the file it points at.
    let link = fs::read_link(path).map_err(|err| io_failure(path, "read symlink", &err))?;
    Ok(match path.parent() {
        Some(parent) if link.is_relative() => parent.join(link),
        _ => link,
    })
}

#[cfg(unix)]
fn temp_file_builder() -> tempfile::Builder<'static, 'static> {
    use std::os::unix::fs::PermissionsExt;

    // Mode is applied at open, so the process umask still filters it.
    let mut builder = tempfile::Builder::new();
    builder.permissions(fs::Permissions::from_mode(0o666));
    builder
}

#[cfg(not(unix))]
fn temp_file_builder() -> tempfile::Builder<'static, 'static> {
    tempfile::Builder::new()
}

pub fn read_json(config: &Config, path: &Path) -> Option<Value> {
    reported(config, try_read_json(path))
}

pub fn read_text(config: &Config, path: &Path) -> Option<String> {
    reported(config, try_read_text(path))
}

pub fn list_dir(config: &Config, path: &Path) -> Option<Vec<String>> {
    reported(config, try_list_dir(path))
}

pub fn write_json<T: Serialize + ?Sized>(
    config: &Config,
    path: &Path,
    value: &T,
) -> Option<PathBuf> {
    reported(config, try_write_json(path, value))
}

fn reported<T>(config: &Config, result: Result<T, ConnectError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            err.log(config.trace_level);
            None
        }
    }
}

fn existing(path: &Path) -> Result<PathBuf, ConnectError> {
    let path = resolve_path(path)?;
    if !path.exists() {
        return Err(ConnectError::MissingPath { path });
    }
    Ok(path)
}

fn io_failure(path: &Path, action: &str, err: &dyn std::fmt::Display) -> ConnectError {
    ConnectError::IoFailure {
        path: path.to_path_buf(),
        message: format!("{action}: {err}"),
    }
}

#[cfg(test)]
#[path = "files_tests.rs"]
mod tests;
