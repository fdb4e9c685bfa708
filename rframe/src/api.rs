//! Public write entry points
//!
//! Thin validation layer in front of `WriteOrchestrator`. All checks here run
//! before the storage writer is touched.

use crate::data::Table;
use crate::rdata::{FileFormat, StorageWriter, WriteOptions, WriteOrchestrator};
use crate::{RFrameError, Result};
use std::path::{Path, PathBuf};

/// Expand a leading `~` to the user's home directory
pub fn expand_user(path: &Path) -> PathBuf {
    let Some(s) = path.to_str() else {
        return path.to_path_buf();
    };
    let rest = match s.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return path.to_path_buf(),
    };
    match std::env::var_os("HOME") {
        Some(home) if rest.is_empty() => PathBuf::from(home),
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}

fn resolve_path(path: &Path) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(RFrameError::InvalidPath("path must be a non-empty string".to_string()));
    }
    Ok(expand_user(path))
}

/// Object name for the container variant: the table's own name when set,
/// otherwise `options.object_name`
fn object_name<'a>(table: &'a Table, options: &'a WriteOptions) -> Result<&'a str> {
    let name = table.name().unwrap_or(&options.object_name);
    if name.is_empty() {
        return Err(RFrameError::InvalidName("object name must be a non-empty string".to_string()));
    }
    Ok(name)
}

/// Write a table as a named object in an RData container.
///
/// A name attached with `Table::named` takes precedence over
/// `options.object_name`. The resolved name must not be empty.
pub fn write_rdata<W: StorageWriter + ?Sized>(
    writer: &mut W,
    path: impl AsRef<Path>,
    table: &Table,
    options: &WriteOptions,
) -> Result<()> {
    let name = object_name(table, options)?;
    options.validate()?;
    let path = resolve_path(path.as_ref())?;
    WriteOrchestrator::write(writer, &path, FileFormat::RData, table, name, options)
}

/// Write a table as the single unnamed object of an Rds file
pub fn write_rds<W: StorageWriter + ?Sized>(
    writer: &mut W,
    path: impl AsRef<Path>,
    table: &Table,
    options: &WriteOptions,
) -> Result<()> {
    options.validate()?;
    let path = resolve_path(path.as_ref())?;
    // The writer ignores the name for this variant
    WriteOrchestrator::write(writer, &path, FileFormat::Rds, table, "", options)
}
