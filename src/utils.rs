use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::Permissions;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;
use tempfile::Builder;

use super::error::PrepError;

/// Creates a progress bar for monitoring function progress.
pub fn progress_bar_for_count(count: usize) -> ProgressBar {
    let style = ProgressStyle::with_template(
        "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {human_pos}/{human_len} ({per_sec}, {eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    ProgressBar::new(count as u64).with_style(style)
}

/// Writes `data` as JSON indented with four spaces. Non-ASCII text is written
/// as is. The file is built next to `path` and renamed over it once complete.
/// An existing destination keeps its permissions; a new file gets the usual
/// `0o666` masked by the umask.
pub fn write_json_file<T: Serialize>(path: &Path, data: &T) -> Result<(), PrepError> {
    println!("Writing to {}", path.display());
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(Permissions::from_mode(0o666));
    }
    let file = builder
        .tempfile_in(directory)
        .map_err(|e| PrepError::file_access(directory, e))?;
    if let Some(permissions) = existing_permissions(path)? {
        file.as_file()
            .set_permissions(permissions)
            .map_err(|e| PrepError::file_access(path, e))?;
    }

    let mut writer = BufWriter::new(file);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    data.serialize(&mut serializer)
        .map_err(|e| PrepError::file_access(path, e.into()))?;
    writer.flush().map_err(|e| PrepError::file_access(path, e))?;

    let file = writer
        .into_inner()
        .map_err(|e| PrepError::file_access(path, e.into_error()))?;
    file.persist(path)
        .map_err(|e| PrepError::file_access(path, e.error))?;
    Ok(())
}

fn existing_permissions(path: &Path) -> Result<Option<Permissions>, PrepError> {
    match fs_err::metadata(path) {
        Ok(metadata) => Ok(Some(metadata.permissions())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(PrepError::file_access(path, e)),
    }
}
