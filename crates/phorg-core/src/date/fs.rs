use std::fs;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDateTime};

use crate::error::OrganizeError;

fn stat(path: &Path) -> Result<fs::Metadata, OrganizeError> {
    fs::metadata(path).map_err(|source| OrganizeError::FilesystemStat {
        path: path.to_path_buf(),
        source,
    })
}

fn to_local(time: SystemTime) -> NaiveDateTime {
    DateTime::<Local>::from(time).naive_local()
}

/// Modification time as local wall-clock time.
pub fn modified(path: &Path) -> Result<NaiveDateTime, OrganizeError> {
    let meta = stat(path)?;
    meta.modified()
        .map(to_local)
        .map_err(|source| OrganizeError::FilesystemStat {
            path: path.to_path_buf(),
            source,
        })
}

/// Creation time as local wall-clock time.
///
/// Uses the birth time where the platform records one. Unix filesystems
/// without it fall back to the inode change time, which usually reflects
/// when the file was copied rather than when the photo was taken.
pub fn created(path: &Path) -> Result<NaiveDateTime, OrganizeError> {
    let meta = stat(path)?;
    match meta.created() {
        Ok(time) => Ok(to_local(time)),
        Err(source) => changed(&meta).ok_or(OrganizeError::FilesystemStat {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(unix)]
fn changed(meta: &fs::Metadata) -> Option<NaiveDateTime> {
    use std::os::unix::fs::MetadataExt;

    let utc = DateTime::from_timestamp(meta.ctime(), meta.ctime_nsec() as u32)?;
    Some(utc.with_timezone(&Local).naive_local())
}

#[cfg(not(unix))]
fn changed(_meta: &fs::Metadata) -> Option<NaiveDateTime> {
    None
}
