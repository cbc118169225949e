use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures the organizer distinguishes between.
///
/// Only `MissingSourceFolder` and `Cancelled` stop a run. The two date
/// resolution variants are recovered inside the resolver, `Copy` becomes a
/// per-file failure and `InvalidDateRange` just switches the filter off.
#[derive(Debug, Error)]
pub enum OrganizeError {
    #[error("source folder not found or not readable: {}", .0.display())]
    MissingSourceFolder(PathBuf),

    #[error("{reader} metadata reader: {message}")]
    MetadataParse { reader: &'static str, message: String },

    #[error("cannot stat {}: {source}", .path.display())]
    FilesystemStat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot copy to {}: {source}", .path.display())]
    Copy {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("operation cancelled")]
    Cancelled,
}

impl OrganizeError {
    pub(crate) fn metadata(reader: &'static str, message: impl ToString) -> Self {
        OrganizeError::MetadataParse {
            reader,
            message: message.to_string(),
        }
    }
}
