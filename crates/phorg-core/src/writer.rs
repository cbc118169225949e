use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDateTime;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::OrganizeError;

/// What to do when the target filename is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Leave the existing file alone and report it as skipped.
    #[default]
    Skip,
    /// Copy under `name_1.ext`, `name_2.ext`, ...
    Rename,
}

impl FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(ConflictPolicy::Skip),
            "rename" => Ok(ConflictPolicy::Rename),
            other => Err(format!("unknown conflict policy '{}' (expected skip or rename)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "kebab-case")]
pub enum PlacementOutcome {
    Copied(PathBuf),
    SkippedExists(PathBuf),
    Failed(String),
}

impl fmt::Display for PlacementOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementOutcome::Copied(dest) => write!(f, "copied -> {}", dest.display()),
            PlacementOutcome::SkippedExists(dest) => {
                write!(f, "already exists -> {}, not copied", dest.display())
            }
            PlacementOutcome::Failed(reason) => write!(f, "error: {}", reason),
        }
    }
}

/// Copies files into `<root>/YYYY/MM/`.
#[derive(Debug, Clone)]
pub struct Placer {
    root: PathBuf,
    conflict: ConflictPolicy,
    preserve_mtime: bool,
    dry_run: bool,
}

impl Placer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            conflict: ConflictPolicy::default(),
            preserve_mtime: false,
            dry_run: false,
        }
    }

    pub fn with_conflict(mut self, conflict: ConflictPolicy) -> Self {
        self.conflict = conflict;
        self
    }

    /// Carry the source modification time over to the copy.
    pub fn with_preserve_mtime(mut self, preserve: bool) -> Self {
        self.preserve_mtime = preserve;
        self
    }

    /// Work out outcomes without touching the destination.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn target_dir(&self, date: NaiveDateTime) -> PathBuf {
        let year = date.format("%Y").to_string();
        let month = date.format("%m").to_string();
        self.root.join(year).join(month)
    }

    /// Create the year and month directories if missing. Existing ones are
    /// reused as they are.
    pub fn ensure_target_dir(&self, date: NaiveDateTime) -> io::Result<PathBuf> {
        let month_dir = self.target_dir(date);
        if let Some(year_dir) = month_dir.parent() {
            ensure_dir(year_dir)?;
        }
        ensure_dir(&month_dir)?;
        Ok(month_dir)
    }

    pub fn place(&self, path: &Path, date: NaiveDateTime) -> PlacementOutcome {
        let Some(filename) = path.file_name() else {
            return PlacementOutcome::Failed(format!("{} has no file name", path.display()));
        };

        let dir = if self.dry_run {
            self.target_dir(date)
        } else {
            match self.ensure_target_dir(date) {
                Ok(dir) => dir,
                Err(source) => {
                    let err = OrganizeError::Copy {
                        path: self.target_dir(date),
                        source,
                    };
                    return PlacementOutcome::Failed(err.to_string());
                }
            }
        };

        let mut dest = dir.join(filename);
        if dest.exists() {
            match self.conflict {
                ConflictPolicy::Skip => return PlacementOutcome::SkippedExists(dest),
                ConflictPolicy::Rename => {
                    dest = dir.join(unique_name(&dir, &filename.to_string_lossy()));
                }
            }
        }

        if self.dry_run {
            return PlacementOutcome::Copied(dest);
        }
        match copy_file(path, &dest, self.preserve_mtime) {
            Ok(()) => PlacementOutcome::Copied(dest),
            Err(e) => PlacementOutcome::Failed(e.to_string()),
        }
    }
}

fn ensure_dir(dir: &Path) -> io::Result<()> {
    match fs::create_dir(dir) {
        Ok(()) => {
            info!("Created {}", dir.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => fs::create_dir_all(dir),
        Err(e) => Err(e),
    }
}

fn copy_file(src: &Path, dest: &Path, preserve_mtime: bool) -> Result<(), OrganizeError> {
    fs::copy(src, dest).map_err(|source| OrganizeError::Copy {
        path: dest.to_path_buf(),
        source,
    })?;

    if preserve_mtime {
        let mtime = fs::metadata(src).map(|m| filetime::FileTime::from_last_modification_time(&m));
        if let Err(e) = mtime.and_then(|ft| filetime::set_file_mtime(dest, ft)) {
            warn!("Could not keep modification time on {}: {}", dest.display(), e);
        }
    }
    Ok(())
}

/// First free name in `dir` of the form `filename`, `stem_1.ext`, `stem_2.ext`, ...
pub fn unique_name(dir: &Path, filename: &str) -> String {
    let file = Path::new(filename);
    let stem = file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
    let ext = file.extension().and_then(|s| s.to_str());

    let mut candidate = filename.to_string();
    let mut counter = 1u32;
    while dir.join(&candidate).exists() {
        candidate = match ext {
            Some(ext) => format!("{}_{}.{}", stem, counter, ext),
            None => format!("{}_{}", stem, counter),
        };
        counter += 1;
    }
    candidate
}
