pub mod exif;
pub mod fs;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{Local, NaiveDateTime};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::OrganizeError;
use self::exif::{DateTag, MetadataSource};

/// Which kind of signal a resolved date came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    ExifPrimary,
    ExifAlternate,
    FileModified,
    FileCreated,
    CurrentTime,
}

/// Result of date resolution: the date plus how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateResolution {
    pub date: NaiveDateTime,
    pub provenance: Provenance,
    /// EXIF reader and tag, for EXIF provenances.
    pub source: Option<MetadataSource>,
    pub tag: Option<DateTag>,
}

impl DateResolution {
    fn filesystem(date: NaiveDateTime, provenance: Provenance) -> Self {
        Self {
            date,
            provenance,
            source: None,
            tag: None,
        }
    }

    fn now() -> Self {
        Self::filesystem(Local::now().naive_local(), Provenance::CurrentTime)
    }

    /// Short human label, e.g. `EXIF (DateTimeOriginal)` or `MODIFICATION`.
    pub fn label(&self) -> String {
        match (self.provenance, self.tag) {
            (Provenance::ExifPrimary | Provenance::ExifAlternate, Some(tag)) => {
                let reader = self.source.map_or("", |s| s.name());
                format!("EXIF {} ({})", reader, tag.name())
            }
            (Provenance::ExifPrimary | Provenance::ExifAlternate, None) => "EXIF".to_string(),
            (Provenance::FileModified, _) => "MODIFICATION".to_string(),
            (Provenance::FileCreated, _) => "CREATION".to_string(),
            (Provenance::CurrentTime, _) => "CURRENT".to_string(),
        }
    }
}

/// Filesystem timestamp used once EXIF has nothing to offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FsTimeFallback {
    #[default]
    Modified,
    /// Unreliable across platforms: often the time the file was copied.
    Created,
}

impl FromStr for FsTimeFallback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "modified" | "mtime" => Ok(FsTimeFallback::Modified),
            "created" | "ctime" => Ok(FsTimeFallback::Created),
            other => Err(format!("unknown filesystem fallback '{}' (expected modified or created)", other)),
        }
    }
}

/// One link of the resolution chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Exif(MetadataSource),
    FileModified,
    FileCreated,
}

impl From<FsTimeFallback> for Strategy {
    fn from(fallback: FsTimeFallback) -> Self {
        match fallback {
            FsTimeFallback::Modified => Strategy::FileModified,
            FsTimeFallback::Created => Strategy::FileCreated,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Exif(source) => write!(f, "exif-{}", source.name()),
            Strategy::FileModified => write!(f, "file-modified"),
            Strategy::FileCreated => write!(f, "file-created"),
        }
    }
}

impl Strategy {
    fn try_resolve(&self, path: &Path) -> Result<Option<DateResolution>, OrganizeError> {
        match self {
            Strategy::Exif(source) => Ok(source.read_date(path)?.map(|hit| DateResolution {
                date: hit.date,
                provenance: if hit.primary {
                    Provenance::ExifPrimary
                } else {
                    Provenance::ExifAlternate
                },
                source: Some(*source),
                tag: Some(hit.tag),
            })),
            Strategy::FileModified => Ok(Some(DateResolution::filesystem(
                fs::modified(path)?,
                Provenance::FileModified,
            ))),
            Strategy::FileCreated => Ok(Some(DateResolution::filesystem(
                fs::created(path)?,
                Provenance::FileCreated,
            ))),
        }
    }

    /// Run this strategy alone. Every failure counts as "nothing found".
    pub fn attempt(&self, path: &Path) -> Option<DateResolution> {
        match self.try_resolve(path) {
            Ok(found) => {
                if found.is_none() {
                    debug!("{}: no date from {}", path.display(), self);
                }
                found
            }
            Err(e) => {
                debug!("{}: {} failed: {}", path.display(), self, e);
                None
            }
        }
    }
}

/// Ordered chain of strategies; the first one producing a date wins.
#[derive(Debug, Clone)]
pub struct DateResolver {
    strategies: Vec<Strategy>,
}

impl Default for DateResolver {
    fn default() -> Self {
        Self::new(FsTimeFallback::default())
    }
}

impl DateResolver {
    /// Both EXIF readers, then the chosen filesystem timestamp.
    pub fn new(fallback: FsTimeFallback) -> Self {
        Self::with_strategies(vec![
            Strategy::Exif(MetadataSource::Rich),
            Strategy::Exif(MetadataSource::Generic),
            fallback.into(),
        ])
    }

    pub fn with_strategies(strategies: Vec<Strategy>) -> Self {
        Self { strategies }
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Best-effort date for `path`. Never fails: when no strategy yields a
    /// date the current time is returned.
    pub fn resolve(&self, path: &Path) -> DateResolution {
        self.strategies
            .iter()
            .find_map(|s| s.attempt(path))
            .unwrap_or_else(|| {
                warn!("{}: no usable date, using current time", path.display());
                DateResolution::now()
            })
    }

    /// Outcome of every strategy in order, without short-circuiting.
    pub fn trace(&self, path: &Path) -> Vec<(Strategy, Option<DateResolution>)> {
        self.strategies
            .iter()
            .map(|s| (*s, s.attempt(path)))
            .collect()
    }
}
