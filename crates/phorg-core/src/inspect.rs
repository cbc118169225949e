//! Read-only diagnostics: why a file gets the date it gets.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::date::{self, DateResolution, DateResolver, Strategy};
use crate::error::OrganizeError;
use crate::media;

const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Container format guessed from the leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
    Tiff,
    Unknown,
}

impl ImageFormat {
    pub fn sniff(head: &[u8]) -> Self {
        match head {
            [0xFF, 0xD8, 0xFF, ..] => ImageFormat::Jpeg,
            [0x89, b'P', b'N', b'G', ..] => ImageFormat::Png,
            [b'G', b'I', b'F', b'8', ..] => ImageFormat::Gif,
            [b'B', b'M', ..] => ImageFormat::Bmp,
            [b'I', b'I', 0x2A, 0x00, ..] | [b'M', b'M', 0x00, 0x2A, ..] => ImageFormat::Tiff,
            _ => ImageFormat::Unknown,
        }
    }

    fn of_file(path: &Path) -> Self {
        let mut head = [0u8; 8];
        let read = File::open(path).and_then(|mut f| f.read(&mut head));
        match read {
            Ok(n) => Self::sniff(&head[..n]),
            Err(_) => ImageFormat::Unknown,
        }
    }
}

/// Everything known about one file's dates.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub format: ImageFormat,
    /// EXIF fields whose name mentions a date or time.
    pub exif_fields: Vec<(String, String)>,
    pub modified: Option<NaiveDateTime>,
    pub created: Option<NaiveDateTime>,
    /// Each strategy's own answer, in chain order.
    pub attempts: Vec<(String, Option<DateResolution>)>,
    pub resolution: DateResolution,
}

pub fn inspect_file(path: &Path, resolver: &DateResolver) -> FileReport {
    FileReport {
        path: path.to_path_buf(),
        format: ImageFormat::of_file(path),
        exif_fields: date::exif::date_fields(path),
        modified: date::fs::modified(path).ok(),
        created: date::fs::created(path).ok(),
        attempts: resolver
            .trace(path)
            .into_iter()
            .map(|(s, r): (Strategy, _)| (s.to_string(), r))
            .collect(),
        resolution: resolver.resolve(path),
    }
}

fn fmt_time(t: Option<NaiveDateTime>) -> String {
    t.map_or_else(|| "unavailable".to_string(), |t| t.format(DISPLAY_FORMAT).to_string())
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "File: {}", self.path.display())?;
        writeln!(f, "Format: {:?}", self.format)?;
        if self.exif_fields.is_empty() {
            writeln!(f, "No EXIF date fields found")?;
        } else {
            writeln!(f, "EXIF date fields:")?;
            for (name, value) in &self.exif_fields {
                writeln!(f, "  {}: {}", name, value)?;
            }
        }
        writeln!(f, "File timestamps:")?;
        writeln!(f, "  Modified: {}", fmt_time(self.modified))?;
        writeln!(f, "  Created:  {}", fmt_time(self.created))?;
        writeln!(f, "Strategies:")?;
        for (name, found) in &self.attempts {
            match found {
                Some(r) => writeln!(f, "  {:<14} {} ({})", name, r.date.format(DISPLAY_FORMAT), r.label())?,
                None => writeln!(f, "  {:<14} -", name)?,
            }
        }
        writeln!(
            f,
            "Resolved: {} ({})",
            self.resolution.date.format(DISPLAY_FORMAT),
            self.resolution.label()
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FolderEntry {
    pub filename: String,
    pub resolution: DateResolution,
}

/// Resolved dates for every image in a folder, plus a per-day count.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FolderReport {
    pub entries: Vec<FolderEntry>,
    pub by_day: BTreeMap<NaiveDate, usize>,
}

pub fn analyze_folder(dir: &Path, resolver: &DateResolver) -> Result<FolderReport, OrganizeError> {
    let mut report = FolderReport::default();
    for mut image in media::scan_images(dir)? {
        let resolution = image.resolve(resolver).clone();
        *report.by_day.entry(resolution.date.date()).or_default() += 1;
        report.entries.push(FolderEntry {
            filename: image.filename,
            resolution,
        });
    }
    Ok(report)
}

impl fmt::Display for FolderReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<50} {:<20} {:<30}", "File", "Detected Date", "Source")?;
        writeln!(f, "{}", "-".repeat(100))?;
        for e in &self.entries {
            writeln!(
                f,
                "{:<50} {:<20} {:<30}",
                e.filename,
                e.resolution.date.format(DISPLAY_FORMAT).to_string(),
                e.resolution.label()
            )?;
        }
        writeln!(f, "{}", "-".repeat(100))?;
        writeln!(f, "Total: {} images", self.entries.len())?;
        writeln!(f, "Summary by date:")?;
        for (day, count) in &self.by_day {
            writeln!(f, "  {}: {} images", day.format("%d/%m/%Y"), count)?;
        }
        Ok(())
    }
}
