use std::path::Path;

use chrono::{DateTime, NaiveDateTime};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::OrganizeError;

/// EXIF fields that can hold a capture timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateTag {
    DateTime,
    DateTimeOriginal,
    DateTimeDigitized,
}

impl DateTag {
    pub fn name(self) -> &'static str {
        match self {
            DateTag::DateTime => "DateTime",
            DateTag::DateTimeOriginal => "DateTimeOriginal",
            DateTag::DateTimeDigitized => "DateTimeDigitized",
        }
    }
}

/// The two EXIF parsers. They disagree on which files they can read, so
/// both get a turn before falling back to filesystem times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataSource {
    /// `kamadak-exif`: walks IFD0 and the Exif sub-IFD directly.
    Rich,
    /// `nom-exif`: media-type aware parser with named tags.
    Generic,
}

/// A tag value found by one of the readers, still undecoded.
type RawTag = (DateTag, Vec<u8>);

/// Timestamp read from EXIF plus where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExifHit {
    pub date: NaiveDateTime,
    pub tag: DateTag,
    /// Whether `tag` is the reader's first-priority tag.
    pub primary: bool,
}

impl MetadataSource {
    pub fn name(self) -> &'static str {
        match self {
            MetadataSource::Rich => "rich",
            MetadataSource::Generic => "generic",
        }
    }

    /// Tag priority. The rich reader prefers the IFD0 `DateTime`, the
    /// generic one the capture time.
    pub fn tag_order(self) -> &'static [DateTag] {
        match self {
            MetadataSource::Rich => &[
                DateTag::DateTime,
                DateTag::DateTimeOriginal,
                DateTag::DateTimeDigitized,
            ],
            MetadataSource::Generic => &[
                DateTag::DateTimeOriginal,
                DateTag::DateTime,
                DateTag::DateTimeDigitized,
            ],
        }
    }

    /// First tag in priority order whose value decodes and parses.
    ///
    /// `Ok(None)` means the metadata was readable but held no usable date;
    /// `Err` means the container itself could not be parsed.
    pub fn read_date(self, path: &Path) -> Result<Option<ExifHit>, OrganizeError> {
        let raw = match self {
            MetadataSource::Rich => read_rich(path)?,
            MetadataSource::Generic => read_generic(path)?,
        };
        Ok(first_parseable(self.tag_order(), &raw, self.value_parser()))
    }

    /// The rich reader sees raw EXIF bytes; the generic one hands back its
    /// own rendering of the value.
    fn value_parser(self) -> fn(&[u8]) -> Option<NaiveDateTime> {
        match self {
            MetadataSource::Rich => parse_exif_datetime,
            MetadataSource::Generic => parse_rendered_datetime,
        }
    }
}

fn first_parseable(
    order: &[DateTag],
    raw: &[RawTag],
    parse: fn(&[u8]) -> Option<NaiveDateTime>,
) -> Option<ExifHit> {
    order.iter().enumerate().find_map(|(rank, tag)| {
        let (_, bytes) = raw.iter().find(|(t, _)| t == tag)?;
        match parse(bytes) {
            Some(date) => Some(ExifHit {
                date,
                tag: *tag,
                primary: rank == 0,
            }),
            None => {
                debug!(
                    "ignoring unparseable {} value {:?}",
                    tag.name(),
                    String::from_utf8_lossy(bytes)
                );
                None
            }
        }
    })
}

#[cfg(feature = "rich-exif")]
fn read_rich(path: &Path) -> Result<Vec<RawTag>, OrganizeError> {
    use exif::{In, Reader, Tag, Value};
    use std::fs::File;
    use std::io::BufReader;

    let file = File::open(path).map_err(|e| OrganizeError::metadata("rich", e))?;
    let exif = Reader::new()
        .read_from_container(&mut BufReader::new(file))
        .map_err(|e| OrganizeError::metadata("rich", e))?;

    let tags = [
        (DateTag::DateTime, Tag::DateTime),
        (DateTag::DateTimeOriginal, Tag::DateTimeOriginal),
        (DateTag::DateTimeDigitized, Tag::DateTimeDigitized),
    ];

    let mut raw = Vec::new();
    for (ours, theirs) in tags {
        let Some(field) = exif.get_field(theirs, In::PRIMARY) else {
            continue;
        };
        if let Value::Ascii(ref parts) = field.value {
            if let Some(bytes) = parts.first() {
                raw.push((ours, bytes.clone()));
            }
        }
    }
    Ok(raw)
}

#[cfg(not(feature = "rich-exif"))]
fn read_rich(_path: &Path) -> Result<Vec<RawTag>, OrganizeError> {
    Err(OrganizeError::metadata("rich", "built without the rich-exif feature"))
}

fn read_generic(path: &Path) -> Result<Vec<RawTag>, OrganizeError> {
    use nom_exif::{Exif, ExifIter, ExifTag, MediaParser, MediaSource as NomSource};

    let mut parser = MediaParser::new();
    let ms = NomSource::file_path(path).map_err(|e| OrganizeError::metadata("generic", e))?;
    let iter: ExifIter = parser
        .parse(ms)
        .map_err(|e| OrganizeError::metadata("generic", e))?;
    let exif: Exif = iter.into();

    let tags = [
        (DateTag::DateTimeOriginal, ExifTag::DateTimeOriginal),
        (DateTag::DateTime, ExifTag::ModifyDate),
        (DateTag::DateTimeDigitized, ExifTag::CreateDate),
    ];

    let mut raw = Vec::new();
    for (ours, theirs) in tags {
        if let Some(value) = exif.get(theirs) {
            let text = value.to_string();
            let text = text.trim().trim_matches('"');
            if !text.is_empty() {
                raw.push((ours, text.as_bytes().to_vec()));
            }
        }
    }
    Ok(raw)
}

/// Every EXIF field whose name mentions a date or time, as `(name, value)`.
/// Empty when the file has no readable EXIF.
#[cfg(feature = "rich-exif")]
pub fn date_fields(path: &Path) -> Vec<(String, String)> {
    use exif::Reader;
    use std::fs::File;
    use std::io::BufReader;

    let Ok(file) = File::open(path) else {
        return vec![];
    };
    let Ok(exif) = Reader::new().read_from_container(&mut BufReader::new(file)) else {
        return vec![];
    };
    exif.fields()
        .filter_map(|field| {
            let name = field.tag.to_string();
            (name.contains("Date") || name.contains("Time"))
                .then(|| (name, field.display_value().to_string()))
        })
        .collect()
}

#[cfg(not(feature = "rich-exif"))]
pub fn date_fields(_path: &Path) -> Vec<(String, String)> {
    vec![]
}

/// Parse a raw EXIF datetime value: `YYYY:MM:DD HH:MM:SS`, NUL padding
/// allowed, nothing else. EXIF datetimes have no timezone: they are taken as
/// local wall-clock time.
pub fn parse_exif_datetime(raw: &[u8]) -> Option<NaiveDateTime> {
    let s = std::str::from_utf8(raw).ok()?;
    let s = s.trim_end_matches('\0').trim();
    NaiveDateTime::parse_from_str(s, "%Y:%m:%d %H:%M:%S").ok()
}

/// Parse a datetime as rendered by `nom-exif`, which may already have turned
/// the EXIF value into an ISO form, with or without an offset. An offset is
/// dropped in favour of the wall-clock time it qualifies.
pub fn parse_rendered_datetime(raw: &[u8]) -> Option<NaiveDateTime> {
    if let Some(dt) = parse_exif_datetime(raw) {
        return Some(dt);
    }
    let s = std::str::from_utf8(raw).ok()?.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S %z") {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}
