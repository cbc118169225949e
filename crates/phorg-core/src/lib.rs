pub mod date;
pub mod error;
pub mod inspect;
pub mod interaction;
pub mod media;
pub mod range;
pub mod summary;
pub mod writer;

#[cfg(test)]
mod fixtures;

use std::fs;
use std::path::PathBuf;

use log::info;
use serde::{Deserialize, Serialize};

pub use date::{DateResolution, DateResolver, FsTimeFallback, Provenance, Strategy};
pub use date::exif::{DateTag, MetadataSource};
pub use error::OrganizeError;
pub use interaction::{prepare, Prompts, RunPlan, ScriptedInteraction, UserInteraction};
pub use media::{ImageFile, IMAGE_EXTENSIONS};
pub use range::DateRange;
pub use summary::{FileEvent, FileOutcome, GroupBy, RunSummary};
pub use writer::{ConflictPolicy, PlacementOutcome, Placer};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizeOptions {
    /// Folder whose top-level images are copied
    pub source: PathBuf,
    /// Root of the `YYYY/MM` tree
    pub destination: PathBuf,
    #[serde(default)]
    pub date_range: Option<DateRange>,
    #[serde(default)]
    pub conflict: ConflictPolicy,
    #[serde(default)]
    pub fs_fallback: FsTimeFallback,
    #[serde(default)]
    pub preserve_mtime: bool,
    #[serde(default)]
    pub group_by: GroupBy,
    #[serde(default)]
    pub dry_run: bool,
}

/// Type alias for the per-file callback
pub type EventCallback<'a> = dyn Fn(&FileEvent) + 'a;

/// Copy every image in `options.source` into its dated folder.
///
/// Fails only when the source folder is unusable or the destination root
/// cannot be created; per-file problems end up in the summary.
pub fn organize(options: &OrganizeOptions, on_event: &EventCallback<'_>) -> anyhow::Result<RunSummary> {
    let images = media::scan_images(&options.source)?;
    if !options.dry_run {
        fs::create_dir_all(&options.destination)?;
    }
    info!(
        "{} image(s) in {}, copying to {}",
        images.len(),
        options.source.display(),
        options.destination.display()
    );

    let resolver = DateResolver::new(options.fs_fallback);
    let placer = Placer::new(&options.destination)
        .with_conflict(options.conflict)
        .with_preserve_mtime(options.preserve_mtime)
        .with_dry_run(options.dry_run);

    let mut summary = RunSummary::new(options.group_by, options.date_range.is_some());
    let total = images.len();

    for (index, mut image) in images.into_iter().enumerate() {
        let resolution = image.resolve(&resolver).clone();
        let outcome = match options.date_range {
            Some(range) if !range.contains(resolution.date) => FileOutcome::OutOfRange,
            _ => FileOutcome::Placed(placer.place(&image.path, resolution.date)),
        };
        let event = FileEvent {
            index,
            total,
            filename: image.filename,
            resolution,
            outcome,
        };
        summary.record(&event);
        on_event(&event);
    }

    Ok(summary)
}

/// Ask for whatever `options` leaves open, then run.
pub fn organize_interactive(
    options: OrganizeOptions,
    prompts: Prompts,
    ui: &mut dyn UserInteraction,
    on_event: &EventCallback<'_>,
) -> anyhow::Result<RunSummary> {
    let options = prepare(options, prompts, ui)?;
    organize(&options, on_event)
}
