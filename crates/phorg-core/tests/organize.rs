#[path = "../src/fixtures.rs"]
mod fixtures;

use std::cell::RefCell;
use std::fs;
use std::path::Path;

use chrono::{Local, TimeZone};
use fixtures::*;
use phorg_core::{
    organize, organize_interactive, ConflictPolicy, DateRange, FileEvent, FileOutcome, OrganizeError,
    OrganizeOptions, PlacementOutcome, Prompts, ScriptedInteraction,
};
use tempfile::tempdir;

fn pin_mtime(path: &Path, y: i32, m: u32, d: u32) {
    let local = Local.with_ymd_and_hms(y, m, d, 12, 0, 0).single().unwrap();
    filetime::set_file_mtime(path, filetime::FileTime::from_unix_time(local.timestamp(), 0)).unwrap();
}

/// `a.jpg` with a capture date and `b.png` with only an mtime.
fn seed_source(dir: &Path) {
    fs::write(
        dir.join("a.jpg"),
        jpeg_with_dates(&[(DATE_TIME_ORIGINAL, "2022:05:10 14:30:00")]),
    )
    .unwrap();
    pin_mtime(&dir.join("a.jpg"), 2024, 3, 3);
    fs::write(dir.join("b.png"), bare_png()).unwrap();
    pin_mtime(&dir.join("b.png"), 2023, 1, 1);
}

fn options(src: &Path, dest: &Path) -> OrganizeOptions {
    OrganizeOptions {
        source: src.to_path_buf(),
        destination: dest.to_path_buf(),
        ..Default::default()
    }
}

#[test]
fn test_exif_and_mtime_placement() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    seed_source(src.path());
    fs::write(src.path().join("notes.txt"), b"not an image").unwrap();

    let events = RefCell::new(Vec::new());
    let summary = organize(&options(src.path(), dest.path()), &|e: &FileEvent| {
        events.borrow_mut().push(e.to_string())
    })
    .unwrap();

    assert!(dest.path().join("2022").join("05").join("a.jpg").is_file());
    assert!(dest.path().join("2023").join("01").join("b.png").is_file());
    assert_eq!(summary.copied, 2);
    assert_eq!(summary.errored, 0);

    let events = events.into_inner();
    assert_eq!(events.len(), 2);
    assert!(events[0].starts_with("Copied: a.jpg [10/05/2022]"));
    assert!(events[1].starts_with("Copied: b.png [01/01/2023]"));
}

#[test]
fn test_second_run_copies_nothing() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    seed_source(src.path());
    let opts = options(src.path(), dest.path());

    organize(&opts, &|_| {}).unwrap();
    let again = organize(&opts, &|_| {}).unwrap();
    assert_eq!(again.copied, 0);
    assert_eq!(again.skipped_existing, 2);
}

#[test]
fn test_existing_target_is_skipped_not_overwritten() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    fs::write(
        src.path().join("a.jpg"),
        jpeg_with_dates(&[(DATE_TIME_ORIGINAL, "2022:05:10 14:30:00")]),
    )
    .unwrap();
    let month = dest.path().join("2022").join("05");
    fs::create_dir_all(&month).unwrap();
    fs::write(month.join("a.jpg"), b"already here").unwrap();
    fs::write(month.join("other.jpg"), b"untouched").unwrap();

    let summary = organize(&options(src.path(), dest.path()), &|_| {}).unwrap();
    assert_eq!(summary.copied, 0);
    assert_eq!(summary.skipped_existing, 1);
    assert_eq!(fs::read(month.join("a.jpg")).unwrap(), b"already here");
    assert_eq!(fs::read(month.join("other.jpg")).unwrap(), b"untouched");
}

#[test]
fn test_rename_policy_keeps_both() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    seed_source(src.path());
    let opts = OrganizeOptions {
        conflict: ConflictPolicy::Rename,
        ..options(src.path(), dest.path())
    };

    organize(&opts, &|_| {}).unwrap();
    let again = organize(&opts, &|_| {}).unwrap();
    assert_eq!(again.copied, 2);
    assert!(dest.path().join("2022").join("05").join("a_1.jpg").is_file());
    assert!(dest.path().join("2023").join("01").join("b_1.png").is_file());
}

#[test]
fn test_date_range_filter() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    for (name, y, m, d) in [("mid.png", 2023, 6, 15), ("old.png", 2022, 1, 1), ("last.png", 2023, 12, 31)] {
        let path = src.path().join(name);
        fs::write(&path, bare_png()).unwrap();
        pin_mtime(&path, y, m, d);
    }
    let opts = OrganizeOptions {
        date_range: Some(DateRange::parse("01/01/2023", "31/12/2023").unwrap()),
        ..options(src.path(), dest.path())
    };

    let outcomes = RefCell::new(Vec::new());
    let summary = organize(&opts, &|e: &FileEvent| {
        outcomes.borrow_mut().push((e.filename.clone(), e.outcome.clone()))
    })
    .unwrap();

    assert_eq!(summary.copied, 2);
    assert_eq!(summary.skipped_out_of_range, 1);
    assert!(summary.to_string().contains("Outside date range (skipped): 1"));
    let outcomes = outcomes.into_inner();
    let old = outcomes.iter().find(|(n, _)| n == "old.png").unwrap();
    assert_eq!(old.1, FileOutcome::OutOfRange);
    assert!(dest.path().join("2023").join("12").join("last.png").is_file());
    assert!(!dest.path().join("2022").exists());
}

#[test]
fn test_unreadable_entry_is_counted_and_run_continues() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    seed_source(src.path());
    // A regular file sits where the 2023 year directory has to go.
    fs::write(dest.path().join("2023"), b"in the way").unwrap();

    let summary = organize(&options(src.path(), dest.path()), &|e: &FileEvent| {
        if e.filename == "b.png" {
            assert!(matches!(e.outcome, FileOutcome::Placed(PlacementOutcome::Failed(_))));
        }
    })
    .unwrap();
    assert_eq!(summary.copied, 1);
    assert_eq!(summary.errored, 1);
}

#[test]
fn test_missing_source_aborts() {
    let dest = tempdir().unwrap();
    let err = organize(&options(&dest.path().join("missing"), dest.path()), &|_| {}).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<OrganizeError>(),
        Some(OrganizeError::MissingSourceFolder(_))
    ));
    assert_eq!(fs::read_dir(dest.path()).unwrap().count(), 0);
}

#[test]
fn test_dry_run_writes_nothing() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    seed_source(src.path());
    let out = dest.path().join("out");
    let opts = OrganizeOptions {
        dry_run: true,
        ..options(src.path(), &out)
    };
    let summary = organize(&opts, &|_| {}).unwrap();
    assert_eq!(summary.copied, 2);
    assert!(!out.exists());
}

#[test]
fn test_interactive_run() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    seed_source(src.path());

    let mut ui = ScriptedInteraction {
        source: Some(src.path().to_path_buf()),
        destination: Some(dest.path().to_path_buf()),
        date_range: Some("01/01/2022 - 31/12/2022".into()),
        confirm: true,
        ..Default::default()
    };
    let prompts = Prompts { ask_range: true, assume_yes: false };
    let summary = organize_interactive(OrganizeOptions::default(), prompts, &mut ui, &|_| {}).unwrap();
    assert_eq!(summary.copied, 1);
    assert_eq!(summary.skipped_out_of_range, 1);

    let mut declined = ScriptedInteraction {
        source: Some(src.path().to_path_buf()),
        destination: Some(dest.path().join("never")),
        ..Default::default()
    };
    let err = organize_interactive(OrganizeOptions::default(), Prompts::default(), &mut declined, &|_| {})
        .unwrap_err();
    assert!(matches!(err.downcast_ref::<OrganizeError>(), Some(OrganizeError::Cancelled)));
    assert!(!dest.path().join("never").exists());
}
