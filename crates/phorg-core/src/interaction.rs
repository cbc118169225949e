//! Everything that has to ask a person something before a run starts.
//!
//! Front-ends implement [`UserInteraction`]; [`prepare`] drives it so the
//! organizer itself never blocks on input.

use std::path::PathBuf;

use log::warn;

use crate::error::OrganizeError;
use crate::media;
use crate::range::DateRange;
use crate::OrganizeOptions;

/// What the user is asked to confirm.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub candidates: usize,
    pub date_range: Option<DateRange>,
}

pub trait UserInteraction {
    fn pick_source(&mut self) -> Option<PathBuf>;

    fn pick_destination(&mut self) -> Option<PathBuf>;

    /// Free text holding two `DD/MM/YYYY` dates. `None` or blank means no
    /// filter.
    fn ask_date_range(&mut self) -> Option<String>;

    fn confirm(&mut self, plan: &RunPlan) -> bool;

    /// Called when the typed range could not be used. The run continues
    /// without a filter.
    fn invalid_date_range(&mut self, _error: &OrganizeError) {}
}

/// Fixed answers, for headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInteraction {
    pub source: Option<PathBuf>,
    pub destination: Option<PathBuf>,
    pub date_range: Option<String>,
    pub confirm: bool,
    /// Prompts shown so far, in order.
    pub asked: Vec<&'static str>,
}

impl UserInteraction for ScriptedInteraction {
    fn pick_source(&mut self) -> Option<PathBuf> {
        self.asked.push("source");
        self.source.clone()
    }

    fn pick_destination(&mut self) -> Option<PathBuf> {
        self.asked.push("destination");
        self.destination.clone()
    }

    fn ask_date_range(&mut self) -> Option<String> {
        self.asked.push("date_range");
        self.date_range.clone()
    }

    fn confirm(&mut self, _plan: &RunPlan) -> bool {
        self.asked.push("confirm");
        self.confirm
    }

    fn invalid_date_range(&mut self, _error: &OrganizeError) {
        self.asked.push("invalid_date_range");
    }
}

/// How much of the prompting to do.
#[derive(Debug, Clone, Copy, Default)]
pub struct Prompts {
    /// Ask for a date range when none is set.
    pub ask_range: bool,
    /// Skip the confirmation step.
    pub assume_yes: bool,
}

/// Fill in unset folders and the date range through `ui`, then confirm.
///
/// An empty `source`/`destination` in `options` means "ask". Declining a
/// folder picker or the confirmation cancels; a bad date range does not.
pub fn prepare(
    mut options: OrganizeOptions,
    prompts: Prompts,
    ui: &mut dyn UserInteraction,
) -> Result<OrganizeOptions, OrganizeError> {
    if options.source.as_os_str().is_empty() {
        options.source = ui
            .pick_source()
            .ok_or(OrganizeError::Cancelled)?;
    }
    let candidates = media::scan_images(&options.source)?.len();

    if options.destination.as_os_str().is_empty() {
        options.destination = ui.pick_destination().ok_or(OrganizeError::Cancelled)?;
    }

    if prompts.ask_range && options.date_range.is_none() {
        if let Some(text) = ui.ask_date_range().filter(|t| !t.trim().is_empty()) {
            match DateRange::parse_pair(&text) {
                Ok(range) => options.date_range = Some(range),
                Err(e) => {
                    warn!("{}; continuing without a date range", e);
                    ui.invalid_date_range(&e);
                }
            }
        }
    }

    if !prompts.assume_yes {
        let plan = RunPlan {
            source: options.source.clone(),
            destination: options.destination.clone(),
            candidates,
            date_range: options.date_range,
        };
        if !ui.confirm(&plan) {
            return Err(OrganizeError::Cancelled);
        }
    }

    Ok(options)
}
