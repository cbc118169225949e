use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use phorg_core::{OrganizeError, RunPlan, UserInteraction};

/// Prompts on stdout, answers from stdin.
pub struct ConsoleInteraction<R> {
    input: R,
}

impl ConsoleInteraction<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> ConsoleInteraction<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    /// Trimmed answer; `None` on blank line or end of input.
    fn ask(&mut self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        io::stdout().flush().ok()?;
        let mut line = String::new();
        self.input.read_line(&mut line).ok()?;
        let answer = line.trim();
        (!answer.is_empty()).then(|| answer.to_string())
    }
}

impl<R: BufRead> UserInteraction for ConsoleInteraction<R> {
    fn pick_source(&mut self) -> Option<PathBuf> {
        self.ask("Source folder: ").map(PathBuf::from)
    }

    fn pick_destination(&mut self) -> Option<PathBuf> {
        self.ask("Destination folder: ").map(PathBuf::from)
    }

    fn ask_date_range(&mut self) -> Option<String> {
        self.ask("Date range as DD/MM/YYYY - DD/MM/YYYY (empty for all dates): ")
    }

    fn confirm(&mut self, plan: &RunPlan) -> bool {
        println!("Source:      {}", plan.source.display());
        println!("Destination: {}", plan.destination.display());
        if let Some(range) = plan.date_range {
            println!("Date range:  {}", range);
        }
        let prompt = format!("Copy {} image(s)? [y/N] ", plan.candidates);
        matches!(
            self.ask(&prompt).map(|a| a.to_ascii_lowercase()).as_deref(),
            Some("y" | "yes" | "s" | "si")
        )
    }

    fn invalid_date_range(&mut self, error: &OrganizeError) {
        println!("{}. Continuing without a date filter.", error);
    }
}

/// Native folder pickers; text prompts stay on the console.
#[cfg(feature = "dialogs")]
pub struct DialogInteraction<R> {
    console: ConsoleInteraction<R>,
}

#[cfg(feature = "dialogs")]
impl<R: BufRead> DialogInteraction<R> {
    pub fn new(console: ConsoleInteraction<R>) -> Self {
        Self { console }
    }
}

#[cfg(feature = "dialogs")]
impl<R: BufRead> UserInteraction for DialogInteraction<R> {
    fn pick_source(&mut self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Select the folder with the photos")
            .pick_folder()
    }

    fn pick_destination(&mut self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Select the destination folder")
            .pick_folder()
    }

    fn ask_date_range(&mut self) -> Option<String> {
        self.console.ask_date_range()
    }

    fn confirm(&mut self, plan: &RunPlan) -> bool {
        self.console.confirm(plan)
    }

    fn invalid_date_range(&mut self, error: &OrganizeError) {
        self.console.invalid_date_range(error)
    }
}
