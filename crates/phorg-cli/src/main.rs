mod console;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use indicatif::ProgressBar;
use phorg_core::inspect;
use phorg_core::{
    ConflictPolicy, DateRange, DateResolver, FileEvent, FsTimeFallback, GroupBy, OrganizeError,
    OrganizeOptions, Prompts, RunSummary, UserInteraction,
};

use console::ConsoleInteraction;

#[derive(Parser)]
#[command(
    name = "phorg",
    version,
    about = "Copy photos into YYYY/MM folders by capture date",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    run: RunArgs,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(clap::Args)]
struct RunArgs {
    /// Folder with the photos (asked for when omitted)
    source: Option<PathBuf>,

    /// Root of the dated folder tree (asked for when omitted)
    destination: Option<PathBuf>,

    /// Only copy photos taken on or after this day
    #[arg(long, value_name = "DD/MM/YYYY", requires = "to")]
    from: Option<String>,

    /// Only copy photos taken on or before this day
    #[arg(long, value_name = "DD/MM/YYYY", requires = "from")]
    to: Option<String>,

    /// Prompt for a date range before copying
    #[arg(long, conflicts_with = "from")]
    ask_range: bool,

    /// What to do when the target name exists: skip or rename
    #[arg(long, default_value = "skip")]
    on_conflict: ConflictPolicy,

    /// Filesystem time used when there is no EXIF date: modified or created
    #[arg(long, default_value = "modified")]
    fs_fallback: FsTimeFallback,

    /// Keep the source modification time on copies
    #[arg(long)]
    preserve_mtime: bool,

    /// Show what would be copied without copying
    #[arg(long)]
    dry_run: bool,

    /// Summary grouping: month or day
    #[arg(long, default_value = "month")]
    group_by: GroupBy,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Do not ask for confirmation
    #[arg(short, long)]
    yes: bool,

    /// Use native folder pickers for missing folders
    #[cfg(feature = "dialogs")]
    #[arg(long)]
    dialogs: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List every image in a folder with its detected date and source
    Analyze {
        dir: PathBuf,
        #[arg(long, default_value = "modified")]
        fs_fallback: FsTimeFallback,
    },
    /// Show all date information found for one file
    Inspect {
        file: PathBuf,
        #[arg(long, default_value = "modified")]
        fs_fallback: FsTimeFallback,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    match cli.command {
        Some(Command::Analyze { dir, fs_fallback }) => {
            println!("Analyzing images in: {}", dir.display());
            let report = inspect::analyze_folder(&dir, &DateResolver::new(fs_fallback))?;
            print!("{}", report);
            Ok(())
        }
        Some(Command::Inspect { file, fs_fallback }) => {
            print!("{}", inspect::inspect_file(&file, &DateResolver::new(fs_fallback)));
            Ok(())
        }
        None => run(cli.run),
    }
}

fn run(args: RunArgs) -> anyhow::Result<()> {
    let date_range = match (&args.from, &args.to) {
        (Some(from), Some(to)) => match DateRange::parse(from, to) {
            Ok(range) => Some(range),
            Err(e) => {
                eprintln!("{}. Continuing without a date filter.", e);
                None
            }
        },
        _ => None,
    };

    let options = OrganizeOptions {
        source: args.source.clone().unwrap_or_default(),
        destination: args.destination.clone().unwrap_or_default(),
        date_range,
        conflict: args.on_conflict,
        fs_fallback: args.fs_fallback,
        preserve_mtime: args.preserve_mtime,
        group_by: args.group_by,
        dry_run: args.dry_run,
    };
    let prompts = Prompts {
        ask_range: args.ask_range,
        assume_yes: args.yes,
    };

    let mut ui = interaction(&args);
    let bar = ProgressBar::new(0);

    let t_total = std::time::Instant::now();
    let result = execute(options, prompts, ui.as_mut(), &bar);
    bar.finish_and_clear();

    let summary = match result {
        Ok(summary) => summary,
        Err(e) if matches!(e.downcast_ref::<OrganizeError>(), Some(OrganizeError::Cancelled)) => {
            println!("Cancelled. Nothing was copied.");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!();
        print!("{}", summary);
        if args.dry_run {
            println!("(dry run, nothing was written)");
        }
    }
    log::info!("Done in {:.2}s", t_total.elapsed().as_secs_f64());
    Ok(())
}

/// Run the copy, echoing each file above `bar`.
fn execute(
    options: OrganizeOptions,
    prompts: Prompts,
    ui: &mut dyn UserInteraction,
    bar: &ProgressBar,
) -> anyhow::Result<RunSummary> {
    let on_event = |event: &FileEvent| {
        if bar.length() == Some(0) {
            bar.set_length(event.total as u64);
        }
        bar.suspend(|| println!("{}", event));
        bar.inc(1);
    };
    phorg_core::organize_interactive(options, prompts, ui, &on_event)
}

#[cfg(feature = "dialogs")]
fn interaction(args: &RunArgs) -> Box<dyn UserInteraction> {
    if args.dialogs {
        Box::new(console::DialogInteraction::new(ConsoleInteraction::stdin()))
    } else {
        Box::new(ConsoleInteraction::stdin())
    }
}

#[cfg(not(feature = "dialogs"))]
fn interaction(_args: &RunArgs) -> Box<dyn UserInteraction> {
    Box::new(ConsoleInteraction::stdin())
}
