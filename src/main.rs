mod flags;
mod parser;
mod render;
mod scanner;
mod stats;
mod types;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use flags::Flags;
use std::path::{Path, PathBuf};
use types::{Elog, ScanReport, SectionKind};

#[derive(Parser)]
#[command(name = "elogview")]
#[command(about = "Browse, filter, and dismiss package manager elogs", version)]
struct Cli {
    /// Elog directory; repeat the option to scan several roots
    #[arg(
        short = 'p',
        long = "elogpath",
        global = true,
        default_value = "/var/log/portage/elog"
    )]
    elogpath: Vec<String>,

    /// Flag state file (defaults to .elogview_flags in the first root)
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List elogs (the default)
    List(ListArgs),

    /// Print one elog in full and mark it read
    Show {
        /// Path or file name of the elog
        file: PathBuf,
    },

    /// Set or clear read/important markers
    Mark {
        #[arg(value_enum)]
        action: FlagAction,

        /// Elogs to mark; omit and pass --all for every scanned elog
        files: Vec<PathBuf>,

        #[arg(long)]
        all: bool,
    },

    /// Delete elog files and their markers
    Delete {
        files: Vec<PathBuf>,
    },

    /// Per-class summary of the scanned elogs
    Stats,
}

impl Default for Command {
    fn default() -> Self {
        Self::List(ListArgs::default())
    }
}

#[derive(Args, Default)]
struct ListArgs {
    /// Only entries of this class
    #[arg(long, value_enum)]
    class: Option<ClassFilter>,

    /// Only entries in this category
    #[arg(long)]
    category: Option<String>,

    /// Only entries for this package name
    #[arg(long)]
    package: Option<String>,

    /// Case-insensitive substring match over atom and file name
    #[arg(long)]
    search: Option<String>,

    /// Only unread entries
    #[arg(long)]
    unread: bool,

    /// Sort column (date sorts newest first)
    #[arg(long, value_enum)]
    sort: Option<SortKey>,

    /// Reverse the sort order
    #[arg(long)]
    reverse: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ClassFilter {
    Error,
    Warn,
    Log,
    Info,
    Qa,
}

impl ClassFilter {
    fn kind(self) -> SectionKind {
        match self {
            Self::Error => SectionKind::Error,
            Self::Warn => SectionKind::Warning,
            Self::Log => SectionKind::Log,
            Self::Info => SectionKind::Info,
            Self::Qa => SectionKind::Qa,
        }
    }
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum SortKey {
    #[default]
    Date,
    Category,
    Package,
    Class,
}

#[derive(Clone, Copy, ValueEnum)]
enum FlagAction {
    Read,
    Unread,
    Important,
    Unimportant,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let state_file = cli
        .state_file
        .clone()
        .unwrap_or_else(|| Path::new(&cli.elogpath[0]).join(".elogview_flags"));

    let outcome = match cli.command.unwrap_or_default() {
        Command::List(args) => cmd_list(&cli.elogpath, &state_file, &args),
        Command::Show { file } => cmd_show(&cli.elogpath, &state_file, &file),
        Command::Mark { action, files, all } => {
            cmd_mark(&cli.elogpath, &state_file, action, &files, all)
        }
        Command::Delete { files } => cmd_delete(&cli.elogpath, &state_file, &files),
        Command::Stats => cmd_stats(&cli.elogpath, &state_file),
    };

    if let Err(message) = outcome {
        eprintln!("{} {message}", "Error:".red());
        std::process::exit(1);
    }
}

/// Fresh scan with the stored markers applied. The flag store is loaded here,
/// at scan start, and nowhere else.
fn scan_with_flags(roots: &[String], state_file: &Path) -> (ScanReport, Flags) {
    let mut report = scanner::scan_roots(roots);
    let flag_store = Flags::load(state_file);
    flag_store.apply(&mut report.entries);
    (report, flag_store)
}

/// Resolve a user-supplied path against the scan, by full path first, then
/// by bare file name.
fn find_entry<'a>(entries: &'a [Elog], file: &Path) -> Option<&'a Elog> {
    entries.iter().find(|e| e.path == file).or_else(|| {
        file.file_name()
            .and_then(|name| entries.iter().find(|e| e.path.file_name() == Some(name)))
    })
}

fn matches(elog: &Elog, args: &ListArgs) -> bool {
    if args.unread && elog.read {
        return false;
    }
    if let Some(class) = args.class
        && elog.class != class.kind()
    {
        return false;
    }
    if let Some(category) = &args.category
        && elog.category != *category
    {
        return false;
    }
    if let Some(package) = &args.package
        && elog.package != *package
    {
        return false;
    }
    if let Some(needle) = &args.search {
        let haystack = format!(
            "{} {}",
            elog.atom(),
            elog.path.file_name().unwrap_or_default().to_string_lossy()
        )
        .to_lowercase();
        if !haystack.contains(&needle.to_lowercase()) {
            return false;
        }
    }
    true
}

fn sort_entries(entries: &mut [&Elog], key: SortKey, reverse: bool) {
    match key {
        SortKey::Date => entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        SortKey::Category => entries.sort_by(|a, b| a.atom().cmp(&b.atom())),
        SortKey::Package => entries.sort_by(|a, b| {
            a.package
                .cmp(&b.package)
                .then_with(|| b.timestamp.cmp(&a.timestamp))
        }),
        SortKey::Class => entries.sort_by(|a, b| {
            b.class
                .severity()
                .cmp(&a.class.severity())
                .then_with(|| b.timestamp.cmp(&a.timestamp))
        }),
    }
    if reverse {
        entries.reverse();
    }
}

fn cmd_list(roots: &[String], state_file: &Path, args: &ListArgs) -> Result<(), String> {
    let (report, _flag_store) = scan_with_flags(roots, state_file);

    let mut entries: Vec<&Elog> = report.entries.iter().filter(|e| matches(e, args)).collect();
    sort_entries(&mut entries, args.sort.unwrap_or_default(), args.reverse);

    render::print_list(&entries);
    let unread = report.entries.iter().filter(|e| !e.read).count();
    println!(
        "{} of {} elogs [{} unread]",
        entries.len(),
        report.entries.len(),
        unread
    );
    render::print_warnings(&report.warnings);
    Ok(())
}

fn cmd_show(roots: &[String], state_file: &Path, file: &Path) -> Result<(), String> {
    let (report, mut flag_store) = scan_with_flags(roots, state_file);

    let elog =
        find_entry(&report.entries, file).ok_or_else(|| format!("{}: no such elog", file.display()))?;
    render::print_detail(elog);

    // Viewing an entry dismisses it.
    flag_store.read.insert(elog.path.clone());
    flag_store.save(state_file)
}

fn cmd_mark(
    roots: &[String],
    state_file: &Path,
    action: FlagAction,
    files: &[PathBuf],
    all: bool,
) -> Result<(), String> {
    let (report, mut flag_store) = scan_with_flags(roots, state_file);

    let targets: Vec<PathBuf> = if all {
        report.entries.iter().map(|e| e.path.clone()).collect()
    } else {
        let mut targets = Vec::with_capacity(files.len());
        for file in files {
            let elog = find_entry(&report.entries, file)
                .ok_or_else(|| format!("{}: no such elog", file.display()))?;
            targets.push(elog.path.clone());
        }
        targets
    };
    if targets.is_empty() {
        return Err("nothing to mark; give elog paths or --all".to_string());
    }

    for path in targets {
        match action {
            FlagAction::Read => {
                flag_store.read.insert(path);
            }
            FlagAction::Unread => {
                flag_store.read.remove(&path);
            }
            FlagAction::Important => {
                flag_store.important.insert(path);
            }
            FlagAction::Unimportant => {
                flag_store.important.remove(&path);
            }
        }
    }
    flag_store.save(state_file)
}

fn cmd_delete(roots: &[String], state_file: &Path, files: &[PathBuf]) -> Result<(), String> {
    if files.is_empty() {
        return Err("no files given".to_string());
    }

    let (report, mut flag_store) = scan_with_flags(roots, state_file);

    let mut failures = 0;
    for file in files {
        // A path the scan no longer knows is still attempted verbatim, so
        // the failure is reported rather than silently skipped.
        let target = find_entry(&report.entries, file)
            .map_or_else(|| file.clone(), |e| e.path.clone());
        match scanner::delete_elog(&target) {
            Ok(()) => {
                flag_store.forget(&target);
                println!("deleted {}", target.display());
            }
            Err(reason) => {
                failures += 1;
                eprintln!("{} {reason}", "Error:".red());
            }
        }
    }
    flag_store.save(state_file)?;

    if failures > 0 {
        Err(format!("{failures} of {} deletions failed", files.len()))
    } else {
        Ok(())
    }
}

fn cmd_stats(roots: &[String], state_file: &Path) -> Result<(), String> {
    let (report, _flag_store) = scan_with_flags(roots, state_file);

    let summary = stats::calculate_summary(&report.entries);
    stats::print_summary(&summary);
    render::print_warnings(&report.warnings);
    Ok(())
}
