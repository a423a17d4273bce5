use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use photodate_core::{
    app_paths, is_jpeg_name, load_config, persist_undo, plan_dir_renames, plan_file_renames,
    run_confirmed, save_config, undo_last, Confirm, Decision, ExecutionReport, RenameMap,
    RunOutcome,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "photodate")]
#[command(about = "Renames photos and photo folders after their EXIF capture dates")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rename the photos of a directory after their capture date and time.
    Files(FilesArgs),
    /// Rename the subdirectories of a directory after the date range of their photos.
    Dirs(PlanArgs),
    /// Revert the last run that renamed anything; runs where every rename failed are skipped.
    Undo,
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    Show,
    Path,
    /// Store one setting, e.g. `config set dirs dayStart 4`.
    Set(SetArgs),
}

#[derive(Debug, Args)]
struct SetArgs {
    #[arg(value_enum)]
    section: Section,
    /// Settings key: dateSeparator, timeSeparator, dateTimeSeparator, rangeSeparator,
    /// dayStart or includeTitle.
    key: String,
    value: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Section {
    Files,
    Dirs,
}

#[derive(Debug, Args)]
struct PlanArgs {
    dir: PathBuf,
    /// Apply without asking.
    #[arg(long, short = 'y', default_value_t = false)]
    yes: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Debug, Args)]
struct FilesArgs {
    #[command(flatten)]
    plan: PlanArgs,
    /// Extensions to consider instead of jpg/jpeg; repeatable.
    #[arg(long = "ext")]
    extensions: Vec<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("PHOTODATE_LOG", "warn"))
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Files(args) => cmd_files(args),
        Commands::Dirs(args) => cmd_dirs(args),
        Commands::Undo => cmd_undo(),
        Commands::Config(config) => match config.action {
            ConfigAction::Show => cmd_config_show(),
            ConfigAction::Path => cmd_config_path(),
            ConfigAction::Set(args) => cmd_config_set(args),
        },
    }
}

fn cmd_files(args: FilesArgs) -> Result<ExitCode> {
    let options = load_config()?.file_options();
    let extensions: Vec<String> = args
        .extensions
        .iter()
        .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
        .collect();

    let plan = if extensions.is_empty() {
        plan_file_renames(&args.plan.dir, is_jpeg_name, &options)?
    } else {
        plan_file_renames(
            &args.plan.dir,
            |name| has_extension(name, &extensions),
            &options,
        )?
    };
    review_and_apply(&plan, &args.plan)
}

fn cmd_dirs(args: PlanArgs) -> Result<ExitCode> {
    let options = load_config()?.dir_options();
    let plan = plan_dir_renames(&args.dir, &options)?;
    review_and_apply(&plan, &args)
}

fn review_and_apply(plan: &RenameMap, args: &PlanArgs) -> Result<ExitCode> {
    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(plan)?),
        OutputFormat::Table => print_plan(plan),
    }

    let outcome = if args.yes {
        run_confirmed(plan, &mut |_: &RenameMap| Decision::Proceed)
    } else {
        run_confirmed(plan, &mut StdinConfirm)
    };

    match outcome {
        RunOutcome::NothingToRename => {
            eprintln!("Nothing to rename.");
            Ok(ExitCode::SUCCESS)
        }
        RunOutcome::Cancelled => {
            eprintln!("Cancelled, nothing was renamed.");
            Ok(ExitCode::SUCCESS)
        }
        RunOutcome::Executed(report) => {
            let succeeded = finish_run(&mut io::stderr().lock(), &report, |report| {
                persist_undo(&plan.base_dir, report)
            })?;
            Ok(exit_code(succeeded))
        }
    }
}

fn cmd_undo() -> Result<ExitCode> {
    let report = undo_last()?;
    let succeeded = write_report(&mut io::stderr().lock(), "Restored", &report)?;
    Ok(exit_code(succeeded))
}

fn cmd_config_show() -> Result<ExitCode> {
    let config = load_config()?;
    let paths = app_paths()?;
    info!("settings file: {}", paths.config_path.display());
    let effective = serde_json::json!({
        "files": config.file_options(),
        "dirs": config.dir_options(),
    });
    println!("{}", serde_json::to_string_pretty(&effective)?);
    Ok(ExitCode::SUCCESS)
}

fn cmd_config_path() -> Result<ExitCode> {
    println!("{}", app_paths()?.config_path.display());
    Ok(ExitCode::SUCCESS)
}

fn cmd_config_set(args: SetArgs) -> Result<ExitCode> {
    let mut config = load_config()?;
    let section = match args.section {
        Section::Files => &mut config.files,
        Section::Dirs => &mut config.dirs,
    };
    section.set(&args.key, &args.value)?;
    save_config(&config)?;
    eprintln!("Saved {} to {}", args.key, app_paths()?.config_path.display());
    Ok(ExitCode::SUCCESS)
}

/// Prompts on stderr and reads the answer from stdin; anything but y/yes cancels.
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, plan: &RenameMap) -> Decision {
        let count = plan.proposed().count();
        eprint!("Rename {count} entries in {}? [y/N] ", plan.base_dir.display());
        if io::stderr().flush().is_err() {
            return Decision::Cancel;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) if matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") => {
                Decision::Proceed
            }
            _ => Decision::Cancel,
        }
    }
}

fn has_extension(name: &str, extensions: &[String]) -> bool {
    if name.starts_with('.') {
        return false;
    }
    Path::new(name)
        .extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_ascii_lowercase();
            extensions.iter().any(|wanted| *wanted == ext)
        })
        .unwrap_or(false)
}

fn print_plan(plan: &RenameMap) {
    println!("{} -> new name", plan.base_dir.display());
    for entry in &plan.entries {
        match &entry.destination {
            Some(dest) => println!("{} -> {}", entry.source, dest),
            None => println!("{} -> unchanged (date unknown)", entry.source),
        }
    }

    let planned = plan.proposed().count();
    println!(
        "\nsummary: entries={} planned={} undated={}",
        plan.entries.len(),
        planned,
        plan.entries.len() - planned
    );
}

/// Reports the run, then stores its undo log. The renames already happened, so a failed
/// store is reported after them instead of hiding them.
fn finish_run<W, F>(out: &mut W, report: &ExecutionReport, store_undo: F) -> io::Result<bool>
where
    W: Write,
    F: FnOnce(&ExecutionReport) -> Result<()>,
{
    let succeeded = write_report(out, "Renamed", report)?;
    if let Err(err) = store_undo(report) {
        writeln!(out, "cannot store undo log, this run cannot be undone: {err:#}")?;
        return Ok(false);
    }
    Ok(succeeded)
}

fn write_report<W: Write>(out: &mut W, verb: &str, report: &ExecutionReport) -> io::Result<bool> {
    for (source, reason) in &report.failures {
        writeln!(out, "failed: {source}: {reason}")?;
    }
    writeln!(
        out,
        "{verb}: {} (failed {})",
        report.applied.len(),
        report.failures.len()
    )?;
    Ok(report.failures.is_empty())
}

fn exit_code(succeeded: bool) -> ExitCode {
    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use photodate_core::RenameOperation;

    #[test]
    fn extension_filter_is_case_insensitive_and_skips_hidden() {
        let wanted = vec!["png".to_string(), "tif".to_string()];
        assert!(has_extension("scan.PNG", &wanted));
        assert!(has_extension("a.tif", &wanted));
        assert!(!has_extension("a.jpg", &wanted));
        assert!(!has_extension(".hidden.png", &wanted));
        assert!(!has_extension("png", &wanted));
    }

    #[test]
    fn cli_parses_file_mode_flags() {
        let cli = Cli::parse_from(["photodate", "files", "/photos", "--ext", "png", "--yes"]);
        match cli.command {
            Commands::Files(args) => {
                assert_eq!(args.plan.dir, PathBuf::from("/photos"));
                assert!(args.plan.yes);
                assert_eq!(args.extensions, vec!["png".to_string()]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["photodate", "config", "set", "dirs", "dayStart", "4"]);
        match cli.command {
            Commands::Config(ConfigArgs {
                action: ConfigAction::Set(args),
            }) => {
                assert!(matches!(args.section, Section::Dirs));
                assert_eq!(args.key, "dayStart");
                assert_eq!(args.value, "4");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn undo_help_names_the_last_run_that_renamed_anything() {
        let cli = Cli::command();
        let about = cli
            .find_subcommand("undo")
            .and_then(|undo| undo.get_about())
            .map(|about| about.to_string())
            .expect("undo has help text");
        assert!(about.contains("last run that renamed anything"));
    }

    #[test]
    fn report_is_written_before_a_failed_undo_store() {
        let report = ExecutionReport {
            applied: vec![RenameOperation::new("a.jpg", "2011.06.01_07.07.07.jpg")],
            failures: [("b.jpg".to_string(), "target exists".to_string())]
                .into_iter()
                .collect(),
        };

        let mut out = Vec::new();
        let succeeded = finish_run(&mut out, &report, |_| anyhow::bail!("read-only config dir"))
            .expect("write report");
        let text = String::from_utf8(out).expect("utf-8");

        assert!(!succeeded);
        let renamed = text.find("Renamed: 1 (failed 1)").expect("count shown");
        let failure = text.find("failed: b.jpg: target exists").expect("failure shown");
        let undo = text.find("read-only config dir").expect("undo error shown");
        assert!(failure < renamed && renamed < undo);
    }

    #[test]
    fn clean_run_with_stored_undo_succeeds() {
        let report = ExecutionReport {
            applied: vec![RenameOperation::new("a.jpg", "b.jpg")],
            failures: Default::default(),
        };
        let mut out = Vec::new();
        assert!(finish_run(&mut out, &report, |_| Ok(())).expect("write report"));
    }
}
