use crate::config::app_paths;
use crate::error::RenameFailure;
use crate::planner::RenameMap;
use anyhow::{Context, Result};
use log::warn;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Source name to failure reason.
pub type FailureList = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameOperation {
    pub from: String,
    pub to: String,
}

impl RenameOperation {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub applied: Vec<RenameOperation>,
    pub failures: FailureList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Cancel,
}

/// Reviews a plan before anything is touched on disk.
pub trait Confirm {
    fn confirm(&mut self, plan: &RenameMap) -> Decision;
}

impl<F> Confirm for F
where
    F: FnMut(&RenameMap) -> Decision,
{
    fn confirm(&mut self, plan: &RenameMap) -> Decision {
        self(plan)
    }
}

#[derive(Debug)]
pub enum RunOutcome {
    NothingToRename,
    Cancelled,
    Executed(ExecutionReport),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UndoLog {
    base_dir: PathBuf,
    operations: Vec<RenameOperation>,
}

/// Renames every entry of `renames` inside `base_dir`, all of them concurrently.
///
/// An entry whose target already exists is left alone and reported as
/// "target exists". Failures never stop or roll back the other entries.
pub fn execute_renames(base_dir: &Path, renames: &[RenameOperation]) -> ExecutionReport {
    let results: Vec<(&RenameOperation, Result<(), RenameFailure>)> = renames
        .par_iter()
        .map(|op| (op, rename_one(base_dir, op)))
        .collect();

    let mut report = ExecutionReport::default();
    for (op, result) in results {
        match result {
            Ok(()) => report.applied.push(op.clone()),
            Err(err) => {
                warn!(
                    "rename failed in {}: {} -> {}: {err}",
                    base_dir.display(),
                    op.from,
                    op.to
                );
                report.failures.insert(op.from.clone(), err.to_string());
            }
        }
    }
    report
}

fn rename_one(base_dir: &Path, op: &RenameOperation) -> Result<(), RenameFailure> {
    if Path::new(&op.to).file_name() != Some(OsStr::new(&op.to)) {
        return Err(RenameFailure::InvalidTarget);
    }

    let target = base_dir.join(&op.to);
    match fs::symlink_metadata(&target) {
        Ok(_) => return Err(RenameFailure::TargetExists),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }

    fs::rename(base_dir.join(&op.from), target)?;
    Ok(())
}

/// Asks `confirm` about `plan` and executes it on approval.
///
/// A plan without a single proposed change returns before `confirm` is consulted.
pub fn run_confirmed<C>(plan: &RenameMap, confirm: &mut C) -> RunOutcome
where
    C: Confirm + ?Sized,
{
    if !plan.has_changes() {
        return RunOutcome::NothingToRename;
    }
    if confirm.confirm(plan) == Decision::Cancel {
        return RunOutcome::Cancelled;
    }

    let operations: Vec<RenameOperation> = plan
        .proposed()
        .map(|(from, to)| RenameOperation::new(from, to))
        .collect();
    RunOutcome::Executed(execute_renames(&plan.base_dir, &operations))
}

/// Records the applied renames so that `undo_last` can revert them.
///
/// See `save_undo_log` for runs where every rename failed.
pub fn persist_undo(base_dir: &Path, report: &ExecutionReport) -> Result<()> {
    let paths = app_paths()?;
    fs::create_dir_all(&paths.config_dir).with_context(|| {
        format!(
            "cannot create config directory: {}",
            paths.config_dir.display()
        )
    })?;
    save_undo_log(&paths.undo_path, base_dir, &report.applied)
}

/// Writes the undo log.
///
/// A run that applied nothing leaves the previous log in place, so undo always reverts the
/// last run that changed the directory.
pub fn save_undo_log(path: &Path, base_dir: &Path, applied: &[RenameOperation]) -> Result<()> {
    if applied.is_empty() {
        return Ok(());
    }
    let log = UndoLog {
        base_dir: base_dir.to_path_buf(),
        operations: applied.to_vec(),
    };
    let body = serde_json::to_string_pretty(&log).context("cannot serialize undo log")?;
    fs::write(path, body)
        .with_context(|| format!("cannot write undo log: {}", path.display()))?;
    Ok(())
}

pub fn undo_last() -> Result<ExecutionReport> {
    undo_from(&app_paths()?.undo_path)
}

/// Reverts the renames logged at `path`.
///
/// Reverts that fail stay in the log for another attempt; the log is removed once empty.
pub fn undo_from(path: &Path) -> Result<ExecutionReport> {
    if !path.exists() {
        anyhow::bail!("nothing to undo");
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("cannot read undo log: {}", path.display()))?;
    let log = serde_json::from_str::<UndoLog>(&raw).context("undo log is corrupt")?;

    let reverse: Vec<RenameOperation> = log
        .operations
        .iter()
        .map(|op| RenameOperation::new(op.to.clone(), op.from.clone()))
        .collect();
    let report = execute_renames(&log.base_dir, &reverse);

    if report.failures.is_empty() {
        fs::remove_file(path)
            .with_context(|| format!("cannot remove undo log: {}", path.display()))?;
    } else {
        let remaining: Vec<RenameOperation> = log
            .operations
            .into_iter()
            .filter(|op| report.failures.contains_key(&op.to))
            .collect();
        save_undo_log(path, &log.base_dir, &remaining)?;
    }

    Ok(report)
}
