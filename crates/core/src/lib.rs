mod apply;
mod config;
mod conflict;
mod error;
mod exif_reader;
mod metadata;
mod naming;
mod planner;
mod scanner;
mod title;

#[cfg(test)]
mod test_support;

pub use apply::{
    execute_renames, persist_undo, run_confirmed, save_undo_log, undo_from, undo_last, Confirm,
    Decision, ExecutionReport, FailureList, RenameOperation, RunOutcome,
};
pub use config::{
    app_paths, load_config, load_config_from, save_config, save_config_to, AppConfig, AppPaths,
    NamingSettings,
};
pub use conflict::resolve_conflicts;
pub use error::{PlanError, RenameFailure};
pub use exif_reader::{read_capture_date, EXIF_SCAN_LIMIT};
pub use metadata::{CaptureTimestamp, DateRange};
pub use naming::{make_new_dir_name, make_new_file_name, NamingOptions};
pub use planner::{
    extract_dir_date_range, plan_dir_renames, plan_file_renames, RenameEntry, RenameMap,
};
pub use scanner::{is_jpeg_name, scan_directory, EntryKind, ScannedEntry};
pub use title::{extract_title, title_extension};
