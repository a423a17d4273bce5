use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("cannot read directory {}: {source}", path.display())]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why a single rename did not happen.
#[derive(Debug, Error)]
pub enum RenameFailure {
    #[error("target exists")]
    TargetExists,
    #[error("invalid target name")]
    InvalidTarget,
    #[error("{0}")]
    Io(#[from] io::Error),
}
