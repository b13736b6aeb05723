//! Error taxonomy for the build pipeline.
//!
//! Every variant is fatal: the pipeline has no partial-success state and no
//! retries. The failing tool's own stderr is already on the terminal
//! (inherited), so these messages stay short and name the stage that failed.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Invalid command line input. No workspace exists when this is raised.
    #[error("{0}")]
    Usage(String),

    /// Workspace or plan artifact could not be created.
    #[error("{context} {path}: {source}")]
    Filesystem {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An external tool could not be spawned at all.
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The plan generator exited non-zero.
    #[error("plan generation failed ({status})")]
    PlanGeneration { status: ExitStatus },

    /// The plan generator exited zero but wrote nothing to stdout.
    #[error("plan generator produced no output")]
    EmptyPlan,

    /// `buildctl` exited non-zero.
    #[error("build execution failed ({status})")]
    BuildExecution { status: ExitStatus },

    /// `docker load` exited non-zero.
    #[error("image load failed ({status})")]
    ImageLoad { status: ExitStatus },
}

pub type Result<T> = std::result::Result<T, Error>;
