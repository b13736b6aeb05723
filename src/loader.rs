//! Load the built image archive into the container runtime.

use std::process::Command;

use tracing::info;

use crate::error::{Error, Result};
use crate::process::run_with_stdin;

/// Pipe `archive` into `docker load`.
///
/// Stdout and stderr are inherited so load progress is visible. The loaded
/// image name comes from the archive's embedded metadata.
pub fn load(archive: &[u8]) -> Result<()> {
    info!(archive_bytes = archive.len(), "loading image");

    let mut cmd = Command::new("docker");
    cmd.arg("load");
    let status = run_with_stdin(cmd, archive).map_err(|source| Error::Launch {
        program: "docker".to_string(),
        source,
    })?;
    if !status.success() {
        return Err(Error::ImageLoad { status });
    }
    Ok(())
}
