//! Sequential orchestration of one build run.
//!
//! Stage order is fixed: workspace, plan, secrets, buildctl, docker load.
//! Each stage blocks until its tool exits and the first failure aborts the
//! run. The workspace is released on every exit path: explicitly on success,
//! through `Drop` on error, and through the [`CleanupSlot`] handle when an
//! interrupt fires mid-stage.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::frontend::{self, BuildRequest};
use crate::loader;
use crate::plan;
use crate::secrets::{self, SecretSet};
use crate::workspace::{CleanupSlot, Workspace};

/// Inputs for one run, resolved from the command line.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory to build; also the cache key.
    pub target_dir: PathBuf,
    /// Raw `NAME=VALUE` entries to expose to the build as secrets.
    pub env_entries: Vec<String>,
    /// Plan generator executable.
    pub generator: String,
    /// Frontend image reference.
    pub frontend_image: String,
    /// Name for the loaded image.
    pub image_name: String,
}

/// State accumulated over one invocation. Never persisted.
#[derive(Debug)]
struct RunContext {
    target_dir: PathBuf,
    run_id: String,
    workspace_root: PathBuf,
    secrets: SecretSet,
}

/// Run the full pipeline.
///
/// `cleanup` must already be watched by the interrupt handler; it is filled
/// as soon as the workspace exists so an interrupt arriving during any stage
/// can tear the workspace down.
pub fn run(config: &RunConfig, cleanup: &CleanupSlot) -> Result<()> {
    if !config.target_dir.is_dir() {
        return Err(Error::Usage(format!(
            "target directory not found: {}",
            config.target_dir.display()
        )));
    }

    let workspace = Workspace::acquire()?;
    if let Ok(mut slot) = cleanup.lock() {
        *slot = Some(workspace.cleanup_handle());
    }

    let plan_path =
        plan::generate_plan(&config.generator, &config.target_dir, workspace.plan_dir())?;

    let context = RunContext {
        target_dir: config.target_dir.clone(),
        run_id: workspace.run_id().to_string(),
        workspace_root: workspace.root().to_path_buf(),
        secrets: secrets::derive(&config.env_entries),
    };
    debug!(
        run_id = %context.run_id,
        workspace = %context.workspace_root.display(),
        plan = %plan_path.display(),
        secret_count = context.secrets.overlay.len(),
        "run context ready"
    );

    let archive = frontend::invoke(&BuildRequest {
        target_dir: &context.target_dir,
        plan_dir: workspace.plan_dir(),
        frontend_image: &config.frontend_image,
        image_name: &config.image_name,
        secrets: &context.secrets,
    })?;
    loader::load(&archive)?;

    workspace.release();
    info!("build complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_target_dir_is_a_usage_error() {
        let config = RunConfig {
            target_dir: PathBuf::from("/definitely/not/a/dir/1234"),
            env_entries: Vec::new(),
            generator: "railpack".to_string(),
            frontend_image: frontend::FRONTEND_IMAGE.to_string(),
            image_name: "test".to_string(),
        };
        let cleanup = CleanupSlot::default();

        let err = run(&config, &cleanup).expect_err("must fail");
        assert!(matches!(err, Error::Usage(_)));
        // No workspace was created, so nothing was deposited for cleanup.
        assert!(cleanup.lock().expect("lock").is_none());
    }
}
