//! Temporary workspace for one pipeline run.
//!
//! A run writes its plan artifact into an isolated directory under the system
//! temp root. The directory must be gone after the process exits no matter
//! how the run ends, so release is idempotent and reachable from both the
//! normal exit path (via `Drop`) and the interrupt handler (via
//! [`CleanupHandle`] deposited in a [`CleanupSlot`]).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use rand::{Rng, distributions::Alphanumeric};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Directory name prefix under the temp root.
const WORKSPACE_PREFIX: &str = "railpack";

#[derive(Debug)]
struct Inner {
    root: PathBuf,
    released: AtomicBool,
}

impl Inner {
    fn release(&self) {
        if self.released.swap(true, Ordering::SeqCst) {
            return;
        }
        if !self.root.exists() {
            return;
        }
        // Removal failure is logged, not propagated: this path also runs from
        // Drop and the signal handler.
        match fs::remove_dir_all(&self.root) {
            Ok(()) => debug!(path = %self.root.display(), "workspace removed"),
            Err(err) => {
                warn!(path = %self.root.display(), err = %err, "failed to remove workspace");
            }
        }
    }
}

/// An acquired workspace: `<temp root>/railpack-<token>/` plus `plan/`.
#[derive(Debug)]
pub struct Workspace {
    inner: Arc<Inner>,
    plan_dir: PathBuf,
    run_id: String,
}

impl Workspace {
    /// Create a uniquely named workspace under the system temp root.
    pub fn acquire() -> Result<Workspace> {
        Self::acquire_in(&std::env::temp_dir())
    }

    /// Create a uniquely named workspace under `temp_root`.
    ///
    /// The random token keeps concurrent runs from colliding.
    pub fn acquire_in(temp_root: &Path) -> Result<Workspace> {
        let run_id = random_token();
        let root = temp_root.join(format!("{WORKSPACE_PREFIX}-{run_id}"));
        let plan_dir = root.join("plan");
        fs::create_dir_all(&plan_dir).map_err(|source| Error::Filesystem {
            context: "create workspace",
            path: root.clone(),
            source,
        })?;
        debug!(path = %root.display(), "workspace created");

        Ok(Workspace {
            inner: Arc::new(Inner {
                root,
                released: AtomicBool::new(false),
            }),
            plan_dir,
            run_id,
        })
    }

    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    pub fn plan_dir(&self) -> &Path {
        &self.plan_dir
    }

    /// Random token identifying this run.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Remove the workspace tree. Safe to call more than once.
    pub fn release(&self) {
        self.inner.release();
    }

    /// Handle that can release the workspace independently of its lifetime.
    pub fn cleanup_handle(&self) -> CleanupHandle {
        CleanupHandle {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        self.inner.release();
    }
}

/// Shared release handle for the interrupt handler.
#[derive(Clone)]
pub struct CleanupHandle {
    inner: Arc<Inner>,
}

impl CleanupHandle {
    /// Same idempotent release as [`Workspace::release`].
    pub fn release(&self) {
        self.inner.release();
    }
}

/// Slot the interrupt handler watches.
///
/// Registered empty before any workspace exists; filled right after
/// acquisition so an interrupt arriving mid-stage finds the handle.
pub type CleanupSlot = Arc<Mutex<Option<CleanupHandle>>>;

fn random_token() -> String {
    let mut rng = rand::thread_rng();
    std::iter::repeat_with(|| rng.sample(Alphanumeric))
        .map(char::from)
        .take(10)
        .collect::<String>()
        .to_lowercase()
}
