//! Build a directory with the custom BuildKit frontend and load the result
//! into the local container runtime.
//!
//! The pipeline chains three external tools in sequence: the plan generator,
//! `buildctl`, and `docker load`. `--env NAME=VALUE` flags become BuildKit
//! secrets sourced from the client's environment.

use std::path::PathBuf;

use clap::Parser;

use frontend_runner::workspace::CleanupSlot;
use frontend_runner::{exit_codes, frontend, logging, pipeline};

#[derive(Parser)]
#[command(
    name = "frontend-runner",
    version,
    about = "Build a directory with the custom BuildKit frontend and docker-load the image"
)]
struct Cli {
    /// Directory to build.
    directory: PathBuf,

    /// Secret exposed to the build, repeatable. Malformed entries are ignored.
    #[arg(long = "env", value_name = "NAME=VALUE")]
    env: Vec<String>,

    /// Plan generator executable.
    #[arg(long, default_value = "railpack")]
    generator: String,

    /// Frontend image reference.
    #[arg(long, default_value = frontend::FRONTEND_IMAGE)]
    frontend: String,

    /// Name for the loaded image.
    #[arg(long, default_value = "test")]
    name: String,
}

fn main() {
    logging::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            std::process::exit(exit_codes::FAILURE);
        }
        // --help / --version land here and exit 0.
        Err(err) => err.exit(),
    };

    // The handler must exist before any workspace does; it picks up whatever
    // handle the run deposits in the slot.
    let cleanup = CleanupSlot::default();
    install_interrupt_handler(cleanup.clone());

    let config = pipeline::RunConfig {
        target_dir: cli.directory,
        env_entries: cli.env,
        generator: cli.generator,
        frontend_image: cli.frontend,
        image_name: cli.name,
    };

    match pipeline::run(&config, &cleanup) {
        Ok(()) => std::process::exit(exit_codes::OK),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(exit_codes::FAILURE);
        }
    }
}

/// Register the SIGINT/SIGTERM handler: release the workspace, then exit.
fn install_interrupt_handler(cleanup: CleanupSlot) {
    let result = ctrlc::set_handler(move || {
        if let Ok(mut slot) = cleanup.lock()
            && let Some(handle) = slot.take()
        {
            handle.release();
        }
        std::process::exit(exit_codes::INTERRUPTED);
    });
    if let Err(err) = result {
        tracing::warn!(err = %err, "failed to install interrupt handler");
    }
}
