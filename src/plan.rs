//! Plan acquisition: run the plan generator and persist its output.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::process::run_capturing_stdout;

/// File name the frontend expects inside the plan mount.
pub const PLAN_FILE: &str = "railpack-plan.json";

/// Run `<generator> plan <dir> --format json` and write the captured plan.
///
/// The generator's stderr stays on the terminal; only its stdout is
/// captured, and the bytes are written verbatim to
/// `<plan_dir>/railpack-plan.json`. The plan content is opaque here; the
/// frontend owns its schema.
pub fn generate_plan(generator: &str, target_dir: &Path, plan_dir: &Path) -> Result<PathBuf> {
    info!(dir = %target_dir.display(), "generating build plan");

    let mut cmd = Command::new(generator);
    cmd.arg("plan").arg(target_dir).arg("--format").arg("json");
    let output = run_capturing_stdout(cmd).map_err(|source| Error::Launch {
        program: generator.to_string(),
        source,
    })?;
    if !output.status.success() {
        return Err(Error::PlanGeneration {
            status: output.status,
        });
    }
    if output.stdout.is_empty() {
        return Err(Error::EmptyPlan);
    }

    let plan_path = plan_dir.join(PLAN_FILE);
    fs::write(&plan_path, &output.stdout).map_err(|source| Error::Filesystem {
        context: "write plan artifact",
        path: plan_path.clone(),
        source,
    })?;
    debug!(
        path = %plan_path.display(),
        bytes = output.stdout.len(),
        "plan written"
    );
    Ok(plan_path)
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use crate::test_support::fake_tool;
    use tempfile::tempdir;

    #[test]
    fn writes_captured_stdout_to_plan_file() {
        let temp = tempdir().expect("tempdir");
        let tool = fake_tool(temp.path(), "gen", r#"printf '{"steps":[]}'"#).expect("tool");
        let plan_dir = temp.path().join("plan");
        fs::create_dir_all(&plan_dir).expect("plan dir");

        let plan_path = generate_plan(tool.to_str().expect("utf8"), temp.path(), &plan_dir)
            .expect("generate");

        assert_eq!(plan_path, plan_dir.join(PLAN_FILE));
        assert_eq!(
            fs::read_to_string(&plan_path).expect("read"),
            r#"{"steps":[]}"#
        );
    }

    #[test]
    fn passes_target_dir_and_json_format_to_generator() {
        let temp = tempdir().expect("tempdir");
        let args_file = temp.path().join("args");
        let tool = fake_tool(
            temp.path(),
            "gen",
            &format!("echo \"$@\" > {}\nprintf plan", args_file.display()),
        )
        .expect("tool");
        let plan_dir = temp.path().join("plan");
        fs::create_dir_all(&plan_dir).expect("plan dir");

        generate_plan(tool.to_str().expect("utf8"), temp.path(), &plan_dir).expect("generate");

        let args = fs::read_to_string(&args_file).expect("read args");
        assert_eq!(
            args.trim(),
            format!("plan {} --format json", temp.path().display())
        );
    }

    #[test]
    fn nonzero_generator_exit_is_fatal() {
        let temp = tempdir().expect("tempdir");
        let tool = fake_tool(temp.path(), "gen", "exit 2").expect("tool");
        let plan_dir = temp.path().join("plan");
        fs::create_dir_all(&plan_dir).expect("plan dir");

        let err = generate_plan(tool.to_str().expect("utf8"), temp.path(), &plan_dir)
            .expect_err("must fail");
        assert!(matches!(err, Error::PlanGeneration { .. }));
        assert!(!plan_dir.join(PLAN_FILE).exists());
    }

    #[test]
    fn empty_generator_output_is_fatal() {
        let temp = tempdir().expect("tempdir");
        let tool = fake_tool(temp.path(), "gen", "exit 0").expect("tool");
        let plan_dir = temp.path().join("plan");
        fs::create_dir_all(&plan_dir).expect("plan dir");

        let err = generate_plan(tool.to_str().expect("utf8"), temp.path(), &plan_dir)
            .expect_err("must fail");
        assert!(matches!(err, Error::EmptyPlan));
    }

    #[test]
    fn missing_generator_is_a_launch_error() {
        let temp = tempdir().expect("tempdir");
        let plan_dir = temp.path().join("plan");
        fs::create_dir_all(&plan_dir).expect("plan dir");

        let err = generate_plan("no-such-generator-3981", temp.path(), &plan_dir)
            .expect_err("must fail");
        assert!(matches!(err, Error::Launch { .. }));
    }
}
