//! BuildKit client invocation against the custom frontend image.
//!
//! The frontend runs as a `gateway.v0` image. It reads the plan artifact from
//! the `dockerfile` local mount (the conventional name for the config mount)
//! and receives the cache key and secrets hash as opaque frontend options.

use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::process::run_capturing_stdout;
use crate::secrets::SecretSet;

/// Published frontend image the gateway build points at by default.
pub const FRONTEND_IMAGE: &str = "ghcr.io/railwayapp/railpack:railpack-frontend";

/// Everything the BuildKit client needs for one build.
#[derive(Debug)]
pub struct BuildRequest<'a> {
    /// Build context directory; its path doubles as the cache key.
    pub target_dir: &'a Path,
    /// Directory holding the plan artifact, mounted for the frontend.
    pub plan_dir: &'a Path,
    /// Frontend image reference for `gateway.v0`.
    pub frontend_image: &'a str,
    /// Name the loaded image will carry.
    pub image_name: &'a str,
    pub secrets: &'a SecretSet,
}

/// Argument list for `buildctl`, without the program name.
///
/// Pure function of the request so the argument shape is testable without
/// spawning anything. Secret values never appear here; only mount
/// descriptors and the digest do.
pub fn buildctl_args(request: &BuildRequest<'_>) -> Vec<String> {
    let context = request.target_dir.display();
    let mut args = vec![
        "build".to_string(),
        "--local".to_string(),
        format!("context={context}"),
        "--local".to_string(),
        format!("dockerfile={}", request.plan_dir.display()),
        "--frontend=gateway.v0".to_string(),
        "--opt".to_string(),
        format!("source={}", request.frontend_image),
        "--output".to_string(),
        format!("type=docker,name={}", request.image_name),
    ];
    args.extend(request.secrets.mounts.iter().cloned());

    // Options forwarded to the frontend itself.
    args.push("--opt".to_string());
    args.push(format!("cache-key={context}"));
    if let Some(hash) = &request.secrets.hash {
        args.push("--opt".to_string());
        args.push(format!("secrets-hash={hash}"));
    }
    args
}

/// Run `buildctl` and capture the image archive it writes to stdout.
///
/// The secret overlay is merged onto the inherited environment so the client
/// can satisfy each `env=` secret source; stdin and stderr stay on the
/// terminal for interactive progress.
pub fn invoke(request: &BuildRequest<'_>) -> Result<Vec<u8>> {
    let args = buildctl_args(request);
    info!(args = %args.join(" "), "executing buildctl");

    let mut cmd = Command::new("buildctl");
    cmd.args(&args).envs(&request.secrets.overlay);
    let output = run_capturing_stdout(cmd).map_err(|source| Error::Launch {
        program: "buildctl".to_string(),
        source,
    })?;
    if !output.status.success() {
        return Err(Error::BuildExecution {
            status: output.status,
        });
    }
    debug!(archive_bytes = output.stdout.len(), "buildctl finished");
    Ok(output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets;

    fn request<'a>(secrets: &'a SecretSet) -> BuildRequest<'a> {
        BuildRequest {
            target_dir: Path::new("./app"),
            plan_dir: Path::new("/tmp/railpack-test/plan"),
            frontend_image: FRONTEND_IMAGE,
            image_name: "test",
            secrets,
        }
    }

    #[test]
    fn args_without_secrets_omit_hash_and_mounts() {
        let secrets = SecretSet::default();
        let args = buildctl_args(&request(&secrets));

        assert_eq!(
            args,
            vec![
                "build",
                "--local",
                "context=./app",
                "--local",
                "dockerfile=/tmp/railpack-test/plan",
                "--frontend=gateway.v0",
                "--opt",
                "source=ghcr.io/railwayapp/railpack:railpack-frontend",
                "--output",
                "type=docker,name=test",
                "--opt",
                "cache-key=./app",
            ]
        );
        assert!(!args.iter().any(|a| a.contains("secrets-hash")));
    }

    #[test]
    fn args_with_secrets_carry_mounts_and_hash() {
        let secrets = secrets::derive(&["A=1".to_string(), "B=2".to_string()]);
        let args = buildctl_args(&request(&secrets));

        assert!(args.contains(&"--secret=id=A,env=A".to_string()));
        assert!(args.contains(&"--secret=id=B,env=B".to_string()));
        let hash = secrets.hash.as_deref().expect("hash");
        assert!(args.contains(&format!("secrets-hash={hash}")));
        // Values themselves must never be on the command line.
        assert!(!args.iter().any(|a| a.contains("A=1") || a.contains("B=2")));
    }

    #[test]
    fn cache_key_is_the_target_dir_path() {
        let secrets = SecretSet::default();
        let args = buildctl_args(&request(&secrets));
        let position = args
            .iter()
            .position(|a| a == "cache-key=./app")
            .expect("cache key present");
        assert_eq!(args[position - 1], "--opt");
    }

    #[test]
    fn image_name_is_configurable() {
        let secrets = SecretSet::default();
        let mut req = request(&secrets);
        req.image_name = "myapp:dev";
        let args = buildctl_args(&req);
        assert!(args.contains(&"type=docker,name=myapp:dev".to_string()));
    }
}
