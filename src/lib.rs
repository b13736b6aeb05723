//! Local build harness for a custom BuildKit frontend.
//!
//! One invocation turns a source directory into a locally loaded container
//! image by chaining three external tools in a fixed order:
//!
//! 1. the plan generator, whose JSON plan is captured into a temporary
//!    workspace,
//! 2. `buildctl`, pointed at the published frontend image with the plan
//!    directory mounted next to the build context, and
//! 3. `docker load`, fed the resulting image archive on stdin.
//!
//! `--env NAME=VALUE` flags become BuildKit secrets: each name is exported to
//! the client process environment and mounted into the build from that same
//! variable, so values never appear on a command line.
//!
//! Each stage is a plain function from explicit inputs to outputs, so stages
//! can be exercised against stub tools; [`pipeline`] wires them together and
//! owns the workspace lifetime.

pub mod error;
pub mod exit_codes;
pub mod frontend;
pub mod loader;
pub mod logging;
pub mod pipeline;
pub mod plan;
pub mod process;
pub mod secrets;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod workspace;
