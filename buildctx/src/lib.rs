//! Build context initialization for the build pipeline.
//!
//! Before any compile, test or packaging step runs, the pipeline assembles an
//! immutable [`context::BuildContext`]: which CI provider runs the build,
//! whether the build comes from a pull request or the canonical repository,
//! whether it targets the protected branch or a release tag, the semantic
//! version, and the registered projects.
//!
//! - **[`core`]**: Pure, deterministic logic (detection, trust evaluation, tag
//!   detection, project registry, version rules). No I/O.
//! - **[`io`]**: Side-effecting collaborators (environment, config, git, tool
//!   installation). Behind traits so tests can substitute them.
//!
//! [`setup`] coordinates the two and is the only constructor of a context.

pub mod context;
pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod setup;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
