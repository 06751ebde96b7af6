//! Fatal failures of context initialization.
//!
//! Missing CI metadata or arguments are never errors; they resolve to
//! defaults. Only configuration problems and failing collaborators abort.

use thiserror::Error;

use crate::exit_codes;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("invalid pipeline configuration")]
    Config(#[source] anyhow::Error),

    #[error("failed to install tool {name} {version}")]
    ToolInstall {
        name: String,
        version: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to resolve build version")]
    VersionResolution(#[source] anyhow::Error),
}

impl SetupError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => exit_codes::INVALID,
            Self::ToolInstall { .. } => exit_codes::TOOL_INSTALL_FAILED,
            Self::VersionResolution(_) => exit_codes::VERSION_FAILED,
        }
    }
}

/// Exit code for any error surfaced by a command.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<SetupError>()
        .map_or(exit_codes::INVALID, SetupError::exit_code)
}
