//! Side-effecting collaborators: environment, config, git, tools.

pub mod build_system;
pub mod config;
pub mod env;
pub mod git;
pub mod process;
pub mod tools;
pub mod version;
