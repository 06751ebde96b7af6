//! Environment variable access.
//!
//! All environment reads go through [`Environment`] so detection can be driven
//! from a fixed map in tests instead of the process environment.

use tracing::debug;

use crate::core::args::Arguments;
use crate::core::text::is_blank;

/// Read-only source of environment variables.
pub trait Environment {
    /// Value of `name`, or `None` when unset or not valid unicode.
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Read `env_var`, falling back to the argument `arg_name` when the variable is
/// unset, empty, or whitespace only.
///
/// Returns `None` when neither source supplies a value.
pub fn resolve_env_or_arg(
    env: &dyn Environment,
    args: &Arguments,
    env_var: &str,
    arg_name: &str,
) -> Option<String> {
    let value = env.var(env_var);
    if !is_blank(value.as_deref()) {
        debug!(env_var, "resolved from environment");
        return value;
    }
    let fallback = args.get(arg_name).map(str::to_string);
    debug!(
        env_var,
        arg_name,
        found = fallback.is_some(),
        "environment blank, falling back to argument"
    );
    fallback
}
