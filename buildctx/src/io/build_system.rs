//! Reads CI provider metadata from the environment.
//!
//! Raw variables are translated into the provider model once, here. Nothing
//! downstream looks at provider variables directly.

use tracing::{debug, warn};

use crate::core::provider::{AppVeyorInfo, BuildSystem, TagInfo, TravisInfo, detect};
use crate::core::text::{eq_ignore_case, is_blank, non_blank};
use crate::io::env::Environment;

/// Build a [`BuildSystem`] snapshot from environment variables.
pub fn read_build_system(env: &dyn Environment) -> BuildSystem {
    let build_system = BuildSystem {
        app_veyor: read_app_veyor(env),
        travis: read_travis(env),
    };

    if build_system.active_count() > 1 {
        warn!(
            selected = %detect(&build_system),
            "multiple CI providers report an active build"
        );
    }
    debug!(provider = %detect(&build_system), "build system detected");
    build_system
}

fn read_app_veyor(env: &dyn Environment) -> AppVeyorInfo {
    AppVeyorInfo {
        running: read(env, "APPVEYOR").is_some(),
        pull_request_number: read(env, "APPVEYOR_PULL_REQUEST_NUMBER")
            .and_then(|raw| raw.parse().ok()),
        repository_name: read_raw(env, "APPVEYOR_REPO_NAME"),
        branch: read_raw(env, "APPVEYOR_REPO_BRANCH"),
        tag: TagInfo {
            is_tag: read(env, "APPVEYOR_REPO_TAG").is_some_and(|raw| eq_ignore_case(&raw, "true")),
            name: read(env, "APPVEYOR_REPO_TAG_NAME"),
        },
    }
}

fn read_travis(env: &dyn Environment) -> TravisInfo {
    TravisInfo {
        running: read(env, "TRAVIS").is_some(),
        pull_request: read(env, "TRAVIS_PULL_REQUEST").filter(|raw| {
            // Travis reports "false" for push builds.
            let push_build = eq_ignore_case(raw, "false");
            if push_build {
                debug!("TRAVIS_PULL_REQUEST=false treated as a push build");
            }
            !push_build
        }),
        slug: read_raw(env, "TRAVIS_REPO_SLUG"),
        branch: read_raw(env, "TRAVIS_BRANCH"),
    }
}

/// Trimmed value for flags and tag names.
fn read(env: &dyn Environment, name: &str) -> Option<String> {
    non_blank(env.var(name).as_deref()).map(str::to_string)
}

/// Untrimmed value for identities compared during trust evaluation.
fn read_raw(env: &dyn Environment, name: &str) -> Option<String> {
    env.var(name).filter(|value| !is_blank(Some(value)))
}
