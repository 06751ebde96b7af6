//! Repository trust evaluation.
//!
//! Reduces the active provider's metadata to the three booleans that gate
//! publishing. A local build is never trusted: all signals stay `false`.

use serde::{Deserialize, Serialize};

use crate::core::provider::{BuildSystem, CiProvider};
use crate::core::text::matches_ignore_case;

/// Repository identifier treated as authoritative for publish decisions.
pub const CANONICAL_REPOSITORY: &str = "octokit/octokit.net";
/// Branch whose builds may publish.
pub const PROTECTED_BRANCH: &str = "master";

/// What a trusted build looks like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustPolicy {
    pub canonical_repository: String,
    pub protected_branch: String,
}

impl Default for TrustPolicy {
    fn default() -> Self {
        Self {
            canonical_repository: CANONICAL_REPOSITORY.to_string(),
            protected_branch: PROTECTED_BRANCH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustSignals {
    pub is_pull_request: bool,
    pub is_original_repository: bool,
    pub is_protected_branch: bool,
}

/// Evaluate trust signals strictly within the active provider.
pub fn evaluate(build_system: &BuildSystem, policy: &TrustPolicy) -> TrustSignals {
    build_system
        .active()
        .map(|provider| evaluate_provider(provider, policy))
        .unwrap_or_default()
}

fn evaluate_provider(provider: &dyn CiProvider, policy: &TrustPolicy) -> TrustSignals {
    TrustSignals {
        is_pull_request: provider.is_pull_request(),
        is_original_repository: matches_ignore_case(
            provider.repository(),
            &policy.canonical_repository,
        ),
        is_protected_branch: matches_ignore_case(provider.branch(), &policy.protected_branch),
    }
}
