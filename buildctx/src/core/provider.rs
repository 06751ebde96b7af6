//! CI provider model and detection.
//!
//! [`BuildSystem`] is a snapshot of what every known provider reports about the
//! current run. Each provider implements [`CiProvider`], so trust evaluation can
//! ask the same questions of whichever one is active while each keeps its own
//! rules for what counts as a pull request.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::text::is_blank;

/// Which CI provider (if any) is running the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// No provider reported itself active: a local build.
    #[default]
    None,
    AppVeyor,
    Travis,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "local",
            Self::AppVeyor => "AppVeyor",
            Self::Travis => "Travis CI",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag metadata for providers that build tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagInfo {
    pub is_tag: bool,
    pub name: Option<String>,
}

/// Uniform view over a CI provider's metadata.
pub trait CiProvider {
    fn kind(&self) -> ProviderKind;

    /// True when this provider is running the current build.
    fn is_active(&self) -> bool;

    /// Provider-specific pull request rule.
    fn is_pull_request(&self) -> bool;

    /// Repository identifier in `owner/name` form.
    fn repository(&self) -> Option<&str>;

    fn branch(&self) -> Option<&str>;

    /// Tag metadata; `None` for providers without tag semantics.
    fn tag(&self) -> Option<&TagInfo> {
        None
    }
}

/// Metadata reported by AppVeyor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppVeyorInfo {
    pub running: bool,
    pub pull_request_number: Option<u64>,
    pub repository_name: Option<String>,
    pub branch: Option<String>,
    pub tag: TagInfo,
}

impl CiProvider for AppVeyorInfo {
    fn kind(&self) -> ProviderKind {
        ProviderKind::AppVeyor
    }

    fn is_active(&self) -> bool {
        self.running
    }

    fn is_pull_request(&self) -> bool {
        self.pull_request_number.is_some_and(|number| number > 0)
    }

    fn repository(&self) -> Option<&str> {
        self.repository_name.as_deref()
    }

    fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    fn tag(&self) -> Option<&TagInfo> {
        Some(&self.tag)
    }
}

/// Metadata reported by Travis CI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TravisInfo {
    pub running: bool,
    /// Raw pull request field; blank means "not a pull request".
    pub pull_request: Option<String>,
    pub slug: Option<String>,
    pub branch: Option<String>,
}

impl CiProvider for TravisInfo {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Travis
    }

    fn is_active(&self) -> bool {
        self.running
    }

    fn is_pull_request(&self) -> bool {
        !is_blank(self.pull_request.as_deref())
    }

    fn repository(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }
}

/// Snapshot of all known providers for the current run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSystem {
    pub app_veyor: AppVeyorInfo,
    pub travis: TravisInfo,
}

impl BuildSystem {
    /// Providers in probe order. The first active one wins.
    pub fn providers(&self) -> [&dyn CiProvider; 2] {
        [&self.app_veyor, &self.travis]
    }

    /// The provider running this build, if any.
    pub fn active(&self) -> Option<&dyn CiProvider> {
        self.providers()
            .into_iter()
            .find(|provider| provider.is_active())
    }

    /// Number of providers claiming to run this build (normally 0 or 1).
    pub fn active_count(&self) -> usize {
        self.providers()
            .iter()
            .filter(|provider| provider.is_active())
            .count()
    }
}

/// Determine which provider runs the build. Absence of CI is `ProviderKind::None`.
pub fn detect(build_system: &BuildSystem) -> ProviderKind {
    build_system
        .active()
        .map_or(ProviderKind::None, |provider| provider.kind())
}
