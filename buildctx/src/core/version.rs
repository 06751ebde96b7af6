//! Semantic version model and derivation rules.
//!
//! The version is split into a numeric `prefix` (`MAJOR.MINOR.PATCH`) and a
//! pre-release `suffix`. Defaults come from repository history; explicit
//! arguments then override either half independently.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use semver::Version;
use serde::{Deserialize, Serialize};

static DESCRIBE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<tag>.+)-(?P<distance>\d+)-g(?P<sha>[0-9a-fA-F]+)$")
        .expect("describe regex should compile")
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildVersion {
    pub prefix: String,
    pub suffix: String,
}

impl BuildVersion {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// Replace each half that was supplied explicitly; keep the rest verbatim.
    pub fn with_overrides(mut self, prefix: Option<&str>, suffix: Option<&str>) -> Self {
        if let Some(prefix) = prefix {
            self.prefix = prefix.to_string();
        }
        if let Some(suffix) = suffix {
            self.suffix = suffix.to_string();
        }
        self
    }
}

impl fmt::Display for BuildVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.suffix.is_empty() {
            f.write_str(&self.prefix)
        } else {
            write!(f, "{}-{}", self.prefix, self.suffix)
        }
    }
}

/// Parsed `git describe --tags --long` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Describe {
    pub tag: String,
    /// Commits between the tag and HEAD.
    pub distance: u64,
    pub sha: String,
}

pub fn parse_describe(output: &str) -> Option<Describe> {
    let caps = DESCRIBE_RE.captures(output.trim())?;
    Some(Describe {
        tag: caps["tag"].to_string(),
        distance: caps["distance"].parse().ok()?,
        sha: caps["sha"].to_string(),
    })
}

/// Parse a release tag such as `v1.2.3` or `1.2.3-beta`.
pub fn parse_tag(tag: &str) -> Result<Version, semver::Error> {
    let trimmed = tag.trim();
    let numeric = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    Version::parse(numeric)
}

/// Derive the default version from the nearest tag and the distance to it.
///
/// - On the tag: the tag's own version.
/// - Past a pre-release tag: same prefix, label + zero-padded distance.
/// - Past a release tag: next patch, `build` + zero-padded distance.
pub fn from_tag(tag: &Version, distance: u64) -> BuildVersion {
    let label = tag.pre.as_str();
    if distance == 0 {
        return BuildVersion::new(
            format!("{}.{}.{}", tag.major, tag.minor, tag.patch),
            label,
        );
    }
    if label.is_empty() {
        BuildVersion::new(
            format!("{}.{}.{}", tag.major, tag.minor, tag.patch + 1),
            format!("build{distance:04}"),
        )
    } else {
        BuildVersion::new(
            format!("{}.{}.{}", tag.major, tag.minor, tag.patch),
            format!("{label}{distance:04}"),
        )
    }
}
