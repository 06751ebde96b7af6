//! Default version resolution from repository history.

use anyhow::{Context, Result, anyhow};
use tracing::{debug, instrument};

use crate::core::version::{BuildVersion, from_tag, parse_describe, parse_tag};
use crate::io::git::Git;

/// Computes the default version before argument overrides are applied.
pub trait VersionResolver {
    fn compute_default(&self) -> Result<BuildVersion>;
}

/// Resolves the version from the nearest reachable tag.
#[derive(Debug, Clone)]
pub struct GitDescribeResolver {
    git: Git,
}

impl GitDescribeResolver {
    pub fn new(git: Git) -> Self {
        Self { git }
    }
}

impl VersionResolver for GitDescribeResolver {
    #[instrument(skip_all, fields(workdir = %self.git.workdir().display()))]
    fn compute_default(&self) -> Result<BuildVersion> {
        let raw = self
            .git
            .describe_long()
            .context("find nearest version tag")?;
        let describe =
            parse_describe(&raw).ok_or_else(|| anyhow!("unexpected git describe output '{raw}'"))?;
        let tag = parse_tag(&describe.tag)
            .with_context(|| format!("tag '{}' is not a semantic version", describe.tag))?;
        let version = from_tag(&tag, describe.distance);
        debug!(
            tag = %describe.tag,
            distance = describe.distance,
            version = %version,
            "computed default version"
        );
        Ok(version)
    }
}
