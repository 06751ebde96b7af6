//! Git adapter used for version resolution.
//!
//! Thin wrapper around `git` subprocess calls in a fixed working directory.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct Git {
    workdir: PathBuf,
}

impl Git {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// `git describe --tags --long` for HEAD: `<tag>-<distance>-g<sha>`.
    #[instrument(skip_all)]
    pub fn describe_long(&self) -> Result<String> {
        let out = self.run_capture(&["describe", "--tags", "--long", "--abbrev=7"])?;
        let described = out.trim().to_string();
        debug!(described = %described, "described HEAD");
        Ok(described)
    }

    #[cfg(test)]
    fn head_short_sha(&self, len: usize) -> Result<String> {
        let arg = format!("--short={len}");
        let out = self.run_capture(&["rev-parse", &arg, "HEAD"])?;
        Ok(out.trim().to_string())
    }

    fn run_capture(&self, args: &[&str]) -> Result<String> {
        let output = self.run_checked(args)?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn run_checked(&self, args: &[&str]) -> Result<Output> {
        let output = self.run(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("git {} failed: {}", args.join(" "), stderr.trim()));
        }
        Ok(output)
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .with_context(|| format!("spawn git {}", args.join(" ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestRepo;

    #[test]
    fn describe_on_tag_has_zero_distance() {
        let repo = TestRepo::new().expect("repo");
        repo.tag("v1.2.3").expect("tag");
        let sha = Git::new(repo.path()).head_short_sha(7).expect("sha");
        let described = Git::new(repo.path()).describe_long().expect("describe");
        assert_eq!(described, format!("v1.2.3-0-g{sha}"));
    }

    #[test]
    fn describe_counts_commits_since_tag() {
        let repo = TestRepo::new().expect("repo");
        repo.tag("v1.2.3").expect("tag");
        repo.commit("one").expect("commit");
        repo.commit("two").expect("commit");
        let described = Git::new(repo.path()).describe_long().expect("describe");
        assert!(described.starts_with("v1.2.3-2-g"), "{described}");
    }

    #[test]
    fn describe_without_tags_fails() {
        let repo = TestRepo::new().expect("repo");
        let err = Git::new(repo.path()).describe_long().expect_err("no tags");
        assert!(err.to_string().contains("git describe"));
    }
}
