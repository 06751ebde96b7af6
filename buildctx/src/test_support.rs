//! Test doubles for the collaborators consulted during initialization.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, anyhow, bail};
use tempfile::TempDir;

use crate::core::version::BuildVersion;
use crate::io::config::ToolSpec;
use crate::io::env::Environment;
use crate::io::tools::ToolInstaller;
use crate::io::version::VersionResolver;

/// Environment backed by a fixed map.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new<const N: usize>(vars: [(&str, &str); N]) -> Self {
        Self {
            vars: vars
                .into_iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        }
    }
}

impl Environment for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Records install requests; optionally fails for one tool name.
#[derive(Debug, Default)]
pub struct RecordingInstaller {
    installed: Vec<ToolSpec>,
    fail_on: Option<String>,
}

impl RecordingInstaller {
    pub fn failing_on(name: &str) -> Self {
        Self {
            installed: Vec::new(),
            fail_on: Some(name.to_string()),
        }
    }

    pub fn installed(&self) -> &[ToolSpec] {
        &self.installed
    }
}

impl ToolInstaller for RecordingInstaller {
    fn install(&mut self, tool: &ToolSpec) -> Result<PathBuf> {
        if self.fail_on.as_deref() == Some(tool.name.as_str()) {
            bail!("scripted failure installing {}", tool.name);
        }
        if !self.installed.contains(tool) {
            self.installed.push(tool.clone());
        }
        Ok(PathBuf::from("tools").join(&tool.name).join(&tool.version))
    }
}

/// Version resolver returning a scripted result.
#[derive(Debug, Clone)]
pub struct FixedVersion(std::result::Result<BuildVersion, String>);

impl FixedVersion {
    pub fn ok(version: BuildVersion) -> Self {
        Self(Ok(version))
    }

    pub fn failing(message: &str) -> Self {
        Self(Err(message.to_string()))
    }
}

impl VersionResolver for FixedVersion {
    fn compute_default(&self) -> Result<BuildVersion> {
        self.0.clone().map_err(|message| anyhow!(message))
    }
}

/// Scratch git repository with one initial commit.
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create tempdir")?;
        let repo = Self { dir };
        repo.git(&["init", "--quiet"])?;
        repo.git(&["config", "user.email", "test@example.com"])?;
        repo.git(&["config", "user.name", "test"])?;
        repo.git(&["config", "commit.gpgsign", "false"])?;
        repo.git(&["config", "tag.gpgsign", "false"])?;
        repo.commit("chore: init")?;
        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Append to a file and commit it.
    pub fn commit(&self, message: &str) -> Result<()> {
        let readme = self.path().join("README.md");
        let mut contents = fs::read_to_string(&readme).unwrap_or_default();
        contents.push_str(message);
        contents.push('\n');
        fs::write(&readme, contents).with_context(|| format!("write {}", readme.display()))?;
        self.git(&["add", "README.md"])?;
        self.git(&["commit", "--quiet", "-m", message])
    }

    /// Create a lightweight tag at HEAD.
    pub fn tag(&self, name: &str) -> Result<()> {
        self.git(&["tag", name])
    }

    fn git(&self, args: &[&str]) -> Result<()> {
        let status = Command::new("git")
            .args(args)
            .current_dir(self.path())
            .status()
            .with_context(|| format!("spawn git {}", args.join(" ")))?;
        if !status.success() {
            bail!("git {} failed", args.join(" "));
        }
        Ok(())
    }
}
