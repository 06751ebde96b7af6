//! Pipeline configuration stored in `buildctx.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::trust::{CANONICAL_REPOSITORY, PROTECTED_BRANCH, TrustPolicy};

/// Default location of the config file, relative to the repository root.
pub const DEFAULT_CONFIG_PATH: &str = "buildctx.toml";

/// Pipeline configuration (TOML).
///
/// Missing fields default to the values the pipeline has always used, so an
/// absent file is equivalent to an empty one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Repository identifier allowed to publish (`owner/name`).
    pub canonical_repository: String,

    /// Branch whose builds may publish.
    pub protected_branch: String,

    /// Output directory for packaged artifacts.
    pub artifacts_path: PathBuf,

    /// Tools installed before the version is resolved.
    pub tools: Vec<ToolSpec>,

    pub installer: InstallerConfig,

    pub integration: IntegrationConfig,
}

/// A pinned external tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToolSpec {
    pub name: String,
    pub version: String,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InstallerConfig {
    /// Install command; each element is a template over `name`, `version`, `dir`.
    pub command: Vec<String>,

    /// Tool cache directory.
    pub cache_dir: PathBuf,

    /// Per-tool install timeout in seconds.
    pub timeout_secs: u64,

    /// Truncate captured installer output beyond this many bytes.
    pub output_limit_bytes: usize,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            command: [
                "nuget",
                "install",
                "{{ name }}",
                "-Version",
                "{{ version }}",
                "-OutputDirectory",
                "{{ dir }}",
                "-ExcludeVersion",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            cache_dir: PathBuf::from("./tools"),
            timeout_secs: 10 * 60,
            output_limit_bytes: 100_000,
        }
    }
}

/// Where integration-test credentials come from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IntegrationConfig {
    pub username_env: String,
    pub username_arg: String,
    pub token_env: String,
    pub token_arg: String,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            username_env: "OCTOKIT_GITHUBUSERNAME".to_string(),
            username_arg: "githubusername".to_string(),
            token_env: "OCTOKIT_OAUTHTOKEN".to_string(),
            token_arg: "githubtoken".to_string(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            canonical_repository: CANONICAL_REPOSITORY.to_string(),
            protected_branch: PROTECTED_BRANCH.to_string(),
            artifacts_path: PathBuf::from("./packaging/"),
            tools: vec![
                ToolSpec::new("GitVersion.CommandLine", "3.6.2"),
                ToolSpec::new("Octokit.CodeFormatter", "1.0.0-preview"),
            ],
            installer: InstallerConfig::default(),
            integration: IntegrationConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.canonical_repository.trim().is_empty() {
            return Err(anyhow!("canonical_repository must be non-empty"));
        }
        if self.protected_branch.trim().is_empty() {
            return Err(anyhow!("protected_branch must be non-empty"));
        }
        if self.artifacts_path.as_os_str().is_empty() {
            return Err(anyhow!("artifacts_path must be non-empty"));
        }
        for tool in &self.tools {
            if tool.name.trim().is_empty() || tool.version.trim().is_empty() {
                return Err(anyhow!("tools entries need a non-empty name and version"));
            }
        }
        if self.installer.command.is_empty() || self.installer.command[0].trim().is_empty() {
            return Err(anyhow!("installer.command must be a non-empty array"));
        }
        if self.installer.timeout_secs == 0 {
            return Err(anyhow!("installer.timeout_secs must be > 0"));
        }
        if self.installer.output_limit_bytes == 0 {
            return Err(anyhow!("installer.output_limit_bytes must be > 0"));
        }
        Ok(())
    }

    pub fn trust_policy(&self) -> TrustPolicy {
        TrustPolicy {
            canonical_repository: self.canonical_repository.clone(),
            protected_branch: self.protected_branch.clone(),
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `PipelineConfig::default()`.
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    if !path.exists() {
        let cfg = PipelineConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: PipelineConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &PipelineConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
