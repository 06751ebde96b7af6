//! Provisioning of pinned external tools.
//!
//! Installs are idempotent: a tool already installed by this process, or one
//! whose marker file exists in the cache, is not installed again.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use minijinja::{Environment, UndefinedBehavior, context};
use tracing::{debug, info, instrument};

use crate::io::config::{InstallerConfig, ToolSpec};
use crate::io::process::run_with_timeout;

const MARKER_FILE: &str = ".installed";

/// Installs a pinned tool into a tool cache.
pub trait ToolInstaller {
    /// Install `tool` and return its directory. Repeat calls are no-ops.
    fn install(&mut self, tool: &ToolSpec) -> Result<PathBuf>;
}

/// Installs tools by running a templated command per tool.
pub struct CommandToolInstaller {
    config: InstallerConfig,
    root: PathBuf,
    installed: HashSet<ToolSpec>,
    templates: Environment<'static>,
}

impl CommandToolInstaller {
    /// `root` is the working directory for install commands and the base for a
    /// relative `cache_dir`.
    pub fn new(root: impl Into<PathBuf>, config: InstallerConfig) -> Self {
        let mut templates = Environment::new();
        templates.set_undefined_behavior(UndefinedBehavior::Strict);
        Self {
            config,
            root: root.into(),
            installed: HashSet::new(),
            templates,
        }
    }

    pub fn tool_dir(&self, tool: &ToolSpec) -> PathBuf {
        self.root
            .join(&self.config.cache_dir)
            .join(&tool.name)
            .join(&tool.version)
    }

    fn render_command(&self, tool: &ToolSpec, dir: &Path) -> Result<Vec<String>> {
        let dir = dir.display().to_string();
        self.config
            .command
            .iter()
            .map(|template| {
                self.templates
                    .render_str(
                        template,
                        context! {
                            name => tool.name.as_str(),
                            version => tool.version.as_str(),
                            dir => dir.as_str(),
                        },
                    )
                    .with_context(|| format!("render installer argument '{template}'"))
            })
            .collect()
    }
}

impl ToolInstaller for CommandToolInstaller {
    #[instrument(skip_all, fields(tool = %tool.name, version = %tool.version))]
    fn install(&mut self, tool: &ToolSpec) -> Result<PathBuf> {
        let dir = self.tool_dir(tool);
        if self.installed.contains(tool) {
            debug!("already installed by this process");
            return Ok(dir);
        }
        let marker = dir.join(MARKER_FILE);
        if marker.is_file() {
            debug!(dir = %dir.display(), "found in tool cache");
            self.installed.insert(tool.clone());
            return Ok(dir);
        }

        fs::create_dir_all(&dir).with_context(|| format!("create tool dir {}", dir.display()))?;
        let argv = self.render_command(tool, &dir)?;
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| anyhow!("installer command is empty"))?;
        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(&self.root);

        let output = run_with_timeout(
            cmd,
            Duration::from_secs(self.config.timeout_secs),
            self.config.output_limit_bytes,
        )?;
        if !output.succeeded() {
            bail!(
                "installer for {} {} failed ({})",
                tool.name,
                tool.version,
                output.failure_summary()
            );
        }

        fs::write(&marker, format!("{} {}\n", tool.name, tool.version))
            .with_context(|| format!("write {}", marker.display()))?;
        self.installed.insert(tool.clone());
        info!(dir = %dir.display(), "installed tool");
        Ok(dir)
    }
}
