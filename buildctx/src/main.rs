//! `buildctx`: initialize the build context for the pipeline.
//!
//! `setup` detects the CI environment, evaluates repository trust, installs
//! pinned tools and resolves the version. With `--json` the frozen context is
//! printed on stdout for later stages.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::debug;

use buildctx::context::BuildContext;
use buildctx::core::args::{Arguments, parse_key_value};
use buildctx::error::{SetupError, exit_code_for};
use buildctx::exit_codes;
use buildctx::io::config::{DEFAULT_CONFIG_PATH, PipelineConfig, load_config, write_config};
use buildctx::io::env::ProcessEnv;
use buildctx::io::git::Git;
use buildctx::io::tools::CommandToolInstaller;
use buildctx::io::version::GitDescribeResolver;
use buildctx::logging;
use buildctx::setup::{Collaborators, initialize};

#[derive(Parser)]
#[command(
    name = "buildctx",
    version,
    about = "Initialize the build context for the pipeline"
)]
struct Cli {
    /// Pipeline config file (missing file means defaults).
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the default config file if missing.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
    /// Build the context for this invocation.
    Setup(SetupArgs),
}

#[derive(Args)]
struct SetupArgs {
    /// Pipeline goal [default: Default].
    #[arg(long)]
    target: Option<String>,

    /// Build configuration [default: Release].
    #[arg(long)]
    configuration: Option<String>,

    /// Override the computed version prefix.
    #[arg(long = "version", id = "version_prefix")]
    version: Option<String>,

    /// Override the computed version suffix.
    #[arg(long)]
    suffix: Option<String>,

    /// Publish regardless of trust evaluation.
    #[arg(
        long = "forcepublish",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true"
    )]
    force_publish: bool,

    /// Additional named argument, e.g. `--arg githubusername=octocat`.
    #[arg(long = "arg", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    extra: Vec<(String, String)>,

    /// Print the context as JSON on stdout.
    #[arg(long)]
    json: bool,
}

impl SetupArgs {
    fn arguments(&self) -> Arguments {
        Arguments {
            target: self.target.clone(),
            configuration: self.configuration.clone(),
            version: self.version.clone(),
            suffix: self.suffix.clone(),
            force_publish: self.force_publish,
            extra: self.extra.iter().cloned().collect(),
        }
    }
}

fn main() {
    logging::init();
    let code = match run() {
        Ok(()) => exit_codes::OK,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_code_for(&err)
        }
    };
    std::process::exit(code);
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let root = std::env::current_dir().context("resolve current directory")?;
    let config_path = root.join(&cli.config);
    match cli.command {
        Command::Init { force } => cmd_init(&config_path, force),
        Command::Setup(args) => cmd_setup(&root, &config_path, &args),
    }
}

fn cmd_init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        println!("init: kept existing {}", config_path.display());
        return Ok(());
    }
    write_config(config_path, &PipelineConfig::default())?;
    println!("init: wrote {}", config_path.display());
    Ok(())
}

fn cmd_setup(root: &Path, config_path: &Path, args: &SetupArgs) -> Result<()> {
    let config = load_config(config_path).map_err(SetupError::Config)?;
    debug!(config = %config_path.display(), "config loaded");

    let mut tools = CommandToolInstaller::new(root, config.installer.clone());
    let versions = GitDescribeResolver::new(Git::new(root));
    let context = initialize(
        &args.arguments(),
        &config,
        Collaborators {
            env: &ProcessEnv,
            tools: &mut tools,
            versions: &versions,
        },
    )?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&context).context("serialize build context")?
        );
    } else {
        print_summary(&context);
    }
    Ok(())
}

fn print_summary(context: &BuildContext) {
    println!(
        "setup: provider={} version={} pull_request={} original_repository={} protected_branch={} tagged={} publish={}",
        context.ci_provider(),
        context.version(),
        context.is_pull_request(),
        context.is_original_repository(),
        context.is_protected_branch(),
        context.is_tagged(),
        context.should_publish()
    );
}
