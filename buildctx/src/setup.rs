//! Orchestration for build context initialization.
//!
//! Runs detection, trust evaluation and tag detection over the environment,
//! provisions tools, resolves the version, and freezes the result into a
//! [`BuildContext`]. This is the only place a context is constructed.

use tracing::{info, instrument};

use crate::context::{BuildContext, IntegrationCredentials};
use crate::core::args::Arguments;
use crate::core::projects::registry;
use crate::core::provider::{ProviderKind, detect};
use crate::core::tag::is_build_tagged;
use crate::core::trust::evaluate;
use crate::error::SetupError;
use crate::io::build_system::read_build_system;
use crate::io::config::PipelineConfig;
use crate::io::env::{Environment, resolve_env_or_arg};
use crate::io::tools::ToolInstaller;
use crate::io::version::VersionResolver;

/// External collaborators consulted during initialization.
pub struct Collaborators<'a> {
    pub env: &'a dyn Environment,
    pub tools: &'a mut dyn ToolInstaller,
    pub versions: &'a dyn VersionResolver,
}

/// Build the context for this invocation.
///
/// Absent CI metadata yields a local build with every trust signal `false`.
/// Fails only on invalid configuration, a failed tool install, or a failed
/// version resolution.
#[instrument(
    skip_all,
    fields(target = %args.target(), configuration = %args.configuration())
)]
pub fn initialize(
    args: &Arguments,
    config: &PipelineConfig,
    collaborators: Collaborators<'_>,
) -> Result<BuildContext, SetupError> {
    let Collaborators {
        env,
        tools,
        versions,
    } = collaborators;
    config.validate().map_err(SetupError::Config)?;

    let build_system = read_build_system(env);
    let ci_provider = detect(&build_system);
    let trust = evaluate(&build_system, &config.trust_policy());
    let is_tagged = is_build_tagged(&build_system);

    let projects = registry();

    info!("Installing tools...");
    for tool in &config.tools {
        tools
            .install(tool)
            .map_err(|source| SetupError::ToolInstall {
                name: tool.name.clone(),
                version: tool.version.clone(),
                source,
            })?;
    }

    let version = versions
        .compute_default()
        .map_err(SetupError::VersionResolution)?
        .with_overrides(args.version.as_deref(), args.suffix.as_deref());

    let integration = IntegrationCredentials {
        username: resolve_env_or_arg(
            env,
            args,
            &config.integration.username_env,
            &config.integration.username_arg,
        ),
        token: resolve_env_or_arg(
            env,
            args,
            &config.integration.token_env,
            &config.integration.token_arg,
        ),
    };

    let context = BuildContext {
        target: args.target().to_string(),
        configuration: args.configuration().to_string(),
        artifacts_path: config.artifacts_path.clone(),
        is_local_build: ci_provider == ProviderKind::None,
        ci_provider,
        trust,
        is_tagged,
        force_publish: args.force_publish,
        version,
        projects,
        integration,
    };
    report(&context);
    Ok(context)
}

fn report(context: &BuildContext) {
    info!("Version: {}", context.version().prefix);
    info!("Version suffix: {}", context.version().suffix);
    info!("Configuration: {}", context.configuration());
    info!("Target: {}", context.target());
    info!("AppVeyor: {}", context.ci_provider() == ProviderKind::AppVeyor);
    info!("Travis CI: {}", context.ci_provider() == ProviderKind::Travis);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::version::BuildVersion;
    use crate::io::config::ToolSpec;
    use crate::test_support::{FixedVersion, MapEnv, RecordingInstaller};

    fn run(
        args: &Arguments,
        env: &MapEnv,
        tools: &mut RecordingInstaller,
        versions: &FixedVersion,
    ) -> Result<BuildContext, SetupError> {
        initialize(
            args,
            &PipelineConfig::default(),
            Collaborators {
                env,
                tools,
                versions,
            },
        )
    }

    fn resolver() -> FixedVersion {
        FixedVersion::ok(BuildVersion::new("0.24.1", "build0007"))
    }

    #[test]
    fn local_build_defaults() {
        let mut tools = RecordingInstaller::default();
        let ctx = run(&Arguments::default(), &MapEnv::default(), &mut tools, &resolver())
            .expect("initialize");

        assert!(ctx.is_local_build());
        assert_eq!(ctx.ci_provider(), ProviderKind::None);
        assert!(!ctx.is_pull_request());
        assert!(!ctx.is_original_repository());
        assert!(!ctx.is_protected_branch());
        assert!(!ctx.is_tagged());
        assert!(!ctx.should_publish());
        assert_eq!(ctx.target(), "Default");
        assert_eq!(ctx.configuration(), "Release");
        assert_eq!(ctx.artifacts_path(), std::path::Path::new("./packaging/"));
        assert_eq!(ctx.version(), &BuildVersion::new("0.24.1", "build0007"));
        assert_eq!(ctx.projects().len(), 5);
    }

    #[test]
    fn trusted_app_veyor_tag_build() {
        let env = MapEnv::new([
            ("APPVEYOR", "True"),
            ("APPVEYOR_REPO_NAME", "Octokit/Octokit.Net"),
            ("APPVEYOR_REPO_BRANCH", "master"),
            ("APPVEYOR_REPO_TAG", "true"),
            ("APPVEYOR_REPO_TAG_NAME", "v0.24.0"),
        ]);
        let mut tools = RecordingInstaller::default();
        let ctx = run(&Arguments::default(), &env, &mut tools, &resolver()).expect("initialize");

        assert!(!ctx.is_local_build());
        assert_eq!(ctx.ci_provider(), ProviderKind::AppVeyor);
        assert!(ctx.is_original_repository());
        assert!(ctx.is_protected_branch());
        assert!(!ctx.is_pull_request());
        assert!(ctx.is_tagged());
        assert!(ctx.should_publish());
    }

    #[test]
    fn travis_pull_request_is_not_published() {
        let env = MapEnv::new([
            ("TRAVIS", "true"),
            ("TRAVIS_PULL_REQUEST", "123"),
            ("TRAVIS_REPO_SLUG", "octokit/octokit.net"),
            ("TRAVIS_BRANCH", "master"),
            ("APPVEYOR_REPO_TAG", "true"),
        ]);
        let mut tools = RecordingInstaller::default();
        let ctx = run(&Arguments::default(), &env, &mut tools, &resolver()).expect("initialize");

        assert_eq!(ctx.ci_provider(), ProviderKind::Travis);
        assert!(ctx.is_pull_request());
        assert!(!ctx.is_tagged());
        assert!(!ctx.should_publish());
    }

    #[test]
    fn version_argument_overrides_prefix_only() {
        let args = Arguments {
            version: Some("2.0.0".to_string()),
            ..Arguments::default()
        };
        let mut tools = RecordingInstaller::default();
        let ctx = run(&args, &MapEnv::default(), &mut tools, &resolver()).expect("initialize");
        assert_eq!(ctx.version(), &BuildVersion::new("2.0.0", "build0007"));
    }

    #[test]
    fn force_publish_argument_is_carried() {
        let args = Arguments {
            force_publish: true,
            ..Arguments::default()
        };
        let mut tools = RecordingInstaller::default();
        let ctx = run(&args, &MapEnv::default(), &mut tools, &resolver()).expect("initialize");
        assert!(ctx.force_publish());
        assert!(ctx.should_publish());
    }

    #[test]
    fn installs_configured_tools_in_order() {
        let mut tools = RecordingInstaller::default();
        run(&Arguments::default(), &MapEnv::default(), &mut tools, &resolver())
            .expect("initialize");
        assert_eq!(
            tools.installed(),
            &[
                ToolSpec::new("GitVersion.CommandLine", "3.6.2"),
                ToolSpec::new("Octokit.CodeFormatter", "1.0.0-preview"),
            ]
        );
    }

    #[test]
    fn tool_failure_is_fatal() {
        let mut tools = RecordingInstaller::failing_on("Octokit.CodeFormatter");
        let err = run(&Arguments::default(), &MapEnv::default(), &mut tools, &resolver())
            .expect_err("should fail");
        assert!(matches!(
            err,
            SetupError::ToolInstall { ref name, .. } if name == "Octokit.CodeFormatter"
        ));
    }

    #[test]
    fn version_failure_is_fatal() {
        let mut tools = RecordingInstaller::default();
        let err = run(
            &Arguments::default(),
            &MapEnv::default(),
            &mut tools,
            &FixedVersion::failing("no tags"),
        )
        .expect_err("should fail");
        assert!(matches!(err, SetupError::VersionResolution(_)));
    }

    #[test]
    fn invalid_config_is_rejected_before_any_side_effect() {
        let mut config = PipelineConfig::default();
        config.canonical_repository = String::new();
        let mut tools = RecordingInstaller::default();
        let err = initialize(
            &Arguments::default(),
            &config,
            Collaborators {
                env: &MapEnv::default(),
                tools: &mut tools,
                versions: &resolver(),
            },
        )
        .expect_err("should fail");
        assert!(matches!(err, SetupError::Config(_)));
        assert!(tools.installed().is_empty());
    }

    #[test]
    fn integration_credentials_prefer_environment() {
        let env = MapEnv::new([
            ("OCTOKIT_GITHUBUSERNAME", "env-user"),
            ("OCTOKIT_OAUTHTOKEN", " "),
        ]);
        let mut args = Arguments::default();
        args.extra
            .insert("githubusername".to_string(), "arg-user".to_string());
        args.extra
            .insert("githubtoken".to_string(), "arg-token".to_string());
        let mut tools = RecordingInstaller::default();

        let ctx = run(&args, &env, &mut tools, &resolver()).expect("initialize");

        assert_eq!(ctx.integration().username(), Some("env-user"));
        assert_eq!(ctx.integration().token(), Some("arg-token"));
        assert!(ctx.can_run_integration_tests());
    }
}
