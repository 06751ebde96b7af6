//! The build context handed to every later pipeline stage.
//!
//! A [`BuildContext`] is assembled once by [`crate::setup::initialize`] and is
//! read-only afterwards: fields are private to the crate and exposed through
//! accessors only.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::core::projects::{Project, ProjectRole, with_role};
use crate::core::provider::ProviderKind;
use crate::core::trust::TrustSignals;
use crate::core::version::BuildVersion;

#[derive(Debug, Clone, Serialize)]
pub struct BuildContext {
    pub(crate) target: String,
    pub(crate) configuration: String,
    pub(crate) artifacts_path: PathBuf,
    pub(crate) is_local_build: bool,
    pub(crate) ci_provider: ProviderKind,
    #[serde(flatten)]
    pub(crate) trust: TrustSignals,
    pub(crate) is_tagged: bool,
    pub(crate) force_publish: bool,
    pub(crate) version: BuildVersion,
    pub(crate) projects: Vec<Project>,
    pub(crate) integration: IntegrationCredentials,
}

impl BuildContext {
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn configuration(&self) -> &str {
        &self.configuration
    }

    pub fn artifacts_path(&self) -> &Path {
        &self.artifacts_path
    }

    pub fn is_local_build(&self) -> bool {
        self.is_local_build
    }

    pub fn ci_provider(&self) -> ProviderKind {
        self.ci_provider
    }

    pub fn trust(&self) -> TrustSignals {
        self.trust
    }

    pub fn is_pull_request(&self) -> bool {
        self.trust.is_pull_request
    }

    pub fn is_original_repository(&self) -> bool {
        self.trust.is_original_repository
    }

    pub fn is_protected_branch(&self) -> bool {
        self.trust.is_protected_branch
    }

    pub fn is_tagged(&self) -> bool {
        self.is_tagged
    }

    pub fn force_publish(&self) -> bool {
        self.force_publish
    }

    pub fn version(&self) -> &BuildVersion {
        &self.version
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn integration(&self) -> &IntegrationCredentials {
        &self.integration
    }

    /// Publish only from the canonical repository's protected branch, never from
    /// a pull request, unless publishing is forced.
    pub fn should_publish(&self) -> bool {
        self.force_publish
            || (!self.is_local_build
                && self.trust.is_original_repository
                && self.trust.is_protected_branch
                && !self.trust.is_pull_request)
    }

    pub fn publishable_projects(&self) -> impl Iterator<Item = &Project> {
        with_role(&self.projects, ProjectRole::Publish)
    }

    pub fn unit_test_projects(&self) -> impl Iterator<Item = &Project> {
        with_role(&self.projects, ProjectRole::UnitTests)
    }

    pub fn integration_test_projects(&self) -> impl Iterator<Item = &Project> {
        with_role(&self.projects, ProjectRole::IntegrationTests)
    }

    pub fn can_run_integration_tests(&self) -> bool {
        self.integration.is_complete()
    }
}

/// Credentials for the integration test suite. The token is never printed.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntegrationCredentials {
    pub(crate) username: Option<String>,
    #[serde(serialize_with = "redact")]
    pub(crate) token: Option<String>,
}

impl IntegrationCredentials {
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.username.is_some() && self.token.is_some()
    }
}

impl fmt::Debug for IntegrationCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegrationCredentials")
            .field("username", &self.username)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

fn redact<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(_) => serializer.serialize_some("***"),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::projects::registry;

    fn context(trust: TrustSignals, is_local_build: bool, force_publish: bool) -> BuildContext {
        BuildContext {
            target: "Default".to_string(),
            configuration: "Release".to_string(),
            artifacts_path: PathBuf::from("./packaging/"),
            is_local_build,
            ci_provider: if is_local_build {
                ProviderKind::None
            } else {
                ProviderKind::AppVeyor
            },
            trust,
            is_tagged: false,
            force_publish,
            version: BuildVersion::new("1.0.0", ""),
            projects: registry(),
            integration: IntegrationCredentials::default(),
        }
    }

    fn trusted() -> TrustSignals {
        TrustSignals {
            is_pull_request: false,
            is_original_repository: true,
            is_protected_branch: true,
        }
    }

    #[test]
    fn publishes_from_trusted_ci_build() {
        assert!(context(trusted(), false, false).should_publish());
    }

    #[test]
    fn never_publishes_pull_requests() {
        let trust = TrustSignals {
            is_pull_request: true,
            ..trusted()
        };
        assert!(!context(trust, false, false).should_publish());
    }

    #[test]
    fn never_publishes_from_forks_or_other_branches() {
        let fork = TrustSignals {
            is_original_repository: false,
            ..trusted()
        };
        let branch = TrustSignals {
            is_protected_branch: false,
            ..trusted()
        };
        assert!(!context(fork, false, false).should_publish());
        assert!(!context(branch, false, false).should_publish());
    }

    #[test]
    fn local_builds_do_not_publish_unless_forced() {
        assert!(!context(TrustSignals::default(), true, false).should_publish());
        assert!(context(TrustSignals::default(), true, true).should_publish());
    }

    #[test]
    fn role_filters_follow_registry_order() {
        let ctx = context(trusted(), false, false);
        let publish: Vec<&str> = ctx.publishable_projects().map(Project::name).collect();
        assert_eq!(publish, vec!["Octokit", "Octokit.Reactive"]);
        assert_eq!(ctx.unit_test_projects().count(), 2);
        assert_eq!(ctx.integration_test_projects().count(), 1);
    }

    #[test]
    fn token_is_redacted() {
        let mut ctx = context(trusted(), false, false);
        ctx.integration = IntegrationCredentials {
            username: Some("octocat".to_string()),
            token: Some("ghp_secret".to_string()),
        };

        let debug = format!("{:?}", ctx);
        let json = serde_json::to_string(&ctx).expect("serialize");

        assert!(!debug.contains("ghp_secret"));
        assert!(!json.contains("ghp_secret"));
        assert!(json.contains("octocat"));
        assert!(ctx.can_run_integration_tests());
        assert_eq!(ctx.integration().token(), Some("ghp_secret"));
    }

    #[test]
    fn serializes_flat_trust_fields() {
        let json = serde_json::to_value(context(trusted(), false, false)).expect("serialize");
        assert_eq!(json["is_original_repository"], true);
        assert_eq!(json["ci_provider"], "appveyor");
        assert_eq!(json["version"]["prefix"], "1.0.0");
        assert_eq!(json["projects"].as_array().map(Vec::len), Some(5));
    }
}
