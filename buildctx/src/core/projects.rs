//! Catalog of buildable projects and their roles.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// What a registered project is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectRole {
    /// Packaged and published as an artifact.
    Publish,
    UnitTests,
    IntegrationTests,
}

/// A buildable unit. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    name: String,
    path: PathBuf,
    roles: BTreeSet<ProjectRole>,
}

impl Project {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, roles: &[ProjectRole]) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            roles: roles.iter().copied().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Location of the project's build descriptor.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn roles(&self) -> &BTreeSet<ProjectRole> {
        &self.roles
    }

    pub fn has_role(&self, role: ProjectRole) -> bool {
        self.roles.contains(&role)
    }
}

/// The fixed, ordered project registry.
pub fn registry() -> Vec<Project> {
    use ProjectRole::{IntegrationTests, Publish, UnitTests};

    vec![
        Project::new("Octokit", "./Octokit/Octokit.csproj", &[Publish]),
        Project::new(
            "Octokit.Reactive",
            "./Octokit.Reactive/Octokit.Reactive.csproj",
            &[Publish],
        ),
        Project::new(
            "Octokit.Tests",
            "./Octokit.Tests/Octokit.Tests.csproj",
            &[UnitTests],
        ),
        Project::new(
            "Octokit.Tests.Conventions",
            "./Octokit.Tests.Conventions/Octokit.Tests.Conventions.csproj",
            &[UnitTests],
        ),
        Project::new(
            "Octokit.Tests.Integration",
            "./Octokit.Tests.Integration/Octokit.Tests.Integration.csproj",
            &[IntegrationTests],
        ),
    ]
}

/// Projects holding `role`, in registry order.
pub fn with_role(projects: &[Project], role: ProjectRole) -> impl Iterator<Item = &Project> {
    projects.iter().filter(move |project| project.has_role(role))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_five_projects_in_stable_order() {
        let first = registry();
        let second = registry();
        assert_eq!(first.len(), 5);
        assert_eq!(first, second);

        let names: Vec<&str> = first.iter().map(Project::name).collect();
        assert_eq!(
            names,
            vec![
                "Octokit",
                "Octokit.Reactive",
                "Octokit.Tests",
                "Octokit.Tests.Conventions",
                "Octokit.Tests.Integration",
            ]
        );
    }

    #[test]
    fn registry_role_counts() {
        let projects = registry();
        assert_eq!(with_role(&projects, ProjectRole::Publish).count(), 2);
        assert_eq!(with_role(&projects, ProjectRole::UnitTests).count(), 2);
        assert_eq!(with_role(&projects, ProjectRole::IntegrationTests).count(), 1);
    }

    #[test]
    fn registry_projects_hold_exactly_one_role() {
        assert!(registry().iter().all(|project| project.roles().len() == 1));
    }

    #[test]
    fn project_without_roles_is_legal() {
        let project = Project::new("Octokit.Common", "./Octokit.Common/Octokit.Common.csproj", &[]);
        assert!(project.roles().is_empty());
        assert!(!project.has_role(ProjectRole::Publish));
    }

    #[test]
    fn duplicate_roles_collapse() {
        let project = Project::new(
            "x",
            "./x.csproj",
            &[ProjectRole::Publish, ProjectRole::Publish],
        );
        assert_eq!(project.roles().len(), 1);
    }
}
