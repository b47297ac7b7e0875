use std::{fmt, str::FromStr};

use async_trait::async_trait;

use crate::{
    error::{Error, Result},
    selection::{ReviewRequestState, TeamMember},
};

/// Splits `value` into exactly two non-empty halves around a single `/`.
fn split_pair<'a>(value: &'a str, what: &str, shape: &str) -> Result<(&'a str, &'a str)> {
    let mut parts = value.trim().split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(left), Some(right), None) if !left.is_empty() && !right.is_empty() => {
            Ok((left, right))
        }
        _ => Err(Error::Config(format!(
            "{what} must be in format '{shape}', got: '{value}'"
        ))),
    }
}

/// A GitHub repository, `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repo {
    owner: String,
    name: String,
}

impl Repo {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let owner = owner.into();
        let name = name.into();
        if owner.is_empty() || name.is_empty() {
            return Err(Error::Config(
                "repository owner and name must not be empty".to_string(),
            ));
        }
        Ok(Self { owner, name })
    }

    pub fn parse(value: &str) -> Result<Self> {
        let (owner, name) = split_pair(value, "Repository", "owner/repo")?;
        Self::new(owner, name)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for Repo {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// The team reviewers are drawn from, `organization/team-slug`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TeamSlug {
    organization: String,
    slug: String,
}

impl TeamSlug {
    pub fn parse(value: &str) -> Result<Self> {
        let (organization, slug) = split_pair(value, "Team", "organization/team-slug")?;
        Ok(Self {
            organization: organization.to_string(),
            slug: slug.to_string(),
        })
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }
}

impl fmt::Display for TeamSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.organization, self.slug)
    }
}

impl FromStr for TeamSlug {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Identifies one pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    pub repo: Repo,
    pub number: u64,
}

impl fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.repo, self.number)
    }
}

/// What the selector needs to know about a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestInfo {
    pub author_login: String,
    pub review_requests: ReviewRequestState,
}

/// Remote API the assignment runs against.
///
/// [`crate::GitHub`] is the real implementation; tests provide in-memory
/// ones.
#[async_trait]
pub trait Forge {
    /// Reads the pull request author and its currently requested reviewers.
    async fn fetch_pull_request(&self, pr: &PullRequestRef) -> Result<PullRequestInfo>;

    /// Lists team members along with their availability.
    async fn fetch_team_members(&self, team: &TeamSlug) -> Result<Vec<TeamMember>>;

    async fn request_reviewers(&self, pr: &PullRequestRef, logins: &[String]) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_slug_parses() {
        let team = TeamSlug::parse("acme/backend-reviewers").unwrap();
        assert_eq!(team.organization(), "acme");
        assert_eq!(team.slug(), "backend-reviewers");
        assert_eq!(team.to_string(), "acme/backend-reviewers");
    }

    #[test]
    fn team_slug_trims_surrounding_whitespace() {
        let team: TeamSlug = " acme/core \n".parse().unwrap();
        assert_eq!(team.to_string(), "acme/core");
    }

    #[test]
    fn team_slug_rejects_bad_shapes() {
        for value in ["", "acme", "acme/", "/core", "acme/core/extra", "/"] {
            let err = TeamSlug::parse(value).unwrap_err();
            assert!(
                matches!(err, Error::Config(_)),
                "expected config error for {value:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn repo_parses_and_displays() {
        let repo = Repo::parse("owner/repo").unwrap();
        assert_eq!(repo.owner(), "owner");
        assert_eq!(repo.name(), "repo");

        let pr = PullRequestRef { repo, number: 17 };
        assert_eq!(pr.to_string(), "owner/repo#17");
    }

    #[test]
    fn repo_rejects_bad_shapes() {
        assert!(Repo::parse("owner").is_err());
        assert!(Repo::parse("owner/repo/pull").is_err());
        assert!(Repo::new("", "repo").is_err());
    }
}
