use std::process::Command;

use async_trait::async_trait;
use octocrab::Octocrab;

use crate::{
    error::{Error, Result},
    graphql::{
        GraphQLResponse, OrganizationData, convert_team_members_response,
        create_team_members_query,
    },
    selection::{ReviewRequestState, TeamMember},
    types::{Forge, PullRequestInfo, PullRequestRef, TeamSlug},
};

/// Resolves a token: explicit value first, then `GITHUB_TOKEN`, `GH_TOKEN`,
/// and finally `gh auth token`.
pub fn get_github_token(explicit: Option<&str>) -> Result<String> {
    if let Some(token) = explicit.filter(|token| !token.trim().is_empty()) {
        return Ok(token.trim().to_string());
    }

    for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
        if let Ok(token) = std::env::var(var) {
            if !token.trim().is_empty() {
                return Ok(token.trim().to_string());
            }
        }
    }

    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .map_err(|err| {
            Error::Config(format!(
                "no token given and the gh CLI could not be run: {err}"
            ))
        })?;

    if !output.status.success() {
        return Err(Error::Config(
            "no token given and gh CLI is not logged in; set GITHUB_TOKEN or run 'gh auth login'"
                .to_string(),
        ));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(Error::Config("Empty token returned from gh CLI".to_string()));
    }

    Ok(token)
}

/// [`Forge`] backed by the GitHub REST and GraphQL APIs.
#[derive(Clone)]
pub struct GitHub {
    client: Octocrab,
}

impl GitHub {
    pub fn new(token: String) -> Result<Self> {
        let client = Octocrab::builder().personal_token(token).build()?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Octocrab) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Forge for GitHub {
    #[tracing::instrument(skip_all, fields(pr = %pr))]
    async fn fetch_pull_request(&self, pr: &PullRequestRef) -> Result<PullRequestInfo> {
        let pull = self
            .client
            .pulls(pr.repo.owner(), pr.repo.name())
            .get(pr.number)
            .await?;

        let author_login = pull
            .user
            .as_ref()
            .map(|user| user.login.clone())
            .ok_or_else(|| Error::ApiResponse(format!("pull request {pr} has no author")))?;

        let review_requests = ReviewRequestState::new(
            pull.requested_reviewers
                .unwrap_or_default()
                .into_iter()
                .map(|reviewer| reviewer.login),
        );

        tracing::debug!(
            author = %author_login,
            requested = review_requests.requested_logins.len(),
            "Fetched pull request"
        );

        Ok(PullRequestInfo {
            author_login,
            review_requests,
        })
    }

    #[tracing::instrument(skip_all, fields(team = %team))]
    async fn fetch_team_members(&self, team: &TeamSlug) -> Result<Vec<TeamMember>> {
        let mut members = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let query = create_team_members_query(team, after.as_deref());
            let response: GraphQLResponse<OrganizationData> = self.client.graphql(&query).await?;
            let page = convert_team_members_response(team, response)?;
            members.extend(page.members);

            match page.next_cursor {
                Some(cursor) => after = Some(cursor),
                None => break,
            }
        }

        tracing::debug!(count = members.len(), "Fetched team roster");
        Ok(members)
    }

    #[tracing::instrument(skip_all, fields(pr = %pr))]
    async fn request_reviewers(&self, pr: &PullRequestRef, logins: &[String]) -> Result<()> {
        let route = format!(
            "/repos/{}/{}/pulls/{}/requested_reviewers",
            pr.repo.owner(),
            pr.repo.name(),
            pr.number
        );
        let body = serde_json::json!({ "reviewers": logins });

        let _: serde_json::Value = self.client.post(route, Some(&body)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_token_wins() {
        assert_eq!(
            get_github_token(Some("  ghp_explicit \n")).unwrap(),
            "ghp_explicit"
        );
    }
}
