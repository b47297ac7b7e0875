//! Team roster over GraphQL.
//!
//! The REST team-members listing has no notion of a member's status, so the
//! roster comes from the GraphQL `Organization.team.members` connection,
//! which exposes `status.indicatesLimitedAvailability`.

use serde::Deserialize;

use crate::{
    error::{Error, Result},
    selection::TeamMember,
    types::TeamSlug,
};

pub const TEAM_MEMBERS_PAGE_SIZE: u32 = 100;

pub fn create_team_members_query(team: &TeamSlug, after: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "query": r#"
            query($org: String!, $team: String!, $first: Int!, $after: String) {
                organization(login: $org) {
                    team(slug: $team) {
                        members(first: $first, after: $after) {
                            nodes {
                                login
                                status {
                                    indicatesLimitedAvailability
                                }
                            }
                            pageInfo {
                                hasNextPage
                                endCursor
                            }
                        }
                    }
                }
            }
        "#,
        "variables": {
            "org": team.organization(),
            "team": team.slug(),
            "first": TEAM_MEMBERS_PAGE_SIZE,
            "after": after,
        }
    })
}

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct OrganizationData {
    pub organization: Option<GraphQLOrganization>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLOrganization {
    pub team: Option<GraphQLTeam>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLTeam {
    pub members: GraphQLTeamMemberConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLTeamMemberConnection {
    pub nodes: Vec<GraphQLUser>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLUser {
    pub login: String,
    pub status: Option<GraphQLUserStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLUserStatus {
    #[serde(default)]
    pub indicates_limited_availability: bool,
}

impl From<GraphQLUser> for TeamMember {
    // No status set means nothing says the member is busy.
    fn from(user: GraphQLUser) -> Self {
        let limited = user
            .status
            .is_some_and(|status| status.indicates_limited_availability);
        TeamMember {
            login: user.login,
            is_available: !limited,
        }
    }
}

/// One page of team members plus the cursor for the next one.
#[derive(Debug)]
pub struct TeamMembersPage {
    pub members: Vec<TeamMember>,
    pub next_cursor: Option<String>,
}

/// Unpacks a team-members response, turning GraphQL errors and missing
/// organization/team nodes into [`Error::ApiResponse`].
pub fn convert_team_members_response(
    team: &TeamSlug,
    response: GraphQLResponse<OrganizationData>,
) -> Result<TeamMembersPage> {
    if !response.errors.is_empty() {
        let messages: Vec<&str> = response
            .errors
            .iter()
            .map(|error| error.message.as_str())
            .collect();
        return Err(Error::ApiResponse(format!(
            "team '{team}' query failed: {}",
            messages.join("; ")
        )));
    }

    let members = response
        .data
        .and_then(|data| data.organization)
        .and_then(|organization| organization.team)
        .map(|team| team.members)
        .ok_or_else(|| {
            Error::ApiResponse(format!(
                "team '{team}' not found or not visible to this token"
            ))
        })?;

    let next_cursor = if members.page_info.has_next_page {
        members.page_info.end_cursor
    } else {
        None
    };

    Ok(TeamMembersPage {
        members: members.nodes.into_iter().map(TeamMember::from).collect(),
        next_cursor,
    })
}
