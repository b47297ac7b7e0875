use std::{collections::BTreeSet, fmt};

use crate::{
    config::{Config, ExistingReviewerPolicy},
    error::Result,
    selection::{RandomSource, SelectionRequest, TeamMember, select},
    types::Forge,
};

/// What a run did, for the caller to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Enough reviewers were already requested; nothing was drawn.
    AlreadySatisfied { desired: usize, existing: usize },
    /// Reviewers were requested (or would have been, on a dry run).
    Requested {
        logins: Vec<String>,
        shortfall: usize,
        dry_run: bool,
    },
    /// Reviewers were needed but nobody on the team was eligible.
    NoneAvailable { shortfall: usize },
}

impl Outcome {
    pub fn requested_logins(&self) -> &[String] {
        match self {
            Outcome::Requested { logins, .. } => logins,
            _ => &[],
        }
    }

    pub fn shortfall(&self) -> usize {
        match self {
            Outcome::AlreadySatisfied { .. } => 0,
            Outcome::Requested { shortfall, .. } | Outcome::NoneAvailable { shortfall } => {
                *shortfall
            }
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::AlreadySatisfied { desired, existing } => write!(
                f,
                "No action needed: {existing} reviewer(s) already requested, {desired} desired"
            ),
            Outcome::Requested {
                logins,
                shortfall,
                dry_run,
            } => {
                let verb = if *dry_run { "Would request" } else { "Requested" };
                write!(f, "{verb} review from {}", logins.join(", "))?;
                if *shortfall > 0 {
                    write!(
                        f,
                        "; not enough eligible team members, {shortfall} slot(s) left unfilled"
                    )?;
                }
                Ok(())
            }
            Outcome::NoneAvailable { shortfall } => write!(
                f,
                "No eligible team members to request; {shortfall} slot(s) left unfilled"
            ),
        }
    }
}

/// Counts the requested reviewers that go toward the desired total.
pub fn count_existing_reviewers(
    policy: ExistingReviewerPolicy,
    requested_logins: &BTreeSet<String>,
    team_members: &[TeamMember],
) -> usize {
    match policy {
        ExistingReviewerPolicy::AllRequested => requested_logins.len(),
        ExistingReviewerPolicy::TeamMembers => requested_logins
            .iter()
            .filter(|login| team_members.iter().any(|member| &member.login == *login))
            .count(),
    }
}

/// Fetches the pull request and team roster, picks reviewers, and requests
/// them unless `config.dry_run` is set.
///
/// Running short of eligible members is reported through the [`Outcome`],
/// never as an error.
pub async fn assign_reviewers<F, R>(config: &Config, forge: &F, rng: &mut R) -> Result<Outcome>
where
    F: Forge + Sync,
    R: RandomSource + ?Sized,
{
    let pr = &config.pull_request;

    let pull_request = forge.fetch_pull_request(pr).await?;
    let team_members = forge.fetch_team_members(&config.team).await?;

    let requested_logins = pull_request.review_requests.requested_logins;
    let existing = count_existing_reviewers(config.policy, &requested_logins, &team_members);
    tracing::info!(
        pr = %pr,
        team = %config.team,
        members = team_members.len(),
        existing,
        desired = config.desired_reviewers,
        policy = %config.policy,
        "Checking reviewers"
    );

    let request = SelectionRequest {
        desired_total: config.desired_reviewers,
        team_members,
        existing_team_reviewer_count: existing,
        pr_author_login: pull_request.author_login,
        requested_logins,
    };
    let result = select(&request, rng);

    if result.logins_to_request.is_empty() {
        if result.shortfall == 0 {
            return Ok(Outcome::AlreadySatisfied {
                desired: config.desired_reviewers,
                existing,
            });
        }
        return Ok(Outcome::NoneAvailable {
            shortfall: result.shortfall,
        });
    }

    let logins: Vec<String> = result.logins_to_request.into_iter().collect();
    if config.dry_run {
        tracing::info!(reviewers = ?logins, "Dry run, not requesting reviewers");
    } else {
        forge.request_reviewers(pr, &logins).await?;
    }

    Ok(Outcome::Requested {
        logins,
        shortfall: result.shortfall,
        dry_run: config.dry_run,
    })
}
