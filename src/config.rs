use std::{fmt, str::FromStr};

use crate::{
    context::{RunnerEnv, resolve_pull_request},
    error::{Error, Result},
    types::{PullRequestRef, TeamSlug},
};

/// Which already-requested reviewers count toward the desired total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExistingReviewerPolicy {
    /// Only requested reviewers who belong to the configured team.
    #[default]
    TeamMembers,
    /// Every requested reviewer, team member or not.
    AllRequested,
}

impl ExistingReviewerPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExistingReviewerPolicy::TeamMembers => "team",
            ExistingReviewerPolicy::AllRequested => "all",
        }
    }
}

impl fmt::Display for ExistingReviewerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExistingReviewerPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "team" | "team-members" => Ok(ExistingReviewerPolicy::TeamMembers),
            "all" | "all-requested" => Ok(ExistingReviewerPolicy::AllRequested),
            other => Err(Error::Config(format!(
                "unknown count-existing policy: '{other}' (expected: team, all)"
            ))),
        }
    }
}

/// Unvalidated inputs as they arrive from flags or `INPUT_*` variables.
#[derive(Debug, Clone, Default)]
pub struct RawInputs {
    pub reviewers: Option<String>,
    pub team: Option<String>,
    pub token: Option<String>,
    pub count_existing: Option<String>,
    pub seed: Option<String>,
    pub dry_run: Option<String>,
    pub repo: Option<String>,
    pub pr: Option<String>,
}

/// Validated settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub desired_reviewers: usize,
    pub team: TeamSlug,
    pub pull_request: PullRequestRef,
    pub token: Option<String>,
    pub policy: ExistingReviewerPolicy,
    pub seed: Option<u64>,
    pub dry_run: bool,
}

// Actions passes unset optional inputs as empty strings.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

pub fn parse_reviewer_count(value: &str) -> Result<usize> {
    let value = value.trim();
    let count: i64 = value.parse().map_err(|_| {
        Error::Config(format!(
            "reviewers must be a whole number, got: '{value}'"
        ))
    })?;
    usize::try_from(count)
        .map_err(|_| Error::Config(format!("reviewers must not be negative, got: {count}")))
}

pub fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "" | "false" | "0" | "no" | "off" => Ok(false),
        "true" | "1" | "yes" | "on" => Ok(true),
        other => Err(Error::Config(format!(
            "{name} must be true or false, got: '{other}'"
        ))),
    }
}

fn parse_seed(value: &str) -> Result<u64> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("seed must be an unsigned integer, got: '{value}'")))
}

fn parse_pr_number(value: &str) -> Result<u64> {
    match value.trim_start_matches('#').parse::<u64>() {
        Ok(number) if number > 0 => Ok(number),
        _ => Err(Error::Config(format!(
            "pull request number must be a positive integer, got: '{value}'"
        ))),
    }
}

impl Config {
    /// Validates raw inputs and resolves the pull request being worked on.
    ///
    /// Configuration is checked before the runner context so a bad input is
    /// reported even when run outside a pull request.
    pub fn from_inputs(inputs: &RawInputs, runner: &RunnerEnv) -> Result<Self> {
        let desired_reviewers = non_empty(&inputs.reviewers)
            .ok_or_else(|| Error::Config("reviewers is required".to_string()))
            .and_then(parse_reviewer_count)?;

        let team = non_empty(&inputs.team)
            .ok_or_else(|| Error::Config("team is required".to_string()))
            .and_then(TeamSlug::parse)?;

        let policy = non_empty(&inputs.count_existing)
            .map(str::parse::<ExistingReviewerPolicy>)
            .transpose()?
            .unwrap_or_default();

        let seed = non_empty(&inputs.seed).map(parse_seed).transpose()?;

        let dry_run = non_empty(&inputs.dry_run)
            .map(|value| parse_bool("dry-run", value))
            .transpose()?
            .unwrap_or(false);

        let pr_number = non_empty(&inputs.pr).map(parse_pr_number).transpose()?;

        let pull_request = resolve_pull_request(non_empty(&inputs.repo), pr_number, runner)?;

        Ok(Config {
            desired_reviewers,
            team,
            pull_request,
            token: non_empty(&inputs.token).map(str::to_string),
            policy,
            seed,
            dry_run,
        })
    }
}
