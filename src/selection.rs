//! Reviewer selection.
//!
//! Pure functions deciding which team members get requested as reviewers.
//! Nothing here talks to GitHub: callers hand in the team roster and the
//! current review-request state, and get back the logins to request plus
//! the number of slots that could not be filled.

use std::collections::{BTreeSet, HashSet};

use crate::error::{Error, Result};

/// Source of uniformly distributed indices for the shuffle.
///
/// Every [`rand::Rng`] is a `RandomSource`; tests substitute scripted
/// sources to pin down exact draws.
pub trait RandomSource {
    /// Returns an index drawn uniformly from `0..=upper`.
    fn index_at_most(&mut self, upper: usize) -> usize;
}

impl<R: rand::Rng> RandomSource for R {
    fn index_at_most(&mut self, upper: usize) -> usize {
        self.gen_range(0..=upper)
    }
}

/// A member of the configured team at query time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMember {
    pub login: String,
    /// `false` when the member has flagged limited availability.
    pub is_available: bool,
}

impl TeamMember {
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            is_available: true,
        }
    }

    pub fn unavailable(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            is_available: false,
        }
    }
}

/// Logins currently requested as reviewers on a pull request, team members
/// or not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewRequestState {
    pub requested_logins: BTreeSet<String>,
}

impl ReviewRequestState {
    pub fn new<I, S>(logins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            requested_logins: logins.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionRequest {
    pub desired_total: usize,
    pub team_members: Vec<TeamMember>,
    pub existing_team_reviewer_count: usize,
    pub pr_author_login: String,
    pub requested_logins: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionResult {
    pub logins_to_request: BTreeSet<String>,
    /// Slots left unfilled because the eligible pool was too small.
    pub shortfall: usize,
}

impl SelectionResult {
    pub fn is_fulfilled(&self) -> bool {
        self.shortfall == 0
    }
}

/// Filters the roster down to members who may be requested.
///
/// A member is eligible when their login differs from the author (exact,
/// case-sensitive match), is not already requested, and they are available.
/// Input order is kept. Logins repeated in the roster (ignoring case) only
/// appear once.
///
/// Fails with [`Error::InvalidInput`] if any member has a blank login.
pub fn compute_eligible_pool(
    team_members: &[TeamMember],
    pr_author_login: &str,
    requested_logins: &BTreeSet<String>,
) -> Result<Vec<TeamMember>> {
    if let Some(position) = team_members
        .iter()
        .position(|member| member.login.trim().is_empty())
    {
        return Err(Error::InvalidInput(format!(
            "team member at position {position} has an empty login"
        )));
    }

    let mut seen = HashSet::new();
    Ok(team_members
        .iter()
        .filter(|member| member.login != pr_author_login)
        .filter(|member| !requested_logins.contains(&member.login))
        .filter(|member| member.is_available)
        .filter(|member| seen.insert(member.login.to_lowercase()))
        .cloned()
        .collect())
}

pub fn compute_needed_count(desired_total: usize, existing_count: usize) -> usize {
    desired_total.saturating_sub(existing_count)
}

/// Fisher-Yates: walks the slice once from the back, swapping each slot with
/// a uniformly drawn slot at or below it.
pub fn shuffle<T, R>(items: &mut [T], rng: &mut R)
where
    R: RandomSource + ?Sized,
{
    for i in (1..items.len()).rev() {
        let j = rng.index_at_most(i);
        items.swap(i, j);
    }
}

/// Draws `min(count, pool.len())` distinct logins, uniformly over all
/// permutations of the pool.
///
/// `count == 0` never touches the random source.
pub fn select_random<R>(pool: &[TeamMember], count: usize, rng: &mut R) -> Vec<String>
where
    R: RandomSource + ?Sized,
{
    if count == 0 || pool.is_empty() {
        return Vec::new();
    }

    let mut logins: Vec<String> = pool.iter().map(|member| member.login.clone()).collect();
    shuffle(&mut logins, rng);
    logins.truncate(count);
    logins
}

/// Tops the reviewer set up to `desired_total`.
///
/// Never fails. A too-small pool shows up as a non-zero `shortfall`, and a
/// malformed roster is logged and treated as an empty pool.
pub fn select<R>(request: &SelectionRequest, rng: &mut R) -> SelectionResult
where
    R: RandomSource + ?Sized,
{
    let needed = compute_needed_count(
        request.desired_total,
        request.existing_team_reviewer_count,
    );
    if needed == 0 {
        return SelectionResult::default();
    }

    let pool = match compute_eligible_pool(
        &request.team_members,
        &request.pr_author_login,
        &request.requested_logins,
    ) {
        Ok(pool) => pool,
        Err(err) => {
            tracing::warn!(error = %err, "Ignoring malformed team roster");
            Vec::new()
        }
    };

    let chosen = select_random(&pool, needed, rng);
    tracing::debug!(
        needed,
        eligible = pool.len(),
        chosen = chosen.len(),
        "Selected reviewers"
    );

    SelectionResult {
        shortfall: needed.saturating_sub(chosen.len()),
        logins_to_request: chosen.into_iter().collect(),
    }
}
