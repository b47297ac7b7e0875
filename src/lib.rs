//! Autoreview: random team reviewer assignment for pull requests.
//!
//! Tops up the reviewers requested on a pull request to a desired count by
//! drawing, uniformly at random, from the members of a GitHub team who are
//! not the author, not already requested, and not flagged as having limited
//! availability. The selection itself lives in [`selection`] and is pure;
//! [`assign_reviewers`] wires it to a [`Forge`].

pub mod assign;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod github;
pub mod graphql;
pub mod selection;
pub mod types;
pub mod workflow;

pub use assign::{Outcome, assign_reviewers, count_existing_reviewers};
pub use cli::parse_args;
pub use config::{Config, ExistingReviewerPolicy, RawInputs};
pub use context::RunnerEnv;
pub use error::{Error, Result};
pub use github::{GitHub, get_github_token};
pub use selection::{
    RandomSource, ReviewRequestState, SelectionRequest, SelectionResult, TeamMember,
    compute_eligible_pool, compute_needed_count, select, select_random,
};
pub use types::{Forge, PullRequestInfo, PullRequestRef, Repo, TeamSlug};
