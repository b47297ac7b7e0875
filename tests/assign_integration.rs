use std::{collections::BTreeSet, sync::Mutex};

use async_trait::async_trait;
use autoreview::{
    Config, Error, ExistingReviewerPolicy, Forge, Outcome, PullRequestInfo, PullRequestRef, Repo,
    ReviewRequestState, RunnerEnv, TeamMember, TeamSlug, assign_reviewers, parse_args,
};
use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// In-memory forge recording every review request it receives.
struct MockHub {
    author: String,
    requested: Vec<String>,
    roster: Vec<TeamMember>,
    fail_roster: bool,
    fail_request: bool,
    requests: Mutex<Vec<(PullRequestRef, Vec<String>)>>,
}

impl MockHub {
    fn new(author: &str, requested: &[&str], roster: Vec<TeamMember>) -> Self {
        Self {
            author: author.to_string(),
            requested: requested.iter().map(|login| login.to_string()).collect(),
            roster,
            fail_roster: false,
            fail_request: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn recorded(&self) -> Vec<(PullRequestRef, Vec<String>)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Forge for MockHub {
    async fn fetch_pull_request(
        &self,
        _pr: &PullRequestRef,
    ) -> autoreview::Result<PullRequestInfo> {
        Ok(PullRequestInfo {
            author_login: self.author.clone(),
            review_requests: ReviewRequestState::new(self.requested.clone()),
        })
    }

    async fn fetch_team_members(&self, team: &TeamSlug) -> autoreview::Result<Vec<TeamMember>> {
        if self.fail_roster {
            return Err(Error::ApiResponse(format!("team '{team}' not found")));
        }
        Ok(self.roster.clone())
    }

    async fn request_reviewers(
        &self,
        pr: &PullRequestRef,
        logins: &[String],
    ) -> autoreview::Result<()> {
        if self.fail_request {
            return Err(Error::ApiResponse(
                "Reviews may only be requested from collaborators".to_string(),
            ));
        }
        self.requests
            .lock()
            .unwrap()
            .push((pr.clone(), logins.to_vec()));
        Ok(())
    }
}

fn test_pr() -> PullRequestRef {
    PullRequestRef {
        repo: Repo::new("owner", "repo").unwrap(),
        number: 42,
    }
}

fn test_config(desired_reviewers: usize) -> Config {
    Config {
        desired_reviewers,
        team: TeamSlug::parse("acme/reviewers").unwrap(),
        pull_request: test_pr(),
        token: None,
        policy: ExistingReviewerPolicy::TeamMembers,
        seed: None,
        dry_run: false,
    }
}

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(1234)
}

fn set(logins: &[String]) -> BTreeSet<String> {
    logins.iter().cloned().collect()
}

#[tokio::test]
async fn test_partial_fulfillment_requests_everyone_eligible() {
    let hub = MockHub::new(
        "dave",
        &[],
        vec![
            TeamMember::new("alice"),
            TeamMember::new("bob"),
            TeamMember::unavailable("carol"),
        ],
    );

    let outcome = assign_reviewers(&test_config(3), &hub, &mut rng())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::Requested {
            logins: vec!["alice".to_string(), "bob".to_string()],
            shortfall: 1,
            dry_run: false,
        }
    );
    assert_eq!(
        hub.recorded(),
        vec![(test_pr(), vec!["alice".to_string(), "bob".to_string()])]
    );
}

#[tokio::test]
async fn test_tops_up_to_desired_count() {
    let hub = MockHub::new(
        "dave",
        &["bob"],
        vec![
            TeamMember::new("alice"),
            TeamMember::new("bob"),
            TeamMember::new("carol"),
            TeamMember::new("erin"),
            TeamMember::new("dave"),
        ],
    );

    let outcome = assign_reviewers(&test_config(3), &hub, &mut rng())
        .await
        .unwrap();

    let logins = set(outcome.requested_logins());
    assert_eq!(logins.len(), 2);
    assert_eq!(outcome.shortfall(), 0);
    assert!(!logins.contains("bob"));
    assert!(!logins.contains("dave"));
    assert!(logins.is_subset(&set(&[
        "alice".to_string(),
        "carol".to_string(),
        "erin".to_string()
    ])));

    let recorded = hub.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(set(&recorded[0].1), logins);
}

#[tokio::test]
async fn test_already_satisfied_makes_no_request() {
    let hub = MockHub::new(
        "dave",
        &["alice", "bob"],
        vec![
            TeamMember::new("alice"),
            TeamMember::new("bob"),
            TeamMember::new("carol"),
        ],
    );

    let outcome = assign_reviewers(&test_config(2), &hub, &mut rng())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::AlreadySatisfied {
            desired: 2,
            existing: 2
        }
    );
    assert!(hub.recorded().is_empty());
}

#[tokio::test]
async fn test_outside_reviewers_count_only_under_all_policy() {
    let roster = vec![TeamMember::new("alice"), TeamMember::new("bob")];

    let hub = MockHub::new("dave", &["outsider"], roster.clone());
    let outcome = assign_reviewers(&test_config(1), &hub, &mut rng())
        .await
        .unwrap();
    assert_eq!(outcome.requested_logins().len(), 1);
    assert_eq!(hub.recorded().len(), 1);

    let hub = MockHub::new("dave", &["outsider"], roster);
    let config = Config {
        policy: ExistingReviewerPolicy::AllRequested,
        ..test_config(1)
    };
    let outcome = assign_reviewers(&config, &hub, &mut rng()).await.unwrap();
    assert_eq!(
        outcome,
        Outcome::AlreadySatisfied {
            desired: 1,
            existing: 1
        }
    );
    assert!(hub.recorded().is_empty());
}

#[tokio::test]
async fn test_dry_run_does_not_request() {
    let hub = MockHub::new("dave", &[], vec![TeamMember::new("alice")]);
    let config = Config {
        dry_run: true,
        ..test_config(1)
    };

    let outcome = assign_reviewers(&config, &hub, &mut rng()).await.unwrap();

    assert_eq!(
        outcome,
        Outcome::Requested {
            logins: vec!["alice".to_string()],
            shortfall: 0,
            dry_run: true,
        }
    );
    assert!(hub.recorded().is_empty());
}

#[tokio::test]
async fn test_author_as_only_member_leaves_shortfall() {
    let hub = MockHub::new("alice", &[], vec![TeamMember::new("alice")]);

    let outcome = assign_reviewers(&test_config(1), &hub, &mut rng())
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::NoneAvailable { shortfall: 1 });
    assert!(hub.recorded().is_empty());
}

#[tokio::test]
async fn test_same_seed_same_reviewers() {
    let roster: Vec<TeamMember> = ["alice", "bob", "carol", "erin", "frank", "grace"]
        .into_iter()
        .map(TeamMember::new)
        .collect();

    let first = assign_reviewers(
        &test_config(2),
        &MockHub::new("dave", &[], roster.clone()),
        &mut ChaCha8Rng::seed_from_u64(7),
    )
    .await
    .unwrap();
    let second = assign_reviewers(
        &test_config(2),
        &MockHub::new("dave", &[], roster),
        &mut ChaCha8Rng::seed_from_u64(7),
    )
    .await
    .unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_roster_failure_aborts_run() {
    let mut hub = MockHub::new("dave", &[], vec![TeamMember::new("alice")]);
    hub.fail_roster = true;

    let err = assign_reviewers(&test_config(1), &hub, &mut rng())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ApiResponse(_)));
    assert!(err.to_string().contains("acme/reviewers"));
    assert!(hub.recorded().is_empty());
}

#[tokio::test]
async fn test_request_failure_is_surfaced() {
    let mut hub = MockHub::new("dave", &[], vec![TeamMember::new("alice")]);
    hub.fail_request = true;

    let err = assign_reviewers(&test_config(1), &hub, &mut rng())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("collaborators"));
}

#[test]
fn test_parse_args_builds_config() {
    let config = parse_args(
        [
            "autoreview",
            "--reviewers",
            "2",
            "--team",
            "acme/reviewers",
            "--repo",
            "owner/repo",
            "--pr",
            "42",
            "--seed",
            "9",
            "--count-existing",
            "all",
        ],
        &RunnerEnv::default(),
    )
    .unwrap();

    assert_eq!(
        config,
        Config {
            seed: Some(9),
            policy: ExistingReviewerPolicy::AllRequested,
            ..test_config(2)
        }
    );
}

#[test]
fn test_parse_args_dry_run_flag() {
    let config = parse_args(
        [
            "autoreview",
            "-n",
            "1",
            "-t",
            "acme/reviewers",
            "-r",
            "owner/repo",
            "-p",
            "42",
            "--dry-run",
        ],
        &RunnerEnv::default(),
    )
    .unwrap();

    assert!(config.dry_run);
}

#[test]
fn test_parse_args_rejects_malformed_team() {
    let err = parse_args(
        [
            "autoreview",
            "--reviewers",
            "2",
            "--team",
            "acme/reviewers/extra",
            "--repo",
            "owner/repo",
            "--pr",
            "42",
        ],
        &RunnerEnv::default(),
    )
    .unwrap_err();

    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Config(_))));
}

#[test]
fn test_parse_args_rejects_negative_count() {
    let err = parse_args(
        [
            "autoreview",
            "--reviewers=-1",
            "--team",
            "acme/reviewers",
            "--repo",
            "owner/repo",
            "--pr",
            "42",
        ],
        &RunnerEnv::default(),
    )
    .unwrap_err();

    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Config(_))));
}

#[test]
fn test_parse_args_outside_pull_request() {
    let runner = RunnerEnv {
        repository: Some("owner/repo".to_string()),
        event_name: Some("push".to_string()),
        ..Default::default()
    };

    let err = parse_args(
        ["autoreview", "--reviewers", "1", "--team", "acme/reviewers"],
        &runner,
    )
    .unwrap_err();

    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Context(_))));
}
