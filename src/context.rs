//! Where the run happens: the GitHub Actions runner environment and the pull
//! request it was triggered for.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{
    error::{Error, Result},
    types::{PullRequestRef, Repo},
};

const PULL_REQUEST_EVENTS: &[&str] = &["pull_request", "pull_request_target"];

/// Snapshot of the runner variables this tool reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerEnv {
    pub github_actions: bool,
    pub repository: Option<String>,
    pub event_name: Option<String>,
    pub event_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
}

impl RunnerEnv {
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|value| !value.is_empty());

        Self {
            github_actions: var("GITHUB_ACTIONS").is_some_and(|value| value == "true"),
            repository: var("GITHUB_REPOSITORY"),
            event_name: var("GITHUB_EVENT_NAME"),
            event_path: var("GITHUB_EVENT_PATH").map(PathBuf::from),
            output_path: var("GITHUB_OUTPUT").map(PathBuf::from),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    pull_request: Option<EventPullRequest>,
}

#[derive(Debug, Deserialize)]
struct EventPullRequest {
    number: u64,
}

/// Extracts `pull_request.number` from a webhook event payload.
pub fn parse_event_payload(content: &str) -> Result<u64> {
    let payload: EventPayload = serde_json::from_str(content)
        .map_err(|err| Error::Context(format!("event payload is not valid JSON: {err}")))?;
    payload
        .pull_request
        .map(|pr| pr.number)
        .ok_or_else(|| Error::Context("event payload has no pull_request".to_string()))
}

fn read_event_number(path: &Path) -> Result<u64> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        Error::Context(format!(
            "cannot read event payload '{}': {err}",
            path.display()
        ))
    })?;
    parse_event_payload(&content)
}

/// Picks the pull request to work on.
///
/// Explicit `repo`/`pr` values win; anything missing comes from the
/// runner, which then has to be handling a pull request event.
pub fn resolve_pull_request(
    repo: Option<&str>,
    pr: Option<u64>,
    runner: &RunnerEnv,
) -> Result<PullRequestRef> {
    let repo = match repo {
        Some(repo) => Repo::parse(repo)?,
        None => {
            let repository = runner.repository.as_deref().ok_or_else(|| {
                Error::Context("GITHUB_REPOSITORY is not set and --repo was not given".to_string())
            })?;
            Repo::parse(repository).map_err(|_| {
                Error::Context(format!("GITHUB_REPOSITORY is malformed: '{repository}'"))
            })?
        }
    };

    let number = match pr {
        Some(number) => number,
        None => {
            let event_name = runner.event_name.as_deref().unwrap_or("<none>");
            if !PULL_REQUEST_EVENTS.contains(&event_name) {
                return Err(Error::Context(format!(
                    "event '{event_name}' is not a pull request event and --pr was not given"
                )));
            }
            let path = runner
                .event_path
                .as_deref()
                .ok_or_else(|| Error::Context("GITHUB_EVENT_PATH is not set".to_string()))?;
            read_event_number(path)?
        }
    };

    Ok(PullRequestRef { repo, number })
}
