use anyhow::Result;
use clap::Parser;

use crate::{
    config::{Config, RawInputs},
    context::RunnerEnv,
};

const BUILD_INFO_HUMAN: &str = env!("BUILD_INFO_HUMAN");

// Every option falls back to the matching `INPUT_*` variable so the binary
// can run unchanged as an Actions step.
#[derive(Parser, Default, Debug)]
#[command(
    name = "autoreview",
    about = "Top up the reviewers on a pull request by drawing random members of a GitHub team"
)]
#[command(long_version = BUILD_INFO_HUMAN)]
struct CliArgs {
    /// Total number of reviewers the pull request should have
    #[arg(short = 'n', long, env = "INPUT_REVIEWERS", value_name = "COUNT")]
    pub reviewers: Option<String>,

    /// Team to draw reviewers from
    #[arg(short = 't', long, env = "INPUT_TEAM", value_name = "ORG/TEAM-SLUG")]
    pub team: Option<String>,

    /// GitHub token (falls back to GITHUB_TOKEN, GH_TOKEN, then `gh auth token`)
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Which requested reviewers count toward the total: team or all
    #[arg(
        long = "count-existing",
        env = "INPUT_COUNT_EXISTING",
        value_name = "POLICY"
    )]
    pub count_existing: Option<String>,

    /// Seed for reproducible selection
    #[arg(long, env = "INPUT_SEED", value_name = "SEED")]
    pub seed: Option<String>,

    /// Report the selection without requesting anyone
    #[arg(
        long = "dry-run",
        env = "INPUT_DRY_RUN",
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub dry_run: Option<String>,

    /// Repository in format 'owner/repo' (defaults to GITHUB_REPOSITORY)
    #[arg(short = 'r', long, value_name = "OWNER/REPO")]
    pub repo: Option<String>,

    /// Pull request number (defaults to the triggering event's)
    #[arg(short = 'p', long, value_name = "NUMBER")]
    pub pr: Option<String>,
}

impl From<CliArgs> for RawInputs {
    fn from(args: CliArgs) -> Self {
        RawInputs {
            reviewers: args.reviewers,
            team: args.team,
            token: args.token,
            count_existing: args.count_existing,
            seed: args.seed,
            dry_run: args.dry_run,
            repo: args.repo,
            pr: args.pr,
        }
    }
}

/// Parses command-line arguments into a validated [`Config`].
///
/// Flags not given on the command line are read from `INPUT_*` variables;
/// the pull request comes from `--repo`/`--pr` or the runner context.
pub fn parse_args<I, T>(args: I, runner: &RunnerEnv) -> Result<Config>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = CliArgs::try_parse_from(args)?;
    let config = Config::from_inputs(&RawInputs::from(cli), runner)?;
    Ok(config)
}
