use anyhow::Context;
use autoreview::{
    Config, GitHub, Outcome, RunnerEnv, assign_reviewers, get_github_token, parse_args,
    workflow::{AnnotationLevel, format_annotation, outcome_outputs, write_outputs},
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn handle_clap_help_version(clap_err: &clap::Error) -> ! {
    use clap::error::ErrorKind;
    match clap_err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{clap_err}");
            std::process::exit(0);
        }
        _ => {
            eprint!("{clap_err}");
            std::process::exit(2);
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Surfaces a fatal error as an `::error::` annotation when under Actions.
fn annotate_failure(runner: &RunnerEnv, err: anyhow::Error) -> anyhow::Error {
    if runner.github_actions {
        println!("{}", format_annotation(AnnotationLevel::Error, &format!("{err:#}")));
    }
    err
}

fn report(outcome: &Outcome, runner: &RunnerEnv) -> anyhow::Result<()> {
    match outcome {
        Outcome::AlreadySatisfied { .. } => tracing::info!("{outcome}"),
        Outcome::Requested { shortfall: 0, .. } => tracing::info!("{outcome}"),
        Outcome::Requested { .. } | Outcome::NoneAvailable { .. } => {
            tracing::warn!("{outcome}");
            if runner.github_actions {
                println!(
                    "{}",
                    format_annotation(AnnotationLevel::Warning, &outcome.to_string())
                );
            }
        }
    }

    if let Some(path) = &runner.output_path {
        write_outputs(path, &outcome_outputs(outcome))
            .with_context(|| format!("Failed to write step outputs to '{}'", path.display()))?;
    }

    Ok(())
}

async fn run(config: &Config, runner: &RunnerEnv) -> anyhow::Result<()> {
    let token = get_github_token(config.token.as_deref())
        .context("Failed to obtain GitHub authentication token")?;
    let github = GitHub::new(token).context("Failed to create GitHub client")?;

    let mut rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let outcome = assign_reviewers(config, &github, &mut rng)
        .await
        .with_context(|| format!("Failed to assign reviewers on {}", config.pull_request))?;

    report(&outcome, runner)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let runner = RunnerEnv::from_env();

    let config = match parse_args(std::env::args(), &runner) {
        Ok(config) => config,
        Err(err) => {
            if let Some(clap_err) = err.downcast_ref::<clap::Error>() {
                handle_clap_help_version(clap_err);
            }
            return Err(annotate_failure(&runner, err));
        }
    };

    run(&config, &runner)
        .await
        .map_err(|err| annotate_failure(&runner, err))
}
