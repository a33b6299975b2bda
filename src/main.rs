use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ci_annotator::{
    annotator,
    config::LOG_ENV,
    context::RunContext,
    github::GithubClient,
    inputs::RawInputs,
    outputs,
};

#[derive(Parser, Debug)]
#[command(name = "ci-annotator", version, about = "Comment on failed CI jobs and keep CI status labels in sync")]
struct Cli {
    /// JSON object mapping job name to the script that fixes it
    #[arg(long, env = "INPUT_FIXES")]
    fixes: Option<String>,
    /// npm, pnpm, yarn or bun; detected from lockfiles when omitted
    #[arg(long, env = "INPUT_PACKAGE_MANAGER")]
    package_manager: Option<String>,
    /// JSON object mapping job name to a workflow file to dispatch when it fails
    #[arg(long, env = "INPUT_AUTO_FIX")]
    auto_fix: Option<String>,
    /// GitHub token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// Verbose logs
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var(LOG_ENV).unwrap_or_else(|_| filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(cli).await {
        outputs::set_failed(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let ctx = RunContext::from_env()?;
    // Building the client makes no request; inputs, token included, are
    // validated by `annotator::run` before anything is sent.
    let client = GithubClient::new(&ctx.api_url, cli.token.clone().unwrap_or_default())?;

    let raw = RawInputs {
        fixes: cli.fixes,
        package_manager: cli.package_manager,
        auto_fix: cli.auto_fix,
        token: cli.token,
    };
    annotator::run(&client, raw, &ctx, outputs::set_output).await?;
    Ok(())
}
