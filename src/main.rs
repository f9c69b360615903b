use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use std::convert::Infallible;
use std::process::ExitCode;
use tracing::error;

use statusbot::config::{Cli, WebhookSettings, load_sites};
use statusbot::notifier::SlackNotifier;
use statusbot::prober::HttpProber;
use statusbot::watcher::WatchLoop;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    statusbot::init_tracing();
    let cli = Cli::parse();

    // Checked before anything is sent; the help text is meant for a human.
    let webhook = match WebhookSettings::from_env() {
        Ok(webhook) => webhook,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli, webhook).await {
        Ok(never) => match never {},
        Err(err) => {
            error!("statusbot stopped: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, webhook: WebhookSettings) -> anyhow::Result<Infallible> {
    let sites = load_sites(&cli.file)
        .with_context(|| format!("loading sites from {}", cli.file.display()))?;

    let notifier = SlackNotifier::new(webhook.url).context("building webhook client")?;
    let prober = HttpProber::new(cli.probe_timeout()).context("building probe client")?;

    let mut watcher = WatchLoop::new(sites, prober, notifier, cli.interval(), cli.chan.clone());
    let never = watcher.start().await?;
    Ok(never)
}
