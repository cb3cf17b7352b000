use anyhow::Context;
use gemini_model_check::{check::check_models, Credentials};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries only the report.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "loaded environment file"),
        Err(err) if err.not_found() => debug!("no .env file found"),
        Err(err) => warn!(error = %err, "failed to load .env file"),
    }

    let credentials = Credentials::from_env();
    let outcome = check_models(&mut std::io::stdout(), credentials)
        .await
        .context("failed to write model report to stdout")?;
    debug!(?outcome, "done");

    Ok(())
}
