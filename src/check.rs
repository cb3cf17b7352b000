//! # Model check
//!
//! Lists every model visible to an API key that supports `generateContent`
//! and prints a short report, with hints when nothing usable is found.
//!
//! Every API failure is reported on the output and is never returned as an
//! error; only a failure to write the report itself is.
//!
//! ```no_run
//! use gemini_model_check::{check::check_models, Credentials};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let outcome = check_models(&mut std::io::stdout(), Credentials::from_env()).await?;
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```

use crate::models::ModelList;
use crate::{Credentials, GeminiErrorResponse, API_KEY_VAR};
use futures_util::StreamExt;
use std::io::{self, Write};
use tracing::{debug, info};

const SEPARATOR: &str = "---";

/// How a run of [`check_models`] ended.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum CheckOutcome {
    /// No API key was configured; nothing was requested.
    MissingKey,
    /// The listing completed with `count` usable models.
    Listed { count: usize },
    /// The API call failed with the given message.
    Failed { message: String },
}

/// Runs the model check and writes the report to `out`.
pub async fn check_models<W: Write>(
    out: &mut W,
    credentials: Option<Credentials>,
) -> io::Result<CheckOutcome> {
    let Some(credentials) = credentials else {
        writeln!(out, "Error: {API_KEY_VAR} not found in .env file.")?;
        return Ok(CheckOutcome::MissingKey);
    };

    writeln!(out, "Finding available models for your API key...")?;
    writeln!(out, "{SEPARATOR}")?;

    let models = ModelList::stream(Some(credentials), None);
    futures_util::pin_mut!(models);

    let mut count = 0;
    while let Some(model) = models.next().await {
        let model = match model {
            Ok(model) => model,
            Err(err) => return report_failure(out, &err),
        };
        if model.supports_generate_content() {
            writeln!(out, "Model name: {}", model.name)?;
            count += 1;
        } else {
            debug!(model = %model.name, "skipping model without generateContent");
        }
    }

    writeln!(out, "{SEPARATOR}")?;
    writeln!(out, "Found {count} usable models.")?;

    if count == 0 {
        writeln!(out)?;
        writeln!(
            out,
            "CRITICAL: No models are available. Please check your Google AI Studio or Google Cloud project settings."
        )?;
        writeln!(
            out,
            "1. Make sure the 'Generative Language API' or 'Vertex AI' is enabled."
        )?;
        writeln!(out, "2. Make sure a billing account is attached to your project.")?;
    }

    info!(count, "model check finished");
    Ok(CheckOutcome::Listed { count })
}

// Any API failure gets the same authentication hint.
fn report_failure<W: Write>(out: &mut W, err: &GeminiErrorResponse) -> io::Result<CheckOutcome> {
    debug!(code = err.error.code, status = %err.error.status, "model listing failed");
    writeln!(out, "An error occurred: {err}")?;
    writeln!(
        out,
        "This might be an authentication error. Is your API key correct?"
    )?;
    Ok(CheckOutcome::Failed {
        message: err.message().to_string(),
    })
}
