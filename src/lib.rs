use reqwest::{header::CONTENT_TYPE, Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::env;
use std::sync::LazyLock;
use tracing::{debug, warn};

pub mod check;
pub mod models;

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
/// Environment variable overriding the API root.
pub const BASE_URL_VAR: &str = "GEMINI_BASE_URL";

pub static DEFAULT_BASE_URL: LazyLock<String> =
    LazyLock::new(|| String::from("https://generativelanguage.googleapis.com/v1beta/"));
static DEFAULT_CREDENTIALS: LazyLock<Option<Credentials>> = LazyLock::new(Credentials::from_env);

/// Holds the API key and base URL for the Gemini API.
#[derive(Clone, Eq, PartialEq)]
pub struct Credentials {
    api_key: String,
    base_url: String,
}

impl Credentials {
    /// Creates credentials with the given API key and base URL.
    ///
    /// If the base URL is empty, it will use the default.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let base_url = if base_url.is_empty() {
            DEFAULT_BASE_URL.clone()
        } else {
            parse_base_url(base_url)
        };
        Self {
            api_key: api_key.into(),
            base_url,
        }
    }

    /// Fetches the credentials from the ENV variables
    /// GEMINI_API_KEY and GEMINI_BASE_URL.
    ///
    /// Returns `None` when the key is missing or empty. If only the base URL
    /// variable is missing, it will use the default.
    pub fn from_env() -> Option<Credentials> {
        Self::from_lookup(|name| match env::var(name) {
            Ok(value) => Some(value),
            Err(env::VarError::NotPresent) => None,
            Err(env::VarError::NotUnicode(value)) => {
                warn!(variable = name, ?value, "ignoring non-unicode environment variable");
                None
            }
        })
    }

    /// Same as [`Credentials::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Option<Credentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR).filter(|key| !key.is_empty())?;
        let base_url = lookup(BASE_URL_VAR).unwrap_or_default();
        Some(Credentials::new(api_key, base_url))
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// The `error` object of a Gemini error response.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct GeminiError {
    #[serde(default)]
    pub code: u16,
    pub message: String,
    #[serde(default)]
    pub status: String,
}

/// Error envelope returned by the Gemini API, also used for local failures.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct GeminiErrorResponse {
    pub error: GeminiError,
}

impl GeminiErrorResponse {
    fn new(message: String, status: &str) -> GeminiErrorResponse {
        GeminiErrorResponse {
            error: GeminiError {
                code: 0,
                message,
                status: status.to_string(),
            },
        }
    }

    /// Builds an error from a non-success response body.
    fn from_body(status: StatusCode, body: &str) -> GeminiErrorResponse {
        if let Ok(response) = serde_json::from_str::<GeminiErrorResponse>(body) {
            return response;
        }
        let message = if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        } else {
            body.trim().to_string()
        };
        GeminiErrorResponse {
            error: GeminiError {
                code: status.as_u16(),
                message,
                status: "http".to_string(),
            },
        }
    }

    pub fn message(&self) -> &str {
        &self.error.message
    }
}

impl std::fmt::Display for GeminiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.error.message)
    }
}

impl std::error::Error for GeminiErrorResponse {}

pub type ApiResponseOrError<T> = Result<T, GeminiErrorResponse>;

impl From<reqwest::Error> for GeminiErrorResponse {
    fn from(value: reqwest::Error) -> Self {
        GeminiErrorResponse::new(value.to_string(), "reqwest")
    }
}

impl From<std::io::Error> for GeminiErrorResponse {
    fn from(value: std::io::Error) -> Self {
        GeminiErrorResponse::new(value.to_string(), "io")
    }
}

impl From<serde_json::Error> for GeminiErrorResponse {
    fn from(value: serde_json::Error) -> Self {
        GeminiErrorResponse::new(value.to_string(), "decode")
    }
}

fn builder_error(err: impl std::fmt::Display) -> GeminiErrorResponse {
    GeminiErrorResponse::new(err.to_string(), "builder")
}

async fn gemini_request_json<F, T>(
    method: Method,
    route: &str,
    builder: F,
    credentials_opt: Option<Credentials>,
) -> ApiResponseOrError<T>
where
    F: FnOnce(RequestBuilder) -> RequestBuilder,
    T: DeserializeOwned,
{
    let response = gemini_request(method, route, builder, credentials_opt).await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!(%status, route, "request failed");
        return Err(GeminiErrorResponse::from_body(status, &body));
    }

    Ok(serde_json::from_str(&body)?)
}

async fn gemini_request<F>(
    method: Method,
    route: &str,
    builder: F,
    credentials_opt: Option<Credentials>,
) -> ApiResponseOrError<Response>
where
    F: FnOnce(RequestBuilder) -> RequestBuilder,
{
    let credentials = match credentials_opt {
        Some(credentials) => credentials,
        None => DEFAULT_CREDENTIALS.clone().ok_or_else(|| {
            GeminiErrorResponse::new(format!("{API_KEY_VAR} is not set"), "credentials")
        })?,
    };
    debug!(%method, route, base_url = credentials.base_url(), "sending request");

    let client = Client::new();
    let mut request = client.request(method, format!("{}{route}", credentials.base_url));

    request = builder(request);

    let response = request
        .header("x-goog-api-key", credentials.api_key)
        .header(CONTENT_TYPE, "application/json")
        .send()
        .await?;

    Ok(response)
}

fn parse_base_url(mut value: String) -> String {
    if !value.ends_with('/') {
        value += "/";
    }
    value
}
