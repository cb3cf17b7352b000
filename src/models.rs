//! # Models API
//!
//! This module provides a Rust interface to the Gemini Models API, which allows you to
//! [list available models](https://ai.google.dev/api/models#method:-models.list) and
//! [get information about specific models](https://ai.google.dev/api/models#method:-models.get).
//!
//! ## Key Features
//!
//! - List one page of models, or stream every page in provider order
//! - Get detailed information about a specific model
//! - Check which generation methods a model supports
//!
//! ## Basic Usage
//!
//! ```no_run
//! use futures_util::TryStreamExt;
//! use gemini_model_check::{models::*, Credentials};
//!
//! #[tokio::main]
//! async fn main() {
//!     let credentials = Credentials::from_env();
//!
//!     // Walk every page of models
//!     let models: Vec<Model> = ModelList::stream(credentials.clone(), None)
//!         .try_collect()
//!         .await
//!         .unwrap();
//!
//!     println!("Available models: {:?}", models);
//!
//!     // Get a specific model
//!     let model = Model::builder("gemini-2.0-flash")
//!         .credentials(credentials.unwrap())
//!         .create()
//!         .await
//!         .unwrap();
//!
//!     println!("Model details: {:?}", model);
//! }
//! ```

use crate::{
    builder_error, gemini_request_json, ApiResponseOrError, Credentials, GeminiErrorResponse,
};
use derive_builder::Builder;
use futures_util::{stream, Stream, TryStreamExt};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Generation method a model must support to be used for content generation.
pub const GENERATE_CONTENT: &str = "generateContent";

/// A model available through the Gemini API.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Resource name, e.g. `models/gemini-2.0-flash`
    pub name: String,
    pub base_model_id: Option<String>,
    pub version: Option<String>,
    /// A human-readable name for the model
    pub display_name: Option<String>,
    pub description: Option<String>,
    /// Maximum number of input tokens allowed for this model
    pub input_token_limit: Option<u32>,
    /// Maximum number of output tokens available for this model
    pub output_token_limit: Option<u32>,
    /// API methods this model can be called with, e.g. `generateContent`
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
    pub temperature: Option<f32>,
    pub max_temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub top_k: Option<u32>,
    /// Whether the model supports thinking
    pub thinking: Option<bool>,
}

impl Model {
    /// Returns true if `method` is one of the model's supported generation methods.
    pub fn supports(&self, method: &str) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|supported| supported == method)
    }

    pub fn supports_generate_content(&self) -> bool {
        self.supports(GENERATE_CONTENT)
    }
}

/// One page of the List Models response.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelList {
    /// Models on this page
    #[serde(default)]
    pub models: Vec<Model>,
    /// Token for the next page; absent or empty on the last page
    pub next_page_token: Option<String>,
}

/// Request parameters for listing models.
#[derive(Serialize, Builder, Debug, Clone)]
#[builder(derive(Clone, Debug))]
#[builder(pattern = "owned")]
#[builder(name = "ModelListBuilder")]
#[builder(setter(strip_option, into))]
#[serde(rename_all = "camelCase")]
pub struct ModelListRequest {
    /// Maximum number of models per page
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,

    /// Token from a previous page's `next_page_token`
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,

    /// Credentials for authentication (not serialized)
    #[serde(skip_serializing)]
    #[builder(default)]
    pub credentials: Option<Credentials>,
}

/// Request parameters for getting a specific model.
#[derive(Serialize, Builder, Debug, Clone)]
#[builder(derive(Clone, Debug))]
#[builder(pattern = "owned")]
#[builder(name = "ModelBuilder")]
#[builder(setter(strip_option, into))]
pub struct ModelRequest {
    /// Model resource name (`models/...`) or bare model id
    pub name: String,

    /// Credentials for authentication (not serialized)
    #[serde(skip_serializing)]
    #[builder(default)]
    pub credentials: Option<Credentials>,
}

impl ModelList {
    /// Creates a builder for listing a single page of models.
    pub fn builder() -> ModelListBuilder {
        ModelListBuilder::create_empty()
    }

    /// Fetches one page of models with the given request parameters.
    pub async fn create(request: ModelListRequest) -> ApiResponseOrError<Self> {
        let credentials_opt = request.credentials.clone();

        gemini_request_json(
            Method::GET,
            "models",
            |r| r.query(&request),
            credentials_opt,
        )
        .await
    }

    /// Streams every model visible to the credentials, following
    /// `nextPageToken` until the last page. The first error ends the stream.
    pub fn stream(
        credentials: Option<Credentials>,
        page_size: Option<u32>,
    ) -> impl Stream<Item = ApiResponseOrError<Model>> {
        // `None` once the last page has been fetched.
        let first: Option<Option<String>> = Some(None);

        stream::try_unfold(first, move |cursor| {
            let credentials = credentials.clone();
            async move {
                let Some(page_token) = cursor else {
                    return Ok::<_, GeminiErrorResponse>(None);
                };
                let page = ModelList::create(ModelListRequest {
                    page_size,
                    page_token,
                    credentials,
                })
                .await?;
                debug!(
                    models = page.models.len(),
                    has_next = page.next_page_token.is_some(),
                    "fetched model page"
                );

                let next = page
                    .next_page_token
                    .filter(|token| !token.is_empty())
                    .map(Some);
                let models = page.models.into_iter().map(Ok::<_, GeminiErrorResponse>);
                Ok(Some((stream::iter(models), next)))
            }
        })
        .try_flatten()
    }
}

impl Model {
    /// Creates a builder for getting a specific model.
    pub fn builder(name: impl Into<String>) -> ModelBuilder {
        ModelBuilder::create_empty().name(name)
    }

    /// Gets information about a specific model.
    pub async fn create(request: ModelRequest) -> ApiResponseOrError<Self> {
        let credentials_opt = request.credentials.clone();
        let route = model_route(&request.name);

        gemini_request_json(Method::GET, &route, |r| r, credentials_opt).await
    }
}

fn model_route(name: &str) -> String {
    if name.contains('/') {
        name.to_string()
    } else {
        format!("models/{name}")
    }
}

// Builder convenience methods
impl ModelListBuilder {
    /// Builds the request and fetches one page of models.
    pub async fn create(self) -> ApiResponseOrError<ModelList> {
        let request = self.build().map_err(builder_error)?;
        ModelList::create(request).await
    }
}

impl ModelBuilder {
    /// Builds the request and fetches the model.
    pub async fn create(self) -> ApiResponseOrError<Model> {
        let request = self.build().map_err(builder_error)?;
        Model::create(request).await
    }
}
