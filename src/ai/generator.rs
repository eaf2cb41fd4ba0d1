use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{GenerationConfig, ModelConfig};
use crate::error::{AppError, Result};

/// One call into the encoder-decoder model: the already-prefixed input and
/// the decoding parameters to run it with.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub text: String,
    pub params: GenerationConfig,
}

/// Anything that can turn a prepared request into decoded model output.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, request: &GenerationRequest) -> impl Future<Output = Result<String>> + Send;

    fn model_name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
    options: InferenceOptions,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_length: usize,
    min_length: usize,
    num_beams: usize,
    temperature: f32,
    top_p: f32,
    no_repeat_ngram_size: usize,
    early_stopping: bool,
    /// Lets the pipeline tokenizer cut inputs beyond the model's window.
    truncation: bool,
}

impl From<&GenerationConfig> for InferenceParameters {
    fn from(params: &GenerationConfig) -> Self {
        Self {
            max_length: params.max_output_length,
            min_length: params.min_output_length,
            num_beams: params.num_beams,
            temperature: params.temperature,
            top_p: params.top_p,
            no_repeat_ngram_size: params.no_repeat_ngram_size,
            early_stopping: params.early_stopping,
            truncation: true,
        }
    }
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    #[serde(alias = "generated_text")]
    summary_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Batch(Vec<GeneratedText>),
    Single(GeneratedText),
}

impl InferenceResponse {
    fn into_text(self) -> Option<String> {
        match self {
            Self::Batch(items) => items.into_iter().next().map(|g| g.summary_text),
            Self::Single(item) => Some(item.summary_text),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Text2text generation over a Hugging Face style inference endpoint.
pub struct HttpGenerator {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
    model_name: String,
}

impl HttpGenerator {
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_token: config.api_token.clone(),
            model_name: config.name.clone(),
        })
    }
}

impl TextGenerator for HttpGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let body = InferenceRequest {
            inputs: &request.text,
            parameters: InferenceParameters::from(&request.params),
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        let mut builder = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .json(&body);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        tracing::debug!(
            "Requesting generation from {} ({} input chars)",
            self.endpoint,
            request.text.chars().count()
        );
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            let message = serde_json::from_str::<ErrorBody>(&error_text)
                .map(|body| body.error)
                .unwrap_or(error_text);
            return Err(AppError::Model(format!("{status}: {message}")));
        }

        let body = response.text().await?;
        let parsed: InferenceResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::Model(format!("unexpected response: {e}")))?;

        parsed
            .into_text()
            .ok_or_else(|| AppError::Model("response contained no generations".to_string()))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
