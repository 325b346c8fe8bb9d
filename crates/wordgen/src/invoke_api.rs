use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::GenerateError;

pub const DEFAULT_MODEL_ID: &str = "meta.llama3-70b-instruct-v1:0";
pub const DEFAULT_REGION: &str = "us-east-1";

/// Decoding parameters sent with every prompt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub max_gen_len: u32,
    pub temperature: f64,
    pub top_p: f64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_gen_len: 512,
            temperature: 0.5,
            top_p: 0.9,
        }
    }
}

/// Body of an invoke-model request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeBody {
    pub prompt: String,
    pub max_gen_len: u32,
    pub temperature: f64,
    pub top_p: f64,
}

impl InvokeBody {
    pub fn new(prompt: impl Into<String>, params: &GenerationParams) -> Self {
        Self {
            prompt: prompt.into(),
            max_gen_len: params.max_gen_len,
            temperature: params.temperature,
            top_p: params.top_p,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct InvokeResponse {
    pub generation: String,
    pub prompt_token_count: Option<u32>,
    pub generation_token_count: Option<u32>,
    pub stop_reason: Option<String>,
}

/// Anything that can turn a prompt into a completion.
#[async_trait]
pub trait CompletionSource: Send + Sync {
    /// Identifier of the model behind this source, used in diagnostics.
    fn model_id(&self) -> &str;

    async fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String, GenerateError>;
}

#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub endpoint: String,
    pub model_id: String,
    pub api_key: Option<String>,
}

impl InferenceConfig {
    pub fn for_region(region: &str) -> Self {
        Self {
            endpoint: format!("https://bedrock-runtime.{region}.amazonaws.com"),
            model_id: DEFAULT_MODEL_ID.to_owned(),
            api_key: None,
        }
    }

    pub fn invoke_url(&self) -> String {
        format!(
            "{}/model/{}/invoke",
            self.endpoint.trim_end_matches('/'),
            self.model_id
        )
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self::for_region(DEFAULT_REGION)
    }
}

/// Calls a hosted text-generation model over HTTP.
pub struct InferenceClient {
    client: reqwest::Client,
    config: InferenceConfig,
}

impl InferenceClient {
    pub fn new(config: InferenceConfig) -> Result<Self, GenerateError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(GenerateError::Client)?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl CompletionSource for InferenceClient {
    fn model_id(&self) -> &str {
        &self.config.model_id
    }

    async fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String, GenerateError> {
        let model = &self.config.model_id;
        tracing::debug!(
            model = %model,
            max_gen_len = params.max_gen_len,
            temperature = params.temperature,
            top_p = params.top_p,
            "invoking model"
        );
        let start = Instant::now();

        let mut req = self
            .client
            .post(self.config.invoke_url())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&InvokeBody::new(prompt, params));
        if let Some(api_key) = &self.config.api_key {
            req = req.bearer_auth(api_key);
        }
        let res = req.send().await.map_err(|source| GenerateError::Fetch {
            model: model.clone(),
            source,
        })?;

        let status = res.status();
        let text = res.text().await.map_err(|source| GenerateError::Fetch {
            model: model.clone(),
            source,
        })?;
        tracing::debug!(
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            bytes = text.len(),
            "model responded"
        );
        if !status.is_success() {
            return Err(GenerateError::Service {
                model: model.clone(),
                status: status.as_u16(),
                body: text,
            });
        }

        let response: InvokeResponse =
            serde_json::from_str(&text).map_err(|source| GenerateError::Deserialize {
                model: model.clone(),
                source,
            })?;
        tracing::debug!(
            prompt_tokens = response.prompt_token_count,
            generation_tokens = response.generation_token_count,
            stop_reason = response.stop_reason.as_deref(),
            "completion received"
        );
        Ok(response.generation)
    }
}
