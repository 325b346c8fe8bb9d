//! Generates vocabulary words in a requested language with a hosted
//! text-generation model.

mod entry;
mod extract;
mod invoke_api;
mod present;
mod prompt;
mod task;

pub use entry::{WordEntry, MISSING_DESCRIPTION, MISSING_WORD};
pub use extract::{extract_entries, try_extract_entries, ExtractError};
pub use invoke_api::{
    CompletionSource, GenerationParams, InferenceClient, InferenceConfig, InvokeBody,
    DEFAULT_MODEL_ID, DEFAULT_REGION,
};
pub use present::render;
pub use prompt::{build_prompt, instruction, PromptStyle, WORD_COUNT};
pub use task::{GenerationTask, TASK_NAME};

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("failed to build the HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("failed to reach model {model}: {source}")]
    Fetch {
        model: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("model {model} rejected the request with HTTP {status}: {body}")]
    Service {
        model: String,
        status: u16,
        body: String,
    },
    #[error("model {model} returned an unreadable response: {source}")]
    Deserialize {
        model: String,
        #[source]
        source: serde_json::Error,
    },
}

pub struct WordGenerator {
    source: Box<dyn CompletionSource>,
    style: PromptStyle,
    params: GenerationParams,
}

impl WordGenerator {
    pub fn new(source: Box<dyn CompletionSource>, style: PromptStyle) -> Self {
        Self {
            source,
            style,
            params: GenerationParams::default(),
        }
    }

    pub fn model_id(&self) -> &str {
        self.source.model_id()
    }

    /// Asks the model for words in `language`. Completions that cannot be
    /// parsed produce an empty list; only failed calls are errors.
    pub async fn generate(&self, language: &str) -> Result<Vec<WordEntry>, GenerateError> {
        let prompt = build_prompt(language, self.style);
        complete_and_extract(self.source.as_ref(), &prompt, &self.params).await
    }
}

pub(crate) async fn complete_and_extract(
    source: &dyn CompletionSource,
    prompt: &str,
    params: &GenerationParams,
) -> Result<Vec<WordEntry>, GenerateError> {
    let completion = source.complete(prompt, params).await?;
    let entries = extract_entries(completion.trim());
    let nonconforming = entries.iter().filter(|entry| !entry.is_conforming()).count();
    if nonconforming > 0 {
        tracing::debug!(nonconforming, total = entries.len(), "model ignored the word constraints");
    }
    Ok(entries)
}
