//! The generation call packaged as a single step of an external workflow
//! engine. The step definition is plain data; the engine decides when and how
//! often it runs.

use serde::Serialize;

use crate::invoke_api::{CompletionSource, GenerationParams, InvokeBody};
use crate::prompt::{build_prompt, PromptStyle};
use crate::{complete_and_extract, GenerateError, WordEntry};

pub const TASK_NAME: &str = "GenerateWords";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationTask {
    pub name: String,
    pub model_id: String,
    pub body: InvokeBody,
}

impl GenerationTask {
    pub fn new(language: &str, model_id: impl Into<String>) -> Self {
        Self {
            name: TASK_NAME.to_owned(),
            model_id: model_id.into(),
            body: InvokeBody::new(
                build_prompt(language, PromptStyle::Plain),
                &GenerationParams::default(),
            ),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "model_id": self.model_id,
            "body": self.body,
        })
    }

    pub fn params(&self) -> GenerationParams {
        GenerationParams {
            max_gen_len: self.body.max_gen_len,
            temperature: self.body.temperature,
            top_p: self.body.top_p,
        }
    }

    /// Executes the step once and hands back the records as data.
    pub async fn run(&self, source: &dyn CompletionSource) -> Result<Vec<WordEntry>, GenerateError> {
        if source.model_id() != self.model_id {
            tracing::warn!(
                task_model = %self.model_id,
                source_model = source.model_id(),
                "running task against a different model"
            );
        }
        complete_and_extract(source, &self.body.prompt, &self.params()).await
    }
}
