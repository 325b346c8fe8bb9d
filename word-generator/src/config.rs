use clap::{Args, Parser, Subcommand};
use wordgen::{InferenceConfig, DEFAULT_MODEL_ID, DEFAULT_REGION};

/// Generate vocabulary words in any language with a hosted language model.
#[derive(Debug, Parser)]
#[command(name = "wordgen", version)]
pub struct Cli {
    #[command(flatten)]
    pub inference: InferenceArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prompt for languages and print generated words (default)
    Interactive,
    /// Print the generation step definition for a workflow engine
    Task {
        /// Language to generate words in
        #[arg(long, value_parser = non_blank)]
        language: String,

        /// Run the step once and print the generated words as JSON
        #[arg(long)]
        execute: bool,
    },
}

#[derive(Debug, Args)]
pub struct InferenceArgs {
    /// Region of the inference endpoint
    #[arg(long, global = true, env = "AWS_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Base URL of the inference endpoint, overrides the regional default
    #[arg(long, global = true, env = "WORDGEN_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Model to invoke
    #[arg(long, global = true, env = "WORDGEN_MODEL", default_value = DEFAULT_MODEL_ID)]
    pub model: String,

    /// Bearer token sent with every request
    #[arg(long, global = true, env = "AWS_BEARER_TOKEN_BEDROCK", hide_env_values = true)]
    pub api_key: Option<String>,
}

impl InferenceArgs {
    pub fn to_config(&self) -> InferenceConfig {
        let mut config = InferenceConfig::for_region(&self.region);
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        config.model_id = self.model.clone();
        config.api_key = self.api_key.clone();
        config
    }
}

fn non_blank(value: &str) -> Result<String, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("language must not be blank".to_owned());
    }
    Ok(value.to_owned())
}
