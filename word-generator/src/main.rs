use std::io::{self, Write};

use clap::Parser;
use config::{Cli, Command};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing_subscriber::EnvFilter;
use utilities::{input, read_line_action, LineAction};
use wordgen::{render, GenerationTask, InferenceClient, InferenceConfig, PromptStyle, WordGenerator};

mod config;
mod utilities;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.inference.to_config();
    match cli.command.unwrap_or(Command::Interactive) {
        Command::Interactive => interactive(config).await,
        Command::Task { language, execute } => task(config, &language, execute).await,
    }
}

async fn interactive(config: InferenceConfig) -> anyhow::Result<()> {
    let client = InferenceClient::new(config)?;
    let generator = WordGenerator::new(Box::new(client), PromptStyle::Llama3Instruct);
    console_loop(BufReader::new(tokio::io::stdin()).lines(), &generator).await?;
    println!("Goodbye!");
    Ok(())
}

async fn console_loop<R>(mut lines: Lines<R>, generator: &WordGenerator) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let line = tokio::select! {
            line = input(&mut lines, "Enter a language (or 'quit' to exit): ") => line,
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => {
                println!();
                break;
            }
            Err(error) if error.kind() == io::ErrorKind::InvalidData => {
                tracing::warn!(%error, "ignoring unreadable input line");
                println!("Could not read that line, please try again.");
                continue;
            }
            Err(error) => return Err(error.into()),
        };
        let language = match read_line_action(&line) {
            LineAction::Exit => break,
            LineAction::Blank => {
                println!("Please enter a language name.");
                continue;
            }
            LineAction::Language(language) => language,
        };
        tokio::select! {
            result = generate_and_display(generator, language) => {
                if let Err(error) = result {
                    tracing::error!(%error, "failed to display words");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
    }
    Ok(())
}

async fn generate_and_display(generator: &WordGenerator, language: &str) -> anyhow::Result<()> {
    println!("Generating words in {language}...");
    let entries = match generator.generate(language).await {
        Ok(entries) => entries,
        Err(error) => {
            tracing::error!(model = generator.model_id(), %error, "word generation failed");
            Vec::new()
        }
    };
    let mut stdout = io::stdout();
    writeln!(stdout, "{}\n", render(language, &entries))?;
    stdout.flush()?;
    Ok(())
}

async fn task(config: InferenceConfig, language: &str, execute: bool) -> anyhow::Result<()> {
    let task = GenerationTask::new(language, config.model_id.clone());
    if !execute {
        println!("{}", serde_json::to_string_pretty(&task.to_json())?);
        return Ok(());
    }
    let client = InferenceClient::new(config)?;
    let entries = task.run(&client).await?;
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}
