use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use legalease_core::config::AppConfig;
use legalease_core::context::PipelineContext;
use legalease_core::language::{detect_language, sample_queries, Language};
use legalease_core::orchestrator::{QueryOrchestrator, QueryRequest};
use legalease_core::telemetry::init_tracing;

#[derive(Parser)]
#[command(name = "legalease", version, about = "Multilingual legal question answering")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask a legal question by text or recorded audio
    Ask {
        #[arg(long)]
        text: Option<String>,
        /// WAV recording; used instead of --text when both are given
        #[arg(long)]
        audio_file: Option<PathBuf>,
        /// Question language; detected from the text when omitted
        #[arg(long)]
        source: Option<String>,
        /// Answer language; defaults to the question language
        #[arg(long)]
        target: Option<String>,
    },
    /// Translate one or more texts
    Translate {
        #[arg(long, default_value = "en")]
        source: String,
        #[arg(long)]
        target: String,
        #[arg(required = true)]
        texts: Vec<String>,
    },
    /// Synthesize speech for a text
    Speak {
        #[arg(long, default_value = "en")]
        language: String,
        /// Writes the decoded audio here instead of printing the data URI
        #[arg(long)]
        output: Option<PathBuf>,
        text: String,
    },
    /// Probe every configured service
    Health,
    /// List example questions for a language
    Samples {
        #[arg(long, default_value = "en")]
        language: String,
    },
}

fn parse_language(code: &str) -> Result<Language> {
    Language::from_code(code).ok_or_else(|| anyhow!("unsupported language code: {code}"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = AppConfig::load().context("failed to load configuration")?;
    let context = Arc::new(PipelineContext::new(config));
    let orchestrator = QueryOrchestrator::new(context);

    match cli.command {
        Command::Ask {
            text,
            audio_file,
            source,
            target,
        } => {
            let audio_base64 = match audio_file {
                Some(path) => {
                    let bytes = std::fs::read(&path)
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    Some(STANDARD.encode(bytes))
                }
                None => None,
            };
            let source = match source {
                Some(code) => code,
                None => detect_language(text.as_deref().unwrap_or_default())
                    .code()
                    .to_string(),
            };
            let target = target.unwrap_or_else(|| source.clone());

            let result = orchestrator
                .run(QueryRequest {
                    text_query: text,
                    audio_base64,
                    source_lang_code: source,
                    target_lang_code: target,
                })
                .await;
            print_json(&result)
        }
        Command::Translate {
            source,
            target,
            texts,
        } => {
            let results = orchestrator
                .batch_translate(&texts, parse_language(&source)?, parse_language(&target)?)
                .await;
            print_json(&results)
        }
        Command::Speak {
            language,
            output,
            text,
        } => {
            let outcome = orchestrator.speak(&text, parse_language(&language)?).await;
            match (output, outcome.data()) {
                (Some(path), Some(clip)) => {
                    let payload = clip
                        .uri
                        .split_once("base64,")
                        .map(|(_, payload)| payload)
                        .ok_or_else(|| anyhow!("audio clip is not a base64 data URI"))?;
                    let bytes = STANDARD.decode(payload).context("invalid audio payload")?;
                    std::fs::write(&path, bytes)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("wrote {} audio to {}", clip.format, path.display());
                    Ok(())
                }
                _ => print_json(&outcome),
            }
        }
        Command::Health => print_json(&orchestrator.health_check().await),
        Command::Samples { language } => {
            for query in sample_queries(parse_language(&language)?) {
                println!("{query}");
            }
            Ok(())
        }
    }
}
