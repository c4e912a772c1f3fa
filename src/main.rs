//! # News Reasoner
//!
//! Answers a free-text question with chain-of-thought reasoning from a
//! language model, grounded in headlines scraped from live news pages.
//!
//! ## Usage
//!
//! ```sh
//! news_reasoner --model mistral "election results"
//! ```
//!
//! ## Architecture
//!
//! One run is a straight line:
//! 1. **Resolve context**: Bing News search for the query, else the BBC
//!    world listing, else a fixed "no news" sentence
//! 2. **Build prompt**: fill the reasoning template with query and context
//! 3. **Invoke model**: send the prompt and return the answer verbatim
//!
//! Scraping failures only ever make a source look empty; a model failure
//! ends the run with an error.

use clap::Parser;
use std::error::Error;
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod extract;
mod fetch;
mod models;
mod pipeline;
mod prompt;
mod reasoning;
mod resolver;
mod sources;

use cli::Cli;
use config::PipelineConfig;
use models::PipelineOutput;
use pipeline::HttpPipeline;
use reasoning::AwfulCompletion;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init (stderr, so stdout only carries results) ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(?args.config, ?args.llm_config, ?args.model, "Parsed CLI arguments");

    let mut config = PipelineConfig::load(args.config.as_deref()).await?;
    if let Some(model) = &args.model {
        config.model = Some(model.clone());
    }

    let completion = AwfulCompletion::load(args.llm_config.as_deref(), config.model.as_deref())?;
    let pipeline = HttpPipeline::from_config(&config, completion)?;

    info!(query = %args.query, "Fetching and analyzing news");
    let output = pipeline.run(&args.query).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_sections(&output);
    }
    Ok(())
}

fn print_sections(output: &PipelineOutput) {
    println!("## Top News Context\n\n{}\n", output.context);
    println!("## Chain of Thought Reasoning\n\n{}\n", output.prompt.trim());
    println!("## CoT Reasoned Answer\n\n{}", output.answer);
}
