//! Command-line interface definitions for News Reasoner.
//!
//! All options can be provided via command-line flags or environment variables.

use clap::Parser;
use std::path::PathBuf;

/// Answer a question with step-by-step reasoning over live news headlines.
///
/// # Examples
///
/// ```sh
/// # Defaults: Bing News, then BBC World, model from the client config
/// news_reasoner "election results"
///
/// # Use a local model and print JSON
/// news_reasoner --model mistral --json "election results"
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// The question to research, used verbatim
    pub query: String,

    /// Optional path to a pipeline config YAML file
    #[arg(short, long, env = "NEWS_REASONER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the completion client's config.yaml
    #[arg(short, long, env = "NEWS_REASONER_LLM_CONFIG")]
    pub llm_config: Option<PathBuf>,

    /// Model identifier, overriding both config files
    #[arg(short, long, env = "NEWS_REASONER_MODEL")]
    pub model: Option<String>,

    /// Print context, prompt and answer as one JSON object
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["news_reasoner", "election results"]);

        assert_eq!(cli.query, "election results");
        assert!(cli.config.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "news_reasoner",
            "-c",
            "/tmp/pipeline.yaml",
            "-l",
            "/tmp/config.yaml",
            "-m",
            "mistral",
            "--json",
            "inflation",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/pipeline.yaml")));
        assert_eq!(cli.llm_config, Some(PathBuf::from("/tmp/config.yaml")));
        assert_eq!(cli.model.as_deref(), Some("mistral"));
        assert!(cli.json);
        assert_eq!(cli.query, "inflation");
    }

    #[test]
    fn test_cli_requires_query() {
        assert!(Cli::try_parse_from(["news_reasoner"]).is_err());
    }
}
