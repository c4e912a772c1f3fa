//! Pipeline configuration.
//!
//! All tunables of a run live in one [`PipelineConfig`] value that is built
//! once and handed to [`crate::pipeline::Pipeline`]. Nothing here is global,
//! so any number of independently configured pipelines can coexist.
//!
//! A YAML file may override any subset of the fields:
//!
//! ```yaml
//! model: mistral
//! timeout_secs: 5
//! fallback:
//!   name: bbc-world
//!   url: https://www.bbc.com/news/world
//!   containers: ["a.gs-c-promo-heading"]
//!   title: { kind: own_text }
//!   detail: { kind: attribute, name: href, base: "https://www.bbc.com", placeholder: No Link }
//! ```

use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

/// The reasoning template, with `{input}` and `{context}` slots.
pub const DEFAULT_TEMPLATE: &str = "
Question: {input}
Context: {context}

Let's think step-by-step:
1. Identify key aspects of the question.
2. Analyze the context and extract meaningful information.
3. Form a coherent and fact-based answer.

Answer:
";

pub const DEFAULT_FALLBACK_CONTEXT: &str = "No relevant news found.";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_ITEMS: usize = 5;

/// Slot in a source URL replaced by the percent-encoded query.
pub const QUERY_SLOT: &str = "{query}";

/// How one field of a headline is pulled out of its container element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldRule {
    /// The container's own text.
    OwnText,
    /// Text of the first nested element matched by any candidate, in order.
    NestedText {
        candidates: Vec<String>,
        placeholder: String,
    },
    /// An attribute of the container. Values starting with `/` are resolved
    /// against `base` when one is set. A missing attribute yields the
    /// placeholder for that item only; it does not discard the whole source.
    Attribute {
        name: String,
        #[serde(default)]
        base: Option<String>,
        placeholder: String,
    },
}

impl FieldRule {
    fn selectors(&self) -> &[String] {
        match self {
            FieldRule::NestedText { candidates, .. } => candidates,
            FieldRule::OwnText | FieldRule::Attribute { .. } => &[],
        }
    }
}

/// Where a news source lives and how its listing page is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    /// Short name used in logs.
    pub name: String,
    /// Listing URL. May contain [`QUERY_SLOT`].
    pub url: String,
    /// Candidate item-container selectors; the first one matching anything wins.
    pub containers: Vec<String>,
    pub title: FieldRule,
    pub detail: FieldRule,
}

impl SourceSpec {
    /// Bing News search, filtered by the user's query.
    pub fn bing_news() -> Self {
        Self {
            name: "bing-news".to_string(),
            url: format!("https://www.bing.com/news/search?q={QUERY_SLOT}"),
            containers: vec![
                "div.news-card".to_string(),
                "div.t_s".to_string(),
                "div.news-card-newsitem".to_string(),
            ],
            title: FieldRule::NestedText {
                candidates: vec!["a.title".to_string(), "a".to_string()],
                placeholder: "No Title".to_string(),
            },
            detail: FieldRule::NestedText {
                candidates: vec!["div.snippet".to_string(), "div.sn_snip".to_string()],
                placeholder: "No Description".to_string(),
            },
        }
    }

    /// BBC world news listing. Not filtered by the query.
    pub fn bbc_world() -> Self {
        Self {
            name: "bbc-world".to_string(),
            url: "https://www.bbc.com/news/world".to_string(),
            containers: vec!["a.gs-c-promo-heading".to_string()],
            title: FieldRule::OwnText,
            detail: FieldRule::Attribute {
                name: "href".to_string(),
                base: Some("https://www.bbc.com".to_string()),
                placeholder: "No Link".to_string(),
            },
        }
    }

    /// Build the request URL for `query`.
    ///
    /// The query is percent-encoded so reserved characters cannot change the
    /// shape of the URL.
    pub fn request_url(&self, query: &str) -> String {
        self.url
            .replace(QUERY_SLOT, urlencoding::encode(query).as_ref())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.containers.is_empty() {
            return Err(ConfigError::NoContainers(self.name.clone()));
        }
        let all = self
            .containers
            .iter()
            .chain(self.title.selectors())
            .chain(self.detail.selectors());
        for selector in all {
            if Selector::parse(selector).is_err() {
                return Err(ConfigError::BadSelector {
                    source_name: self.name.clone(),
                    selector: selector.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Explicit configuration for one pipeline instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Model identifier. `None` keeps the completion client's own setting.
    pub model: Option<String>,
    pub template: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Per-source cap on extracted headlines.
    pub max_items: usize,
    /// Context used when every source came back empty.
    pub fallback_context: String,
    pub primary: SourceSpec,
    pub fallback: SourceSpec,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: None,
            template: DEFAULT_TEMPLATE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_items: DEFAULT_MAX_ITEMS,
            fallback_context: DEFAULT_FALLBACK_CONTEXT.to_string(),
            primary: SourceSpec::bing_news(),
            fallback: SourceSpec::bbc_world(),
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a YAML document. Missing fields take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, Box<dyn Error>> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the pipeline configuration.
    ///
    /// # Arguments
    ///
    /// * `path` - Optional path to a YAML file. Fields it omits keep their defaults.
    ///
    /// # Returns
    ///
    /// The validated configuration, or [`PipelineConfig::default`] when `path`
    /// is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid YAML, or fails
    /// [`PipelineConfig::validate`].
    ///
    /// # Example
    ///
    /// ```ignore
    /// let config = PipelineConfig::load(Some(Path::new("pipeline.yaml"))).await?;
    /// assert!(config.max_items > 0);
    /// ```
    #[instrument(level = "info")]
    pub async fn load(path: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        let Some(path) = path else {
            info!("No pipeline config given; using defaults");
            return Ok(Self::default());
        };
        let yaml = tokio::fs::read_to_string(path).await?;
        let config = Self::from_yaml(&yaml)?;
        info!(path = %path.display(), "Loaded pipeline configuration");
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for slot in ["{input}", "{context}"] {
            if !self.template.contains(slot) {
                return Err(ConfigError::MissingSlot(slot));
            }
        }
        if self.fallback_context.trim().is_empty() {
            return Err(ConfigError::EmptyFallbackContext);
        }
        if self.max_items == 0 {
            return Err(ConfigError::Zero("max_items"));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Zero("timeout_secs"));
        }
        self.primary.validate()?;
        self.fallback.validate()
    }
}

/// Reasons a configuration is rejected before the pipeline starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingSlot(&'static str),
    Zero(&'static str),
    EmptyFallbackContext,
    NoContainers(String),
    BadSelector { source_name: String, selector: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingSlot(slot) => write!(f, "template is missing the {slot} slot"),
            ConfigError::Zero(field) => write!(f, "{field} must be greater than zero"),
            ConfigError::EmptyFallbackContext => write!(f, "fallback_context must not be empty"),
            ConfigError::NoContainers(name) => {
                write!(f, "source '{name}' has no container selectors")
            }
            ConfigError::BadSelector {
                source_name,
                selector,
            } => write!(f, "source '{source_name}' has an invalid selector: {selector}"),
        }
    }
}

impl Error for ConfigError {}
