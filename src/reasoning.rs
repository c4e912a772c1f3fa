//! Language model invocation.
//!
//! [`Completion`] is the text-in/text-out seam; [`AwfulCompletion`] backs it
//! with `awful_aj` against any OpenAI-compatible endpoint (a local Ollama
//! server works). [`ReasoningInvoker`] sends one rendered prompt and returns
//! the answer untouched.
//!
//! Unlike news fetching, failures here are not absorbed: an unreachable or
//! failing model ends the run with an error. There are no retries.

use awful_aj::api::ask;
use awful_aj::{config::AwfulJadeConfig, template::ChatTemplate};
use std::error::Error;
use std::fmt;
use std::path::Path;
use std::time::Instant;
use tracing::{error, info, instrument};

/// Chat wrapper around the prompt. It adds no text of its own: the rendered
/// prompt is the only content the model receives.
const CHAT_TEMPLATE_YAML: &str = r#"
system_prompt: ""
messages: []
"#;

/// Something that can complete a prompt.
pub trait Completion {
    async fn complete(&self, prompt: &str) -> Result<String, Box<dyn Error>>;
}

/// [`Completion`] backed by `awful_aj::api::ask`.
pub struct AwfulCompletion {
    config: AwfulJadeConfig,
    template: ChatTemplate,
}

impl AwfulCompletion {
    pub fn new(config: AwfulJadeConfig) -> Result<Self, Box<dyn Error>> {
        let template: ChatTemplate = serde_yaml::from_str(CHAT_TEMPLATE_YAML)?;
        Ok(Self { config, template })
    }

    /// Load the client's `config.yaml` from `path`, or from the default
    /// config directory, optionally overriding the model identifier.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>, model: Option<&str>) -> Result<Self, Box<dyn Error>> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => awful_aj::config_dir()?.join("config.yaml"),
        };
        let config_path = path
            .to_str()
            .ok_or_else(|| format!("Not a valid config filename: {}", path.display()))?;
        let mut config = awful_aj::config::load_config(config_path)?;
        if let Some(model) = model {
            config.model = model.to_string();
        }
        info!(config_path, model = %config.model, "Loaded completion configuration");
        Self::new(config)
    }
}

impl fmt::Debug for AwfulCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwfulCompletion")
            .field("model", &self.config.model)
            .finish()
    }
}

impl Completion for AwfulCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, Box<dyn Error>> {
        ask(&self.config, prompt.to_string(), &self.template, None, None).await
    }
}

/// Sends rendered prompts to a [`Completion`].
#[derive(Debug)]
pub struct ReasoningInvoker<C> {
    completion: C,
}

impl<C: Completion> ReasoningInvoker<C> {
    pub fn new(completion: C) -> Self {
        Self { completion }
    }

    /// Complete `prompt` and return the model's text verbatim.
    #[instrument(level = "info", skip_all, fields(prompt_bytes = prompt.len()))]
    pub async fn invoke(&self, prompt: &str) -> Result<String, Box<dyn Error>> {
        let t0 = Instant::now();
        let res = self.completion.complete(prompt).await;
        let elapsed_ms = t0.elapsed().as_millis() as u64;

        match &res {
            Ok(answer) => info!(elapsed_ms, answer_bytes = answer.len(), "Model answered"),
            Err(e) => error!(elapsed_ms, error = %e, "Model invocation failed"),
        }
        res
    }
}
