//! The end-to-end run: resolve context, render the prompt, ask the model.

use crate::config::PipelineConfig;
use crate::fetch::HttpFetcher;
use crate::models::PipelineOutput;
use crate::prompt::PromptTemplate;
use crate::reasoning::{Completion, ReasoningInvoker};
use crate::resolver::ContextResolver;
use crate::sources::{NewsSource, ScrapedSource};
use std::error::Error;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// The pipeline wired to live HTTP sources.
pub type HttpPipeline<C> = Pipeline<ScrapedSource<HttpFetcher>, ScrapedSource<HttpFetcher>, C>;

/// One isolated pipeline instance.
///
/// Each stage runs exactly once per [`Pipeline::run`], in order, and nothing
/// is shared between runs.
#[derive(Debug)]
pub struct Pipeline<A, B, C> {
    resolver: ContextResolver<A, B>,
    template: PromptTemplate,
    invoker: ReasoningInvoker<C>,
}

impl<A, B, C> Pipeline<A, B, C>
where
    A: NewsSource,
    B: NewsSource,
    C: Completion,
{
    pub fn new(resolver: ContextResolver<A, B>, template: PromptTemplate, completion: C) -> Self {
        Self {
            resolver,
            template,
            invoker: ReasoningInvoker::new(completion),
        }
    }

    /// Run the pipeline for `query`.
    ///
    /// # Arguments
    ///
    /// * `query` - Free-text question, used verbatim in the prompt
    ///
    /// # Returns
    ///
    /// The resolved context, the rendered prompt and the model's answer.
    ///
    /// # Errors
    ///
    /// News retrieval never fails the run; an error from the model does and
    /// is returned as is.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let pipeline = HttpPipeline::from_config(&PipelineConfig::default(), completion)?;
    /// let output = pipeline.run("election results").await?;
    /// println!("{}", output.answer);
    /// ```
    #[instrument(level = "info", skip(self))]
    pub async fn run(&self, query: &str) -> Result<PipelineOutput, Box<dyn Error>> {
        let t0 = Instant::now();

        let context = self.resolver.resolve(query).await;
        debug!(context_bytes = context.len(), "Context resolved");

        let prompt = self.template.render(query, &context);
        debug!(prompt_bytes = prompt.len(), "Prompt rendered");

        let answer = self.invoker.invoke(&prompt).await?;

        info!(elapsed_ms = t0.elapsed().as_millis() as u64, "Pipeline run complete");
        Ok(PipelineOutput {
            context,
            prompt,
            answer,
        })
    }
}

impl<C: Completion> HttpPipeline<C> {
    /// Build a pipeline from `config` with HTTP-backed sources.
    pub fn from_config(config: &PipelineConfig, completion: C) -> Result<Self, Box<dyn Error>> {
        config.validate()?;
        let fetcher = HttpFetcher::new(&config.user_agent, config.timeout())?;
        let resolver = ContextResolver::new(
            ScrapedSource::new(config.primary.clone(), fetcher.clone(), config.max_items),
            ScrapedSource::new(config.fallback.clone(), fetcher, config.max_items),
            config.fallback_context.clone(),
        );
        Ok(Self::new(
            resolver,
            PromptTemplate::new(config.template.clone()),
            completion,
        ))
    }
}
