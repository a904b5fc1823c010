//! MCP tools over stdio.
//!
//! [`ProjectServer`] holds the loaded [`Config`] and one prebuilt
//! [`KeywordAnalyzer`], so a tool call gives the same answer as the matching
//! CLI command run in the same directory. Tools take text, never paths, and
//! return pretty JSON except `get_info` in text mode. Bad arguments map to
//! `invalid_params`; only serialization failures are `internal_error`.

use std::sync::Arc;

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Serialize;

use seo_lens_core::density::{KeywordAnalyzer, NGramSize};
use seo_lens_core::serp::{self, SerpInput};
use seo_lens_core::{Config, counter, markdown};

/// Rendering for `get_info`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum InfoFormat {
    /// One line per field.
    #[default]
    Text,
    /// A JSON object.
    Json,
}

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// "text" (default) or "json".
    #[serde(default)]
    pub format: InfoFormat,
}

/// Parameters for the `analyze_density` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct AnalyzeDensityParams {
    /// The text to analyze.
    pub text: String,
    /// Keyword or phrase to measure (case-insensitive).
    pub target_phrase: Option<String>,
    /// Words per ranked phrase: 1, 2, or 3. Defaults to the configured size.
    pub ngram_size: Option<u8>,
    /// Maximum acceptable target density, in percent.
    pub max_density: Option<f64>,
    /// Whether to strip markdown formatting before analysis.
    #[serde(default)]
    pub strip_markdown: bool,
}

/// Parameters for the `count_text` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CountTextParams {
    /// The text to count.
    pub text: String,
    /// Maximum acceptable Flesch-Kincaid grade level.
    pub max_grade: Option<f64>,
    /// Whether to strip markdown formatting before counting.
    #[serde(default)]
    pub strip_markdown: bool,
}

/// Parameters for the `simulate_serp` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct SimulateSerpParams {
    /// Page title.
    pub title: String,
    /// Meta description.
    #[serde(default)]
    pub description: String,
    /// Page URL, rendered as a breadcrumb.
    pub url: Option<String>,
    /// Focus keyword to look for in the title and description.
    pub keyword: Option<String>,
}

/// Tool host for `seo-lens serve`.
#[derive(Clone)]
pub struct ProjectServer {
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
    config: Arc<Config>,
    analyzer: Arc<KeywordAnalyzer>,
    max_input_bytes: Option<usize>,
}

impl Default for ProjectServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl ProjectServer {
    /// Create a server with default configuration and input limit.
    pub fn new() -> Self {
        let config = Config::default();
        let max_input_bytes = config.input_limit();
        Self::with_config(config, max_input_bytes)
    }

    /// Create a server using loaded configuration.
    pub fn with_config(config: Config, max_input_bytes: Option<usize>) -> Self {
        let analyzer = config.density.analyzer();
        Self {
            tool_router: Self::tool_router(),
            config: Arc::new(config),
            analyzer: Arc::new(analyzer),
            max_input_bytes,
        }
    }

    /// Name, version and the defaults the other tools apply.
    #[tool(
        description = "Get the seo-lens version and the defaults other tools use (n-gram size, prominence window, input limit, snippet length ranges)"
    )]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        let serp = &self.config.serp;
        let ngram_size: u8 = self.config.ngram_size.unwrap_or_default().into();
        let text = match params.format {
            InfoFormat::Json => to_json(&serde_json::json!({
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
                "ngram_size": ngram_size,
                "prominence_window": self.analyzer.policy().prominence_window,
                "max_input_bytes": self.max_input_bytes,
                "title_range": [serp.title_min, serp.title_max],
                "description_range": [serp.description_min, serp.description_max],
            }))?,
            InfoFormat::Text => format!(
                "{} {}\nn-gram size: {ngram_size}\ntitle: {}-{} chars\ndescription: {}-{} chars",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                serp.title_min,
                serp.title_max,
                serp.description_min,
                serp.description_max,
            ),
        };
        tracing::debug!(format = ?params.format, "get_info served");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Measure keyword density and rank frequent phrases.
    #[tool(
        description = "Analyze keyword density. Returns word counts, how often the target phrase occurs (with density percent and whether it appears in the first 100 words), and the most frequent 1-, 2-, or 3-word phrases after stop-word filtering."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn analyze_density(
        &self,
        #[allow(unused_variables)] Parameters(params): Parameters<AnalyzeDensityParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "analyze_density",
            ngram = ?params.ngram_size,
            strip_md = params.strip_markdown,
            "executing MCP tool"
        );

        self.check_input_size(&params.text)?;
        let ngram = match params.ngram_size {
            Some(n) => NGramSize::try_from(n)
                .map_err(|e| McpError::invalid_params(e.to_string(), None))?,
            None => self.config.ngram_size.unwrap_or_default(),
        };
        let text = if params.strip_markdown {
            markdown::to_plain_text(&params.text)
        } else {
            params.text
        };
        let max_density = params.max_density.or(self.config.max_density_percent);

        let report = self
            .analyzer
            .analyze(&text, params.target_phrase.as_deref(), ngram)
            .with_max_density(max_density);

        tracing::info!(
            tool = "analyze_density",
            total_words = report.total_words,
            target_count = report.target_count,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(to_json(&report)?)]))
    }

    /// Count words and score readability.
    #[tool(
        description = "Count words, characters, sentences, and paragraphs. Returns reading and speaking time plus Flesch reading ease and Flesch-Kincaid grade level."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn count_text(
        &self,
        #[allow(unused_variables)] Parameters(params): Parameters<CountTextParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "count_text",
            strip_md = params.strip_markdown,
            "executing MCP tool"
        );

        self.check_input_size(&params.text)?;
        let max_grade = params.max_grade.or(self.config.max_grade);
        let stats = counter::count_text(&params.text, params.strip_markdown, max_grade);

        tracing::info!(tool = "count_text", words = stats.words, "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(to_json(&stats)?)]))
    }

    /// Preview a search result snippet.
    #[tool(
        description = "Simulate a search result snippet. Checks title and meta description lengths, shows the truncated text a results page would display, and renders the URL as a breadcrumb."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn simulate_serp(
        &self,
        #[allow(unused_variables)] Parameters(params): Parameters<SimulateSerpParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "simulate_serp", url = ?params.url, "executing MCP tool");

        self.check_input_size(&params.title)?;
        self.check_input_size(&params.description)?;

        let input = SerpInput {
            title: params.title,
            description: params.description,
            url: params.url,
            keyword: params.keyword,
        };
        let preview = serp::simulate(&input, &self.config.serp)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        tracing::info!(
            tool = "simulate_serp",
            good = preview.is_good(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(to_json(&preview)?)]))
    }
}

impl ProjectServer {
    fn check_input_size(&self, text: &str) -> Result<(), McpError> {
        match self.max_input_bytes {
            Some(max) if text.len() > max => Err(McpError::invalid_params(
                format!(
                    "input too large: {} bytes (limit: {max} bytes)",
                    text.len()
                ),
                None,
            )),
            _ => Ok(()),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))
}

#[tool_handler]
impl ServerHandler for ProjectServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use analyze_density, count_text, and simulate_serp to check page copy.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}
