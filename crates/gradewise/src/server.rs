//! MCP (Model Context Protocol) server implementation.
//!
//! Exposes the evaluator to AI assistants over stdio. Each tool delegates to
//! the same [`Evaluator`] the CLI commands build; no grading logic lives
//! here.

use std::sync::Arc;

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Serialize;

use gradewise_core::Evaluator;

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the grading tools.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct TextParams {
    /// The student's response.
    pub text: String,
}

/// MCP server exposing the evaluator.
#[derive(Clone)]
pub struct ProjectServer {
    evaluator: Arc<Evaluator>,
    max_input: Option<usize>,
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
}

fn to_json<T: Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))
}

#[tool_router]
impl ProjectServer {
    /// Create a server around an evaluator.
    pub fn with_evaluator(evaluator: Evaluator, max_input: Option<usize>) -> Self {
        Self {
            evaluator: Arc::new(evaluator),
            max_input,
            tool_router: Self::tool_router(),
        }
    }

    fn check_size(&self, text: &str) -> Result<(), McpError> {
        match self.max_input {
            Some(max) if text.len() > max => Err(McpError::invalid_params(
                format!("input too large: {} bytes (limit: {max} bytes)", text.len()),
                None,
            )),
            _ => Ok(()),
        }
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let text = if params.format == "json" {
            to_json(&serde_json::json!({
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
                "description": env!("CARGO_PKG_DESCRIPTION"),
            }))?
        } else {
            format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            )
        };

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Full evaluation.
    #[tool(
        description = "Grade a short written response. Returns a 0-4 grammar score with per-sentence error tallies and explanations, usage hints, and a 0-4 spelling score."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", text_len = params.text.len()))]
    fn evaluate_summary(
        &self,
        Parameters(params): Parameters<TextParams>,
    ) -> Result<CallToolResult, McpError> {
        self.check_size(&params.text)?;
        let report = self
            .evaluator
            .evaluate(&params.text)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        tracing::info!(
            tool = "evaluate_summary",
            grammar_score = report.grammar.score,
            spelling_score = report.spelling.spelling_score,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(to_json(&report)?)]))
    }

    /// Grammar only.
    #[tool(
        description = "Check grammar only. Returns sentences, per-sentence error tallies with evidence spans, and a 0-4 score."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", text_len = params.text.len()))]
    fn check_grammar(
        &self,
        Parameters(params): Parameters<TextParams>,
    ) -> Result<CallToolResult, McpError> {
        self.check_size(&params.text)?;
        let report = self
            .evaluator
            .grammar(&params.text)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        tracing::info!(
            tool = "check_grammar",
            score = report.score,
            errors = report.total_errors(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(to_json(&report)?)]))
    }

    /// Spelling only.
    #[tool(description = "Check spelling only. Returns misspelled words and a 0-4 score.")]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", text_len = params.text.len()))]
    fn check_spelling(
        &self,
        Parameters(params): Parameters<TextParams>,
    ) -> Result<CallToolResult, McpError> {
        self.check_size(&params.text)?;
        let report = self
            .evaluator
            .spelling(&params.text)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        tracing::info!(
            tool = "check_spelling",
            misspelled = report.misspelled_count,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(to_json(&report)?)]))
    }
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
                "{} MCP server. Use evaluate_summary to grade a response, or check_grammar and check_spelling for one dimension.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradewise_core::{DocumentStore, WordList};
    use rmcp::model::RawContent;

    const CAT_SIT: &str = r#"{
        "text": "the cat sit on the mat",
        "tokens": [
            {"id": 0, "start": 0, "end": 3, "pos": "DET", "tag": "DT", "dep": "det", "head": 1, "lemma": "the"},
            {"id": 1, "start": 4, "end": 7, "pos": "NOUN", "tag": "NN", "dep": "nsubj", "head": 2, "lemma": "cat"},
            {"id": 2, "start": 8, "end": 11, "pos": "VERB", "tag": "VBP", "dep": "ROOT", "head": 2, "lemma": "sit"},
            {"id": 3, "start": 12, "end": 14, "pos": "ADP", "tag": "IN", "dep": "prep", "head": 2, "lemma": "on"},
            {"id": 4, "start": 15, "end": 18, "pos": "DET", "tag": "DT", "dep": "det", "head": 5, "lemma": "the"},
            {"id": 5, "start": 19, "end": 22, "pos": "NOUN", "tag": "NN", "dep": "pobj", "head": 3, "lemma": "mat"}
        ]
    }"#;

    fn server() -> ProjectServer {
        let store = DocumentStore::from_json_str(CAT_SIT).unwrap();
        let evaluator = Evaluator::builder(store)
            .dictionary(WordList::from_words(["the", "cat", "on", "mat"]))
            .build();
        ProjectServer::with_evaluator(evaluator, Some(1024))
    }

    /// Extract text from the first content item in a `CallToolResult`.
    fn extract_text(result: &CallToolResult) -> Option<&str> {
        result.content.first().and_then(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
    }

    fn text(s: &str) -> Parameters<TextParams> {
        Parameters(TextParams {
            text: s.to_string(),
        })
    }

    #[test]
    fn server_info_has_correct_name() {
        let info = ServerHandler::get_info(&server());
        assert_eq!(info.server_info.name, env!("CARGO_PKG_NAME"));
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn get_info_tool_returns_json_when_requested() {
        let params = Parameters(GetInfoParams {
            format: "json".to_string(),
        });
        let result = server().get_info(params).expect("get_info should succeed");
        let json: serde_json::Value =
            serde_json::from_str(extract_text(&result).unwrap()).expect("valid JSON");
        assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
    }

    #[test]
    fn evaluate_summary_tool_works() {
        let result = server()
            .evaluate_summary(text("the cat sit on the mat"))
            .expect("evaluate_summary should succeed");
        assert!(!result.is_error.unwrap_or(false));

        let json: serde_json::Value =
            serde_json::from_str(extract_text(&result).unwrap()).expect("valid JSON");
        assert_eq!(json["grammar"]["score"], 3);
        assert_eq!(json["grammar"]["details"][0]["agreement_error"], 1);
        assert_eq!(json["spelling"]["misspelled_words"][0], "sit");
    }

    #[test]
    fn check_grammar_tool_works() {
        let result = server()
            .check_grammar(text("the cat sit on the mat"))
            .expect("check_grammar should succeed");
        let json: serde_json::Value =
            serde_json::from_str(extract_text(&result).unwrap()).expect("valid JSON");
        assert_eq!(json["score"], 3);
        assert_eq!(json["rubric"], "severity");
        assert_eq!(json["sentences"][0]["type"], "normal");
    }

    #[test]
    fn check_spelling_tool_works() {
        let result = server()
            .check_spelling(text("the cat"))
            .expect("check_spelling should succeed");
        let json: serde_json::Value =
            serde_json::from_str(extract_text(&result).unwrap()).expect("valid JSON");
        assert_eq!(json["spelling_score"], 4);
        assert_eq!(json["total_words"], 2);
    }

    #[test]
    fn unannotated_text_is_a_tool_error() {
        assert!(server().check_grammar(text("Nobody annotated me.")).is_err());
    }

    #[test]
    fn oversized_input_is_rejected() {
        let big = "word ".repeat(400);
        assert!(server().check_grammar(text(&big)).is_err());
    }
}
