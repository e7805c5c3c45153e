//! Serve command - MCP server on stdio.

use anyhow::Context;
use clap::Args;
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tracing::{info, instrument, warn};

use gradewise_core::EvaluatorBuilder;
use gradewise_core::config::Config;

use super::load_dictionary;
use crate::server::ProjectServer;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Never call the explanation service.
    #[arg(long)]
    pub no_explain: bool,
}

/// Run the MCP server until the client disconnects.
///
/// A missing dictionary is not fatal; `check_spelling` and
/// `evaluate_summary` report it per call.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(args: ServeArgs, mut config: Config) -> anyhow::Result<()> {
    if args.no_explain {
        config.explanation.enabled = false;
    }

    let mut builder = EvaluatorBuilder::from_config(&config);
    match load_dictionary(None, &config) {
        Ok(dictionary) => builder = builder.dictionary(dictionary),
        Err(e) => warn!(error = %e, "spelling unavailable"),
    }
    let server = ProjectServer::with_evaluator(builder.build(), config.input_limit());

    info!("starting MCP server on stdio");
    let service = server
        .serve(stdio())
        .await
        .context("failed to start MCP server")?;
    service.waiting().await.context("MCP server failed")?;
    info!("MCP server stopped");
    Ok(())
}
