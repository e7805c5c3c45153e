//! Schema command.

use clap::Args;
use tracing::instrument;

/// Arguments for the `schema` subcommand.
#[derive(Args, Debug, Default)]
pub struct SchemaArgs {}

/// Print the evaluation report's JSON Schema. Always JSON.
#[instrument(name = "cmd_schema", skip_all)]
pub fn cmd_schema(_args: SchemaArgs) -> anyhow::Result<()> {
    let schema = gradewise_core::report_schema();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
