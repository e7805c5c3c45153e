//! Grammar command - segmentation, tallies and score.

use anyhow::{Context, bail};
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use gradewise_core::config::Config;
use gradewise_core::{EvaluatorBuilder, Rubric};

use super::evaluate::print_grammar;
use super::{AnnotationArgs, input_label, read_input_file};

/// Arguments for the `grammar` subcommand.
#[derive(Args, Debug)]
pub struct GrammarArgs {
    /// File to check (`-` for stdin).
    pub file: Utf8PathBuf,

    #[command(flatten)]
    pub annotation: AnnotationArgs,

    /// Scoring rubric.
    #[arg(long, value_enum)]
    pub rubric: Option<Rubric>,

    /// Fail when the grammar score is below this value (0–4).
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=4))]
    pub min_score: Option<u8>,
}

/// Check grammar in a file. Never calls the explanation service.
#[instrument(name = "cmd_grammar", skip_all, fields(file = %args.file))]
pub fn cmd_grammar(
    args: GrammarArgs,
    global_json: bool,
    mut config: Config,
    max_input: Option<usize>,
) -> anyhow::Result<()> {
    debug!(file = %args.file, rubric = ?args.rubric, "executing grammar command");

    let content = read_input_file(&args.file, max_input)?;
    let label = input_label(&args.file);

    args.annotation.apply(&mut config);
    if let Some(rubric) = args.rubric {
        config.grammar.rubric = rubric;
    }
    let evaluator = EvaluatorBuilder::from_config(&config)
        .without_explainer()
        .build();

    let report = evaluator
        .grammar(&content)
        .with_context(|| format!("failed to check grammar of {label}"))?;

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", label.bold());
        print_grammar(&report);
    }

    if let Some(min) = args.min_score
        && report.score < min
    {
        bail!(
            "{label} has grammar score {} (min: {min}). Fix the reported errors.",
            report.score
        );
    }

    Ok(())
}
