//! Spelling command.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use gradewise_core::config::Config;
use gradewise_core::{evaluate_spelling, normalize_text};

use super::evaluate::print_spelling;
use super::{input_label, load_dictionary, read_input_file};

/// Arguments for the `spelling` subcommand.
#[derive(Args, Debug)]
pub struct SpellingArgs {
    /// File to check (`-` for stdin).
    pub file: Utf8PathBuf,

    /// Newline-delimited word list.
    #[arg(long, value_name = "FILE")]
    pub dictionary: Option<Utf8PathBuf>,
}

/// Spell-check a file. Needs no annotation source.
#[instrument(name = "cmd_spelling", skip_all, fields(file = %args.file))]
pub fn cmd_spelling(
    args: SpellingArgs,
    global_json: bool,
    config: &Config,
    max_input: Option<usize>,
) -> anyhow::Result<()> {
    debug!(file = %args.file, dictionary = ?args.dictionary, "executing spelling command");

    let content = read_input_file(&args.file, max_input)?;
    let label = input_label(&args.file);
    let dictionary = load_dictionary(args.dictionary.as_deref(), config)
        .with_context(|| format!("cannot spell-check {label}"))?;

    let report = evaluate_spelling(&dictionary, &normalize_text(&content));

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", label.bold());
        print_spelling(&report);
    }
    Ok(())
}
