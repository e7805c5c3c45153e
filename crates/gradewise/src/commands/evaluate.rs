//! Evaluate command - grammar, usage and spelling in one pass.

use std::time::Duration;

use anyhow::{Context, bail};
use camino::Utf8PathBuf;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use gradewise_core::config::Config;
use gradewise_core::grammar::MAX_SCORE;
use gradewise_core::{
    EvaluatorBuilder, GrammarReport, Rubric, Severity, SpellingReport, UsageReport,
};

use super::{AnnotationArgs, input_label, load_dictionary, read_input_file};

/// Arguments for the `evaluate` subcommand.
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// File to grade (`-` for stdin).
    pub file: Utf8PathBuf,

    #[command(flatten)]
    pub annotation: AnnotationArgs,

    /// Newline-delimited word list for spelling.
    #[arg(long, value_name = "FILE")]
    pub dictionary: Option<Utf8PathBuf>,

    /// Scoring rubric.
    #[arg(long, value_enum)]
    pub rubric: Option<Rubric>,

    /// Skip the explanation service.
    #[arg(long)]
    pub no_explain: bool,

    /// Fail when the grammar score is below this value (0–4).
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=4))]
    pub min_score: Option<u8>,
}

/// Grade a file for grammar and spelling.
#[instrument(name = "cmd_evaluate", skip_all, fields(file = %args.file))]
pub fn cmd_evaluate(
    args: EvaluateArgs,
    global_json: bool,
    mut config: Config,
    max_input: Option<usize>,
) -> anyhow::Result<()> {
    debug!(
        file = %args.file,
        rubric = ?args.rubric,
        no_explain = args.no_explain,
        "executing evaluate command"
    );

    let content = read_input_file(&args.file, max_input)?;
    let label = input_label(&args.file);

    args.annotation.apply(&mut config);
    if let Some(rubric) = args.rubric {
        config.grammar.rubric = rubric;
    }
    if args.no_explain {
        config.explanation.enabled = false;
    }
    let dictionary = load_dictionary(args.dictionary.as_deref(), &config)?;
    let evaluator = EvaluatorBuilder::from_config(&config)
        .dictionary(dictionary)
        .build();

    let spinner = (!global_json).then(|| spinner("evaluating"));
    let result = evaluator.evaluate(&content);
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let report = result.with_context(|| format!("failed to evaluate {label}"))?;

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", label.bold());
        print_grammar(&report.grammar);
        if let Some(usage) = &report.usage_clarity {
            print_usage(usage);
        }
        print_spelling(&report.spelling);
    }

    if let Some(min) = args.min_score
        && report.grammar.score < min
    {
        bail!(
            "{label} has grammar score {} (min: {min}). Fix the reported errors.",
            report.grammar.score
        );
    }

    Ok(())
}

/// Stderr spinner; hidden automatically when stderr is not a terminal.
pub(crate) fn spinner(message: &'static str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

fn severity_label(severity: Severity) -> String {
    match severity {
        Severity::Critical => "CRITICAL".red().to_string(),
        Severity::Major => "MAJOR".yellow().to_string(),
        Severity::Minor => "MINOR".dimmed().to_string(),
    }
}

/// Print the grammar section in text form.
pub(crate) fn print_grammar(report: &GrammarReport) {
    println!(
        "\n  {} {}/{MAX_SCORE} ({} rubric), {} sentences, {} errors",
        "Grammar:".cyan(),
        report.score,
        report.rubric.as_str(),
        report.sentences.len(),
        report.total_errors(),
    );

    for (n, (sentence, tally)) in report.sentences.iter().zip(&report.details).enumerate() {
        if tally.is_clean() {
            continue;
        }
        println!("    Sentence {}: \"{}\"", n + 1, sentence.text);
        for kind in tally.fired() {
            let spans = tally.spans(kind);
            if spans.is_empty() {
                println!(
                    "      [{}] {}",
                    severity_label(kind.severity()),
                    kind
                );
            }
            for span in spans {
                println!(
                    "      [{}] {}: \"{}\"",
                    severity_label(kind.severity()),
                    kind,
                    span
                );
            }
        }
    }

    if !report.explanation.errors.is_empty() {
        println!("\n  {}", "Explanations:".cyan());
        for item in &report.explanation.errors {
            println!("    {} \"{}\": {}", item.kind, item.text_span, item.description);
        }
    }
}

fn print_usage(report: &UsageReport) {
    if report.issues.is_empty() {
        return;
    }
    println!("\n  {} {} hints", "Usage:".cyan(), report.issues.len());
    for issue in &report.issues {
        println!(
            "    \"{}\": {}",
            issue.text_span,
            issue.description.dimmed()
        );
    }
}

/// Print the spelling section in text form.
pub(crate) fn print_spelling(report: &SpellingReport) {
    println!(
        "\n  {} {}/{MAX_SCORE}, {} of {} words misspelled",
        "Spelling:".cyan(),
        report.spelling_score,
        report.misspelled_count,
        report.total_words,
    );
    if !report.misspelled_words.is_empty() {
        println!("    {}", report.misspelled_words.join(", "));
    }
}
