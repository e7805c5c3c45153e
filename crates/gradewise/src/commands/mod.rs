//! Command implementations.

use std::io::Read;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use gradewise_core::config::Config;
use gradewise_core::WordList;

pub mod evaluate;
pub mod grammar;
pub mod info;
pub mod schema;
#[cfg(feature = "mcp")]
pub mod serve;
pub mod spelling;

/// Path that means "read standard input".
pub const STDIN: &str = "-";

/// Human label for an input path.
pub fn input_label(path: &Utf8Path) -> &str {
    if path.as_str() == STDIN { "<stdin>" } else { path.as_str() }
}

/// Read a file (or stdin for `-`) and validate its size against the limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    if path.as_str() == STDIN {
        return read_stdin(max_bytes);
    }

    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = metadata.len() as usize;
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    std::fs::read_to_string(path.as_std_path()).with_context(|| format!("failed to read {path}"))
}

fn read_stdin(max_bytes: Option<usize>) -> anyhow::Result<String> {
    let mut content = String::new();
    let mut stdin = std::io::stdin().lock();
    match max_bytes {
        Some(max) => {
            stdin
                .take(max as u64 + 1)
                .read_to_string(&mut content)
                .context("failed to read stdin")?;
            if content.len() > max {
                anyhow::bail!("input too large: stdin exceeds {max} bytes");
            }
        }
        None => {
            stdin
                .read_to_string(&mut content)
                .context("failed to read stdin")?;
        }
    }
    Ok(content)
}

/// Annotation source overrides shared by the grading commands.
#[derive(Args, Debug, Default, Clone)]
pub struct AnnotationArgs {
    /// Pre-annotated documents (spaCy JSON array or JSON lines)
    #[arg(long, value_name = "FILE")]
    pub annotations: Option<Utf8PathBuf>,

    /// Annotation service URL
    #[arg(long, value_name = "URL", conflicts_with = "annotations")]
    pub annotator_url: Option<String>,
}

impl AnnotationArgs {
    /// Apply the overrides to the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.annotations {
            config.annotator.documents = Some(path.clone());
            config.annotator.endpoint = None;
        }
        if let Some(url) = &self.annotator_url {
            config.annotator.endpoint = Some(url.clone());
            config.annotator.documents = None;
        }
    }
}

/// Load the spelling dictionary: `override_path`, then the configured
/// path, then the system word list.
pub fn load_dictionary(
    override_path: Option<&Utf8Path>,
    config: &Config,
) -> anyhow::Result<WordList> {
    let path = override_path.or(config.spelling.dictionary.as_deref());
    WordList::discover(path).context("failed to load spelling dictionary")
}
