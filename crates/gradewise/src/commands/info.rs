//! Info command implementation

use clap::Args;
use gradewise_core::config::{Config, ConfigSources, user_config_dir};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_config_dir: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_input_bytes: Option<usize>,
    rubric: &'static str,
    usage_clarity: bool,
    annotator: String,
    explanation_backends: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dictionary: Option<String>,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources) -> Self {
        let annotator = match (&config.annotator.documents, &config.annotator.endpoint) {
            (Some(path), _) => format!("documents: {path}"),
            (None, Some(url)) => format!("endpoint: {url}"),
            (None, None) => "not configured".to_string(),
        };
        let explanation_backends = if config.explanation.enabled {
            config
                .explanation
                .backends
                .iter()
                .map(|b| b.name.clone())
                .collect()
        } else {
            Vec::new()
        };
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            user_config_dir: user_config_dir().map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            max_input_bytes: config.input_limit(),
            rubric: config.grammar.rubric.as_str(),
            usage_clarity: config.usage_clarity,
            annotator,
            explanation_backends,
            dictionary: config.spelling.dictionary.as_ref().map(|p| p.to_string()),
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
}

/// Print package information and the effective configuration.
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing info command");

    let full_info = FullInfo {
        package: PackageInfo::new(),
        config: ConfigInfo::from_config(config, sources),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&full_info)?);
        return Ok(());
    }

    let package = &full_info.package;
    println!("{} {}", package.name.bold(), package.version.green());
    if !package.description.is_empty() {
        println!("{}", package.description);
    }
    if !package.license.is_empty() {
        println!("{}: {}", "License".dimmed(), package.license);
    }

    let info = &full_info.config;
    println!();
    println!("{}", "Configuration".bold().underline());
    match &info.config_file {
        Some(path) => println!("{}: {}", "Config file".dimmed(), path.cyan()),
        None => println!("{}: {}", "Config file".dimmed(), "none loaded".yellow()),
    }
    if let Some(dir) = &info.user_config_dir {
        println!("{}: {}", "User config dir".dimmed(), dir);
    }
    println!("{}: {}", "Log level".dimmed(), info.log_level);
    if let Some(dir) = &info.log_dir {
        println!("{}: {}", "Log directory".dimmed(), dir);
    }
    match info.max_input_bytes {
        Some(max) => println!("{}: {} bytes", "Input limit".dimmed(), max),
        None => println!("{}: {}", "Input limit".dimmed(), "disabled".yellow()),
    }

    println!();
    println!("{}", "Pipeline".bold().underline());
    println!("{}: {}", "Annotator".dimmed(), info.annotator);
    println!("{}: {}", "Rubric".dimmed(), info.rubric);
    println!("{}: {}", "Usage hints".dimmed(), info.usage_clarity);
    if info.explanation_backends.is_empty() {
        println!("{}: {}", "Explanations".dimmed(), "(none)".dimmed());
    } else {
        println!(
            "{}: {}",
            "Explanations".dimmed(),
            info.explanation_backends.join(" → ")
        );
    }
    match &info.dictionary {
        Some(path) => println!("{}: {}", "Dictionary".dimmed(), path),
        None => println!("{}: {}", "Dictionary".dimmed(), "system word list".dimmed()),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradewise_core::config::BackendConfig;

    #[test]
    fn test_cmd_info_text_succeeds() {
        let result = cmd_info(
            InfoArgs::default(),
            false,
            &Config::default(),
            &ConfigSources::default(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_cmd_info_json_via_global() {
        let result = cmd_info(
            InfoArgs::default(),
            true,
            &Config::default(),
            &ConfigSources::default(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_config_info_no_file() {
        let info = ConfigInfo::from_config(&Config::default(), &ConfigSources::default());
        assert!(info.config_file.is_none());
        assert_eq!(info.log_level, "info");
        assert_eq!(info.rubric, "severity");
        assert_eq!(info.annotator, "not configured");
    }

    #[test]
    fn disabled_explanations_list_no_backends() {
        let mut config = Config::default();
        config.explanation.backends.push(BackendConfig {
            name: "local".to_string(),
            base_url: "http://localhost:8000/v1".to_string(),
            model: "m".to_string(),
            api_key_env: None,
            timeout_secs: 5,
        });
        let info = ConfigInfo::from_config(&config, &ConfigSources::default());
        assert_eq!(info.explanation_backends, ["local"]);

        config.explanation.enabled = false;
        let info = ConfigInfo::from_config(&config, &ConfigSources::default());
        assert!(info.explanation_backends.is_empty());
    }
}
