//! `seo-lens info`: version plus the settings a run would use.

use clap::Args;
use seo_lens_core::config::{Config, ConfigSources};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    homepage: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
            homepage: env!("CARGO_PKG_HOMEPAGE"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    ngram_size: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_density_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_grade: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_input_bytes: Option<usize>,
    prominence_window: usize,
    max_phrases: usize,
    min_count: usize,
    stop_words: usize,
    title_range: [usize; 2],
    description_range: [usize; 2],
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources) -> Self {
        let policy = config.density.policy().clamped();
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            ngram_size: config.ngram_size.unwrap_or_default().into(),
            max_density_percent: config.max_density_percent,
            max_grade: config.max_grade,
            max_input_bytes: config.input_limit(),
            prominence_window: policy.prominence_window,
            max_phrases: policy.max_phrases,
            min_count: policy.min_count,
            stop_words: config.density.stop_words().len(),
            title_range: [config.serp.title_min, config.serp.title_max],
            description_range: [config.serp.description_min, config.serp.description_max],
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
}

/// Print the package metadata and the effective configuration.
#[instrument(name = "cmd_info", skip_all, fields(json_output = global_json))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    let info = FullInfo {
        package: PackageInfo::new(),
        config: ConfigInfo::from_config(config, sources),
    };
    debug!(config_file = ?info.config.config_file, "collected info");

    if global_json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    print_package(&info.package);
    print_config(&info.config);
    Ok(())
}

fn print_package(package: &PackageInfo) {
    println!("{} {}", package.name.bold(), package.version.green());
    if !package.description.is_empty() {
        println!("{}", package.description);
    }
    for (label, value) in [
        ("License", package.license),
        ("Repository", package.repository),
        ("Homepage", package.homepage),
    ] {
        if !value.is_empty() {
            row(label, value.cyan());
        }
    }
}

fn print_config(config: &ConfigInfo) {
    heading("Configuration");
    match &config.config_file {
        Some(path) => row("Config file", path.cyan()),
        None => row("Config file", "none loaded".yellow()),
    }
    row("Log level", &config.log_level);
    if let Some(dir) = &config.log_dir {
        row("Log directory", dir);
    }

    heading("Density");
    row("N-gram size", config.ngram_size);
    row("Max density %", or_unset(config.max_density_percent.map(|v| format!("{v:.1}"))));
    row(
        "Prominence window",
        format!("first {} words", config.prominence_window),
    );
    row(
        "Top phrases",
        format!("{} (min count {})", config.max_phrases, config.min_count),
    );
    row("Stop words", config.stop_words);

    heading("Gates");
    row("Max grade", or_unset(config.max_grade.map(|v| format!("{v:.1}"))));
    row("Max input bytes", or_unset(config.max_input_bytes.map(|v| v.to_string())));
    let [title_min, title_max] = config.title_range;
    let [desc_min, desc_max] = config.description_range;
    row("Title", format!("{title_min}–{title_max} characters"));
    row("Description", format!("{desc_min}–{desc_max} characters"));
}

fn heading(title: &str) {
    println!();
    println!("{}", title.bold().underline());
}

fn row(label: &str, value: impl std::fmt::Display) {
    println!("{}: {value}", label.dimmed());
}

fn or_unset(value: Option<String>) -> String {
    value.unwrap_or_else(|| "(not set)".dimmed().to_string())
}
