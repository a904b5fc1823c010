//! Density command: keyword density and top phrases.

use anyhow::bail;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use seo_lens_core::Config;
use seo_lens_core::density::{DensityReport, NGramSize, Prominence};
use seo_lens_core::markdown;

use super::{is_markdown, read_input_file};

/// Arguments for the `density` subcommand.
#[derive(Args, Debug)]
pub struct DensityArgs {
    /// File to analyze.
    pub file: Utf8PathBuf,

    /// Keyword or phrase to measure (case-insensitive).
    #[arg(short, long)]
    pub target: Option<String>,

    /// Words per ranked phrase.
    #[arg(short, long, value_enum)]
    pub ngram: Option<NGramSize>,

    /// Maximum acceptable target density, in percent.
    #[arg(long)]
    pub max_density: Option<f64>,
}

/// Measure keyword density in a file.
#[instrument(name = "cmd_density", skip_all, fields(file = %args.file))]
pub fn cmd_density(
    args: DensityArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(
        file = %args.file,
        target = ?args.target,
        ngram = ?args.ngram,
        "executing density command"
    );

    let content = read_input_file(&args.file, max_input_bytes)?;
    let text = if is_markdown(&args.file) {
        markdown::to_plain_text(&content)
    } else {
        content
    };

    let ngram = args.ngram.or(config.ngram_size).unwrap_or_default();
    let max_density = args.max_density.or(config.max_density_percent);

    let report = config
        .density
        .analyzer()
        .analyze(&text, args.target.as_deref(), ngram)
        .with_max_density(max_density);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&args.file, &report, ngram);

    if report.over_max {
        bail!(
            "{}: \"{}\" density is {:.2}% (max: {:.2}%). Use it less often to avoid keyword stuffing.",
            args.file,
            report.target_phrase.as_deref().unwrap_or_default(),
            report.target_density_percent,
            report.max_density_percent.unwrap_or_default(),
        );
    } else if let Some(max) = report.max_density_percent
        && report.target_phrase.is_some()
    {
        println!(
            "{} {} target density {:.2}% (max: {:.2}%)",
            "PASS:".green(),
            args.file,
            report.target_density_percent,
            max,
        );
    }

    Ok(())
}

fn print_report(file: &Utf8Path, report: &DensityReport, ngram: NGramSize) {
    println!("{}", file.bold());
    println!(
        "  {} {} words, {} characters ({} without spaces)",
        "Length:".cyan(),
        report.total_words,
        report.total_characters,
        report.characters_no_spaces,
    );

    if let Some(ref target) = report.target_phrase {
        let prominence = match report.prominence {
            Prominence::FoundEarly => report.prominence.message().green().to_string(),
            Prominence::FoundLate => report.prominence.message().yellow().to_string(),
            Prominence::NotFound => report.prominence.message().red().to_string(),
        };
        println!(
            "  {} \"{}\" {} times, {:.2}% density, {}",
            "Target:".cyan(),
            target,
            report.target_count,
            report.target_density_percent,
            prominence,
        );
    }

    let label = if ngram == NGramSize::One {
        "Top words:".to_string()
    } else {
        format!("Top {ngram}-word phrases:")
    };
    if report.top_phrases.is_empty() {
        println!("  {} {}", label.cyan(), "none repeated".dimmed());
        return;
    }
    println!("  {}", label.cyan());
    let width = report
        .top_phrases
        .iter()
        .map(|p| p.phrase.len())
        .max()
        .unwrap_or(0);
    for (rank, phrase) in report.top_phrases.iter().enumerate() {
        println!(
            "    {:>2}. {:<width$}  {:>4}  {:>6.2}%",
            rank + 1,
            phrase.phrase,
            phrase.count,
            phrase.density_percent,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args_for(dir: &TempDir, body: &str) -> DensityArgs {
        let path = dir.path().join("page.txt");
        fs::write(&path, body).unwrap();
        DensityArgs {
            file: Utf8PathBuf::try_from(path).unwrap(),
            target: Some("seo".to_string()),
            ngram: None,
            max_density: None,
        }
    }

    #[test]
    fn text_output_succeeds() {
        let tmp = TempDir::new().unwrap();
        let args = args_for(&tmp, "SEO is great. SEO helps you rank. I love SEO strategy.");
        assert!(cmd_density(args, false, &Config::default(), None).is_ok());
    }

    #[test]
    fn over_max_density_fails() {
        let tmp = TempDir::new().unwrap();
        let mut args = args_for(&tmp, "SEO is great. SEO helps you rank. I love SEO strategy.");
        args.max_density = Some(5.0);
        let err = cmd_density(args, false, &Config::default(), None).unwrap_err();
        assert!(err.to_string().contains("keyword stuffing"));
    }

    #[test]
    fn json_output_does_not_gate() {
        let tmp = TempDir::new().unwrap();
        let mut args = args_for(&tmp, "SEO is great. SEO helps you rank. I love SEO strategy.");
        args.max_density = Some(5.0);
        assert!(cmd_density(args, true, &Config::default(), None).is_ok());
    }

    #[test]
    fn config_max_density_applies() {
        let tmp = TempDir::new().unwrap();
        let args = args_for(&tmp, "SEO is great. SEO helps you rank. I love SEO strategy.");
        let config = Config {
            max_density_percent: Some(10.0),
            ..Config::default()
        };
        assert!(cmd_density(args, false, &config, None).is_err());
    }
}
