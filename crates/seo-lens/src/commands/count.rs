//! Count command: word counts, reading time, and readability.

use anyhow::bail;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use seo_lens_core::counter::{self, TextStats};

use super::{is_markdown, read_input_file};

/// Arguments for the `count` subcommand.
#[derive(Args, Debug)]
pub struct CountArgs {
    /// File to count.
    pub file: Utf8PathBuf,

    /// Maximum acceptable Flesch-Kincaid grade level.
    #[arg(long)]
    pub max_grade: Option<f64>,
}

/// Count words and score readability of a file.
#[instrument(name = "cmd_count", skip_all, fields(file = %args.file))]
pub fn cmd_count(
    args: CountArgs,
    global_json: bool,
    config_max_grade: Option<f64>,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(file = %args.file, max_grade = ?args.max_grade, "executing count command");

    let content = read_input_file(&args.file, max_input_bytes)?;

    let max_grade = args.max_grade.or(config_max_grade);
    let stats = counter::count_text(&content, is_markdown(&args.file), max_grade);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    print_stats(&args.file, &stats);

    if stats.over_max
        && let Some(ref r) = stats.readability
    {
        bail!(
            "{} scores grade {:.1} (max: {:.0}). Shorten sentences or use simpler words.",
            args.file,
            r.grade,
            stats.max_grade.unwrap_or_default(),
        );
    } else if let Some(max) = stats.max_grade
        && let Some(ref r) = stats.readability
    {
        println!(
            "{} {} scores grade {:.1} (max: {:.0})",
            "PASS:".green(),
            args.file,
            r.grade,
            max,
        );
    }

    Ok(())
}

fn print_stats(file: &Utf8Path, stats: &TextStats) {
    println!("{}", file.bold());
    println!(
        "  {} {} words, {} sentences, {} paragraphs",
        "Counts:".cyan(),
        stats.words,
        stats.sentences,
        stats.paragraphs,
    );
    println!(
        "  {} {} ({} without spaces)",
        "Characters:".cyan(),
        stats.characters,
        stats.characters_no_spaces,
    );
    println!(
        "  {} {:.2} characters per word, {:.2} words per sentence",
        "Averages:".cyan(),
        stats.avg_word_length,
        stats.avg_sentence_length,
    );
    println!(
        "  {} {} to read, {} to speak",
        "Time:".cyan(),
        format_duration(stats.reading_time_seconds),
        format_duration(stats.speaking_time_seconds),
    );
    match stats.readability {
        Some(ref r) => println!(
            "  {} ease {:.1} ({}), grade {:.1}",
            "Readability:".cyan(),
            r.reading_ease,
            r.ease_label,
            r.grade,
        ),
        None => println!("  {} {}", "Readability:".cyan(), "not enough text".dimmed()),
    }
}

/// `95` → `1m 35s`, `40` → `40s`.
fn format_duration(seconds: u64) -> String {
    match (seconds / 60, seconds % 60) {
        (0, s) => format!("{s}s"),
        (m, 0) => format!("{m}m"),
        (m, s) => format!("{m}m {s}s"),
    }
}
