//! Serp command: search result snippet preview.

use anyhow::{Context, bail};
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use seo_lens_core::serp::{self, FieldAnalysis, LengthStatus, SerpInput, SerpLimits};

/// Arguments for the `serp` subcommand.
#[derive(Args, Debug)]
pub struct SerpArgs {
    /// Page title.
    #[arg(long)]
    pub title: String,

    /// Meta description.
    #[arg(long, default_value = "")]
    pub description: String,

    /// Page URL, shown as a breadcrumb.
    #[arg(long)]
    pub url: Option<String>,

    /// Focus keyword to look for in the title and description.
    #[arg(long)]
    pub keyword: Option<String>,
}

/// Preview a title and description as a search result.
#[instrument(name = "cmd_serp", skip_all, fields(url = ?args.url))]
pub fn cmd_serp(args: SerpArgs, global_json: bool, limits: &SerpLimits) -> anyhow::Result<()> {
    debug!(
        title_len = args.title.len(),
        description_len = args.description.len(),
        "executing serp command"
    );

    let input = SerpInput {
        title: args.title,
        description: args.description,
        url: args.url,
        keyword: args.keyword,
    };
    let preview = serp::simulate(&input, limits).context("failed to build search preview")?;

    if global_json {
        println!("{}", serde_json::to_string_pretty(&preview)?);
        return Ok(());
    }

    println!("{}", "Search preview".bold().underline());
    if let Some(ref url) = preview.url {
        println!("  {}", url.breadcrumb.dimmed());
    }
    println!("  {}", preview.title.display.blue().bold());
    println!("  {}", preview.description.display);
    println!();
    print_field("Title", &preview.title);
    print_field("Description", &preview.description);

    if !preview.is_good() {
        let problems: Vec<String> = [("title", &preview.title), ("description", &preview.description)]
            .into_iter()
            .filter(|(_, field)| field.status != LengthStatus::Good)
            .map(|(name, field)| format!("{name} {}", describe(field)))
            .collect();
        bail!("{}", problems.join("; "));
    }

    println!("{} title and description fit", "PASS:".green());
    Ok(())
}

fn print_field(label: &str, field: &FieldAnalysis) {
    let status = match field.status {
        LengthStatus::Good => "good".green().to_string(),
        LengthStatus::TooLong => "too long".red().to_string(),
        LengthStatus::TooShort => "too short".yellow().to_string(),
        LengthStatus::Empty => "empty".red().to_string(),
    };
    let keyword = match field.has_keyword {
        Some(true) => ", keyword present",
        Some(false) => ", keyword missing",
        None => "",
    };
    println!(
        "{}: {} characters ({}–{}), {}{}",
        label.dimmed(),
        field.length,
        field.min,
        field.max,
        status,
        keyword,
    );
}

fn describe(field: &FieldAnalysis) -> String {
    match field.status {
        LengthStatus::Empty => "is empty".to_string(),
        LengthStatus::TooShort => format!(
            "is too short ({} characters, min {})",
            field.length, field.min
        ),
        LengthStatus::TooLong => format!(
            "is too long ({} characters, max {}) and will be truncated",
            field.length, field.max
        ),
        LengthStatus::Good => "fits".to_string(),
    }
}
