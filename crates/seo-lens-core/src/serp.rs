//! Search result snippet simulation.
//!
//! Checks a page title and meta description against the lengths search
//! engines typically display, shows how each would be cut off, and renders
//! the page URL as the breadcrumb line shown above the title.
//!
//! Lengths are counted in characters after collapsing whitespace. Engines
//! actually truncate by pixel width, so the limits are approximations.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::density::match_positions;
use crate::error::{AnalysisError, AnalysisResult};
use crate::text;

/// Separator between breadcrumb segments.
pub const BREADCRUMB_SEPARATOR: &str = " › ";

/// Appended to truncated text.
pub const ELLIPSIS: char = '…';

/// Preferred length ranges, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SerpLimits {
    /// Titles shorter than this waste space.
    pub title_min: usize,
    /// Titles longer than this are truncated.
    pub title_max: usize,
    /// Descriptions shorter than this are often replaced by the engine.
    pub description_min: usize,
    /// Descriptions longer than this are truncated.
    pub description_max: usize,
}

impl Default for SerpLimits {
    fn default() -> Self {
        Self {
            title_min: 30,
            title_max: 60,
            description_min: 70,
            description_max: 160,
        }
    }
}

/// What to preview.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SerpInput {
    /// Page title (`<title>`).
    pub title: String,
    /// Meta description.
    pub description: String,
    /// Page URL; a missing scheme is assumed to be `https`.
    #[serde(default)]
    pub url: Option<String>,
    /// Focus keyword to look for in the title and description.
    #[serde(default)]
    pub keyword: Option<String>,
}

/// How a field's length compares to its preferred range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LengthStatus {
    /// Nothing was entered.
    Empty,
    /// Below the minimum.
    TooShort,
    /// Within range.
    Good,
    /// Above the maximum; the displayed text is truncated.
    TooLong,
}

/// Length analysis of a single snippet field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldAnalysis {
    /// Text with whitespace collapsed.
    pub text: String,
    /// Length of `text` in characters.
    pub length: usize,
    /// Preferred minimum.
    pub min: usize,
    /// Preferred maximum.
    pub max: usize,
    /// Where `length` falls relative to the range.
    pub status: LengthStatus,
    /// What a results page would show.
    pub display: String,
    /// Whether `display` was cut short.
    pub truncated: bool,
    /// Whether the focus keyword occurs (absent when no keyword was given).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_keyword: Option<bool>,
}

/// The URL line of a snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UrlPreview {
    /// Normalized absolute URL.
    pub url: String,
    /// Host without a leading `www.`.
    pub host: String,
    /// `host › segment › segment`.
    pub breadcrumb: String,
}

/// A simulated search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SerpPreview {
    /// Title analysis.
    pub title: FieldAnalysis,
    /// Description analysis.
    pub description: FieldAnalysis,
    /// URL line, when a URL was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<UrlPreview>,
}

impl SerpPreview {
    /// Whether both title and description are within their ranges.
    pub fn is_good(&self) -> bool {
        self.title.status == LengthStatus::Good && self.description.status == LengthStatus::Good
    }
}

/// Build a snippet preview.
///
/// Fails only when a URL is given and cannot be parsed into an address with
/// a host.
#[tracing::instrument(skip(input), fields(title_len = input.title.len(), has_url = input.url.is_some()))]
pub fn simulate(input: &SerpInput, limits: &SerpLimits) -> AnalysisResult<SerpPreview> {
    let keyword: Vec<String> = input
        .keyword
        .as_deref()
        .map(text::tokenize)
        .unwrap_or_default();

    let title = analyze_field(&input.title, limits.title_min, limits.title_max, &keyword);
    let description = analyze_field(
        &input.description,
        limits.description_min,
        limits.description_max,
        &keyword,
    );
    let url = input
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(preview_url)
        .transpose()?;

    tracing::debug!(
        title_status = ?title.status,
        description_status = ?description.status,
        "snippet simulated"
    );

    Ok(SerpPreview {
        title,
        description,
        url,
    })
}

fn analyze_field(raw: &str, min: usize, max: usize, keyword: &[String]) -> FieldAnalysis {
    let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let length = text.chars().count();

    let status = if length == 0 {
        LengthStatus::Empty
    } else if length < min {
        LengthStatus::TooShort
    } else if length > max {
        LengthStatus::TooLong
    } else {
        LengthStatus::Good
    };

    let (display, truncated) = if length > max {
        (truncate(&text, max), true)
    } else {
        (text.clone(), false)
    };

    let has_keyword = (!keyword.is_empty()).then(|| {
        let tokens = text::tokenize(&text);
        let haystack: Vec<&str> = tokens.iter().map(String::as_str).collect();
        let needle: Vec<&str> = keyword.iter().map(String::as_str).collect();
        !match_positions(&haystack, &needle).is_empty()
    });

    FieldAnalysis {
        text,
        length,
        min,
        max,
        status,
        display,
        truncated,
        has_keyword,
    }
}

/// Cut `text` so that, with the ellipsis, it fits in `max` characters.
///
/// Prefers the last word boundary; a single over-long word is cut mid-word.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }

    let budget = max.saturating_sub(1);
    let cut = text
        .char_indices()
        .nth(budget)
        .map_or(text.len(), |(i, _)| i);
    let mut head = &text[..cut];

    let breaks_word = !text[cut..].starts_with(char::is_whitespace);
    if breaks_word && let Some(space) = head.rfind(char::is_whitespace) {
        head = &head[..space];
    }

    let head = head.trim_end_matches(|c: char| c.is_whitespace() || ",;:-|–—".contains(c));
    format!("{head}{ELLIPSIS}")
}

fn preview_url(raw: &str) -> AnalysisResult<UrlPreview> {
    let parsed = match Url::parse(raw) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{raw}"))
            .map_err(|e| invalid_url(raw, &e.to_string()))?,
        Err(e) => return Err(invalid_url(raw, &e.to_string())),
    };

    let host = parsed
        .host_str()
        .ok_or_else(|| invalid_url(raw, "URL has no host"))?;
    let host = host.strip_prefix("www.").unwrap_or(host).to_string();

    let mut crumbs = vec![host.clone()];
    if let Some(segments) = parsed.path_segments() {
        crumbs.extend(segments.filter(|s| !s.is_empty()).map(str::to_owned));
    }

    Ok(UrlPreview {
        url: parsed.to_string(),
        host,
        breadcrumb: crumbs.join(BREADCRUMB_SEPARATOR),
    })
}

fn invalid_url(url: &str, reason: &str) -> AnalysisError {
    AnalysisError::InvalidUrl {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, description: &str) -> SerpInput {
        SerpInput {
            title: title.to_string(),
            description: description.to_string(),
            ..SerpInput::default()
        }
    }

    #[test]
    fn good_lengths() {
        let preview = simulate(
            &input(
                "Local SEO Services for Small Businesses | Acme",
                "Get found by nearby customers. Our local SEO audits, citations and review \
                 management help small businesses rank in map results.",
            ),
            &SerpLimits::default(),
        )
        .unwrap();
        assert_eq!(preview.title.status, LengthStatus::Good);
        assert_eq!(preview.description.status, LengthStatus::Good);
        assert!(!preview.title.truncated);
        assert!(preview.is_good());
        assert!(preview.url.is_none());
    }

    #[test]
    fn empty_and_short() {
        let preview = simulate(&input("", "Too short."), &SerpLimits::default()).unwrap();
        assert_eq!(preview.title.status, LengthStatus::Empty);
        assert_eq!(preview.description.status, LengthStatus::TooShort);
        assert!(!preview.is_good());
    }

    #[test]
    fn long_title_is_truncated_at_word_boundary() {
        let title = "The Complete Beginner's Guide to Technical SEO Audits, Crawl Budgets and Log Files";
        let preview = simulate(&input(title, ""), &SerpLimits::default()).unwrap();
        assert_eq!(preview.title.status, LengthStatus::TooLong);
        assert!(preview.title.truncated);
        assert!(preview.title.display.ends_with(ELLIPSIS));
        assert!(preview.title.display.chars().count() <= 60);
        assert_eq!(
            preview.title.display,
            "The Complete Beginner's Guide to Technical SEO Audits…"
        );
    }

    #[test]
    fn whitespace_is_collapsed_before_counting() {
        let preview = simulate(&input("  SEO \n\t Guide  ", ""), &SerpLimits::default()).unwrap();
        assert_eq!(preview.title.text, "SEO Guide");
        assert_eq!(preview.title.length, 9);
    }

    #[test]
    fn truncate_cuts_single_long_word() {
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("one two, three", 10), "one two…");
    }

    #[test]
    fn url_breadcrumb() {
        let mut request = input("Title", "Description");
        request.url = Some("https://www.example.com/blog/local-seo/?ref=x".to_string());
        let preview = simulate(&request, &SerpLimits::default()).unwrap();
        let url = preview.url.unwrap();
        assert_eq!(url.host, "example.com");
        assert_eq!(url.breadcrumb, "example.com › blog › local-seo");
    }

    #[test]
    fn url_without_scheme_assumes_https() {
        let mut request = input("Title", "Description");
        request.url = Some("example.com/pricing".to_string());
        let url = simulate(&request, &SerpLimits::default()).unwrap().url.unwrap();
        assert_eq!(url.url, "https://example.com/pricing");
        assert_eq!(url.breadcrumb, "example.com › pricing");
    }

    #[test]
    fn invalid_url_is_an_error() {
        let mut request = input("Title", "Description");
        request.url = Some("http://exa mple.com".to_string());
        let err = simulate(&request, &SerpLimits::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidUrl { .. }));

        request.url = Some("mailto:someone@example.com".to_string());
        assert!(simulate(&request, &SerpLimits::default()).is_err());
    }

    #[test]
    fn blank_url_is_ignored() {
        let mut request = input("Title", "Description");
        request.url = Some("   ".to_string());
        assert!(simulate(&request, &SerpLimits::default()).unwrap().url.is_none());
    }

    #[test]
    fn keyword_presence() {
        let mut request = input("Local SEO Services | Acme", "We audit local listings.");
        request.keyword = Some("Local SEO".to_string());
        let preview = simulate(&request, &SerpLimits::default()).unwrap();
        assert_eq!(preview.title.has_keyword, Some(true));
        assert_eq!(preview.description.has_keyword, Some(false));

        let preview = simulate(&input("Local SEO", ""), &SerpLimits::default()).unwrap();
        assert!(preview.title.has_keyword.is_none());
    }
}
