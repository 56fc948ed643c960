use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::frontmatter::Frontmatter;
use crate::markdown::Markdown;
use crate::value::Num;

/// Display format for article dates: `January 15, 2025`.
pub const DISPLAY_DATE_FORMAT: &str = "%B %-d, %Y";

/// A published article, ready for its template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub date_formatted: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub read_time: Num,
    pub image: Option<String>,
    pub html_content: String,
}

impl Article {
    /// Builds the article for `slug` from validated front matter and its
    /// Markdown body.
    pub fn new(slug: impl Into<String>, frontmatter: Frontmatter, body: &str) -> Self {
        let html_content = Markdown::from(body).render();
        Article {
            slug: slug.into(),
            date_formatted: format_date(&frontmatter.date),
            title: frontmatter.title,
            date: frontmatter.date,
            excerpt: frontmatter.excerpt,
            tags: frontmatter.tags,
            read_time: frontmatter.read_time,
            image: frontmatter.image,
            html_content,
        }
    }
}

/// The slug for a content file: its file name without the `.md` extension.
///
/// ```
/// use std::path::Path;
/// use folio::article::slug_for;
///
/// assert_eq!(slug_for(Path::new("content/blog/hello-world.md")).as_deref(), Some("hello-world"));
/// assert_eq!(slug_for(Path::new("notes.txt")).as_deref(), Some("notes.txt"));
/// ```
pub fn slug_for(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    Some(name.strip_suffix(".md").unwrap_or(name).to_string())
}

/// Formats a `YYYY-MM-DD` date for display. Dates that don't parse, such
/// as `2025-02-30`, are returned as is.
pub fn format_date(date: &str) -> String {
    format_date_with(date, DISPLAY_DATE_FORMAT)
}

/// Like [`format_date()`] with a `chrono` strftime `format`.
pub fn format_date_with(date: &str, format: &str) -> String {
    use std::fmt::Write;

    let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
        return date.to_string();
    };

    let mut output = String::new();
    match write!(output, "{}", parsed.format(format)) {
        Ok(()) => output,
        Err(_) => date.to_string(),
    }
}
