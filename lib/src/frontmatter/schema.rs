use std::fmt;
use std::ops::RangeInclusive;

use serde::Serialize;

use crate::error::ErrorDetail;
use crate::util::is_iso_date;
use crate::value::{Dict, Num, Value};

/// Keys every article's front matter must carry.
pub const REQUIRED_FIELDS: [&str; 5] = ["title", "date", "excerpt", "tags", "readTime"];

pub const MAX_TITLE_CHARS: usize = 70;

/// Excerpt lengths outside this range are legal but logged.
pub const EXCERPT_CHARS: RangeInclusive<usize> = 150..=160;

pub const TAG_COUNT: RangeInclusive<usize> = 2..=6;

/// Front matter that satisfies the article schema.
///
/// Only [`Frontmatter::validate()`] constructs one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frontmatter {
    pub title: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub read_time: Num,
    pub image: Option<String>,
    pub published: bool,
}

/// Every schema violation found in one file's front matter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub file: String,
    pub violations: Vec<String>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid front matter in {}:", self.file)?;
        for violation in &self.violations {
            write!(f, "\n  - {violation}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError { }

impl ErrorDetail for ValidationError { }

impl Frontmatter {
    /// Checks `dict` against the article schema, collecting every violation
    /// rather than stopping at the first.
    ///
    /// An excerpt whose length is outside [`EXCERPT_CHARS`] is logged as a
    /// warning and accepted. `file` names the input in errors and warnings.
    pub fn validate(dict: &Dict, file: &str) -> Result<Frontmatter, ValidationError> {
        let mut violations = vec![];
        let mut violation = |msg: String| violations.push(msg);

        let missing: Vec<&str> = REQUIRED_FIELDS.iter()
            .copied()
            .filter(|key| !dict.contains_key(*key))
            .collect();

        if !missing.is_empty() {
            violation(format!("missing required fields: {}", missing.join(", ")));
        }

        let title = match dict.get("title") {
            None => None,
            Some(Value::String(title)) if !title.is_empty() => {
                let len = title.chars().count();
                if len > MAX_TITLE_CHARS {
                    violation(format!("title must be at most {MAX_TITLE_CHARS} characters (found {len})"));
                }

                Some(title.to_string())
            }
            Some(_) => {
                violation("title must be a non-empty string".into());
                None
            }
        };

        let date = match dict.get("date") {
            None => None,
            Some(Value::String(date)) if is_iso_date(date) => Some(date.to_string()),
            Some(_) => {
                violation("date must be in YYYY-MM-DD format".into());
                None
            }
        };

        let excerpt = match dict.get("excerpt") {
            None => None,
            Some(Value::String(excerpt)) => {
                let len = excerpt.chars().count();
                if !EXCERPT_CHARS.contains(&len) {
                    log::warn!("{file}: excerpt should be {}-{} characters (found {len})",
                        EXCERPT_CHARS.start(), EXCERPT_CHARS.end());
                }

                Some(excerpt.to_string())
            }
            Some(_) => {
                violation("excerpt must be a string".into());
                None
            }
        };

        let tags = match dict.get("tags") {
            None => None,
            Some(Value::Array(tags)) if TAG_COUNT.contains(&tags.len()) => {
                Some(tags.iter().map(|tag| tag.to_string()).collect::<Vec<_>>())
            }
            Some(Value::Array(tags)) => {
                violation(format!("tags must have between {} and {} items (found {})",
                    TAG_COUNT.start(), TAG_COUNT.end(), tags.len()));
                None
            }
            Some(_) => {
                violation("tags must be a sequence".into());
                None
            }
        };

        let read_time = match dict.get("readTime") {
            None => None,
            Some(Value::Num(n)) if n.to_f64() >= 1.0 => Some(*n),
            Some(_) => {
                violation("readTime must be a number greater than or equal to 1".into());
                None
            }
        };

        // An empty or null image means "use the site default".
        let image = match dict.get("image") {
            None | Some(Value::Null) => None,
            Some(Value::String(image)) if image.is_empty() => None,
            Some(Value::String(image)) => Some(image.to_string()),
            Some(_) => {
                violation("image must be a string path".into());
                None
            }
        };

        let published = match dict.get("published") {
            None => true,
            Some(Value::Bool(published)) => *published,
            Some(_) => {
                violation("published must be a boolean".into());
                true
            }
        };

        match (title, date, excerpt, tags, read_time) {
            (Some(title), Some(date), Some(excerpt), Some(tags), Some(read_time))
                if violations.is_empty() =>
            {
                Ok(Frontmatter { title, date, excerpt, tags, read_time, image, published })
            }
            _ => Err(ValidationError { file: file.into(), violations }),
        }
    }

    /// Drafts are valid but are not rendered.
    pub fn is_draft(&self) -> bool {
        !self.published
    }
}
