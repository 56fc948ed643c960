//! Front matter: the metadata block at the top of a content file.
//!
//! A block opens with a line that is exactly `---` (YAML) or `+++` (TOML) and
//! closes at the next line equal to the opening delimiter:
//!
//! ```text
//! ---
//! title: Hello
//! tags: [a, b]
//! ---
//! Body text starts here.
//! ```
//!
//! [`parse()`] splits a file into its decoded mapping and its body.
//! [`Frontmatter::validate()`] checks the mapping against the article schema.

mod schema;

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::error::{ErrorDetail, Result};
use crate::value::{Dict, Format, Toml, Value, Yaml};

pub use schema::*;

const BOM: char = '\u{feff}';

/// The front matter in `file` could not be split out or decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub file: String,
    pub reason: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse front matter in {}: {}", self.file, self.reason)
    }
}

impl std::error::Error for ParseError { }

impl ErrorDetail for ParseError { }

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    Yaml,
    Toml,
}

impl Delimiter {
    fn from_line(line: &str) -> Option<Self> {
        match line.trim_end() {
            "---" => Some(Delimiter::Yaml),
            "+++" => Some(Delimiter::Toml),
            _ => None,
        }
    }

    fn decode(self, block: &str) -> Result<Value, String> {
        fn decode<F: Format, T: DeserializeOwned>(block: &str) -> Result<T, String> {
            F::from_str(block).map_err(|e| format!("invalid {}: {}", F::NAME, e.to_string().trim_end()))
        }

        match self {
            Delimiter::Yaml => decode::<Yaml, _>(block),
            Delimiter::Toml => decode::<Toml, _>(block),
        }
    }
}

/// Splits `input` into its decoded front-matter mapping and its body.
///
/// A leading byte-order mark is ignored. Input without an opening delimiter
/// has an empty mapping and is all body. The returned body borrows `input`
/// and is everything after the closing delimiter's line, unmodified.
///
/// `file` names the input in errors.
///
/// ```
/// use folio::frontmatter::parse;
///
/// let (meta, body) = parse("---\ntitle: Hi\n---\n# Hi\n", "hi.md").unwrap();
/// assert_eq!(meta["title"].as_str(), Some("Hi"));
/// assert_eq!(body, "# Hi\n");
///
/// let (meta, body) = parse("just text", "plain.md").unwrap();
/// assert!(meta.is_empty());
/// assert_eq!(body, "just text");
/// ```
pub fn parse<'a>(input: &'a str, file: &str) -> Result<(Dict, &'a str), ParseError> {
    let input = input.strip_prefix(BOM).unwrap_or(input);
    let error = |reason: String| ParseError { file: file.into(), reason };

    let (first, rest) = input.split_once('\n').unwrap_or((input, ""));
    let Some(delimiter) = Delimiter::from_line(first) else {
        return Ok((Dict::new(), input));
    };

    let mut offset = 0;
    let mut closing = None;
    for line in rest.split_inclusive('\n') {
        if Delimiter::from_line(line) == Some(delimiter) {
            closing = Some((offset, offset + line.len()));
            break;
        }

        offset += line.len();
    }

    let Some((block_end, body_start)) = closing else {
        return Err(error(format!("unterminated block; expected a closing `{}` line", first.trim_end())));
    };

    let block = &rest[..block_end];
    let body = &rest[body_start..];
    let blank = |line: &str| line.trim().is_empty() || line.trim_start().starts_with('#');
    if block.lines().all(blank) {
        return Ok((Dict::new(), body));
    }

    match delimiter.decode(block).map_err(error)? {
        Value::Null => Ok((Dict::new(), body)),
        Value::Dict(dict) => Ok((Arc::unwrap_or_clone(dict), body)),
        other => Err(error(format!("expected a mapping, found {}", other.kind()))),
    }
}

/// Writes `dict` as a YAML front-matter block followed by `body`.
///
/// `parse()` of the result yields `dict` and `body` again.
pub fn stringify(dict: &Dict, body: &str) -> Result<String> {
    let mut output = String::from("---\n");
    if !dict.is_empty() {
        output.push_str(&serde_yaml_ng::to_string(dict)?);
    }

    if !output.ends_with('\n') {
        output.push('\n');
    }

    output.push_str("---\n");
    output.push_str(body);
    Ok(output)
}
