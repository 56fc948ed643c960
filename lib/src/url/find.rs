use std::ops::Range;

use super::is_url_char;

/// A bare URL found in prose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpan {
    /// Byte range of the link text in the searched string.
    pub range: Range<usize>,
    /// The link target. `www.` links are given an `http://` scheme.
    pub href: String,
}

const PREFIXES: &[&str] = &["https://", "http://", "www."];

/// Finds bare `http://`, `https://`, and `www.` URLs in `text`.
///
/// A link must start at a word boundary and have at least one alphanumeric
/// character after its prefix. Trailing punctuation, and closing brackets
/// without a matching opener inside the link, are left out of the link.
///
/// ```
/// use folio::url::find_links;
///
/// let text = "See https://example.com/a_(b). Or www.rust-lang.org!";
/// let links = find_links(text);
/// assert_eq!(&text[links[0].range.clone()], "https://example.com/a_(b)");
/// assert_eq!(links[1].href, "http://www.rust-lang.org");
/// ```
pub fn find_links(text: &str) -> Vec<LinkSpan> {
    let bytes = text.as_bytes();
    let mut links = vec![];
    let mut i = 0;

    while i < bytes.len() {
        let at_boundary = i == 0 || !(bytes[i - 1].is_ascii_alphanumeric() || bytes[i - 1] == b'.');
        let prefix = at_boundary
            .then(|| PREFIXES.iter().find(|p| starts_with_ignore_case(&bytes[i..], p)))
            .flatten();

        let Some(prefix) = prefix else {
            i += 1;
            continue;
        };

        let end = bytes[i..].iter()
            .position(|c| !is_url_char(c))
            .map_or(bytes.len(), |n| i + n);

        let end = trim_trailing(bytes, i, end);
        let host_start = i + prefix.len();
        if end <= host_start || !bytes[host_start..end].iter().any(u8::is_ascii_alphanumeric) {
            i = end.max(i + 1);
            continue;
        }

        let link = &text[i..end];
        let href = match *prefix {
            "www." => format!("http://{link}"),
            _ => link.to_string(),
        };

        links.push(LinkSpan { range: i..end, href });
        i = end;
    }

    links
}

fn starts_with_ignore_case(haystack: &[u8], prefix: &str) -> bool {
    haystack.len() >= prefix.len() && haystack[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Shrinks `start..end` until it ends on a character that belongs to a link.
fn trim_trailing(bytes: &[u8], start: usize, mut end: usize) -> usize {
    while end > start {
        let span = &bytes[start..end];
        let unbalanced = |open: u8, close: u8| {
            let opens = span.iter().filter(|&&c| c == open).count();
            let closes = span.iter().filter(|&&c| c == close).count();
            closes > opens
        };

        match bytes[end - 1] {
            b'.' | b',' | b':' | b';' | b'!' | b'?' | b'\'' | b'*' | b'_' | b'~' => end -= 1,
            b')' if unbalanced(b'(', b')') => end -= 1,
            b']' if unbalanced(b'[', b']') => end -= 1,
            b'}' if unbalanced(b'{', b'}') => end -= 1,
            _ => break,
        }
    }

    end
}
