use pulldown_cmark::{Event, Tag};
use pulldown_cmark_escape::{escape_href, escape_html};

use super::Plugin;

/// Makes links to other sites open in a new tab without handing the new
/// page a reference to this one.
#[derive(Default, Clone, Copy)]
pub struct ExternalLinks;

/// Whether `url` points off-site: an absolute `http` or `https` URL.
pub fn is_external(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// The opening `<a>` tag for an external link, with `href` encoded the way
/// `push_html` encodes the links it writes itself.
fn external_anchor(dest_url: &str, title: &str) -> String {
    let mut html = String::from("<a href=\"");
    let _ = escape_href(&mut html, dest_url);
    if !title.is_empty() {
        html.push_str("\" title=\"");
        let _ = escape_html(&mut html, title);
    }

    html.push_str("\" target=\"_blank\" rel=\"noopener noreferrer\">");
    html
}

impl Plugin for ExternalLinks {
    fn remap<'a, I>(&'a mut self, events: I) -> impl Iterator<Item = Event<'a>> + 'a
        where I: Iterator<Item = Event<'a>> + 'a
    {
        events.map(|event| match event {
            Event::Start(Tag::Link { dest_url, title, .. }) if is_external(&dest_url) => {
                Event::InlineHtml(external_anchor(&dest_url, &title).into())
            }
            event => event,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn href_is_percent_encoded() {
        assert_eq!(external_anchor("https://e.com/a b/ä", ""),
            "<a href=\"https://e.com/a%20b/%C3%A4\" target=\"_blank\" rel=\"noopener noreferrer\">");
    }

    #[test]
    fn title_is_escaped() {
        assert_eq!(external_anchor("https://e.com/?a=1&b=2", "\"Q\" & A"),
            "<a href=\"https://e.com/?a=1&amp;b=2\" title=\"&quot;Q&quot; &amp; A\" \
            target=\"_blank\" rel=\"noopener noreferrer\">");
    }
}
