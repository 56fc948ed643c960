use pulldown_cmark::{Parser, Options};

use crate::markdown::{Plugin, EscapeRawHtml, Linkify, ExternalLinks, SyntaxHighlight};

/// An article body on its way to HTML.
#[derive(Debug, Clone)]
pub struct Markdown<'a> {
    input: &'a str,
    options: Options,
}

impl<'a> Markdown<'a> {
    pub fn from(input: &'a str) -> Self {
        Self {
            input,
            options: Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_SMART_PUNCTUATION,
        }
    }

    /// Renders to HTML through the article plugin chain: raw HTML is
    /// escaped, bare URLs are linked, external links open in a new tab, and
    /// fenced code is highlighted.
    pub fn render(self) -> String {
        let (mut raw, mut linkify) = (EscapeRawHtml, Linkify);
        let (mut external, mut highlight) = (ExternalLinks, SyntaxHighlight);

        let parser = Parser::new_ext(self.input, self.options);
        let events = raw.remap(parser);
        let events = linkify.remap(events);
        let events = external.remap(events);
        let events = highlight.remap(events);

        let mut html = String::with_capacity(self.input.len() + self.input.len() / 2);
        pulldown_cmark::html::push_html(&mut html, events);
        html
    }
}
