use pulldown_cmark::{Event, Tag, TagEnd};

use crate::markdown::Markdown;
use super::Plugin;

/// Renders raw HTML in the source as literal, escaped text.
///
/// An HTML block is rendered again as ordinary Markdown with its tags shown
/// as text, so emphasis and links inside it still work.
#[derive(Default, Clone, Copy)]
pub struct EscapeRawHtml;

pub struct Escaper<I> {
    inner: I,
}

impl Plugin for EscapeRawHtml {
    fn remap<'a, I>(&'a mut self, events: I) -> impl Iterator<Item = Event<'a>> + 'a
        where I: Iterator<Item = Event<'a>> + 'a
    {
        Escaper { inner: events }
    }
}

/// Backslash-escapes the `<` opening each line of `block`, which keeps the
/// line from starting another HTML block.
fn literal_tags(block: &str) -> String {
    let mut source = String::with_capacity(block.len() + 8);
    for line in block.split_inclusive('\n') {
        let text = line.trim_start_matches([' ', '\t']);
        source.push_str(&line[..line.len() - text.len()]);
        if text.starts_with('<') {
            source.push('\\');
        }

        source.push_str(text);
    }

    source
}

impl<'a, I: Iterator<Item = Event<'a>>> Iterator for Escaper<I> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next()? {
            Event::Start(Tag::HtmlBlock) => {
                let mut block = String::new();
                for event in self.inner.by_ref() {
                    match event {
                        Event::Html(html) | Event::Text(html) => block.push_str(&html),
                        Event::End(TagEnd::HtmlBlock) => break,
                        _ => {}
                    }
                }

                let html = Markdown::from(&literal_tags(&block)).render();
                Some(Event::Html(html.into()))
            }
            Event::Html(html) | Event::InlineHtml(html) => Some(Event::Text(html)),
            event => Some(event),
        }
    }
}
