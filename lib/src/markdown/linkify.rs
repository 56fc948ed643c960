use std::collections::VecDeque;
use std::iter::Peekable;

use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};

use crate::url::find_links;
use super::Plugin;

/// Turns bare URLs in prose into links.
///
/// Text inside links, images, and code blocks is left alone.
#[derive(Default, Clone, Copy)]
pub struct Linkify;

pub struct Linker<'a, I: Iterator<Item = Event<'a>>> {
    inner: Peekable<I>,
    pending: VecDeque<Event<'a>>,
    depth: usize,
}

impl Plugin for Linkify {
    fn remap<'a, I>(&'a mut self, events: I) -> impl Iterator<Item = Event<'a>> + 'a
        where I: Iterator<Item = Event<'a>> + 'a
    {
        Linker { inner: events.peekable(), pending: VecDeque::new(), depth: 0 }
    }
}

impl<'a, I: Iterator<Item = Event<'a>>> Linker<'a, I> {
    /// Pulls any directly following text events into `text`. The parser
    /// splits text at characters that might have been markup.
    fn coalesce(&mut self, text: CowStr<'a>) -> CowStr<'a> {
        let mut joined: Option<String> = None;
        while let Some(Event::Text(_)) = self.inner.peek() {
            if let Some(Event::Text(next)) = self.inner.next() {
                joined.get_or_insert_with(|| text.to_string()).push_str(&next);
            }
        }

        joined.map(CowStr::from).unwrap_or(text)
    }

    fn split(&mut self, text: CowStr<'a>) {
        let links = find_links(&text);
        if links.is_empty() {
            self.pending.push_back(Event::Text(text));
            return;
        }

        let mut last = 0;
        for link in links {
            if link.range.start > last {
                self.pending.push_back(Event::Text(text[last..link.range.start].to_string().into()));
            }

            self.pending.push_back(Event::Start(Tag::Link {
                link_type: LinkType::Autolink,
                dest_url: link.href.into(),
                title: CowStr::Borrowed(""),
                id: CowStr::Borrowed(""),
            }));

            self.pending.push_back(Event::Text(text[link.range.clone()].to_string().into()));
            self.pending.push_back(Event::End(TagEnd::Link));
            last = link.range.end;
        }

        if last < text.len() {
            self.pending.push_back(Event::Text(text[last..].to_string().into()));
        }
    }
}

impl<'a, I: Iterator<Item = Event<'a>>> Iterator for Linker<'a, I> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }

            match self.inner.next()? {
                event@Event::Start(Tag::Link { .. } | Tag::Image { .. } | Tag::CodeBlock(_)) => {
                    self.depth += 1;
                    return Some(event);
                }
                event@Event::End(TagEnd::Link | TagEnd::Image | TagEnd::CodeBlock) => {
                    self.depth = self.depth.saturating_sub(1);
                    return Some(event);
                }
                Event::Text(text) if self.depth == 0 => {
                    let text = self.coalesce(text);
                    self.split(text);
                }
                event => return Some(event),
            }
        }
    }
}
