use pulldown_cmark::{Event, Tag, CodeBlockKind, TagEnd};
use syntect::html::{ClassedHTMLGenerator, ClassStyle};
use syntect::parsing::{SyntaxSet, SyntaxReference};
use syntect::util::LinesWithEndings;
use once_cell::sync::Lazy;
use pulldown_cmark_escape::escape_html;

use super::Plugin;

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);

/// Highlights fenced code blocks with CSS classes (`<span class="source
/// rust">`), leaving the colors to the site's stylesheet.
#[derive(Default, Clone, Copy)]
pub struct SyntaxHighlight;

pub struct Highlighter<I> {
    block: Option<CodeBlock>,
    inner: I,
}

struct CodeBlock {
    lang: Option<String>,
    code: String,
}

impl SyntaxHighlight {
    /// Loads the syntax definitions in the background so the first
    /// highlighted block doesn't pay for it.
    #[inline]
    pub fn warm_up() {
        rayon::spawn(|| { Lazy::force(&SYNTAX_SET); });
    }
}

impl Plugin for SyntaxHighlight {
    fn remap<'a, I>(&'a mut self, events: I) -> impl Iterator<Item = Event<'a>> + 'a
        where I: Iterator<Item = Event<'a>> + 'a
    {
        Highlighter { block: None, inner: events }
    }
}

fn html_generator(syntax: &SyntaxReference) -> ClassedHTMLGenerator<'_> {
    ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, ClassStyle::Spaced)
}

fn highlight_with(syntax: &SyntaxReference, code: &str) -> Result<String, syntect::Error> {
    let mut generator = html_generator(syntax);
    for line in LinesWithEndings::from(code) {
        generator.parse_html_for_line_which_includes_newline(line)?;
    }

    Ok(generator.finalize())
}

/// Returns `code` as highlighted HTML.
///
/// `lang` picks the syntax. When it is missing, unknown, or fails, the syntax
/// is guessed from the first line (a shebang, `<?xml`, and so on). When that
/// fails too the code is HTML-escaped as is.
pub fn highlight(code: &str, lang: Option<&str>) -> String {
    if let Some(lang) = lang {
        match SYNTAX_SET.find_syntax_by_token(lang) {
            Some(syntax) => match highlight_with(syntax, code) {
                Ok(html) => return html,
                Err(e) => log::warn!("failed to highlight `{lang}` code block: {e}"),
            },
            None => log::debug!("no syntax for code block language `{lang}`"),
        }
    }

    let detected = SYNTAX_SET.find_syntax_by_first_line(code)
        .and_then(|syntax| highlight_with(syntax, code).ok());

    detected.unwrap_or_else(|| {
        let mut html = String::with_capacity(code.len());
        let _ = escape_html(&mut html, code);
        html
    })
}

fn code_block_html(block: CodeBlock) -> String {
    let code = highlight(&block.code, block.lang.as_deref());
    let mut html = String::from("<pre><code");
    if let Some(lang) = &block.lang {
        html.push_str(" class=\"language-");
        let _ = escape_html(&mut html, lang);
        html.push('"');
    }

    html.push('>');
    html.push_str(&code);
    html.push_str("</code></pre>\n");
    html
}

impl<'a, I: Iterator<Item = Event<'a>>> Iterator for Highlighter<I> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                    let lang = info.split(|c: char| c == ',' || c.is_whitespace())
                        .next()
                        .filter(|lang| !lang.is_empty())
                        .map(String::from);

                    self.block = Some(CodeBlock { lang, code: String::new() });
                }
                Event::Text(text) if self.block.is_some() => {
                    if let Some(block) = self.block.as_mut() {
                        block.code.push_str(&text);
                    }
                }
                Event::End(TagEnd::CodeBlock) if self.block.is_some() => {
                    let block = self.block.take()?;
                    return Some(Event::Html(code_block_html(block).into()));
                },
                ev => return Some(ev),
            }
        }
    }
}
