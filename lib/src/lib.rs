//! A toolkit for turning a directory of Markdown articles into a static blog.
//!
//! # Overview
//!
//! Each content file is a front-matter block followed by a Markdown body. A
//! file travels through the following stages:
//!
//! 1. [`frontmatter::parse()`] splits it into a decoded mapping and a body.
//! 2. [`Frontmatter::validate()`](frontmatter::Frontmatter::validate) checks
//!    the mapping against the article schema, reporting every violation.
//!    Files with `published: false` are drafts and stop here.
//! 3. [`markdown::Markdown`] renders the body to HTML: raw HTML is escaped,
//!    bare URLs are linked, external links open in a new tab, and fenced code
//!    is highlighted.
//! 4. The result becomes an [`article::Article`], from which
//!    [`seo::generate_seo_tags()`] derives search and social metadata.
//! 5. A [`templating::Engine`] renders the article page, and once all
//!    articles are in, the index page listing them newest first.
//!
//! Every stage except the last is a pure function of its input; reading
//! files and writing pages is left to the caller.

#[macro_use]
pub mod error;
pub mod util;
pub mod value;
pub mod url;
pub mod frontmatter;
pub mod markdown;
pub mod article;
pub mod seo;
pub mod templating;

pub use rayon;
