pub mod minijinja;

use std::fmt::Debug;
use std::path::Path;

use serde::Serialize;

use crate::article::Article;
use crate::error::Result;
use crate::seo::SeoMetadata;

pub const ARTICLE_TEMPLATE: &str = "article.html";
pub const INDEX_TEMPLATE: &str = "blog-index.html";

/// The context a page template is rendered with.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum Page<'a> {
    /// One article: `article`, `seo`, and the pre-rendered `metaTags` HTML.
    Article {
        article: &'a Article,
        seo: &'a SeoMetadata,
        #[serde(rename = "metaTags")]
        meta_tags: &'a str,
    },
    /// The blog index: `articles`, newest first.
    Index {
        articles: &'a [Article],
    },
}

pub trait EngineInit {
    type Engine: Engine + 'static;

    /// Creates an engine loading templates from `template_dir`, with
    /// `globals` available to every template as `G`.
    fn init<G: Serialize>(template_dir: &Path, globals: G) -> Self::Engine;
}

pub trait Engine: Send + Sync + Debug {
    /// Loads and compiles each named template, failing on the first that is
    /// missing or malformed.
    fn check(&self, names: &[&str]) -> Result<()>;

    fn render(&self, name: &str, page: &Page<'_>) -> Result<String>;
}
