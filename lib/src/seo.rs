use serde::{Deserialize, Serialize};
use pulldown_cmark_escape::escape_html;

use crate::article::Article;

/// Site-wide facts that SEO tags and templates draw on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfo {
    /// Origin the site is served from, without a trailing `/`.
    pub base_url: String,
    pub author: String,
    /// Site-relative path of the image used when an article has none.
    pub default_image: String,
    pub title: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        SiteInfo {
            base_url: "https://francescoanzalone.com".into(),
            author: "Francesco Anzalone".into(),
            default_image: "/assets/og-default.jpg".into(),
            title: "Blog".into(),
        }
    }
}

impl SiteInfo {
    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// One `<meta>` tag. `key` is the `property` of an Open Graph tag or the
/// `name` of a Twitter tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaTag {
    pub key: &'static str,
    pub content: String,
}

impl MetaTag {
    fn new(key: &'static str, content: impl Into<String>) -> Self {
        MetaTag { key, content: content.into() }
    }

    /// `<meta {attr}="key" content="...">`, with the content escaped.
    fn render(&self, attr: &str) -> String {
        let mut html = format!("  <meta {attr}=\"{}\" content=\"", self.key);
        let _ = escape_html(&mut html, &self.content);
        html.push_str("\">");
        html
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoMetadata {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub keywords: String,
    pub image_url: String,
    pub og_tags: Vec<MetaTag>,
    pub twitter_tags: Vec<MetaTag>,
}

/// Computes the search and social metadata for `article` on `site`.
pub fn generate_seo_tags(article: &Article, site: &SiteInfo) -> SeoMetadata {
    let base = site.base();
    let canonical = format!("{base}/blog/{}.html", article.slug);
    let image_url = match &article.image {
        Some(image) => format!("{base}{image}"),
        None => format!("{base}{}", site.default_image),
    };

    let og_tags = vec![
        MetaTag::new("og:type", "article"),
        MetaTag::new("og:title", &*article.title),
        MetaTag::new("og:description", &*article.excerpt),
        MetaTag::new("og:url", &*canonical),
        MetaTag::new("og:image", &*image_url),
        MetaTag::new("og:image:width", "1200"),
        MetaTag::new("og:image:height", "630"),
        MetaTag::new("article:published_time", &*article.date),
        MetaTag::new("article:author", &*site.author),
    ];

    let twitter_tags = vec![
        MetaTag::new("twitter:card", "summary_large_image"),
        MetaTag::new("twitter:title", &*article.title),
        MetaTag::new("twitter:description", &*article.excerpt),
        MetaTag::new("twitter:image", &*image_url),
    ];

    SeoMetadata {
        title: format!("{} | {}", article.title, site.author),
        description: article.excerpt.clone(),
        keywords: article.tags.join(", "),
        canonical,
        image_url,
        og_tags,
        twitter_tags,
    }
}

/// Renders the Open Graph then the Twitter tags of `seo` as `<meta>`
/// elements, one per line, with escaped content.
pub fn render_meta_tags(seo: &SeoMetadata) -> String {
    let og = seo.og_tags.iter().map(|tag| tag.render("property"));
    let twitter = seo.twitter_tags.iter().map(|tag| tag.render("name"));

    og.chain(twitter)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
