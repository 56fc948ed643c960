use std::path::Path;

use minijinja::{Environment, path_loader};
use minijinja::value::Value;
use serde::Serialize;

use crate::error::{Chainable, Result};
use crate::templating::{Engine, EngineInit, Page};

#[derive(Debug)]
pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl EngineInit for MiniJinjaEngine {
    type Engine = Self;

    fn init<G: Serialize>(template_dir: &Path, globals: G) -> Self::Engine {
        let mut env = Environment::new();
        env.set_loader(path_loader(template_dir));
        env.add_global("G", Value::from_serialize(&globals));
        env.add_filter("date", ext::date);
        env.add_filter("slugify", ext::slugify);
        MiniJinjaEngine { env }
    }
}

impl Engine for MiniJinjaEngine {
    fn check(&self, names: &[&str]) -> Result<()> {
        for name in names {
            self.env.get_template(name).chain_with(|| error! {
                "failed to load template",
                "template" => name,
            })?;
        }

        Ok(())
    }

    fn render(&self, name: &str, page: &Page<'_>) -> Result<String> {
        let template = self.env.get_template(name)?;
        template.render(page).chain_with(|| error! {
            "failed to render template",
            "template" => name,
        })
    }
}

mod ext {
    use crate::article::{format_date_with, DISPLAY_DATE_FORMAT};

    /// `{{ article.date|date }}`, `{{ article.date|date("%Y") }}`
    pub fn date(value: &str, fmt: Option<&str>) -> String {
        format_date_with(value, fmt.unwrap_or(DISPLAY_DATE_FORMAT))
    }

    pub fn slugify(value: &str) -> String {
        crate::util::slugify(value)
    }
}

impl_error_detail_with_std_error!(minijinja::Error);

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::article::Article;
    use crate::seo::{generate_seo_tags, render_meta_tags, SiteInfo};
    use crate::value::Num;

    fn article(slug: &str, date: &str) -> Article {
        Article {
            slug: slug.into(),
            title: format!("Title of {slug}"),
            date: date.into(),
            date_formatted: crate::article::format_date(date),
            excerpt: "An <excerpt>.".into(),
            tags: vec!["Rust Lang".into(), "web".into()],
            read_time: Num::Int(4),
            image: None,
            html_content: "<p>Body</p>".into(),
        }
    }

    fn engine(templates: &[(&str, &str)]) -> (tempfile::TempDir, MiniJinjaEngine) {
        let dir = tempfile::tempdir().unwrap();
        for (name, source) in templates {
            fs::write(dir.path().join(name), source).unwrap();
        }

        let engine = MiniJinjaEngine::init(dir.path(), SiteInfo::default());
        (dir, engine)
    }

    #[test]
    fn renders_article_page() {
        let (_dir, engine) = engine(&[("article.html",
            "<title>{{ seo.title }}</title>\n{{ metaTags|safe }}\n{{ article.htmlContent|safe }}\n\
            {{ article.excerpt }} {{ article.dateFormatted }} {{ G.author }}")]);

        let article = article("a", "2025-01-15");
        let seo = generate_seo_tags(&article, &SiteInfo::default());
        let meta_tags = render_meta_tags(&seo);
        let page = Page::Article { article: &article, seo: &seo, meta_tags: &meta_tags };

        let html = engine.render("article.html", &page).unwrap();
        assert!(html.starts_with("<title>Title of a | Francesco Anzalone</title>\n<meta property=\"og:type\""));
        assert!(html.contains("<p>Body</p>"));
        assert!(html.contains("An &lt;excerpt&gt;. January 15, 2025 Francesco Anzalone"), "{html}");
    }

    #[test]
    fn renders_index_with_filters() {
        let (_dir, engine) = engine(&[("blog-index.html",
            "{% for a in articles %}{{ a.slug }}:{{ a.date|date(\"%Y\") }}:{{ a.tags[0]|slugify }};{% endfor %}")]);

        let articles = [article("new", "2025-06-01"), article("old", "2024-01-01")];
        let html = engine.render("blog-index.html", &Page::Index { articles: &articles }).unwrap();
        assert_eq!(html, "new:2025:rust-lang;old:2024:rust-lang;");

        let html = engine.render("blog-index.html", &Page::Index { articles: &[] }).unwrap();
        assert_eq!(html, "");
    }

    #[test]
    fn check_reports_missing_and_malformed_templates() {
        let (_dir, engine) = engine(&[("good.html", "ok"), ("bad.html", "{% for %}")]);

        assert!(engine.check(&["good.html"]).is_ok());

        let error = engine.check(&["good.html", "missing.html"]).unwrap_err();
        assert_eq!(error.message(), "failed to load template");
        assert!(error.to_string().contains("template: missing.html"));

        let error = engine.check(&["bad.html"]).unwrap_err();
        assert!(error.to_string().contains("template: bad.html"));
    }
}
