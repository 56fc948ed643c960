use std::fs;
use std::path::Path;

use folio::rayon::prelude::*;
use folio::{err, error};
use folio::error::{Chainable, Result};
use folio::article::{slug_for, Article};
use folio::frontmatter::{self, Frontmatter};
use folio::seo::{generate_seo_tags, render_meta_tags};
use folio::templating::{Engine, EngineInit, Page, ARTICLE_TEMPLATE, INDEX_TEMPLATE};

use crate::config::Settings;
use crate::discover::{dircheck, markdown_files};

/// Page name of the blog index; no article may take it.
const INDEX_SLUG: &str = "index";

/// What a run produced.
#[derive(Debug, Default)]
pub struct Report {
    /// Published articles, newest first.
    pub articles: Vec<Article>,
    pub processed: usize,
    pub drafts: usize,
    pub errors: usize,
}

#[derive(Debug)]
pub struct Generator {
    pub settings: Settings,
    engine: Box<dyn Engine>,
}

impl Generator {
    /// Sets up the template engine and checks that both page templates load.
    pub fn new<E: EngineInit>(settings: Settings) -> Result<Self> {
        let templates = &settings.paths.templates;
        dircheck(templates, "template directory")?;

        let engine = Box::new(E::init(templates, &settings.site));
        engine.check(&[ARTICLE_TEMPLATE, INDEX_TEMPLATE])?;
        Ok(Generator { settings, engine })
    }

    /// Renders every article in the content directory, then the index.
    ///
    /// A file that fails is logged and counted in the report; the others
    /// are still written. Errors are returned only for failures that affect
    /// the whole run: the output or content directory, or the index page.
    pub fn generate(&self) -> Result<Report> {
        let paths = &self.settings.paths;
        fs::create_dir_all(&paths.output).chain_with(|| error! {
            "failed to create output directory",
            "path" => paths.output.display(),
        })?;

        let files = markdown_files(&paths.content)?;
        match files.len() {
            0 => log::warn!("no markdown files found in {}", paths.content.display()),
            n => log::info!("found {n} markdown file(s)"),
        }

        let outcomes: Vec<_> = files.par_iter()
            .map(|path| {
                let name = path.file_name().unwrap_or(path.as_os_str()).to_string_lossy();
                let outcome = self.process_file(path, &name);
                match &outcome {
                    Ok(Some(article)) => log::info!("{name} -> {}.html", article.slug),
                    Ok(None) => log::warn!("{name}: skipped draft (published: false)"),
                    Err(e) => log::error!("{name}: {e}"),
                }

                outcome
            })
            .collect();

        let mut report = Report::default();
        for outcome in outcomes {
            match outcome {
                Ok(Some(article)) => {
                    report.processed += 1;
                    report.articles.push(article);
                }
                Ok(None) => report.drafts += 1,
                Err(_) => report.errors += 1,
            }
        }

        // `YYYY-MM-DD` sorts chronologically as text.
        report.articles.sort_by(|a, b| b.date.cmp(&a.date));
        self.write_index(&report.articles)?;
        log::info!("generated blog index page");

        Ok(report)
    }

    /// Renders and writes one article page. Returns `None` for drafts.
    fn process_file(&self, path: &Path, name: &str) -> Result<Option<Article>> {
        let source = fs::read_to_string(path).chain_with(|| error! {
            "failed to read content file",
            "path" => path.display(),
        })?;

        let (meta, body) = frontmatter::parse(&source, name)?;
        let frontmatter = Frontmatter::validate(&meta, name)?;
        if frontmatter.is_draft() {
            return Ok(None);
        }

        let slug = slug_for(path).ok_or_else(|| error! {
            "content file name must be valid UTF-8",
            "path" => path.display(),
        })?;

        if slug == INDEX_SLUG {
            return err! {
                "article would overwrite the blog index",
                "path" => path.display(),
            };
        }

        log::debug!("{name}: rendering markdown");
        let article = Article::new(slug, frontmatter, body);
        let seo = generate_seo_tags(&article, &self.settings.site);
        let meta_tags = render_meta_tags(&seo);
        let page = Page::Article { article: &article, seo: &seo, meta_tags: &meta_tags };
        let html = self.engine.render(ARTICLE_TEMPLATE, &page)?;

        let output = self.settings.paths.output.join(format!("{}.html", article.slug));
        fs::write(&output, html).chain_with(|| error! {
            "failed to write article page",
            "path" => output.display(),
        })?;

        Ok(Some(article))
    }

    fn write_index(&self, articles: &[Article]) -> Result<()> {
        let html = self.engine.render(INDEX_TEMPLATE, &Page::Index { articles })
            .chain_with(|| "failed to render blog index")?;

        let output = self.settings.paths.output.join(format!("{INDEX_SLUG}.html"));
        fs::write(&output, html).chain_with(|| error! {
            "failed to write blog index",
            "path" => output.display(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use folio::seo::SiteInfo;
    use folio::templating::minijinja::MiniJinjaEngine;

    use super::*;
    use crate::config::Paths;

    const ARTICLE_HTML: &str = include_str!("../templates/article.html");
    const INDEX_HTML: &str = include_str!("../templates/blog-index.html");

    struct Site {
        _dir: tempfile::TempDir,
        content: PathBuf,
        output: PathBuf,
        templates: PathBuf,
    }

    impl Site {
        fn new() -> Site {
            let dir = tempfile::tempdir().unwrap();
            let root = dir.path();
            let site = Site {
                content: root.join("content"),
                output: root.join("public/blog"),
                templates: root.join("templates"),
                _dir: dir,
            };

            fs::create_dir_all(&site.content).unwrap();
            fs::create_dir_all(&site.templates).unwrap();
            fs::write(site.templates.join(ARTICLE_TEMPLATE), ARTICLE_HTML).unwrap();
            fs::write(site.templates.join(INDEX_TEMPLATE), INDEX_HTML).unwrap();
            site
        }

        fn post(&self, name: &str, source: &str) -> &Self {
            fs::write(self.content.join(name), source).unwrap();
            self
        }

        fn settings(&self) -> Settings {
            Settings {
                paths: Paths {
                    content: self.content.clone(),
                    output: self.output.clone(),
                    templates: self.templates.clone(),
                },
                site: SiteInfo::default(),
            }
        }

        fn generate(&self) -> Result<Report> {
            Generator::new::<MiniJinjaEngine>(self.settings())?.generate()
        }

        fn read(&self, name: &str) -> String {
            fs::read_to_string(self.output.join(name)).unwrap()
        }
    }

    fn post(title: &str, date: &str, extra: &str) -> String {
        format!("---\ntitle: {title}\ndate: '{date}'\nexcerpt: About {title}.\n\
            tags: [rust, web]\nreadTime: 3\n{extra}---\n\n# {title}\n\n\
            Read more at https://example.com/{title}.\n")
    }

    #[test]
    fn writes_articles_and_index_newest_first() {
        let site = Site::new();
        site.post("older.md", &post("Older", "2025-01-01", ""))
            .post("newer.md", &post("Newer", "2025-06-01", "image: /img/newer.jpg\n"));

        let report = site.generate().unwrap();
        assert_eq!((report.processed, report.drafts, report.errors), (2, 0, 0));

        let slugs: Vec<_> = report.articles.iter().map(|a| &*a.slug).collect();
        assert_eq!(slugs, ["newer", "older"]);

        let index = site.read("index.html");
        let newer = index.find("newer.html").unwrap();
        let older = index.find("older.html").unwrap();
        assert!(newer < older);
        assert!(index.contains("June 1, 2025"));

        let page = site.read("newer.html");
        assert!(page.contains("<title>Newer | Francesco Anzalone</title>"), "{page}");
        assert!(page.contains("<meta property=\"og:image\" \
            content=\"https://francescoanzalone.com/img/newer.jpg\">"), "{page}");
        assert!(page.contains("<h1>Newer</h1>"), "{page}");
        assert!(page.contains("target=\"_blank\" rel=\"noopener noreferrer\""), "{page}");

        let page = site.read("older.html");
        assert!(page.contains("content=\"https://francescoanzalone.com/assets/og-default.jpg\""));
    }

    #[test]
    fn same_date_keeps_file_order() {
        let site = Site::new();
        site.post("b.md", &post("B", "2025-03-03", ""))
            .post("a.md", &post("A", "2025-03-03", ""))
            .post("c.md", &post("C", "2025-04-04", ""));

        let report = site.generate().unwrap();
        let slugs: Vec<_> = report.articles.iter().map(|a| &*a.slug).collect();
        assert_eq!(slugs, ["c", "a", "b"]);
    }

    #[test]
    fn drafts_are_counted_not_written() {
        let site = Site::new();
        site.post("live.md", &post("Live", "2025-01-01", ""))
            .post("draft.md", &post("Draft", "2025-02-01", "published: false\n"));

        let report = site.generate().unwrap();
        assert_eq!((report.processed, report.drafts, report.errors), (1, 1, 0));
        assert!(!site.output.join("draft.html").exists());
        assert!(!site.read("index.html").contains("draft.html"));
    }

    #[test]
    fn bad_files_do_not_stop_the_batch() {
        let site = Site::new();
        site.post("good.md", &post("Good", "2025-01-01", ""))
            .post("invalid.md", "---\ntitle: Missing everything else\n---\nbody")
            .post("broken.md", "---\ntitle: never closed\n")
            .post("bad-date.md", &post("Bad", "January 1st", ""));

        let report = site.generate().unwrap();
        assert_eq!((report.processed, report.drafts, report.errors), (1, 0, 3));
        assert!(site.output.join("good.html").exists());
        assert!(!site.output.join("invalid.html").exists());

        let index = site.read("index.html");
        assert!(index.contains("good.html"));
        assert!(!index.contains("invalid.html"));
    }

    #[test]
    fn index_slug_is_rejected() {
        let site = Site::new();
        site.post("index.md", &post("Index", "2025-05-05", ""))
            .post("other.md", &post("Other", "2025-01-01", ""));

        let report = site.generate().unwrap();
        assert_eq!((report.processed, report.drafts, report.errors), (1, 0, 1));

        assert_eq!(report.articles.len(), 1);
        let index = site.read("index.html");
        assert!(index.contains("href=\"other.html\""), "{index}");
        assert!(!index.contains("href=\"index.html\""), "{index}");
        assert!(!index.contains("<h1>Index</h1>"), "{index}");
    }

    #[test]
    fn dotfiles_are_articles() {
        let site = Site::new();
        site.post(".notes.md", &post("Notes", "2025-01-01", ""));

        let report = site.generate().unwrap();
        assert_eq!(report.articles[0].slug, ".notes");
        assert!(site.output.join(".notes.html").exists());
    }

    #[test]
    fn empty_content_directory_writes_empty_index() {
        let site = Site::new();
        let report = site.generate().unwrap();

        assert!(report.articles.is_empty());
        assert_eq!((report.processed, report.drafts, report.errors), (0, 0, 0));
        assert!(site.read("index.html").contains("No articles yet."));
    }

    #[test]
    fn raw_html_in_articles_is_escaped() {
        let site = Site::new();
        site.post("xss.md", &format!("{}\n<script>alert(1)</script>\n", post("Xss", "2025-01-01", "")));

        site.generate().unwrap();
        let page = site.read("xss.html");
        assert!(!page.contains("<script>"), "{page}");
        assert!(page.contains("&lt;script&gt;"), "{page}");
    }

    #[test]
    fn missing_content_directory_is_fatal() {
        let site = Site::new();
        fs::remove_dir(&site.content).unwrap();

        let error = site.generate().unwrap_err();
        assert_eq!(error.message(), "content directory must point to an existing directory");
        assert!(!site.output.join("index.html").exists());
    }

    #[test]
    fn missing_template_is_fatal() {
        let site = Site::new();
        fs::remove_file(site.templates.join(INDEX_TEMPLATE)).unwrap();

        let error = Generator::new::<MiniJinjaEngine>(site.settings()).unwrap_err();
        assert_eq!(error.message(), "failed to load template");
        assert!(error.to_string().contains(INDEX_TEMPLATE));
    }
}
