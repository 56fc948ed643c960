use std::process::ExitCode;
use std::time::Instant;

use folio::error::Result;
use folio::markdown::SyntaxHighlight;
use folio::templating::minijinja::MiniJinjaEngine;

use crate::config::Settings;
use crate::render::{Generator, Report};

mod config;
mod discover;
mod render;

pub const CONFIG_FILE: &str = "quill.toml";

mod flags {
    use std::path::PathBuf;

    xflags::xflags! {
        /// Generate the blog: one page per published article plus an index.
        cmd quill {
            /// Site root; relative paths are resolved against it. Defaults
            /// to the current directory.
            optional root: PathBuf
            /// Configuration file. Defaults to `quill.toml` in the root.
            optional -c, --config path: PathBuf
            /// Directory holding the Markdown articles.
            optional --content dir: PathBuf
            /// Directory the HTML pages are written to.
            optional -o, --output dir: PathBuf
            /// Directory holding `article.html` and `blog-index.html`.
            optional -t, --templates dir: PathBuf
            /// Origin the site is served from, used in SEO tags.
            optional --base-url url: String
            /// Log every stage.
            optional -v, --verbose
        }
    }
}

fn run(flags: &flags::Quill) -> Result<Report> {
    let settings = Settings::load(flags)?;
    log::debug!("settings: {settings:#?}");

    let generator = Generator::new::<MiniJinjaEngine>(settings)?;
    generator.generate()
}

pub fn main() -> ExitCode {
    let flags = flags::Quill::from_env_or_exit();

    let default_filter = if flags.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();

    SyntaxHighlight::warm_up();
    let start = Instant::now();
    match run(&flags) {
        Ok(report) => {
            log::info!("blog generation complete in {}ms", start.elapsed().as_millis());
            log::info!("{} article(s) processed", report.processed);
            if report.drafts > 0 {
                log::info!("{} draft(s) skipped", report.drafts);
            }

            if report.errors > 0 {
                log::error!("{} error(s) encountered", report.errors);
                return ExitCode::FAILURE;
            }

            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("blog generation failed:\n{e}");
            ExitCode::FAILURE
        }
    }
}
