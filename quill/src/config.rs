use std::path::{Path, PathBuf};

use serde::Deserialize;

use folio::error::Result;
use folio::seo::SiteInfo;
use folio::value::{Format, Toml};

use crate::flags::Quill;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub paths: Paths,
    pub site: SiteInfo,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Paths {
    pub content: PathBuf,
    pub output: PathBuf,
    pub templates: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Paths {
            content: "content/blog".into(),
            output: "public/blog".into(),
            templates: "templates".into(),
        }
    }
}

impl Settings {
    /// Reads the configuration file, if any, then applies `flags` on top.
    ///
    /// An explicitly named configuration file must exist; the default one is
    /// optional. Relative paths resolve against the site root.
    pub fn load(flags: &Quill) -> Result<Settings> {
        let root = flags.root.clone().unwrap_or_else(|| PathBuf::from("."));
        let mut settings = match &flags.config {
            Some(path) => Toml::read(path)?,
            None => {
                let path = root.join(crate::CONFIG_FILE);
                match path.is_file() {
                    true => Toml::read(&path)?,
                    false => Settings::default(),
                }
            }
        };

        if let Some(dir) = &flags.content {
            settings.paths.content = dir.clone();
        }

        if let Some(dir) = &flags.output {
            settings.paths.output = dir.clone();
        }

        if let Some(dir) = &flags.templates {
            settings.paths.templates = dir.clone();
        }

        if let Some(url) = &flags.base_url {
            settings.site.base_url = url.clone();
        }

        settings.paths.resolve(&root);
        Ok(settings)
    }
}

impl Paths {
    fn resolve(&mut self, root: &Path) {
        for path in [&mut self.content, &mut self.output, &mut self.templates] {
            if path.is_relative() {
                *path = root.join(&*path);
            }
        }
    }
}
