use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use folio::{err, error};
use folio::error::Result;

#[track_caller]
pub fn dircheck(path: &Path, what: &str) -> Result<()> {
    match path.metadata() {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => err! {
            format!("{what} path must point to a directory"),
            "path is not a directory" => path.display(),
        },
        Err(e) => err! {
            format!("{what} must point to an existing directory"),
            "path" => path.display(),
            e,
        },
    }
}

/// The `.md` files directly inside `dir`, dotfiles included, sorted by file
/// name. Subdirectories are skipped.
pub fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>> {
    dircheck(dir, "content directory")?;

    let mut files = vec![];
    for entry in WalkDir::new(dir).max_depth(1).sort(true).skip_hidden(false) {
        let entry = entry.map_err(|e| error! {
            "failed to read content directory",
            "path" => dir.display(),
            e,
        })?;

        let path = entry.path();
        if entry.depth == 1 && path.extension().is_some_and(|ext| ext == "md") && path.is_file() {
            files.push(path);
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn finds_top_level_markdown_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.md", "a.md", "notes.txt", ".hidden.md", "c.markdown"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/d.md"), "").unwrap();
        fs::create_dir(dir.path().join("dir.md")).unwrap();

        let files = markdown_files(dir.path()).unwrap();
        let names: Vec<_> = files.iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();

        assert_eq!(names, [".hidden.md", "a.md", "b.md"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let error = markdown_files(&dir.path().join("missing")).unwrap_err();
        assert_eq!(error.message(), "content directory must point to an existing directory");

        let file = dir.path().join("file.md");
        fs::write(&file, "").unwrap();
        let error = markdown_files(&file).unwrap_err();
        assert_eq!(error.message(), "content directory path must point to a directory");
    }
}
