use std::io;
use std::path::{Path, PathBuf};

use spdlog::debug;
use walkdir::WalkDir;

use crate::content::content_file::ContentFile;

pub struct ContentSource {
    pub root_dir: PathBuf,
    pub index_base_name: String,
}

impl ContentSource {
    /// Every markdown file below the root, sorted by path so builds are reproducible
    pub fn retrieve_files(&self) -> io::Result<Vec<PathBuf>> {
        let mut files = vec![];
        for entry in WalkDir::new(&self.root_dir).follow_links(true) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            if Self::is_hidden(entry.path()) {
                continue;
            }
            if ContentFile::is_markdown(entry.path()) {
                files.push(entry.into_path());
            }
        }
        files.sort();
        debug!("Found {} content files in {}", files.len(), self.root_dir.display());
        Ok(files)
    }

    pub fn load(&self) -> io::Result<Vec<ContentFile>> {
        self.retrieve_files()?
            .into_iter()
            .map(|path| ContentFile::from_file(&self.root_dir, path, &self.index_base_name))
            .collect()
    }

    /// Files sitting next to a directory post, excluding other content files
    pub fn retrieve_assets(post_file: &Path) -> io::Result<Vec<PathBuf>> {
        let Some(dir) = post_file.parent() else {
            return Ok(vec![]);
        };

        let mut assets = vec![];
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            if entry.file_type().is_file() && !ContentFile::is_markdown(entry.path()) && !Self::is_hidden(entry.path()) {
                assets.push(entry.into_path());
            }
        }
        assets.sort();
        Ok(assets)
    }

    fn is_hidden(path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with('.'))
            .unwrap_or(false)
    }
}
