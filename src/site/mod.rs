use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{fs, io};

use walkdir::WalkDir;

pub mod builder;
pub mod cms;
pub mod netlify;

/// Writes `contents` to `path`, creating missing parent directories
pub(crate) fn write_file<C: AsRef<[u8]>>(path: &Path, contents: C) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
        .map_err(|e| io::Error::new(e.kind(), format!("Error writing {}: {}", path.display(), e)))
}

pub(crate) fn copy_file(from: &Path, to: &Path) -> io::Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(from, to)
        .map(|_| ())
        .map_err(|e| io::Error::new(e.kind(), format!("Error copying {} to {}: {}", from.display(), to.display(), e)))
}

/// Recursively copies the files of `from` into `to`. Returns the copied destinations.
pub(crate) fn copy_dir(from: &Path, to: &Path) -> io::Result<Vec<PathBuf>> {
    let mut copied = vec![];
    for entry in WalkDir::new(from).follow_links(true) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(from)
            .map_err(|e| io::Error::new(ErrorKind::InvalidInput, e.to_string()))?;
        let target = to.join(relative);
        copy_file(entry.path(), &target)?;
        copied.push(target);
    }
    Ok(copied)
}

/// `/` -> `<out>/index.html`, `/blog/hello/` -> `<out>/blog/hello/index.html`
pub(crate) fn route_dir(output_dir: &Path, route: &str) -> PathBuf {
    let trimmed = route.trim_matches('/');
    if trimmed.is_empty() {
        output_dir.to_path_buf()
    } else {
        output_dir.join(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_dir() {
        let out = Path::new("public");
        assert_eq!(route_dir(out, "/"), PathBuf::from("public"));
        assert_eq!(route_dir(out, "/blog/hello/"), PathBuf::from("public/blog/hello"));
        assert_eq!(route_dir(out, "/tags/rust/page/2/"), PathBuf::from("public/tags/rust/page/2"));
    }

    #[test]
    fn test_copy_dir() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        fs::create_dir_all(src.path().join("icons")).unwrap();
        fs::write(src.path().join("logo.svg"), "<svg/>").unwrap();
        fs::write(src.path().join("icons/github-icon.svg"), "<svg/>").unwrap();

        let copied = copy_dir(src.path(), &dst.path().join("img")).unwrap();
        assert_eq!(copied.len(), 2);
        assert!(dst.path().join("img/logo.svg").is_file());
        assert!(dst.path().join("img/icons/github-icon.svg").is_file());
    }
}
