use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::{fs, io};

pub struct ContentFile {
    pub route: String,
    pub file_path: PathBuf,
    /// Directory posts (`<dir>/index.md`) may carry assets next to them
    pub is_dir_post: bool,
    pub raw_content: String,
}

impl ContentFile {
    pub fn from_file(root_dir: &Path, file_path: PathBuf, index_base_name: &str) -> io::Result<ContentFile> {
        if !Self::is_markdown(&file_path) {
            return Err(io::Error::new(ErrorKind::Unsupported, format!("Not a markdown file: {}", file_path.display())));
        }

        let (route, is_dir_post) = route_for(root_dir, &file_path, index_base_name)?;
        let raw_content = fs::read_to_string(&file_path)?;

        Ok(ContentFile {
            route,
            file_path,
            is_dir_post,
            raw_content,
        })
    }

    pub fn is_markdown(file_name: &Path) -> bool {
        matches!(file_name.extension().and_then(|e| e.to_str()), Some("md") | Some("markdown"))
    }
}

/// `blog/hello.md` -> `/blog/hello/`, `blog/hello/index.md` -> `/blog/hello/`, `index.md` -> `/`
pub fn route_for(root_dir: &Path, file_path: &Path, index_base_name: &str) -> io::Result<(String, bool)> {
    let relative = file_path.strip_prefix(root_dir).map_err(|_| {
        io::Error::new(ErrorKind::InvalidInput, format!("{} is outside of {}", file_path.display(), root_dir.display()))
    })?;

    let mut parts = vec![];
    for component in relative.parent().unwrap_or_else(|| Path::new("")).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().to_string()),
            _ => return Err(io::Error::new(ErrorKind::InvalidInput, format!("Invalid content path {}", file_path.display()))),
        }
    }

    let stem = relative.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let is_index = stem == index_base_name;
    if !is_index {
        parts.push(stem);
    }

    let route = if parts.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", parts.join("/"))
    };

    let is_dir_post = is_index && route != "/";
    Ok((route, is_dir_post))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_for_file() {
        let root = PathBuf::from("src/pages");
        let (route, dir_post) = route_for(&root, &root.join("blog/2018-01-hello.md"), "index").unwrap();
        assert_eq!(route, "/blog/2018-01-hello/");
        assert!(!dir_post);
    }

    #[test]
    fn test_route_for_dir_post() {
        let root = PathBuf::from("src/pages");
        let (route, dir_post) = route_for(&root, &root.join("blog/hello/index.md"), "index").unwrap();
        assert_eq!(route, "/blog/hello/");
        assert!(dir_post);
    }

    #[test]
    fn test_route_for_root_index() {
        let root = PathBuf::from("src/pages");
        let (route, dir_post) = route_for(&root, &root.join("index.md"), "index").unwrap();
        assert_eq!(route, "/");
        assert!(!dir_post);

        let (route, _) = route_for(&root, &root.join("about.md"), "index").unwrap();
        assert_eq!(route, "/about/");
    }

    #[test]
    fn test_route_outside_root() {
        let root = PathBuf::from("src/pages");
        assert!(route_for(&root, Path::new("other/post.md"), "index").is_err());
    }

    #[test]
    fn test_is_markdown() {
        assert!(ContentFile::is_markdown(Path::new("a/b.md")));
        assert!(!ContentFile::is_markdown(Path::new("a/b.png")));
        assert!(!ContentFile::is_markdown(Path::new("a/md")));
    }
}
