use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use blogpress::config::{read_config, Config};

use crate::config_data::write_sample_cfg;
use crate::{InitArgs, CFG_FILE_NAME};

fn config_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![];

    if let Ok(exe_path) = env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.push(exe_dir.join(CFG_FILE_NAME));
        }
    }
    if let Ok(cur_dir) = env::current_dir() {
        candidates.push(cur_dir.join(CFG_FILE_NAME));
    }
    if let Some(cfg_dir) = dirs::config_dir() {
        candidates.push(cfg_dir.join(CFG_FILE_NAME));
    }

    candidates
}

fn get_config_path() -> Option<PathBuf> {
    config_candidates().into_iter().find(|path| path.exists())
}

pub(crate) fn open_config(cfg_path: Option<PathBuf>) -> Result<Config> {
    let config_path = match cfg_path.or_else(get_config_path) {
        Some(path) => path,
        None => bail!("Could not find {}. Run blogpress init or pass --config-path", CFG_FILE_NAME),
    };

    println!("Reading config from {}", config_path.display());
    let config = read_config(&config_path)
        .with_context(|| format!("Invalid configuration {}", config_path.display()))?;

    if config.log.is_none() {
        println!("Log disabled. Using stdout");
    }

    Ok(config)
}

pub(crate) fn init_blog(out_dir: &Path) -> Result<PathBuf> {
    let cfg_path = out_dir.join(CFG_FILE_NAME);
    if cfg_path.exists() {
        bail!("{} already exists", cfg_path.display());
    }

    for dir in ["src/pages/blog", "src/img", "src/cms"] {
        let dir = out_dir.join(dir);
        fs::create_dir_all(&dir).with_context(|| format!("Error creating {}", dir.display()))?;
    }

    write_sample_cfg(&cfg_path).with_context(|| format!("Error writing {}", cfg_path.display()))?;
    Ok(cfg_path)
}

pub(crate) fn init_cmd(args: InitArgs) -> Result<()> {
    let cfg_path = init_blog(Path::new(&args.out_dir))?;
    println!("Created {}", cfg_path.display());
    println!("Add posts under src/pages/blog and run blogpress build -c {}", cfg_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use blogpress::site::builder::SiteBuilder;

    use super::*;

    #[test]
    fn test_init_blog() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = init_blog(dir.path()).unwrap();
        assert_eq!(cfg_path, dir.path().join("blogpress.toml"));
        assert!(dir.path().join("src/pages/blog").is_dir());

        let config = open_config(Some(cfg_path)).unwrap();
        assert_eq!(config.paths.pages_dir, dir.path().join("src/pages"));

        assert!(init_blog(dir.path()).is_err());
    }

    #[test]
    fn test_build_after_init_from_other_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = init_blog(dir.path()).unwrap();
        fs::write(dir.path().join("src/pages/blog/hello.md"), "---\ntitle: Hello\ndate: 2024-01-02\n---\n\nHi.\n").unwrap();

        assert_ne!(env::current_dir().unwrap(), dir.path());
        let config = open_config(Some(cfg_path)).unwrap();
        let report = SiteBuilder::new(&config).unwrap().build().unwrap();
        assert_eq!(report.posts, 1);
        assert!(dir.path().join("public/blog/hello/index.html").is_file());
        assert!(dir.path().join("public/rss.xml").is_file());
    }

    #[test]
    fn test_missing_config_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(open_config(Some(dir.path().join("nope.toml"))).is_err());
    }
}
