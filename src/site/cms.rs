use std::io;
use std::path::{Path, PathBuf};

use spdlog::info;

use crate::config::Cms;
use crate::site::{copy_file, write_file};

const ADMIN_HTML: &str = include_str!("../../res/templates/admin.html");

/// Writes the CMS admin overlay under `<output>/admin/`: the page loading the
/// CMS bundle, the site's CMS module and, when configured, the CMS config.
pub fn write_admin(cms: &Cms, output_dir: &Path) -> io::Result<Vec<PathBuf>> {
    let admin_dir = output_dir.join("admin");
    let mut written = vec![];

    let index = admin_dir.join("index.html");
    write_file(&index, ADMIN_HTML)?;
    written.push(index);

    let module = admin_dir.join("cms.js");
    copy_file(&cms.module_path, &module)?;
    written.push(module);

    if let Some(ref config_path) = cms.config_path {
        let config = admin_dir.join("config.yml");
        copy_file(config_path, &config)?;
        written.push(config);
    }

    info!("CMS admin written to {}", admin_dir.display());
    Ok(written)
}
