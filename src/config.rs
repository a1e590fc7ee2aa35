use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;

pub const DEFAULT_DATE_FORMAT: &str = "%B %d, %Y";
pub const DEFAULT_HIGHLIGHT_THEME: &str = "Solarized (light)";

#[derive(Deserialize)]
pub struct Site {
    pub title: String,
    /// Title used by pages that don't carry their own metadata
    pub default_title: String,
    pub site_url: String,
    pub description: Option<String>,
    pub date_format: Option<String>,
    #[serde(default)]
    pub stylesheets: Vec<String>,
}

#[derive(Deserialize)]
pub struct Paths {
    pub pages_dir: PathBuf,
    pub images_dir: Option<PathBuf>,
    pub output_dir: PathBuf,
}

#[derive(Deserialize)]
pub struct Defaults {
    pub index_base_name: Option<String>,
    pub page_size: u32,
}

#[derive(Deserialize, Default)]
pub struct Markdown {
    #[serde(default)]
    pub katex: bool,
    pub highlight: Option<Highlight>,
}

#[derive(Deserialize, Clone)]
pub struct Highlight {
    #[serde(default = "default_class_prefix")]
    pub class_prefix: String,
    pub inline_code_marker: Option<String>,
    #[serde(default)]
    pub aliases: HashMap<String, String>,
    #[serde(default)]
    pub show_line_numbers: bool,
    pub theme: Option<String>,
}

fn default_class_prefix() -> String {
    "language-".to_string()
}

impl Default for Highlight {
    fn default() -> Self {
        Highlight {
            class_prefix: default_class_prefix(),
            inline_code_marker: None,
            aliases: HashMap::new(),
            show_line_numbers: false,
            theme: None,
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct Analytics {
    pub tracking_id: String,
    /// Puts the tracking script in the head instead of the end of body
    #[serde(default)]
    pub head: bool,
    #[serde(default)]
    pub anonymize: bool,
    #[serde(default)]
    pub respect_dnt: bool,
    #[serde(default)]
    pub exclude: Vec<String>,
    pub sample_rate: Option<u32>,
    pub site_speed_sample_rate: Option<u32>,
    pub cookie_domain: Option<String>,
    pub optimize_id: Option<String>,
}

#[derive(Deserialize)]
pub struct Comments {
    pub disqus_shortname: String,
}

#[derive(Deserialize)]
pub struct Cms {
    pub module_path: PathBuf,
    pub config_path: Option<PathBuf>,
}

#[derive(Deserialize, Default)]
pub struct Netlify {
    /// Extra headers for every path, on top of the security defaults
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

#[derive(Deserialize)]
pub struct RssFeed {
    pub title: String,
    /// Falls back to the site description
    pub description: Option<String>,
    pub page_size: u32,
}

#[derive(Deserialize)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone, Debug, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Site manifest. Every optional section is a plugin: present means enabled.
#[derive(Deserialize)]
pub struct Config {
    pub site: Site,
    pub paths: Paths,
    pub defaults: Defaults,
    #[serde(default)]
    pub markdown: Markdown,
    pub analytics: Option<Analytics>,
    pub comments: Option<Comments>,
    pub cms: Option<Cms>,
    pub netlify: Option<Netlify>,
    pub rss_feed: Option<RssFeed>,
    pub log: Option<Log>,
}

impl Config {
    pub fn date_format(&self) -> &str {
        self.site.date_format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT)
    }

    /// Channel description of the feed: its own, or the site's
    pub fn feed_description(&self) -> &str {
        self.rss_feed.as_ref()
            .and_then(|rss| rss.description.as_deref())
            .or(self.site.description.as_deref())
            .unwrap_or("")
    }

    pub fn index_base_name(&self) -> &str {
        self.defaults.index_base_name.as_deref().unwrap_or("index")
    }
}

fn parse_path(path: PathBuf) -> io::Result<PathBuf> {
    if !path.starts_with("${exe_dir}") {
        return Ok(path);
    }

    let cur_exe = env::current_exe()?;
    let exe_dir = cur_exe.parent().unwrap_or_else(|| Path::new("."));
    let rest = path.strip_prefix("${exe_dir}")
        .map_err(|e| io::Error::new(ErrorKind::InvalidInput, e.to_string()))?;
    Ok(exe_dir.join(rest))
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    if cfg.defaults.page_size == 0 {
        return Err(io::Error::new(ErrorKind::InvalidData, "defaults.page_size must be greater than 0"));
    }

    cfg.paths = Paths {
        pages_dir: parse_path(cfg.paths.pages_dir)?,
        images_dir: cfg.paths.images_dir.map(parse_path).transpose()?,
        output_dir: parse_path(cfg.paths.output_dir)?,
    };

    if let Some(cms) = cfg.cms.take() {
        cfg.cms = Some(Cms {
            module_path: parse_path(cms.module_path)?,
            config_path: cms.config_path.map(parse_path).transpose()?,
        });
    }

    Ok(cfg)
}

fn rebase(base_dir: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    }
}

/// Relative paths in the file are taken from the directory holding it
pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    let mut cfg = parse_config(&cfg_content)?;
    let base_dir = cfg_path.parent().unwrap_or_else(|| Path::new(""));

    cfg.paths = Paths {
        pages_dir: rebase(base_dir, cfg.paths.pages_dir),
        images_dir: cfg.paths.images_dir.map(|p| rebase(base_dir, p)),
        output_dir: rebase(base_dir, cfg.paths.output_dir),
    };

    if let Some(cms) = cfg.cms.take() {
        cfg.cms = Some(Cms {
            module_path: rebase(base_dir, cms.module_path),
            config_path: cms.config_path.map(|p| rebase(base_dir, p)),
        });
    }

    if let Some(ref mut log) = cfg.log {
        log.location = log.location.take().map(|p| rebase(base_dir, p));
    }

    Ok(cfg)
}
