use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use spdlog::{info, warn};

use blogpress::logger::configure_logger;
use blogpress::site::builder::SiteBuilder;

use crate::config::{init_cmd, open_config};
use crate::post::post_cmd;

mod config;
mod config_data;
mod post;

const CFG_FILE_NAME: &str = "blogpress.toml";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
enum Args {
    /// Builds the site into the output directory
    Build(BuildArgs),
    /// Creates a new blog post
    New(NewArgs),
    /// Writes a sample configuration and the content directories
    Init(InitArgs),
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct BuildArgs {
    /// Config path. If empty, blogpress.toml is searched next to the executable,
    /// in the current directory and in the user config directory
    #[arg(short, long)]
    config_path: Option<String>,

    /// Overrides paths.output_dir
    #[arg(short, long)]
    out_dir: Option<String>,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct NewArgs {
    /// Title of the post
    #[arg(short, long)]
    title: Option<String>,

    /// Tags of the post, comma separated
    #[arg(long, value_delimiter = ',')]
    tags: Vec<String>,

    /// Post generation options
    #[arg(short, long, value_enum, default_value_t = PostOutput::Stdout)]
    output: PostOutput,

    /// Directory where file and dir posts are created
    #[arg(short, long, default_value = ".")]
    dir: String,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct InitArgs {
    /// Directory where the new blog will be generated
    #[arg(short, long)]
    out_dir: String,
}

#[derive(Clone, Debug, PartialEq, ValueEnum)]
enum PostOutput {
    /// Writes the new post content to the stdout
    Stdout,
    /// Writes the new post content to a file (posts without images)
    File,
    /// Writes the new post content to a directory (posts with images)
    Dir,
}

impl Display for PostOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.to_possible_value() {
            Some(value) => write!(f, "{}", value.get_name()),
            None => Ok(()),
        }
    }
}

fn build_cmd(args: BuildArgs) -> Result<()> {
    let mut config = open_config(args.config_path.map(PathBuf::from))?;
    if let Some(out_dir) = args.out_dir {
        config.paths.output_dir = PathBuf::from(out_dir);
    }

    if let Err(err) = configure_logger(config.log.as_ref()) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    info!("Starting blogpress build =-=-=-=-=-=-=-=-=-=-=-=-=-=-=-");
    let report = SiteBuilder::new(&config)?.build()?;
    info!("Done: {} files written, {} assets copied", report.files_written, report.assets_copied);

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args {
        Args::Build(args) => build_cmd(args),
        Args::New(args) => post_cmd(args),
        Args::Init(args) => init_cmd(args),
    }
}
