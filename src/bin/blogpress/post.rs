use std::fmt::Write;
use std::fs::{create_dir_all, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use uuid::Uuid;

use blogpress::content::BLOG_POST_KEY;
use blogpress::text_utils::slugify;

use crate::{NewArgs, PostOutput};

/// Frontmatter the CMS would write. Strings are JSON quoted, which YAML accepts.
fn render_header(id: &str, date: &DateTime<Utc>, title: Option<&str>, tags: &[String]) -> String {
    let mut buf = String::new();

    let _ = writeln!(&mut buf, "---");
    let _ = writeln!(&mut buf, "id: {}", id);
    let _ = writeln!(&mut buf, "templateKey: {}", BLOG_POST_KEY);
    let _ = writeln!(&mut buf, "title: {}", json!(title.unwrap_or("Replace with title")));
    let _ = writeln!(&mut buf, "date: {}", date.format("%Y-%m-%dT%H:%M:%S%.3fZ"));
    let _ = writeln!(&mut buf, "description: \"\"");
    if tags.is_empty() {
        let _ = writeln!(&mut buf, "tags: []");
    } else {
        let _ = writeln!(&mut buf, "tags:");
        for tag in tags {
            let _ = writeln!(&mut buf, "  - {}", json!(tag));
        }
    }
    let _ = writeln!(&mut buf, "---");
    let _ = writeln!(&mut buf);
    buf
}

fn render_body() -> String {
    let mut buf = String::new();

    let _ = writeln!(&mut buf, "This is a body example");
    let _ = writeln!(&mut buf, "Please remove it and replace with your content");
    let _ = writeln!(&mut buf);
    let _ = writeln!(&mut buf, "<!-- more -->");
    let _ = writeln!(&mut buf);
    let _ = writeln!(&mut buf, "And this is the rest of your post");

    buf
}

/// `2024-02-29-post-title-of-mine`
fn post_name_from_title(title: &str, date: &NaiveDate) -> String {
    format!("{}-{}", date.format("%Y-%m-%d"), slugify(title))
}

fn post_path(dir: &Path, name: &str, output: &PostOutput) -> Option<PathBuf> {
    match output {
        PostOutput::Stdout => None,
        PostOutput::File => Some(dir.join(format!("{}.md", name))),
        PostOutput::Dir => Some(dir.join(name).join("index.md")),
    }
}

fn write_post(path: &Path, contents: &str) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        create_dir_all(parent).with_context(|| format!("Error creating {}", parent.display()))?;
    }
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .with_context(|| format!("Error creating {}", path.display()))?;
    file.write_all(contents.as_bytes())?;
    Ok(())
}

pub fn post_cmd(args: NewArgs) -> Result<()> {
    let id = Uuid::new_v4().to_string();
    let date = Utc::now();

    let title = args.title.as_deref().map(str::trim).filter(|t| !t.is_empty());
    if args.output != PostOutput::Stdout && title.is_none() {
        bail!("For file and dir outputs, title is required");
    }

    let tags: Vec<String> = args.tags.iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    let contents = format!("{}{}", render_header(&id, &date, title, &tags), render_body());

    let name = post_name_from_title(title.unwrap_or_default(), &date.date_naive());
    match post_path(Path::new(&args.dir), &name, &args.output) {
        None => print!("{}", contents),
        Some(path) => {
            println!("Creating post {}", path.display());
            write_post(&path, &contents)?;
        }
    }

    Ok(())
}
