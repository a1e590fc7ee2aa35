use std::io;
use std::io::ErrorKind;

use markdown::Options;
use uuid::Uuid;

use crate::config::Markdown;
use crate::content::content_file::ContentFile;
use crate::content::highlight::Highlighter;
use crate::content::parsing_utils::{extract_preview, remove_comments, split_frontmatter, RawFrontmatter};
use crate::content::{Frontmatter, Post, PostId, TemplateKey};
use crate::text_utils::{excerpt_from_html, format_date, parse_frontmatter_date, EXCERPT_LENGTH};

/// Turns content files into post records
pub struct MarkdownRenderer {
    options: Options,
    highlighter: Option<Highlighter>,
    date_format: String,
}

impl MarkdownRenderer {
    pub fn new(config: &Markdown, date_format: &str) -> Self {
        let mut options = Options::gfm();
        // Content is authored through the CMS and trusted
        options.compile.allow_dangerous_html = true;
        if config.katex {
            options.parse.constructs.math_flow = true;
            options.parse.constructs.math_text = true;
        }

        MarkdownRenderer {
            options,
            highlighter: config.highlight.as_ref().map(Highlighter::new),
            date_format: date_format.to_string(),
        }
    }

    pub fn render(&self, content_file: &ContentFile) -> io::Result<Post> {
        let file_name = &content_file.file_path;
        let (raw, body) = split_frontmatter(file_name, &content_file.raw_content)?;

        let img_prefix = if content_file.is_dir_post {
            Some(content_file.route.as_str())
        } else {
            None
        };

        let with_file = |e: io::Error| io::Error::new(e.kind(), format!("{} - file={}", e, file_name.display()));
        let html = self.render_markdown(&body, img_prefix).map_err(with_file)?;
        let excerpt = match extract_preview(&body) {
            Some(preview) => {
                let preview_html = self.render_markdown(preview, img_prefix).map_err(with_file)?;
                excerpt_from_html(&preview_html, EXCERPT_LENGTH)
            }
            None => excerpt_from_html(&html, EXCERPT_LENGTH),
        };

        let published = match raw.date {
            Some(ref date) => Some(parse_frontmatter_date(date).map_err(|e| {
                io::Error::new(ErrorKind::InvalidData, format!("{} - file={}", e, file_name.display()))
            })?),
            None => None,
        };

        let RawFrontmatter { id, template_key, title, description, tags, .. } = raw;
        let id = match id {
            Some(id) if !id.trim().is_empty() => PostId(id.trim().to_string()),
            _ => derive_post_id(&content_file.route),
        };

        Ok(Post {
            id,
            route: content_file.route.clone(),
            source: file_name.clone(),
            template_key: TemplateKey::from_key(template_key.as_deref()),
            html,
            excerpt,
            published,
            frontmatter: Frontmatter {
                title: title.unwrap_or_default(),
                description,
                date: published.map(|d| format_date(&d, &self.date_format)).unwrap_or_default(),
                tags,
            },
        })
    }

    fn render_markdown(&self, md_text: &str, img_prefix: Option<&str>) -> io::Result<String> {
        let buf = match img_prefix {
            Some(prefix) => change_images(prefix, md_text),
            None => md_text.to_string(),
        };

        let html = match markdown::to_html_with_options(&buf, &self.options) {
            Ok(x) => x,
            Err(e) => return Err(io::Error::new(ErrorKind::InvalidInput, e.reason)),
        };
        // Code is escaped by now, so only raw HTML comments are left to strip
        let html = remove_comments(&html)?;

        Ok(match self.highlighter {
            Some(ref highlighter) => highlighter.process(&html),
            None => html,
        })
    }
}

/// Stable across builds: the same route always yields the same id
pub fn derive_post_id(route: &str) -> PostId {
    PostId(Uuid::new_v5(&Uuid::NAMESPACE_URL, route.as_bytes()).to_string())
}

/// Prefixes relative image references so assets next to a directory post resolve
fn change_images(post_route: &str, md_post: &str) -> String {
    let mut parsed_string = String::new();
    let mut remaining_input = md_post;

    while let Some(text_start) = remaining_input.find("![") {
        let text_end = text_start + 2;
        parsed_string.push_str(&remaining_input[0..text_end]);
        remaining_input = &remaining_input[text_end..];

        let Some(link_end) = remaining_input.find("](") else {
            continue;
        };
        let url_start = link_end + 2;
        let url_start_slice = &remaining_input[url_start..];
        let Some(url_end) = url_start_slice.find(')') else {
            continue;
        };

        let link_text = &remaining_input[..link_end];
        let url = &url_start_slice[..url_end];
        let is_relative = !url.contains("://") && !url.starts_with('/') && !url.starts_with('#');
        let url = if is_relative {
            format!("{}/{}", post_route.trim_end_matches('/'), url)
        } else {
            url.to_string()
        };

        parsed_string.push_str(link_text);
        parsed_string.push_str("](");
        parsed_string.push_str(&url);
        parsed_string.push(')');

        remaining_input = &url_start_slice[url_end + 1..];
    }

    parsed_string.push_str(remaining_input);
    parsed_string
}
