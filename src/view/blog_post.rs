use std::io;

use ramhorns::Template;

use crate::content::Post;
use crate::text_utils::{slugify, tag_path};
use crate::view::comments::{DisqusConfig, DisqusEmbed};
use crate::view::content::{ContentRenderer, HtmlContent, PlainContent};
use crate::view::layout::{Fragment, Helmet};
use crate::view::parse_template;

const BLOG_POST_TPL: &str = include_str!("../../res/templates/blog-post.tpl");

#[derive(ramhorns::Content)]
struct ViewTag<'a> {
    tag: &'a str,
    link: String,
}

#[derive(ramhorns::Content)]
struct TagSection<'a> {
    tags: Vec<ViewTag<'a>>,
}

#[derive(ramhorns::Content)]
struct ViewItem<'a> {
    title: &'a str,
    description: &'a str,
    post_content: String,
    tag_section: Option<TagSection<'a>>,
}

/// Inputs of the blog post template. Only `content` is required.
pub struct BlogPostProps<'a> {
    pub content: &'a str,
    pub content_component: Option<&'a dyn ContentRenderer>,
    pub description: Option<&'a str>,
    pub tags: Option<&'a [String]>,
    pub title: Option<&'a str>,
    pub helmet: Option<Helmet>,
}

impl<'a> BlogPostProps<'a> {
    pub fn new(content: &'a str) -> Self {
        BlogPostProps {
            content,
            content_component: None,
            description: None,
            tags: None,
            title: None,
            helmet: None,
        }
    }
}

pub struct BlogPostTemplate {
    template: Template<'static>,
}

impl BlogPostTemplate {
    pub fn new() -> io::Result<BlogPostTemplate> {
        Ok(BlogPostTemplate {
            template: parse_template("blog post", BLOG_POST_TPL)?,
        })
    }

    pub fn render(&self, props: BlogPostProps) -> Fragment {
        let content_component: &dyn ContentRenderer = props.content_component.unwrap_or(&PlainContent);

        // Tags without a usable slug have no page to link to
        let tags: Vec<ViewTag> = props.tags.unwrap_or(&[]).iter()
            .filter(|tag| !slugify(tag).is_empty())
            .map(|tag| ViewTag { tag: tag.as_str(), link: tag_path(tag) })
            .collect();
        let tag_section = if tags.is_empty() {
            None
        } else {
            Some(TagSection { tags })
        };

        let markup = self.template.render(&ViewItem {
            title: props.title.unwrap_or(""),
            description: props.description.unwrap_or(""),
            post_content: content_component.render(props.content),
            tag_section,
        });

        Fragment {
            helmet: props.helmet,
            markup,
        }
    }

    /// Full post page body: the template fed from a post record, followed by the
    /// comment thread when comments are enabled.
    pub fn render_post(&self, post: &Post, comments: Option<(&DisqusEmbed, &str)>) -> Fragment {
        let fm = &post.frontmatter;
        let mut fragment = self.render(BlogPostProps {
            content: &post.html,
            content_component: Some(&HtmlContent),
            description: fm.description.as_deref(),
            tags: fm.tags.as_deref(),
            title: Some(fm.title.as_str()),
            helmet: Some(Helmet { title: format!("{} | Blog", fm.title) }),
        });

        if let Some((embed, site_url)) = comments {
            fragment.markup.push('\n');
            fragment.markup.push_str(&embed.render(&DisqusConfig::for_post(post, site_url)));
        }

        fragment
    }
}
