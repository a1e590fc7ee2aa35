use std::path::PathBuf;

use chrono::NaiveDateTime;

pub mod content_file;
pub mod content_source;
pub mod highlight;
pub mod markdown_renderer;
pub mod parsing_utils;

pub const BLOG_POST_KEY: &str = "blog-post";

#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct PostId(pub String);

#[derive(Debug, Clone, PartialEq)]
pub enum TemplateKey {
    BlogPost,
    Page(String),
}

impl TemplateKey {
    pub fn from_key(key: Option<&str>) -> Self {
        match key {
            None | Some(BLOG_POST_KEY) => TemplateKey::BlogPost,
            Some(other) => TemplateKey::Page(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frontmatter {
    pub title: String,
    pub description: Option<String>,
    /// Already formatted for display
    pub date: String,
    pub tags: Option<Vec<String>>,
}

/// A content record, created once per source file and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: PostId,
    pub route: String,
    pub source: PathBuf,
    pub template_key: TemplateKey,
    pub html: String,
    pub excerpt: String,
    pub published: Option<NaiveDateTime>,
    pub frontmatter: Frontmatter,
}

impl Post {
    pub fn is_blog_post(&self) -> bool {
        self.template_key == TemplateKey::BlogPost
    }

    pub fn tags(&self) -> &[String] {
        self.frontmatter.tags.as_deref().unwrap_or(&[])
    }
}

/// Newest first; posts without a date go last.
pub fn sort_by_date(posts: &mut [&Post]) {
    posts.sort_by(|a, b| b.published.cmp(&a.published));
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn post_at(route: &str, published: Option<NaiveDateTime>) -> Post {
        Post {
            id: PostId(route.to_string()),
            route: route.to_string(),
            source: PathBuf::from(route),
            template_key: TemplateKey::BlogPost,
            html: String::new(),
            excerpt: String::new(),
            published,
            frontmatter: Frontmatter {
                title: route.to_string(),
                description: None,
                date: String::new(),
                tags: None,
            },
        }
    }

    #[test]
    fn test_template_key() {
        assert_eq!(TemplateKey::from_key(None), TemplateKey::BlogPost);
        assert_eq!(TemplateKey::from_key(Some("blog-post")), TemplateKey::BlogPost);
        assert_eq!(TemplateKey::from_key(Some("about-page")), TemplateKey::Page("about-page".to_string()));
    }

    #[test]
    fn test_sort_by_date() {
        let day = |d| NaiveDate::from_ymd_opt(2020, 1, d).unwrap().and_hms_opt(0, 0, 0);
        let a = post_at("/a/", day(1));
        let b = post_at("/b/", day(3));
        let c = post_at("/c/", None);
        let mut posts = vec![&c, &a, &b];
        sort_by_date(&mut posts);
        let routes: Vec<&str> = posts.iter().map(|p| p.route.as_str()).collect();
        assert_eq!(routes, ["/b/", "/a/", "/c/"]);
    }
}
