use std::io;

use ramhorns::Template;

use crate::content::Post;
use crate::view::content::{ContentRenderer, HtmlContent};
use crate::view::layout::{Fragment, Helmet};
use crate::view::parse_template;

const PAGE_TPL: &str = include_str!("../../res/templates/page.tpl");

#[derive(ramhorns::Content)]
struct PageItem<'a> {
    title: &'a str,
    page_content: String,
}

/// Standalone pages such as About: a title and a body, no tags or comments
pub struct PageTemplate {
    template: Template<'static>,
}

impl PageTemplate {
    pub fn new() -> io::Result<PageTemplate> {
        Ok(PageTemplate {
            template: parse_template("page", PAGE_TPL)?,
        })
    }

    pub fn render_page(&self, page: &Post, site_title: &str) -> Fragment {
        let title = page.frontmatter.title.as_str();
        let markup = self.template.render(&PageItem {
            title,
            page_content: HtmlContent.render(&page.html),
        });

        let helmet = if title.is_empty() {
            None
        } else {
            Some(Helmet { title: format!("{} | {}", title, site_title) })
        };

        Fragment { helmet, markup }
    }
}
