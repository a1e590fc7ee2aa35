use std::io;

use ramhorns::Template;

use crate::config::Config;
use crate::view::analytics::AnalyticsSnippet;
use crate::view::navbar::Navbar;
use crate::view::parse_template;

const LAYOUT_TPL: &str = include_str!("../../res/templates/layout.tpl");

const KATEX_HEAD: &str = r#"<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/katex@0.16.11/dist/katex.min.css">
<script defer src="https://cdn.jsdelivr.net/npm/katex@0.16.11/dist/katex.min.js"></script>
<script>
document.addEventListener("DOMContentLoaded", function () {
  document.querySelectorAll(".math-inline, .math-display").forEach(function (el) {
    katex.render(el.textContent, el, { displayMode: el.classList.contains("math-display"), throwOnError: false });
  });
});
</script>"#;

/// Document metadata a page asks the shell to set
#[derive(Debug, Clone, PartialEq)]
pub struct Helmet {
    pub title: String,
}

/// Rendered page body plus the metadata it wants in the document head
pub struct Fragment {
    pub helmet: Option<Helmet>,
    pub markup: String,
}

impl Fragment {
    pub fn new(markup: String) -> Self {
        Fragment { helmet: None, markup }
    }
}

#[derive(ramhorns::Content)]
struct Stylesheet<'a> {
    href: &'a str,
}

#[derive(ramhorns::Content)]
struct LayoutPage<'a> {
    title: &'a str,
    stylesheets: Vec<Stylesheet<'a>>,
    head_extra: String,
    navbar: &'a str,
    children: String,
    body_extra: String,
}

pub struct Layout {
    template: Template<'static>,
    default_title: String,
    stylesheets: Vec<String>,
    katex: bool,
    analytics: Option<AnalyticsSnippet>,
}

impl Layout {
    pub fn new(config: &Config) -> io::Result<Layout> {
        let analytics = match config.analytics {
            Some(ref analytics) => Some(AnalyticsSnippet::new(analytics)?),
            None => None,
        };

        Ok(Layout {
            template: parse_template("layout", LAYOUT_TPL)?,
            default_title: config.site.default_title.clone(),
            stylesheets: config.site.stylesheets.clone(),
            katex: config.markdown.katex,
            analytics,
        })
    }

    /// Wraps the output of `children` in the page shell. The page path decides
    /// whether analytics are injected.
    pub fn render<F: FnOnce() -> Fragment>(&self, page_path: &str, children: F) -> String {
        let Fragment { helmet, markup } = children();

        let mut head_extra = String::new();
        let mut body_extra = String::new();
        if self.katex {
            head_extra.push_str(KATEX_HEAD);
        }
        if let Some(ref analytics) = self.analytics {
            if !analytics.is_excluded(page_path) {
                let target = if analytics.in_head() { &mut head_extra } else { &mut body_extra };
                if !target.is_empty() {
                    target.push('\n');
                }
                target.push_str(&analytics.render());
            }
        }

        let title = match helmet {
            Some(ref helmet) => helmet.title.as_str(),
            None => self.default_title.as_str(),
        };

        self.template.render(&LayoutPage {
            title,
            stylesheets: self.stylesheets.iter().map(|href| Stylesheet { href }).collect(),
            head_extra,
            navbar: Navbar::render(),
            children: markup,
            body_extra,
        })
    }
}
