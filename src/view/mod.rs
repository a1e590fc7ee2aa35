use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

pub mod analytics;
pub mod blog_post;
pub mod comments;
pub mod content;
pub mod layout;
pub mod list_renderer;
pub mod navbar;
pub mod page;
pub mod rss_renderer;

pub(crate) fn parse_template(name: &str, source: &'static str) -> io::Result<Template<'static>> {
    match Template::new(source) {
        Ok(x) => Ok(x),
        Err(e) => Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing {} template: {}", name, e))),
    }
}

/// JSON literal safe to place inside an inline `<script>`
pub(crate) fn script_value(value: serde_json::Value) -> String {
    value.to_string().replace("</", "<\\/")
}
