/// How a body string gets embedded into a template
pub trait ContentRenderer {
    fn render(&self, content: &str) -> String;
}

/// Treats the content as text
pub struct PlainContent;

impl ContentRenderer for PlainContent {
    fn render(&self, content: &str) -> String {
        format!("<div>{}</div>", html_escape::encode_text(content))
    }
}

/// Embeds pre-rendered, trusted markup as is
pub struct HtmlContent;

impl ContentRenderer for HtmlContent {
    fn render(&self, content: &str) -> String {
        format!("<div>{}</div>", content)
    }
}
