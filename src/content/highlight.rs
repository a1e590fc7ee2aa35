use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use spdlog::{debug, warn};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::config::{Highlight, DEFAULT_HIGHLIGHT_THEME};

lazy_static! {
    static ref SYNTAX_SET: SyntaxSet = SyntaxSet::load_defaults_newlines();
    static ref THEME_SET: ThemeSet = ThemeSet::load_defaults();
    static ref CODE_BLOCK_REGEX: Regex = Regex::new(
        r#"(?s)<pre><code class="language-([^"\s]+)">(.*?)</code></pre>"#
    ).unwrap();
    static ref INLINE_CODE_REGEX: Regex = Regex::new(r#"(<pre>)?<code>([^<]*)</code>"#).unwrap();
}

/// Build-time highlighting of the code blocks found in compiled markdown
pub struct Highlighter {
    config: Highlight,
    theme_name: String,
}

impl Highlighter {
    pub fn new(config: &Highlight) -> Self {
        let requested = config.theme.as_deref().unwrap_or(DEFAULT_HIGHLIGHT_THEME);
        let theme_name = if THEME_SET.themes.contains_key(requested) {
            requested.to_string()
        } else {
            warn!("Unknown highlight theme {}. Using {}", requested, DEFAULT_HIGHLIGHT_THEME);
            DEFAULT_HIGHLIGHT_THEME.to_string()
        };

        Highlighter {
            config: config.clone(),
            theme_name,
        }
    }

    pub fn process(&self, html: &str) -> String {
        let html = CODE_BLOCK_REGEX.replace_all(html, |caps: &Captures| {
            self.highlight_block(&caps[1], &caps[2])
        });

        match self.config.inline_code_marker {
            Some(ref marker) if !marker.is_empty() => self.mark_inline_code(&html, marker),
            _ => html.to_string(),
        }
    }

    fn resolve_alias<'a>(&'a self, lang: &'a str) -> &'a str {
        self.config.aliases.get(lang).map(String::as_str).unwrap_or(lang)
    }

    fn highlight_block(&self, lang: &str, escaped_code: &str) -> String {
        let lang = self.resolve_alias(lang);
        let code = html_escape::decode_html_entities(escaped_code);

        let body = match SYNTAX_SET.find_syntax_by_token(lang) {
            Some(syntax) => match self.highlight_lines(&code, syntax) {
                Ok(body) => body,
                Err(e) => {
                    warn!("Error highlighting {} block: {}", lang, e);
                    html_escape::encode_text(&code).to_string()
                }
            },
            None => {
                debug!("No syntax found for language {}", lang);
                html_escape::encode_text(&code).to_string()
            }
        };

        let class = html_escape::encode_double_quoted_attribute(&format!("{}{}", self.config.class_prefix, lang)).to_string();
        let (pre_class, rows) = if self.config.show_line_numbers {
            (format!("{} line-numbers", class), line_number_rows(&code))
        } else {
            (class.clone(), String::new())
        };

        format!(
            r#"<div class="highlight" data-language="{}"><pre class="{}"><code class="{}">{}</code>{}</pre></div>"#,
            html_escape::encode_double_quoted_attribute(lang), pre_class, class, body, rows
        )
    }

    fn highlight_lines(&self, code: &str, syntax: &SyntaxReference) -> Result<String, syntect::Error> {
        let theme = &THEME_SET.themes[&self.theme_name];
        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut out = String::new();
        for line in LinesWithEndings::from(code) {
            let regions = highlighter.highlight_line(line, &SYNTAX_SET)?;
            out.push_str(&styled_line_to_highlighted_html(&regions[..], IncludeBackground::No)?);
        }
        Ok(out)
    }

    /// `lang›code` inside inline code becomes code tagged with that language
    fn mark_inline_code(&self, html: &str, marker: &str) -> String {
        let marker: Cow<str> = html_escape::encode_text(marker);
        INLINE_CODE_REGEX.replace_all(html, |caps: &Captures| {
            if caps.get(1).is_some() {
                return caps[0].to_string();
            }

            let code = &caps[2];
            match code.split_once(marker.as_ref()) {
                Some((lang, rest)) if !lang.is_empty() => {
                    let lang = self.resolve_alias(lang);
                    format!(r#"<code class="{}{}">{}</code>"#,
                            self.config.class_prefix,
                            html_escape::encode_double_quoted_attribute(lang),
                            rest)
                }
                _ => caps[0].to_string(),
            }
        }).to_string()
    }
}

fn line_number_rows(code: &str) -> String {
    let count = code.lines().count().max(1);
    let mut rows = String::from(r#"<span aria-hidden="true" class="line-numbers-rows">"#);
    for _ in 0..count {
        rows.push_str("<span></span>");
    }
    rows.push_str("</span>");
    rows
}
