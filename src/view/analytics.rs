use std::fmt::Write;
use std::io;
use std::io::ErrorKind;

use regex::Regex;
use serde_json::{json, Map, Value};

use crate::config::Analytics;
use crate::view::script_value;

const GA_LOADER: &str = r#"(function(i,s,o,g,r,a,m){i['GoogleAnalyticsObject']=r;i[r]=i[r]||function(){
(i[r].q=i[r].q||[]).push(arguments)},i[r].l=1*new Date();a=s.createElement(o),
m=s.getElementsByTagName(o)[0];a.async=1;a.src=g;m.parentNode.insertBefore(a,m)
})(window,document,'script','https://www.google-analytics.com/analytics.js','ga');"#;

pub struct AnalyticsSnippet {
    config: Analytics,
    exclude: Vec<Regex>,
}

impl AnalyticsSnippet {
    pub fn new(config: &Analytics) -> io::Result<Self> {
        let mut exclude = vec![];
        for glob in config.exclude.iter() {
            let re = glob_to_regex(glob).map_err(|e| {
                io::Error::new(ErrorKind::InvalidInput, format!("Invalid analytics exclude pattern {}: {}", glob, e))
            })?;
            exclude.push(re);
        }

        Ok(AnalyticsSnippet {
            config: config.clone(),
            exclude,
        })
    }

    pub fn in_head(&self) -> bool {
        self.config.head
    }

    pub fn is_excluded(&self, page_path: &str) -> bool {
        self.exclude.iter().any(|re| re.is_match(page_path))
    }

    pub fn render(&self) -> String {
        let cfg = &self.config;

        let mut fields = Map::new();
        if let Some(rate) = cfg.sample_rate {
            fields.insert("sampleRate".to_string(), json!(rate));
        }
        if let Some(rate) = cfg.site_speed_sample_rate {
            fields.insert("siteSpeedSampleRate".to_string(), json!(rate));
        }
        let cookie_domain = cfg.cookie_domain.as_deref().unwrap_or("auto");

        let mut buf = String::new();
        let _ = writeln!(&mut buf, "<script>");
        if cfg.respect_dnt {
            let _ = writeln!(&mut buf, r#"if (!(navigator.doNotTrack == "1" || window.doNotTrack == "1")) {{"#);
            let _ = writeln!(&mut buf, "{}", GA_LOADER);
            let _ = writeln!(&mut buf, "}}");
        } else {
            let _ = writeln!(&mut buf, "{}", GA_LOADER);
        }
        let _ = writeln!(&mut buf, r#"if (typeof ga === "function") {{"#);
        let _ = writeln!(&mut buf, "  ga('create', {}, {}, {});",
                         script_value(json!(cfg.tracking_id)),
                         script_value(json!(cookie_domain)),
                         script_value(Value::Object(fields)));
        if cfg.anonymize {
            let _ = writeln!(&mut buf, "  ga('set', 'anonymizeIp', true);");
        }
        if let Some(ref optimize_id) = cfg.optimize_id {
            let _ = writeln!(&mut buf, "  ga('require', {});", script_value(json!(optimize_id)));
        }
        let _ = writeln!(&mut buf, "  ga('send', 'pageview');");
        let _ = writeln!(&mut buf, "}}");
        let _ = write!(&mut buf, "</script>");
        buf
    }
}

/// `**` crosses path separators, `*` and `?` don't
fn glob_to_regex(glob: &str) -> Result<Regex, regex::Error> {
    let mut pattern = String::from("^");
    let mut chars = glob.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                pattern.push_str(".*");
            }
            '*' => pattern.push_str("[^/]*"),
            '?' => pattern.push_str("[^/]"),
            c => pattern.push_str(&regex::escape(&c.to_string())),
        }
    }
    pattern.push('$');
    Regex::new(&pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analytics() -> Analytics {
        Analytics {
            tracking_id: "UA-127457130-1".to_string(),
            head: false,
            anonymize: true,
            respect_dnt: true,
            exclude: vec!["/preview/**".to_string(), "/do-not-track/me/too/".to_string(), "/drafts/*/".to_string()],
            sample_rate: Some(5),
            site_speed_sample_rate: Some(10),
            cookie_domain: None,
            optimize_id: None,
        }
    }

    #[test]
    fn test_exclusion() {
        let snippet = AnalyticsSnippet::new(&analytics()).unwrap();
        assert!(snippet.is_excluded("/preview/"));
        assert!(snippet.is_excluded("/preview/a/b/"));
        assert!(snippet.is_excluded("/do-not-track/me/too/"));
        assert!(!snippet.is_excluded("/do-not-track/me/"));
        assert!(snippet.is_excluded("/drafts/one/"));
        assert!(!snippet.is_excluded("/drafts/one/two/"));
        assert!(!snippet.is_excluded("/blog/post/"));
    }

    #[test]
    fn test_render() {
        let html = AnalyticsSnippet::new(&analytics()).unwrap().render();
        assert!(html.starts_with("<script>\nif (!(navigator.doNotTrack == \"1\""));
        assert!(html.contains(r#"ga('create', "UA-127457130-1", "auto", {"sampleRate":5,"siteSpeedSampleRate":10});"#));
        assert!(html.contains("ga('set', 'anonymizeIp', true);"));
        assert!(html.contains("ga('send', 'pageview');"));
        assert!(!html.contains("ga('require'"));
        assert!(html.ends_with("</script>"));
    }

    #[test]
    fn test_render_without_options() {
        let mut cfg = analytics();
        cfg.respect_dnt = false;
        cfg.anonymize = false;
        cfg.sample_rate = None;
        cfg.site_speed_sample_rate = None;
        cfg.cookie_domain = Some("example.com".to_string());
        cfg.optimize_id = Some("GTM-XYZ".to_string());
        let html = AnalyticsSnippet::new(&cfg).unwrap().render();
        assert!(!html.contains("doNotTrack"));
        assert!(!html.contains("anonymizeIp"));
        assert!(html.contains(r#"ga('create', "UA-127457130-1", "example.com", {});"#));
        assert!(html.contains(r#"ga('require', "GTM-XYZ");"#));
    }
}
