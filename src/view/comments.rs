use std::fmt::Write;

use serde_json::json;

use crate::content::{Post, PostId};
use crate::view::script_value;

/// What the comment widget keys a thread on
#[derive(Debug, Clone, PartialEq)]
pub struct DisqusConfig {
    pub identifier: String,
    pub title: String,
    pub url: String,
}

impl DisqusConfig {
    pub fn for_post(post: &Post, site_url: &str) -> Self {
        let PostId(ref id) = post.id;
        DisqusConfig {
            identifier: id.clone(),
            title: post.frontmatter.title.clone(),
            url: format!("{}{}", site_url.trim_end_matches('/'), post.route),
        }
    }
}

/// Disqus thread embed. The widget fetches the thread by itself once loaded.
pub struct DisqusEmbed {
    pub shortname: String,
}

impl DisqusEmbed {
    pub fn render(&self, config: &DisqusConfig) -> String {
        let mut buf = String::new();
        let _ = writeln!(&mut buf, r#"<div class="container content disqus-div">"#);
        let _ = writeln!(&mut buf, r#"  <div class="columns">"#);
        let _ = writeln!(&mut buf, r#"    <div class="column is-10 is-offset-1">"#);
        let _ = writeln!(&mut buf, r#"      <div id="disqus_thread"></div>"#);
        let _ = writeln!(&mut buf, "      <script>");
        let _ = writeln!(&mut buf, "        var disqus_config = function () {{");
        let _ = writeln!(&mut buf, "          this.page.identifier = {};", script_value(json!(config.identifier)));
        let _ = writeln!(&mut buf, "          this.page.title = {};", script_value(json!(config.title)));
        let _ = writeln!(&mut buf, "          this.page.url = {};", script_value(json!(config.url)));
        let _ = writeln!(&mut buf, "        }};");
        let _ = writeln!(&mut buf, "        (function () {{");
        let _ = writeln!(&mut buf, "          var d = document, s = d.createElement('script');");
        let _ = writeln!(&mut buf, "          s.src = {};", script_value(json!(format!("https://{}.disqus.com/embed.js", self.shortname))));
        let _ = writeln!(&mut buf, "          s.setAttribute('data-timestamp', +new Date());");
        let _ = writeln!(&mut buf, "          (d.head || d.body).appendChild(s);");
        let _ = writeln!(&mut buf, "        }})();");
        let _ = writeln!(&mut buf, "      </script>");
        let _ = writeln!(&mut buf, "    </div>");
        let _ = writeln!(&mut buf, "  </div>");
        let _ = write!(&mut buf, "</div>");
        buf
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::content::{Frontmatter, TemplateKey};

    use super::*;

    fn post(id: &str, title: &str) -> Post {
        Post {
            id: PostId(id.to_string()),
            route: "/blog/hello/".to_string(),
            source: PathBuf::from("src/pages/blog/hello.md"),
            template_key: TemplateKey::BlogPost,
            html: String::new(),
            excerpt: String::new(),
            published: None,
            frontmatter: Frontmatter {
                title: title.to_string(),
                description: None,
                date: String::new(),
                tags: None,
            },
        }
    }

    #[test]
    fn test_identifier_is_post_id() {
        let p = post("post-123", "Hello");
        let config = DisqusConfig::for_post(&p, "https://blog.sardor.io/");
        assert_eq!(config.identifier, "post-123");
        assert_eq!(config.title, "Hello");
        assert_eq!(config.url, "https://blog.sardor.io/blog/hello/");
        assert_eq!(DisqusConfig::for_post(&p, "https://blog.sardor.io/"), config);
    }

    #[test]
    fn test_render_embed() {
        let embed = DisqusEmbed { shortname: "https-blog-sardor-io".to_string() };
        let html = embed.render(&DisqusConfig::for_post(&post("post-123", "Hi </script>"), "https://blog.sardor.io"));
        assert!(html.contains(r#"<div id="disqus_thread"></div>"#));
        assert!(html.contains(r#"this.page.identifier = "post-123";"#));
        assert!(html.contains(r#"this.page.title = "Hi <\/script>";"#));
        assert!(html.contains(r#"s.src = "https://https-blog-sardor-io.disqus.com/embed.js";"#));
    }
}
