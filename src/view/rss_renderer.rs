use std::io::Cursor;

use chrono::{TimeZone, Utc};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::content::{Post, PostId};

/* Example
<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
<channel>
  <title>blog.sardor.io</title>
  <link>https://blog.sardor.io</link>
  <description>Notes on Rust, machine learning and the web</description>
  <item>
    <title>Rust for the curious</title>
    <link>https://blog.sardor.io/blog/rust-for-the-curious/</link>
    <guid isPermaLink="false">3f0c6e0a-8b1e-5b8e-9a57-0c2b1f3e9a11</guid>
    <description><![CDATA[A short tour of ownership]]></description>
    <pubDate>Fri, 5 Oct 2018 15:04:10 +0000</pubDate>
  </item>
</channel>
</rss>
*/

pub struct RssChannel<'a> {
    pub ch_title: &'a str,
    pub ch_link: &'a str,
    pub ch_desc: &'a str,
}

impl<'a> RssChannel<'a> {
    /// Posts are written in the order given
    pub fn render(&self, posts: &[&Post]) -> quick_xml::Result<Vec<u8>> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));

        let decl = Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None));
        writer.write_event(decl)?;

        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("version", "2.0"));
        writer.write_event(Event::Start(rss))?;

        writer.write_event(Event::Start(BytesStart::new("channel")))?;
        push_text(&mut writer, "title", self.ch_title)?;
        push_text(&mut writer, "link", self.ch_link)?;
        push_text(&mut writer, "description", self.ch_desc)?;

        for post in posts {
            writer.write_event(Event::Start(BytesStart::new("item")))?;

            push_text(&mut writer, "title", post.frontmatter.title.as_str())?;

            let link = full_link(self.ch_link, post.route.as_str());
            push_text(&mut writer, "link", link.as_str())?;

            let PostId(ref guid) = post.id;
            let mut guid_elem = BytesStart::new("guid");
            guid_elem.push_attribute(("isPermaLink", "false"));
            writer.write_event(Event::Start(guid_elem))?;
            writer.write_event(Event::Text(BytesText::new(guid.as_str())))?;
            writer.write_event(Event::End(BytesEnd::new("guid")))?;

            push_cdata(&mut writer, "description", post.excerpt.as_str())?;

            if let Some(dt) = &post.published {
                let dt = Utc.from_utc_datetime(dt);
                push_text(&mut writer, "pubDate", &dt.to_rfc2822())?;
            }

            writer.write_event(Event::End(BytesEnd::new("item")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("channel")))?;
        writer.write_event(Event::End(BytesEnd::new("rss")))?;

        Ok(writer.into_inner().into_inner())
    }
}

fn full_link(base_url: &str, route: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    if route.starts_with('/') {
        format!("{}{}", base_url, route)
    } else {
        format!("{}/{}", base_url, route)
    }
}

fn push_text(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn push_cdata(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    if text.contains("]]>") {
        let new_text = text.replace("]]>", "]] >");
        writer.write_event(Event::CData(BytesCData::new(&new_text)))?;
    } else {
        writer.write_event(Event::CData(BytesCData::new(text)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::str;

    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    use crate::content::{Frontmatter, TemplateKey};

    use super::*;

    fn create_post(id: &str, published: Option<NaiveDateTime>) -> Post {
        Post {
            id: PostId(id.to_string()),
            route: format!("/blog/post-{}/", id),
            source: PathBuf::from(format!("post-{}.md", id)),
            template_key: TemplateKey::BlogPost,
            html: String::new(),
            excerpt: format!("summary-of-post-{}", id),
            published,
            frontmatter: Frontmatter {
                title: format!("title-of-post-{}", id),
                description: None,
                date: String::new(),
                tags: None,
            },
        }
    }

    fn channel() -> RssChannel<'static> {
        RssChannel {
            ch_title: "my feed",
            ch_link: "https://blog.sardor.io/",
            ch_desc: "My blog feed",
        }
    }

    #[test]
    fn render_xml() {
        let dt = NaiveDateTime::new(
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            NaiveTime::from_hms_opt(5, 6, 7).unwrap(),
        );
        let first = create_post("1", Some(dt));
        let second = create_post("2", Some(dt));

        let xml = channel().render(&[&first, &second]).unwrap();
        assert_eq!(str::from_utf8(&xml).unwrap(), EXPECTED);
    }

    #[test]
    fn render_without_date_skips_pub_date() {
        let post = create_post("3", None);
        let xml = channel().render(&[&post]).unwrap();
        let xml = str::from_utf8(&xml).unwrap();
        assert!(!xml.contains("pubDate"));
        assert!(xml.contains("<link>https://blog.sardor.io/blog/post-3/</link>"));
    }

    #[test]
    fn cdata_terminator_is_broken_up() {
        let mut post = create_post("4", None);
        post.excerpt = "a ]]> b".to_string();
        let xml = channel().render(&[&post]).unwrap();
        assert!(str::from_utf8(&xml).unwrap().contains("<![CDATA[a ]] > b]]>"));
    }

    #[test]
    fn test_full_link() {
        assert_eq!(full_link("https://blog.sardor.io", "/about/"), "https://blog.sardor.io/about/");
        assert_eq!(full_link("https://blog.sardor.io/", "about/"), "https://blog.sardor.io/about/");
    }

    const EXPECTED: &str = r##"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0"><channel><title>my feed</title><link>https://blog.sardor.io/</link><description>My blog feed</description><item><title>title-of-post-1</title><link>https://blog.sardor.io/blog/post-1/</link><guid isPermaLink="false">1</guid><description><![CDATA[summary-of-post-1]]></description><pubDate>Tue, 2 Jan 2024 05:06:07 +0000</pubDate></item><item><title>title-of-post-2</title><link>https://blog.sardor.io/blog/post-2/</link><guid isPermaLink="false">2</guid><description><![CDATA[summary-of-post-2]]></description><pubDate>Tue, 2 Jan 2024 05:06:07 +0000</pubDate></item></channel></rss>"##;
}
