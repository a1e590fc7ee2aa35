use std::collections::HashSet;
use std::io;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use spdlog::{debug, info, warn};

use crate::config::Config;
use crate::content::content_source::ContentSource;
use crate::content::markdown_renderer::MarkdownRenderer;
use crate::content::{sort_by_date, Post};
use crate::paginator::{page_path, Paginator};
use crate::site::{cms, copy_dir, copy_file, netlify, route_dir, write_file};
use crate::text_utils::slugify;
use crate::view::blog_post::BlogPostTemplate;
use crate::view::comments::DisqusEmbed;
use crate::view::layout::{Helmet, Layout};
use crate::view::list_renderer::{group_by_tag, ListPageInfo, ListRenderer};
use crate::view::page::PageTemplate;
use crate::view::rss_renderer::RssChannel;

const INDEX_HEADING: &str = "Latest Stories";

#[derive(Debug, Default, PartialEq)]
pub struct BuildReport {
    pub posts: usize,
    pub pages: usize,
    pub tags: usize,
    pub files_written: usize,
    pub assets_copied: usize,
}

/// Renders the whole site into the configured output directory.
/// Existing files in the output directory are overwritten, never removed.
pub struct SiteBuilder<'a> {
    config: &'a Config,
    layout: Layout,
    markdown: MarkdownRenderer,
    blog_post: BlogPostTemplate,
    page: PageTemplate,
    lists: ListRenderer,
    comments: Option<DisqusEmbed>,
}

impl<'a> SiteBuilder<'a> {
    pub fn new(config: &'a Config) -> io::Result<SiteBuilder<'a>> {
        Ok(SiteBuilder {
            config,
            layout: Layout::new(config)?,
            markdown: MarkdownRenderer::new(&config.markdown, config.date_format()),
            blog_post: BlogPostTemplate::new()?,
            page: PageTemplate::new()?,
            lists: ListRenderer::new()?,
            comments: config.comments.as_ref().map(|c| DisqusEmbed { shortname: c.disqus_shortname.clone() }),
        })
    }

    fn output_dir(&self) -> &Path {
        &self.config.paths.output_dir
    }

    pub fn build(&self) -> io::Result<BuildReport> {
        let mut report = BuildReport::default();

        let source = ContentSource {
            root_dir: self.config.paths.pages_dir.clone(),
            index_base_name: self.config.index_base_name().to_string(),
        };

        let mut posts: Vec<Post> = vec![];
        let mut dir_posts: Vec<(String, PathBuf)> = vec![];
        let mut routes: HashSet<String> = HashSet::new();
        for content_file in source.load()? {
            if !routes.insert(content_file.route.clone()) {
                warn!("Skipping {}: route {} is already taken", content_file.file_path.display(), content_file.route);
                continue;
            }
            let post = self.markdown.render(&content_file)?;
            for tag in post.tags().iter().filter(|tag| slugify(tag).is_empty()) {
                warn!("Tag {:?} of {} has no characters usable in a link, it gets no tag page",
                    tag, content_file.file_path.display());
            }
            if content_file.is_dir_post {
                dir_posts.push((content_file.route.clone(), content_file.file_path.clone()));
            }
            posts.push(post);
        }
        info!("Loaded {} content files from {}", posts.len(), self.config.paths.pages_dir.display());

        for post in &posts {
            self.write_content_page(post)?;
            report.files_written += 1;
            if post.is_blog_post() {
                report.posts += 1;
            } else {
                report.pages += 1;
            }
        }

        let mut blog_posts: Vec<&Post> = posts.iter().filter(|p| p.is_blog_post()).collect();
        sort_by_date(&mut blog_posts);

        if routes.contains("/") {
            info!("Content routes to /, skipping the index listing");
        } else {
            report.files_written += self.write_listing(&blog_posts, "/", INDEX_HEADING, |_| None)?;
        }

        report.tags = self.write_tag_pages(&blog_posts, &mut report.files_written)?;

        if let Some(ref rss) = self.config.rss_feed {
            let latest: Vec<&Post> = blog_posts.iter().take(rss.page_size as usize).copied().collect();
            let channel = RssChannel {
                ch_title: &rss.title,
                ch_link: &self.config.site.site_url,
                ch_desc: self.config.feed_description(),
            };
            let xml = channel.render(&latest)
                .map_err(|e| io::Error::new(ErrorKind::Other, format!("Error rendering rss feed: {}", e)))?;
            write_file(&self.output_dir().join("rss.xml"), xml)?;
            report.files_written += 1;
        }

        if let Some(ref cms_config) = self.config.cms {
            report.files_written += cms::write_admin(cms_config, self.output_dir())?.len();
        }

        if let Some(ref images_dir) = self.config.paths.images_dir {
            if images_dir.is_dir() {
                report.assets_copied += copy_dir(images_dir, &self.output_dir().join("img"))?.len();
            } else {
                warn!("Images directory {} not found, nothing copied", images_dir.display());
            }
        }

        for (route, file_path) in &dir_posts {
            for asset in ContentSource::retrieve_assets(file_path)? {
                let Some(file_name) = asset.file_name() else {
                    continue;
                };
                let target = route_dir(self.output_dir(), route).join(file_name);
                debug!("Copying {} to {}", asset.display(), target.display());
                copy_file(&asset, &target)?;
                report.assets_copied += 1;
            }
        }

        // Must stay the last file written
        if let Some(ref netlify_config) = self.config.netlify {
            netlify::write_headers(netlify_config, self.output_dir())?;
            report.files_written += 1;
        }

        info!("Built {} posts, {} pages and {} tags into {}",
            report.posts, report.pages, report.tags, self.output_dir().display());
        Ok(report)
    }

    fn write_html(&self, route: &str, html: String) -> io::Result<()> {
        write_file(&route_dir(self.output_dir(), route).join("index.html"), html)
    }

    fn write_content_page(&self, post: &Post) -> io::Result<()> {
        let route = post.route.as_str();
        let html = if post.is_blog_post() {
            let comments = self.comments.as_ref().map(|embed| (embed, self.config.site.site_url.as_str()));
            self.layout.render(route, || self.blog_post.render_post(post, comments))
        } else {
            self.layout.render(route, || self.page.render_page(post, &self.config.site.title))
        };
        debug!("Writing {} from {}", route, post.source.display());
        self.write_html(route, html)
    }

    /// Paginated listing under `base_path`. Always writes at least the first page.
    fn write_listing<H>(&self, posts: &[&Post], base_path: &str, heading: &str, helmet: H) -> io::Result<usize>
    where
        H: Fn(u32) -> Option<Helmet>,
    {
        let paginator = Paginator::from(posts, self.config.defaults.page_size);
        let page_count = paginator.page_count().max(1);

        for cur_page in 1..=page_count {
            let items = paginator.get_page(cur_page).unwrap_or(&[]);
            let route = page_path(base_path, cur_page);
            let info = ListPageInfo { heading, base_path, cur_page, page_count };
            let html = self.layout.render(&route, || self.lists.render(items, &info, helmet(cur_page)));
            self.write_html(&route, html)?;
        }

        Ok(page_count as usize)
    }

    fn write_tag_pages(&self, blog_posts: &[&Post], files_written: &mut usize) -> io::Result<usize> {
        let groups = group_by_tag(blog_posts);
        let site_title = self.config.site.title.as_str();

        for group in &groups {
            let base_path = format!("/tags/{}/", group.slug);
            let helmet = |_: u32| Some(Helmet { title: format!("{} | {}", group.name, site_title) });
            *files_written += self.write_listing(&group.posts, &base_path, &group.name, helmet)?;
        }

        let html = self.layout.render("/tags/", || self.lists.render_tag_index(&groups, site_title));
        self.write_html("/tags/", html)?;
        *files_written += 1;

        Ok(groups.len())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::config::parse_config;
    use crate::test_data::{PAGE_DATA_YAML, POST_DATA_HEADER, POST_DATA_YAML};

    use super::*;

    struct Site {
        _dir: tempfile::TempDir,
        root: PathBuf,
    }

    impl Site {
        fn read(&self, rel: &str) -> String {
            fs::read_to_string(self.root.join("public").join(rel)).unwrap()
        }

        fn exists(&self, rel: &str) -> bool {
            self.root.join("public").join(rel).is_file()
        }
    }

    fn setup(page_size: u32, extra: &str) -> Site {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        let pages = root.join("pages");
        fs::create_dir_all(pages.join("blog")).unwrap();
        fs::create_dir_all(pages.join("about")).unwrap();
        fs::create_dir_all(root.join("img")).unwrap();
        fs::create_dir_all(root.join("cms")).unwrap();

        fs::write(pages.join("blog/rust-for-the-curious.md"), POST_DATA_YAML).unwrap();
        fs::write(pages.join("blog/what-i-learned.md"), POST_DATA_HEADER).unwrap();
        fs::write(pages.join("about/index.md"), PAGE_DATA_YAML).unwrap();
        fs::write(pages.join("about/me.png"), [137u8, 80, 78, 71]).unwrap();
        fs::write(root.join("img/github-icon.svg"), "<svg/>").unwrap();
        fs::write(root.join("cms/cms.js"), "// cms").unwrap();
        fs::write(root.join("cms/config.yml"), "backend:\n  name: git-gateway\n").unwrap();

        let config = format!(r##"
[site]
title = "blog.sardor.io"
default_title = "Home | Gatsby + Netlify CMS"
site_url = "https://blog.sardor.io"

[paths]
pages_dir = '{root}/pages'
images_dir = '{root}/img'
output_dir = '{root}/public'

[defaults]
page_size = {page_size}

[comments]
disqus_shortname = "https-blog-sardor-io"

[cms]
module_path = '{root}/cms/cms.js'
config_path = '{root}/cms/config.yml'

[netlify]

[rss_feed]
title = "blog.sardor.io"
description = "Notes on software"
page_size = 10
{extra}
"##, root = root.display(), page_size = page_size, extra = extra);
        fs::write(root.join("blogpress.toml"), config).unwrap();

        Site { _dir: dir, root }
    }

    fn build(site: &Site) -> BuildReport {
        let config = parse_config(&fs::read_to_string(site.root.join("blogpress.toml")).unwrap()).unwrap();
        SiteBuilder::new(&config).unwrap().build().unwrap()
    }

    #[test]
    fn test_build_site() {
        let site = setup(10, "");
        let report = build(&site);
        assert_eq!(report.posts, 2);
        assert_eq!(report.pages, 1);
        assert_eq!(report.tags, 3);
        assert_eq!(report.assets_copied, 2);

        let post = site.read("blog/rust-for-the-curious/index.html");
        assert!(post.contains("<title>Rust for the curious | Blog</title>"));
        assert!(post.contains(r#"<a href="/tags/machine-learning/">Machine Learning</a>"#));
        assert!(post.contains("disqus_thread"));

        let about = site.read("about/index.html");
        assert!(about.contains("<title>About me | blog.sardor.io</title>"));
        assert!(!about.contains("disqus_thread"));
        assert!(site.exists("about/me.png"));

        let index = site.read("index.html");
        assert!(index.contains("<title>Home | Gatsby + Netlify CMS</title>"));
        let newest = index.find("/blog/what-i-learned/").unwrap();
        let oldest = index.find("/blog/rust-for-the-curious/").unwrap();
        assert!(newest < oldest);
        assert!(!index.contains("/about/\""));

        let rust = site.read("tags/rust/index.html");
        assert!(rust.contains("/blog/rust-for-the-curious/"));
        assert!(rust.contains("/blog/what-i-learned/"));
        // The newest post spells the tag first
        assert!(rust.contains("<title>rust | blog.sardor.io</title>"));
        assert!(site.exists("tags/machine-learning/index.html"));
        assert!(site.exists("tags/something-else/index.html"));
        assert!(site.read("tags/index.html").contains(r#"<a href="/tags/rust/">rust (2)</a>"#));

        let rss = site.read("rss.xml");
        assert!(rss.contains(r#"<guid isPermaLink="false">a63bd715-a3fe-4788-b0e1-2a3153778544</guid>"#));
        assert!(rss.contains("<link>https://blog.sardor.io/blog/rust-for-the-curious/</link>"));

        assert!(site.exists("admin/index.html"));
        assert_eq!(site.read("admin/cms.js"), "// cms");
        assert!(site.exists("admin/config.yml"));
        assert!(site.exists("img/github-icon.svg"));
        assert!(site.read("_headers").contains("X-Frame-Options: DENY"));
    }

    #[test]
    fn test_index_pagination() {
        let site = setup(1, "");
        build(&site);
        let first = site.read("index.html");
        assert!(first.contains("/blog/what-i-learned/"));
        assert!(first.contains(r#"href="/page/2/">2</a>"#));
        let second = site.read("page/2/index.html");
        assert!(second.contains("/blog/rust-for-the-curious/"));
        assert!(site.exists("tags/rust/page/2/index.html"));
    }

    #[test]
    fn test_content_index_replaces_listing() {
        let site = setup(10, "");
        fs::write(site.root.join("pages/index.md"), "---\ntemplateKey: index-page\ntitle: Welcome\n---\n\nHello.\n").unwrap();
        let report = build(&site);
        assert_eq!(report.pages, 2);
        let index = site.read("index.html");
        assert!(index.contains("Welcome"));
        assert!(!index.contains("Latest Stories"));
    }

    #[test]
    fn test_broken_post_names_file() {
        let site = setup(10, "");
        fs::write(site.root.join("pages/blog/broken.md"), "<!-- never closed\n\n# Oops\n").unwrap();
        let config = parse_config(&fs::read_to_string(site.root.join("blogpress.toml")).unwrap()).unwrap();
        let err = SiteBuilder::new(&config).unwrap().build().unwrap_err();
        assert!(err.to_string().contains("broken.md"));
    }
}
