use std::collections::HashMap;
use std::io;

use ramhorns::Template;

use crate::content::Post;
use crate::paginator::page_path;
use crate::text_utils::{slugify, tag_path};
use crate::view::layout::{Fragment, Helmet};
use crate::view::parse_template;

const POST_LIST_TPL: &str = include_str!("../../res/templates/post-list.tpl");
const TAGS_TPL: &str = include_str!("../../res/templates/tags.tpl");

#[derive(ramhorns::Content)]
struct ListPage<'a> {
    heading: &'a str,
    post_list: Vec<PostItem<'a>>,
    page_list: Vec<ViewPagination>,
    show_pagination: bool,
}

#[derive(ramhorns::Content)]
struct PostItem<'a> {
    date: &'a str,
    link: &'a str,
    title: &'a str,
    excerpt: &'a str,
}

#[derive(ramhorns::Content)]
struct ViewPagination {
    current: bool,
    number: u32,
    link: String,
}

#[derive(ramhorns::Content)]
struct TagsPage<'a> {
    tags: Vec<ViewTag<'a>>,
}

#[derive(ramhorns::Content)]
struct ViewTag<'a> {
    tag: &'a str,
    link: String,
    count: usize,
}

/// Posts sharing one tag slug
pub struct TagGroup<'a> {
    pub slug: String,
    /// Spelling of the first post that used the tag
    pub name: String,
    pub posts: Vec<&'a Post>,
}

/// One page of a post listing
pub struct ListPageInfo<'a> {
    pub heading: &'a str,
    pub base_path: &'a str,
    pub cur_page: u32,
    pub page_count: u32,
}

pub struct ListRenderer {
    list_template: Template<'static>,
    tags_template: Template<'static>,
}

impl ListRenderer {
    pub fn new() -> io::Result<ListRenderer> {
        Ok(ListRenderer {
            list_template: parse_template("post list", POST_LIST_TPL)?,
            tags_template: parse_template("tags", TAGS_TPL)?,
        })
    }

    pub fn render(&self, posts: &[&Post], info: &ListPageInfo, helmet: Option<Helmet>) -> Fragment {
        let post_list = posts.iter()
            .map(|post| PostItem {
                date: post.frontmatter.date.as_str(),
                link: post.route.as_str(),
                title: post.frontmatter.title.as_str(),
                excerpt: post.excerpt.as_str(),
            })
            .collect();

        let page_list = (1..=info.page_count)
            .map(|number| ViewPagination {
                current: number == info.cur_page,
                number,
                link: page_path(info.base_path, number),
            })
            .collect();

        let markup = self.list_template.render(&ListPage {
            heading: info.heading,
            post_list,
            page_list,
            show_pagination: info.page_count > 1,
        });

        Fragment { helmet, markup }
    }

    pub fn render_tag_index(&self, groups: &[TagGroup], site_title: &str) -> Fragment {
        let tags = groups.iter()
            .map(|group| ViewTag {
                tag: group.name.as_str(),
                link: tag_path(&group.name),
                count: group.posts.len(),
            })
            .collect();

        Fragment {
            helmet: Some(Helmet { title: format!("Tags | {}", site_title) }),
            markup: self.tags_template.render(&TagsPage { tags }),
        }
    }
}

/// Groups posts by tag slug, most used tags first, ties by name.
/// Posts keep the order they are given in.
pub fn group_by_tag<'a>(posts: &[&'a Post]) -> Vec<TagGroup<'a>> {
    let mut groups: Vec<TagGroup<'a>> = vec![];
    let mut index: HashMap<String, usize> = HashMap::new();

    for &post in posts {
        let mut seen = vec![];
        for tag in post.tags() {
            let slug = slugify(tag);
            if slug.is_empty() || seen.contains(&slug) {
                continue;
            }
            seen.push(slug.clone());

            match index.get(&slug) {
                Some(&i) => groups[i].posts.push(post),
                None => {
                    index.insert(slug.clone(), groups.len());
                    groups.push(TagGroup {
                        slug,
                        name: tag.clone(),
                        posts: vec![post],
                    });
                }
            }
        }
    }

    groups.sort_by(|a, b| {
        b.posts.len().cmp(&a.posts.len()).then_with(|| a.name.cmp(&b.name))
    });
    groups
}
