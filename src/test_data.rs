#[cfg(test)]
pub const CONFIG_DATA: &str = r##"
[site]
title = "blog.sardor.io"
default_title = "Home | Gatsby + Netlify CMS"
site_url = "https://blog.sardor.io"
description = "Notes on software"
stylesheets = ["/styles/all.css"]

[paths]
pages_dir = "src/pages"
images_dir = "src/img"
output_dir = "public"

[defaults]
index_base_name = "index"
page_size = 10

[markdown]
katex = true

[markdown.highlight]
class_prefix = "language-"
show_line_numbers = true
aliases = { sh = "bash" }

[analytics]
tracking_id = "UA-127457130-1"
head = false
anonymize = true
respect_dnt = true
exclude = ["/preview/**", "/do-not-track/me/too/"]
sample_rate = 5
site_speed_sample_rate = 10

[comments]
disqus_shortname = "https-blog-sardor-io"

[cms]
module_path = "src/cms/cms.js"

[netlify]

[log]
level = "Info"
log_to_console = true
"##;

#[cfg(test)]
pub const POST_DATA_YAML: &str = r##"---
templateKey: blog-post
title: Rust for the curious
date: 2018-10-05T15:04:10.000Z
description: A short tour of ownership and borrowing
tags:
  - Rust
  - Machine Learning
---

Rust makes you think about who owns what.

<!-- more -->

## Ownership

Every value has a single owner.

```rust
fn main() {
    let x = 1 < 2;
}
```
"##;

#[cfg(test)]
pub const POST_DATA_HEADER: &str = "<!--
[ID]: # (a63bd715-a3fe-4788-b0e1-2a3153778544)
[DATE]: # (2022-04-02 12:05:00.000)
[TAGS]: # (rust something-else)
-->

# What I learned after 20+ years of software development
How to be a great software engineer?

Someone asked me this question today and I didn’t have an answer.
";

#[cfg(test)]
pub const PAGE_DATA_YAML: &str = r##"---
templateKey: about-page
title: About me
---

I write code and sometimes words.
"##;
