use std::fs::File;
use std::io;
use std::io::Write;
use std::path::Path;

const CONFIG_SAMPLE: &str = r#"[site]
title = "My blog"
default_title = "Home | My blog"
site_url = "https://example.com"
description = "Notes on software"
stylesheets = ["/styles/all.css"]
# date_format = "%B %d, %Y"

# For the file locations, If you want it to be relative to the executable directory
# use ${exe_dir}/location
[paths]
pages_dir = "src/pages"
images_dir = "src/img"
output_dir = "public"

# Default file name if using directory instead of files
[defaults]
index_base_name = "index"
page_size = 10

[markdown]
katex = false

[markdown.highlight]
class_prefix = "language-"
show_line_numbers = false
aliases = { sh = "bash" }

# Every section below is optional. Remove it to disable the feature.

# [analytics]
# tracking_id = "UA-XXXXXXXXX-X"
# anonymize = true
# respect_dnt = true
# exclude = ["/admin/**"]

# [comments]
# disqus_shortname = "my-blog"

# [cms]
# module_path = "src/cms/cms.js"
# config_path = "src/cms/config.yml"

[netlify]

[rss_feed]
title = "My blog"
# Defaults to site.description
# description = "Notes on software"
page_size = 20

# [log]
# level = "Info"
# log_to_console = true
# location = "log/blogpress.log"
"#;

pub(crate) fn write_sample_cfg(file_path: &Path) -> io::Result<()> {
    let mut file = File::create(file_path)?;
    file.write_all(CONFIG_SAMPLE.as_bytes())
}
