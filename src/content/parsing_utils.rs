use std::io;
use std::io::ErrorKind;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

pub const MORE_TAG: &str = "<!-- more -->";

/// Frontmatter as written by the author, before any derivation
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawFrontmatter {
    pub id: Option<String>,
    pub template_key: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Splits a content document into its frontmatter and markdown body.
/// YAML blocks delimited by `---` come first; the `[KEY]: # (value)` comment
/// header is the fallback. A document with neither has empty frontmatter.
pub fn split_frontmatter(file_name: &Path, raw: &str) -> io::Result<(RawFrontmatter, String)> {
    if let Some((yaml, body)) = find_yaml_block(raw) {
        let frontmatter = parse_yaml_frontmatter(file_name, yaml)?;
        return Ok((frontmatter, body.to_string()));
    }

    match parse_comment_header(file_name, raw)? {
        Some(parsed) => Ok(parsed),
        None => Ok((RawFrontmatter::default(), raw.to_string())),
    }
}

fn find_yaml_block(raw: &str) -> Option<(&str, &str)> {
    let trimmed = raw.trim_start_matches(['\u{feff}', '\n', '\r']);
    let offset = raw.len() - trimmed.len();

    let mut pos = 0;
    let mut yaml_start = None;
    for line in trimmed.split_inclusive('\n') {
        let line_end = pos + line.len();
        if line.trim_end() == "---" {
            match yaml_start {
                None if pos == 0 => yaml_start = Some(line_end),
                Some(start) => {
                    let yaml = &raw[offset + start..offset + pos];
                    let body = &raw[offset + line_end..];
                    return Some((yaml, body));
                }
                None => return None,
            }
        } else if yaml_start.is_none() {
            return None;
        }
        pos = line_end;
    }

    None
}

fn parse_yaml_frontmatter(file_name: &Path, yaml: &str) -> io::Result<RawFrontmatter> {
    if yaml.trim().is_empty() {
        return Ok(RawFrontmatter::default());
    }

    let mut frontmatter: RawFrontmatter = serde_yaml_ng::from_str(yaml).map_err(|e| {
        io::Error::new(ErrorKind::InvalidData, format!("Invalid frontmatter: {} - file={}", e, file_name.display()))
    })?;

    frontmatter.tags = frontmatter.tags.map(|tags| {
        tags.into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    });

    Ok(frontmatter)
}

/// Example of header
/// <!--
/// [ID]: # (a63bd715-a3fe-4788-b0e1-2a3153778544)
/// [DATE]: # (2022-04-02 12:05:00.000)
/// [TAGS]: # (rust programming)
/// -->
///
/// # What I learned after 20+ years of software development
fn parse_comment_header(file_name: &Path, raw: &str) -> io::Result<Option<(RawFrontmatter, String)>> {
    let lines: Vec<&str> = raw.lines().collect();
    let skip_blank = |idx: &mut usize| {
        while *idx < lines.len() && lines[*idx].trim().is_empty() {
            *idx += 1;
        }
    };

    let mut frontmatter = RawFrontmatter::default();
    let mut found = false;
    let mut idx = 0;

    // Skip optional HTML comment in the beginning
    skip_blank(&mut idx);
    let start_with_comment = idx < lines.len() && lines[idx].trim() == "<!--";
    if start_with_comment {
        idx += 1;
    }

    loop {
        skip_blank(&mut idx);
        let Some((key, val)) = lines.get(idx).and_then(|line| extract_header_key_val(line)) else {
            break;
        };

        found = true;
        match key {
            "ID" => frontmatter.id = Some(val.to_string()),
            "DATE" => frontmatter.date = Some(val.to_string()),
            "TITLE" => frontmatter.title = Some(val.to_string()),
            "DESCRIPTION" => frontmatter.description = Some(val.to_string()),
            "TEMPLATE" => frontmatter.template_key = Some(val.to_string()),
            "TAGS" => frontmatter.tags = Some(extract_tags(val)),
            _ => {}
        }
        idx += 1;
    }

    if !found {
        return Ok(None);
    }

    if start_with_comment {
        loop {
            match lines.get(idx) {
                Some(line) if line.trim() == "-->" => {
                    idx += 1;
                    break;
                }
                Some(_) => idx += 1,
                None => return Err(io::Error::new(
                    ErrorKind::InvalidData,
                    format!("End of comment in the header is missing - file={}", file_name.display()),
                )),
            }
        }
    }

    // After the header, an optional H1 title
    skip_blank(&mut idx);
    if let Some(title) = lines.get(idx).and_then(|line| line.strip_prefix("# ")) {
        if frontmatter.title.is_none() {
            frontmatter.title = Some(title.trim().to_string());
        }
        idx += 1;
    }

    Ok(Some((frontmatter, join_lines(&lines[idx.min(lines.len())..]))))
}

fn join_lines(lines: &[&str]) -> String {
    let mut content = String::new();
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    content
}

fn extract_tags(tags_str: &str) -> Vec<String> {
    tags_str.split(' ')
        .filter(|x| !x.is_empty())
        .map(|s| s.to_string())
        .collect()
}

fn extract_header_key_val(line: &str) -> Option<(&str, &str)> {
    lazy_static! {
        static ref HEADER_REGEX: Regex = Regex::new(r"^\s*\[(?P<key>\w+)\]: # \((?P<value>.*)\)\s*$").unwrap();
    }

    HEADER_REGEX.captures(line).and_then(|cap| {
        let key = cap.name("key").map(|key| key.as_str());
        let val = cap.name("value").map(|val| val.as_str());
        match (key, val) {
            (Some(key), Some(val)) => Some((key, val)),
            _ => None
        }
    })
}

/// Text before the `<!-- more -->` marker, if the marker exists
pub fn extract_preview(body: &str) -> Option<&str> {
    body.find(MORE_TAG).map(|pos| &body[..pos])
}

/// Strips `<!-- -->` comments from compiled HTML
pub fn remove_comments(md_post: &str) -> io::Result<String> {
    let mut res: String = String::new();
    let mut block = md_post;

    let start_comment = "<!--";
    let end_comment = "-->";

    while let Some(start) = block.find(start_comment) {
        res.push_str(&block[..start]);
        let next = &block[(start + start_comment.len())..];
        match next.find(end_comment) {
            Some(end) => block = &next[(end + end_comment.len())..],
            None => return Err(io::Error::new(ErrorKind::InvalidData, "Error finding end of comment")),
        }
    }
    res.push_str(block);

    Ok(res)
}
