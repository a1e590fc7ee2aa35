use std::ops::Index;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;

pub const EXCERPT_LENGTH: usize = 400;

fn to_int<T: std::str::FromStr>(num_str: &str, date_str: &str) -> Result<T, String> {
    match num_str.parse::<T>() {
        Ok(x) => Ok(x),
        Err(_) => Err(format!("Error parsing {} from the date {}", num_str, date_str)),
    }
}

/// Parses `YYYY-MM-DD HH:MM:SS[.mmm]`
pub fn parse_date_time(buf: &str) -> Result<NaiveDateTime, String> {
    lazy_static! {
        static ref DATE_TIME_REGEX: Regex = Regex::new(
            r#"(\d{4})-(\d{1,2})-(\d{1,2})[ T](\d{1,2}):(\d{1,2}):(\d{1,2})(\.\d{0,3})?"#
        ).unwrap();
    }

    let Some(caps) = DATE_TIME_REGEX.captures(buf) else {
        return Err(format!("Unable to parse date time {}", buf));
    };

    let to_i32 = |num_str: &str| to_int::<i32>(num_str, buf);
    let to_u32 = |num_str: &str| to_int::<u32>(num_str, buf);

    let y: i32 = to_i32(caps.index(1))?;
    let m: u32 = to_u32(caps.index(2))?;
    let d: u32 = to_u32(caps.index(3))?;
    let h: u32 = to_u32(caps.index(4))?;
    let mn: u32 = to_u32(caps.index(5))?;
    let s: u32 = to_u32(caps.index(6))?;

    let date = NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| format!("Invalid date {}", buf))?;
    let time = NaiveTime::from_hms_opt(h, mn, s)
        .ok_or_else(|| format!("Invalid time {}", buf))?;

    Ok(NaiveDateTime::new(date, time))
}

/// Accepts the date forms found in frontmatter: RFC 3339, `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DD`
pub fn parse_frontmatter_date(buf: &str) -> Result<NaiveDateTime, String> {
    let buf = buf.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(buf) {
        return Ok(dt.naive_utc());
    }

    if let Ok(dt) = parse_date_time(buf) {
        return Ok(dt);
    }

    NaiveDate::parse_from_str(buf, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("Unable to parse date {}", buf))
}

pub fn format_date(date_time: &NaiveDateTime, format: &str) -> String {
    date_time.format(format).to_string()
}

/// Lowercase words joined by hyphens. Non-ASCII letters are transliterated
/// and everything that isn't alphanumeric separates words.
pub fn slugify(text: &str) -> String {
    let text = unidecode::unidecode(text);
    let words: Vec<String> = text
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_ascii_lowercase())
        .collect();
    words.join("-")
}

pub fn tag_path(tag: &str) -> String {
    format!("/tags/{}/", slugify(tag))
}

/// Drops tags, collapses whitespace and prunes at a word boundary
pub fn excerpt_from_html(html: &str, max_len: usize) -> String {
    lazy_static! {
        static ref TAG_REGEX: Regex = Regex::new(r"<[^>]*>").unwrap();
    }

    let text = TAG_REGEX.replace_all(html, " ");
    let text = html_escape::decode_html_entities(&text);
    let words: Vec<&str> = text.split_whitespace().collect();

    let mut res = String::new();
    for word in words.iter() {
        let extra = if res.is_empty() { 0 } else { 1 };
        if res.chars().count() + extra + word.chars().count() > max_len {
            res.push('…');
            return res;
        }
        if !res.is_empty() {
            res.push(' ');
        }
        res.push_str(word);
    }
    res
}
