use std::fmt::Write;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::Netlify;
use crate::site::write_file;

const SECURITY_HEADERS: [(&str, &str); 4] = [
    ("X-Frame-Options", "DENY"),
    ("X-XSS-Protection", "1; mode=block"),
    ("X-Content-Type-Options", "nosniff"),
    ("Referrer-Policy", "same-origin"),
];

/// `_headers` contents: security headers for every path, then the configured
/// extras. An extra with the name of a security header replaces its value.
pub fn headers_file(netlify: &Netlify) -> String {
    let mut headers: Vec<(&str, &str)> = SECURITY_HEADERS.to_vec();
    for (name, value) in &netlify.headers {
        match headers.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some(header) => header.1 = value.as_str(),
            None => headers.push((name.as_str(), value.as_str())),
        }
    }

    let mut buf = String::from("/*\n");
    for (name, value) in headers {
        let _ = writeln!(&mut buf, "  {}: {}", name, value);
    }
    buf
}

pub fn write_headers(netlify: &Netlify, output_dir: &Path) -> io::Result<PathBuf> {
    let path = output_dir.join("_headers");
    write_file(&path, headers_file(netlify))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_headers() {
        let expected = "/*\n  X-Frame-Options: DENY\n  X-XSS-Protection: 1; mode=block\n  X-Content-Type-Options: nosniff\n  Referrer-Policy: same-origin\n";
        assert_eq!(headers_file(&Netlify::default()), expected);
    }

    #[test]
    fn test_extra_headers() {
        let mut netlify = Netlify::default();
        netlify.headers.insert("referrer-policy".to_string(), "no-referrer".to_string());
        netlify.headers.insert("Permissions-Policy".to_string(), "interest-cohort=()".to_string());

        let headers = headers_file(&netlify);
        assert!(headers.contains("  Referrer-Policy: no-referrer\n"));
        assert!(!headers.contains("same-origin"));
        assert!(headers.ends_with("  Permissions-Policy: interest-cohort=()\n"));
    }
}
