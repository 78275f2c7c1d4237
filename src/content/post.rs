//! Post model and normalization

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::frontmatter::Frontmatter;

/// Reading speed used for the read-time estimate, in words per minute.
const WORDS_PER_MINUTE: usize = 200;

/// Title used when a post has none in its front matter.
const UNTITLED: &str = "Untitled";

/// Why a document could not be normalized into a [`Post`].
///
/// Normalization failures are isolated per document: the loader logs them and
/// keeps going, so one bad file never takes the whole collection down.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("invalid date '{0}'")]
    InvalidDate(String),
    #[error("no usable slug")]
    MissingSlug,
}

/// A blog post.
///
/// Constructed once at load time from a source document; never mutated
/// afterwards.
#[derive(Debug, Clone, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Ingestion position, assigned before sorting. Breaks date ties so the
    /// repository order never depends on sort stability.
    pub id: usize,

    /// Post title
    pub title: String,

    /// URL-safe identifier used for routing and lookup
    pub slug: String,

    /// Publication date
    pub date: NaiveDate,

    /// Short summary shown in listings
    pub excerpt: String,

    /// Tags, in source order
    pub tags: Vec<String>,

    /// Editorial flag promoting the post in summary views
    pub featured: bool,

    /// Estimated reading time in minutes
    pub read_time: u32,

    /// Markdown body with the front matter stripped
    pub body: String,

    /// Source file path relative to the content directory
    pub source: String,
}

impl Post {
    /// Combine a parsed header and body into a complete post, filling
    /// defaults for every absent field.
    ///
    /// `fallback_slug` is the source file's stem; `id` is the document's
    /// ingestion position.
    pub fn from_document(
        fm: &Frontmatter,
        body: &str,
        fallback_slug: &str,
        source: &str,
        id: usize,
    ) -> Result<Self, NormalizeError> {
        let title = fm.str_value("title").unwrap_or(UNTITLED).to_string();

        let slug = match fm.str_value("slug") {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => fallback_slug.to_string(),
        };
        if slug.is_empty() {
            return Err(NormalizeError::MissingSlug);
        }

        // An absent date falls back to today; a present but unparseable one
        // fails the document.
        let date = match fm.str_value("date") {
            Some(raw) => {
                parse_date(raw).ok_or_else(|| NormalizeError::InvalidDate(raw.to_string()))?
            }
            None => Local::now().date_naive(),
        };

        let excerpt = fm.str_value("excerpt").unwrap_or_default().to_string();
        let tags = fm
            .list_value("tags")
            .map(<[String]>::to_vec)
            .unwrap_or_default();
        let featured = fm.bool_value("featured").unwrap_or(false);

        let read_time = fm
            .int_value("readTime")
            .and_then(|minutes| u32::try_from(minutes).ok())
            .unwrap_or_else(|| estimate_read_time(body));

        Ok(Self {
            id,
            title,
            slug,
            date,
            excerpt,
            tags,
            featured,
            read_time,
            body: body.to_string(),
            source: source.to_string(),
        })
    }
}

/// Estimated reading time for a body: word count over the fixed reading
/// rate, rounded up, never below one minute.
pub fn estimate_read_time(body: &str) -> u32 {
    let words = body.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

/// Parse a front-matter date in the handful of formats posts actually use.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date);
        }
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(content: &str) -> Result<Post, NormalizeError> {
        let (fm, body) = Frontmatter::parse(content);
        Post::from_document(&fm, body, "fallback-slug", "posts/fallback-slug.md", 0)
    }

    #[test]
    fn test_defaults_without_frontmatter() {
        let body: String = (0..50).map(|i| format!("word{} ", i)).collect();
        let post = normalize(&body).unwrap();

        assert_eq!(post.title, "Untitled");
        assert_eq!(post.slug, "fallback-slug");
        assert_eq!(post.date, Local::now().date_naive());
        assert_eq!(post.excerpt, "");
        assert!(post.tags.is_empty());
        assert!(!post.featured);
        assert_eq!(post.read_time, 1);
        assert_eq!(post.body, body);
    }

    #[test]
    fn test_frontmatter_values_take_precedence() {
        let content = r#"---
title: "My Post"
slug: "my-post"
date: "2024-01-15"
excerpt: "A summary."
tags: ["Rust"]
featured: true
readTime: 12
---
body
"#;
        let post = normalize(content).unwrap();
        assert_eq!(post.title, "My Post");
        assert_eq!(post.slug, "my-post");
        assert_eq!(post.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(post.excerpt, "A summary.");
        assert_eq!(post.tags, vec!["Rust"]);
        assert!(post.featured);
        assert_eq!(post.read_time, 12);
        assert_eq!(post.body, "body\n");
    }

    #[test]
    fn test_empty_slug_falls_back() {
        let content = "---\nslug: \"\"\ntitle: T\n---\n";
        let post = normalize(content).unwrap();
        assert_eq!(post.slug, "fallback-slug");
    }

    #[test]
    fn test_read_time_rounds_up() {
        // Exactly 400 words at 200 wpm
        let body: String = (0..400).map(|i| format!("w{} ", i)).collect();
        let post = normalize(&body).unwrap();
        assert_eq!(post.read_time, 2);

        let body: String = (0..401).map(|i| format!("w{} ", i)).collect();
        let post = normalize(&body).unwrap();
        assert_eq!(post.read_time, 3);
    }

    #[test]
    fn test_read_time_minimum_is_one() {
        assert_eq!(estimate_read_time(""), 1);
        assert_eq!(estimate_read_time("   \n\t  "), 1);
        assert_eq!(estimate_read_time("one two three"), 1);
    }

    #[test]
    fn test_unparseable_date_fails_the_document() {
        let content = "---\ndate: not-a-date\n---\nbody\n";
        let err = normalize(content).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidDate(_)));
    }

    #[test]
    fn test_date_formats() {
        for raw in ["2024-01-15", "2024/01/15", "2024-01-15 10:30:00"] {
            let content = format!("---\ndate: \"{}\"\n---\n", raw);
            let post = normalize(&content).unwrap();
            assert_eq!(post.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        }
    }

    #[test]
    fn test_unrecognized_boolean_token_keeps_default() {
        let content = "---\nfeatured: yes\n---\n";
        let post = normalize(content).unwrap();
        assert!(!post.featured);
    }

    #[test]
    fn test_quoted_true_is_featured() {
        let content = "---\nfeatured: \"true\"\n---\n";
        let post = normalize(content).unwrap();
        assert!(post.featured);
    }
}
