//! In-memory post collection with read accessors
//!
//! The repository is built once at startup, owned by the composition root,
//! and handed out by reference. Everything on it is a pure read.

use std::collections::BTreeSet;

use anyhow::Result;

use super::loader::ContentLoader;
use super::Post;
use crate::Folio;

/// The immutable, date-sorted collection of all posts.
pub struct PostRepository {
    posts: Vec<Post>,
}

impl PostRepository {
    /// Build the repository from the site's content directory.
    pub fn load(folio: &Folio) -> Result<Self> {
        let posts = ContentLoader::new(folio).load_posts()?;
        Ok(Self::from_posts(posts))
    }

    /// Wrap an already-sorted post list.
    pub fn from_posts(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    /// All posts in repository order (newest first).
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// First post whose slug matches exactly. Case-sensitive.
    pub fn get_by_slug(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    /// Featured posts, preserving repository order.
    pub fn featured(&self) -> Vec<&Post> {
        self.posts.iter().filter(|p| p.featured).collect()
    }

    /// Posts carrying `tag` (exact string match), preserving repository
    /// order.
    pub fn with_tag(&self, tag: &str) -> Vec<&Post> {
        self.posts
            .iter()
            .filter(|p| p.tags.iter().any(|t| t == tag))
            .collect()
    }

    /// Every distinct tag across every post, sorted lexicographically.
    pub fn all_tags(&self) -> Vec<String> {
        let tags: BTreeSet<&str> = self
            .posts
            .iter()
            .flat_map(|p| p.tags.iter().map(String::as_str))
            .collect();
        tags.into_iter().map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn post(id: usize, slug: &str, date: &str, tags: &[&str], featured: bool) -> Post {
        Post {
            id,
            title: slug.to_string(),
            slug: slug.to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            excerpt: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            featured,
            read_time: 1,
            body: String::new(),
            source: format!("posts/{}.md", slug),
        }
    }

    fn repo() -> PostRepository {
        PostRepository::from_posts(vec![
            post(2, "newest", "2024-03-01", &["Rust", "Systems"], true),
            post(0, "middle", "2024-02-20", &["Go"], false),
            post(1, "oldest", "2024-01-15", &["Rust"], true),
        ])
    }

    #[test]
    fn test_get_by_slug() {
        let repo = repo();
        assert_eq!(repo.get_by_slug("middle").unwrap().id, 0);
        assert!(repo.get_by_slug("missing").is_none());
        // Exact match only
        assert!(repo.get_by_slug("MIDDLE").is_none());
    }

    #[test]
    fn test_duplicate_slug_first_match_wins() {
        let repo = PostRepository::from_posts(vec![
            post(0, "dup", "2024-03-01", &[], false),
            post(1, "dup", "2024-01-01", &[], true),
        ]);
        assert_eq!(
            repo.get_by_slug("dup").unwrap().date,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_featured_preserves_order() {
        let repo = repo();
        let featured: Vec<&str> = repo.featured().iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(featured, vec!["newest", "oldest"]);
    }

    #[test]
    fn test_with_tag_is_case_sensitive() {
        let repo = repo();
        let rust: Vec<&str> = repo
            .with_tag("Rust")
            .iter()
            .map(|p| p.slug.as_str())
            .collect();
        assert_eq!(rust, vec!["newest", "oldest"]);
        assert!(repo.with_tag("rust").is_empty());
    }

    #[test]
    fn test_all_tags_sorted_and_deduplicated() {
        let repo = repo();
        assert_eq!(repo.all_tags(), vec!["Go", "Rust", "Systems"]);
        // Deterministic across calls
        assert_eq!(repo.all_tags(), repo.all_tags());
    }

    #[test]
    fn test_empty_repository() {
        let repo = PostRepository::from_posts(Vec::new());
        assert!(repo.is_empty());
        assert!(repo.all_tags().is_empty());
        assert!(repo.featured().is_empty());
    }
}
