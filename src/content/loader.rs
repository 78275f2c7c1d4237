//! Content loader - builds the post collection from the source directory

use anyhow::Result;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{Frontmatter, Post};
use crate::Folio;

/// Loads posts from the site's content directory.
pub struct ContentLoader<'a> {
    folio: &'a Folio,
}

impl<'a> ContentLoader<'a> {
    pub fn new(folio: &'a Folio) -> Self {
        Self { folio }
    }

    /// Load every post under `<source>/posts`, newest first.
    ///
    /// Documents that fail normalization are logged and skipped; the rest of
    /// the collection is unaffected.
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let posts_dir = self.folio.source_dir.join("posts");
        if !posts_dir.exists() {
            return Ok(Vec::new());
        }

        // Sorted path order keeps ingestion order, and with it id
        // assignment, deterministic across runs.
        let mut files: Vec<PathBuf> = WalkDir::new(&posts_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file() && is_markdown_file(e.path()))
            .map(|e| e.into_path())
            .collect();
        files.sort();

        let mut posts = Vec::new();
        for path in files {
            match self.load_post(&path, posts.len()) {
                Ok(post) => posts.push(post),
                Err(e) => {
                    tracing::warn!("Skipping post {:?}: {}", path, e);
                }
            }
        }

        // Newest first; ingestion order breaks date ties explicitly rather
        // than relying on sort stability.
        posts.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));

        warn_duplicate_slugs(&posts);

        Ok(posts)
    }

    /// Load a single post from a file.
    fn load_post(&self, path: &Path, id: usize) -> Result<Post> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = Frontmatter::parse(&content);

        let fallback_slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled");

        let source = path
            .strip_prefix(&self.folio.source_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        Ok(Post::from_document(&fm, body, fallback_slug, &source, id)?)
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

/// Duplicate slugs are tolerated (lookups resolve to the first match in
/// repository order) but worth surfacing at build time.
fn warn_duplicate_slugs(posts: &[Post]) {
    let mut seen = HashSet::new();
    for post in posts {
        if !seen.insert(post.slug.as_str()) {
            tracing::warn!(
                "Duplicate slug '{}' in {}; lookups resolve to the first match",
                post.slug,
                post.source
            );
        }
    }
}
