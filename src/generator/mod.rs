//! Static bundle generation
//!
//! Renders the post collection into the JSON bundle the front end consumes:
//! one document per post (rendered HTML body included), a post index, a tag
//! index, and the highlight stylesheet.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::cache::ChangeSet;
use crate::config::SiteConfig;
use crate::content::{MarkdownRenderer, Post, PostRepository};
use crate::Folio;

/// Post metadata as it appears in `posts/index.json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PostSummary<'a> {
    id: usize,
    title: &'a str,
    slug: &'a str,
    date: NaiveDate,
    excerpt: &'a str,
    tags: &'a [String],
    featured: bool,
    read_time: u32,
    /// Route the front end links to
    path: String,
}

/// Full post document as written to `posts/<slug>.json`.
#[derive(Debug, Serialize)]
struct PostDocument<'a> {
    #[serde(flatten)]
    summary: PostSummary<'a>,
    /// Rendered, sanitized HTML body
    html: &'a str,
}

/// One entry of `tags.json`.
#[derive(Debug, Serialize)]
struct TagEntry {
    name: String,
    path: String,
    count: usize,
}

/// Renders posts into the public directory.
pub struct Generator<'a> {
    folio: &'a Folio,
    renderer: MarkdownRenderer,
}

impl<'a> Generator<'a> {
    pub fn new(folio: &'a Folio) -> Self {
        let renderer = MarkdownRenderer::with_options(
            &folio.config.highlight.theme,
            folio.config.highlight.line_numbers,
            folio.config.sanitize,
        );
        Self { folio, renderer }
    }

    /// Render the whole repository.
    pub fn generate(&self, repo: &PostRepository) -> Result<()> {
        self.generate_scoped(repo, None)
    }

    /// Incremental variant: re-render only the posts named in the changeset
    /// and drop outputs of deleted sources.
    pub fn generate_incremental(&self, repo: &PostRepository, changes: &ChangeSet) -> Result<()> {
        self.generate_scoped(repo, Some(changes))
    }

    fn generate_scoped(&self, repo: &PostRepository, changes: Option<&ChangeSet>) -> Result<()> {
        let posts_dir = self.folio.public_dir.join("posts");
        fs::create_dir_all(&posts_dir)?;

        let mut written = 0;
        for post in repo.posts() {
            if let Some(changes) = changes {
                if !changes.changed_posts.contains(&post.source) {
                    continue;
                }
            }
            self.write_post(post, &posts_dir)?;
            written += 1;
        }

        if let Some(changes) = changes {
            for output in &changes.deleted_outputs {
                let path = self.folio.public_dir.join(output);
                if path.exists() {
                    fs::remove_file(&path)?;
                    tracing::debug!("Removed {:?}", path);
                }
            }
        }

        if changes.map_or(true, |c| c.rebuild_index) {
            self.write_index(repo, &posts_dir)?;
            self.write_tags(repo)?;
        }
        self.write_theme_css()?;

        tracing::info!("Rendered {} post documents", written);
        Ok(())
    }

    fn write_post(&self, post: &Post, posts_dir: &Path) -> Result<()> {
        let html = self
            .renderer
            .render(&post.body)
            .with_context(|| format!("rendering {}", post.source))?;
        let doc = PostDocument {
            summary: summarize(&self.folio.config, post),
            html: &html,
        };

        let path = posts_dir.join(format!("{}.json", post.slug));
        fs::write(&path, serde_json::to_string_pretty(&doc)?)?;
        tracing::debug!("Wrote {:?}", path);
        Ok(())
    }

    fn write_index(&self, repo: &PostRepository, posts_dir: &Path) -> Result<()> {
        let summaries: Vec<PostSummary> = repo
            .posts()
            .iter()
            .map(|p| summarize(&self.folio.config, p))
            .collect();
        fs::write(
            posts_dir.join("index.json"),
            serde_json::to_string_pretty(&summaries)?,
        )?;
        Ok(())
    }

    fn write_tags(&self, repo: &PostRepository) -> Result<()> {
        let entries: Vec<TagEntry> = repo
            .all_tags()
            .into_iter()
            .map(|name| TagEntry {
                path: tag_path(&self.folio.config, &name),
                count: repo.with_tag(&name).len(),
                name,
            })
            .collect();
        fs::write(
            self.folio.public_dir.join("tags.json"),
            serde_json::to_string_pretty(&entries)?,
        )?;
        Ok(())
    }

    fn write_theme_css(&self) -> Result<()> {
        let assets_dir = self.folio.public_dir.join("assets");
        fs::create_dir_all(&assets_dir)?;
        fs::write(assets_dir.join("highlight.css"), self.renderer.theme_css()?)?;
        Ok(())
    }
}

fn summarize<'a>(config: &SiteConfig, post: &'a Post) -> PostSummary<'a> {
    PostSummary {
        id: post.id,
        title: &post.title,
        slug: &post.slug,
        date: post.date,
        excerpt: &post.excerpt,
        tags: &post.tags,
        featured: post.featured,
        read_time: post.read_time,
        path: post_path(config, post),
    }
}

/// Generate a URL with the root path
fn url_for(config: &SiteConfig, path: &str) -> String {
    format!(
        "{}/{}",
        config.root.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn post_path(config: &SiteConfig, post: &Post) -> String {
    url_for(config, &format!("blog/{}", post.slug))
}

fn tag_path(config: &SiteConfig, tag: &str) -> String {
    let encoded = utf8_percent_encode(tag, NON_ALPHANUMERIC).to_string();
    url_for(config, &format!("blog/tag/{}", encoded))
}
