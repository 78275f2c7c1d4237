//! Cache module for incremental generation
//!
//! Tracks a content hash per normalized post so unchanged documents are not
//! re-rendered on subsequent runs. A config change or a cache format bump
//! forces a full rebuild.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;

use crate::content::Post;

/// Cache file name
const CACHE_FILE: &str = ".folio-cache/db.json";

/// Cached entry for one source document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Hash of the normalized post
    pub content_hash: u64,
    /// Output path relative to the public dir
    pub output_path: String,
}

/// Cache database for tracking document changes
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheDb {
    /// Version of the cache format
    pub version: u32,
    /// Hash of the site config (changes trigger full rebuild)
    pub config_hash: u64,
    /// Cached entries keyed by source path
    pub posts: HashMap<String, CacheEntry>,
}

impl CacheDb {
    /// Current cache format version
    const VERSION: u32 = 1;

    /// Load cache from disk, or create a new empty cache
    pub fn load(base_dir: &Path) -> Self {
        let cache_path = base_dir.join(CACHE_FILE);
        if let Ok(content) = fs::read_to_string(&cache_path) {
            if let Ok(cache) = serde_json::from_str::<CacheDb>(&content) {
                if cache.version == Self::VERSION {
                    return cache;
                }
                tracing::info!("Cache version mismatch, rebuilding cache");
            }
        }
        Self::default()
    }

    /// Save cache to disk
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let cache_path = base_dir.join(CACHE_FILE);
        if let Some(dir) = cache_path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(cache_path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Create a new cache with version set
    pub fn new() -> Self {
        Self {
            version: Self::VERSION,
            ..Default::default()
        }
    }
}

/// Change detection result
#[derive(Debug, Clone)]
pub struct ChangeSet {
    /// Source paths of posts that need re-rendering
    pub changed_posts: Vec<String>,
    /// Output paths (relative to the public dir) of deleted posts
    pub deleted_outputs: Vec<String>,
    /// Whether the index and tag files need rewriting
    pub rebuild_index: bool,
    /// Whether to regenerate everything (config changed, cache cold)
    pub full_rebuild: bool,
}

impl ChangeSet {
    /// Create a changeset indicating full rebuild is needed
    pub fn full_rebuild() -> Self {
        Self {
            changed_posts: Vec::new(),
            deleted_outputs: Vec::new(),
            rebuild_index: true,
            full_rebuild: true,
        }
    }

    /// Create an empty changeset (no changes)
    pub fn empty() -> Self {
        Self {
            changed_posts: Vec::new(),
            deleted_outputs: Vec::new(),
            rebuild_index: false,
            full_rebuild: false,
        }
    }

    /// Check if any changes were detected
    pub fn has_changes(&self) -> bool {
        self.full_rebuild
            || !self.changed_posts.is_empty()
            || !self.deleted_outputs.is_empty()
            || self.rebuild_index
    }

    /// Get summary of changes for logging
    pub fn summary(&self) -> String {
        if self.full_rebuild {
            return "full rebuild required".to_string();
        }

        let mut parts = Vec::new();
        if !self.changed_posts.is_empty() {
            parts.push(format!("{} posts changed", self.changed_posts.len()));
        }
        if !self.deleted_outputs.is_empty() {
            parts.push(format!("{} posts deleted", self.deleted_outputs.len()));
        }

        if parts.is_empty() {
            "no changes".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Calculate a hash for string content
pub fn hash_content(content: &str) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

/// Calculate a hash for a file on disk
pub fn hash_file(path: &Path) -> Result<u64> {
    let content = fs::read_to_string(path)?;
    Ok(hash_content(&content))
}

/// Hash of a normalized post, covering every field that feeds the bundle.
pub fn hash_post(post: &Post) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    post.hash(&mut hasher);
    hasher.finish()
}

/// Detect changes between the current post set and the cached state.
///
/// `current` carries one `(source, hash, output_path)` triple per post.
pub fn detect_changes(
    cache: &CacheDb,
    config_hash: u64,
    current: &[(String, u64, String)],
) -> ChangeSet {
    if cache.config_hash != config_hash && cache.config_hash != 0 {
        tracing::info!("Config changed, full rebuild required");
        return ChangeSet::full_rebuild();
    }

    let mut changeset = ChangeSet::empty();

    for (source, hash, _) in current {
        match cache.posts.get(source) {
            Some(cached) if cached.content_hash == *hash => {}
            Some(_) => {
                tracing::debug!("Post changed: {}", source);
                changeset.changed_posts.push(source.clone());
            }
            None => {
                tracing::debug!("New post: {}", source);
                changeset.changed_posts.push(source.clone());
            }
        }
    }

    let current_sources: HashSet<&str> = current.iter().map(|(s, _, _)| s.as_str()).collect();
    for (source, cached) in &cache.posts {
        if !current_sources.contains(source.as_str()) {
            tracing::debug!("Deleted post: {}", source);
            changeset.deleted_outputs.push(cached.output_path.clone());
        }
    }

    // The index and tag files embed every post's metadata, so any change at
    // all invalidates them.
    changeset.rebuild_index =
        !changeset.changed_posts.is_empty() || !changeset.deleted_outputs.is_empty();

    changeset
}

/// Update cache with current state
pub fn update_cache(cache: &mut CacheDb, config_hash: u64, current: &[(String, u64, String)]) {
    cache.version = CacheDb::VERSION;
    cache.config_hash = config_hash;

    cache.posts.clear();
    for (source, hash, output_path) in current {
        cache.posts.insert(
            source.clone(),
            CacheEntry {
                content_hash: *hash,
                output_path: output_path.clone(),
            },
        );
    }
}
