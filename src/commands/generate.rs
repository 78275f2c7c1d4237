//! Generate the content bundle

use anyhow::Result;
use notify::Watcher;
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::cache::{self, CacheDb, ChangeSet};
use crate::content::PostRepository;
use crate::generator::Generator;
use crate::Folio;

/// Generate the content bundle (with incremental support)
pub fn run(folio: &Folio) -> Result<()> {
    run_with_options(folio, false)
}

/// Generate with force option
pub fn run_with_options(folio: &Folio, force: bool) -> Result<()> {
    let start = std::time::Instant::now();

    let repo = PostRepository::load(folio)?;
    tracing::info!("Loaded {} posts", repo.len());

    let cache = CacheDb::load(&folio.base_dir);
    let config_path = folio.base_dir.join("folio.yml");
    let config_hash = if config_path.exists() {
        cache::hash_file(&config_path)?
    } else {
        0
    };

    let current: Vec<(String, u64, String)> = repo
        .posts()
        .iter()
        .map(|p| {
            (
                p.source.clone(),
                cache::hash_post(p),
                format!("posts/{}.json", p.slug),
            )
        })
        .collect();

    let changeset = if force || cache.posts.is_empty() {
        tracing::info!(
            "Full generation (force={}, cache_empty={})",
            force,
            cache.posts.is_empty()
        );
        ChangeSet::full_rebuild()
    } else {
        cache::detect_changes(&cache, config_hash, &current)
    };

    if !changeset.has_changes() {
        tracing::info!(
            "No changes detected, completed in {:.2}s",
            start.elapsed().as_secs_f64()
        );
        return Ok(());
    }
    tracing::info!("Changes detected: {}", changeset.summary());

    let generator = Generator::new(folio);
    if changeset.full_rebuild {
        generator.generate(&repo)?;
    } else {
        generator.generate_incremental(&repo, &changeset)?;
    }

    let mut new_cache = CacheDb::new();
    cache::update_cache(&mut new_cache, config_hash, &current);
    new_cache.save(&folio.base_dir)?;

    tracing::info!("Generated in {:.2}s", start.elapsed().as_secs_f64());

    Ok(())
}

/// Watch for file changes and regenerate (with incremental support)
pub fn watch(folio: &Folio) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    watcher.watch(folio.source_dir.as_ref(), notify::RecursiveMode::Recursive)?;

    let config_path = folio.base_dir.join("folio.yml");
    if config_path.exists() {
        watcher.watch(&config_path, notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes (incremental mode). Press Ctrl+C to stop.");

    // Debounce events
    let mut last_rebuild = std::time::Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                // Only rebuild if more than 500ms since last rebuild
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("File changed, regenerating...");
                    if let Err(e) = run(folio) {
                        tracing::error!("Generation failed: {}", e);
                    }
                    last_rebuild = std::time::Instant::now();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                // Continue waiting
            }
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    Ok(())
}
