//! folio: a headless content engine for a personal portfolio and blog
//!
//! This crate ingests markdown documents with front-matter headers into an
//! immutable, date-sorted post repository, renders post bodies to sanitized
//! HTML with syntax-highlighted code widgets, and emits a static JSON bundle
//! for the site's front end to consume.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod generator;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The main Folio application
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content source directory
    pub source_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Folio {
    /// Create a new Folio instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("folio.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let source_dir = base_dir.join(&config.source_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            source_dir,
            public_dir,
        })
    }

    /// Generate the content bundle
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post
    pub fn new_post(&self, title: &str, featured: bool) -> Result<()> {
        commands::new::run(self, title, featured)
    }
}
