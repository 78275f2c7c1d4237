//! Create a new post

use anyhow::Result;
use std::fs;

use crate::Folio;

/// Create a new post skeleton under `<source>/posts`
pub fn run(folio: &Folio, title: &str, featured: bool) -> Result<()> {
    let posts_dir = folio.source_dir.join("posts");
    fs::create_dir_all(&posts_dir)?;

    let slug = slug::slugify(title);
    let file_path = posts_dir.join(format!("{}.md", slug));

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let date = chrono::Local::now().format("%Y-%m-%d");
    let content = format!(
        r#"---
title: "{title}"
slug: "{slug}"
date: "{date}"
excerpt: ""
tags: []
featured: {featured}
---

"#
    );

    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);

    Ok(())
}
