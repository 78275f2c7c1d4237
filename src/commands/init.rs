//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Default site configuration written by `init`
const DEFAULT_CONFIG: &str = r#"# Folio configuration

# Site
title: Folio
description: ''
author: ''

# URL
url: http://example.com
root: /

# Directory
source_dir: content
public_dir: public

# Rendering
highlight:
  theme: base16-ocean.dark
  line_numbers: true
sanitize: true
"#;

/// A first post demonstrating the front-matter dialect
const HELLO_POST: &str = r#"---
title: "Hello World"
slug: "hello-world"
date: "2024-01-01"
excerpt: "The first post."
tags: ["Meta"]
featured: false
---

Welcome to your new site. This post lives in `content/posts/` and is
rendered into the JSON bundle by `folio generate`.

```rust
fn main() {
    println!("hello, folio");
}
```
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("folio.yml");
    if config_path.exists() {
        anyhow::bail!("Already a folio site: {:?}", config_path);
    }

    fs::create_dir_all(target_dir.join("content/posts"))?;
    fs::write(&config_path, DEFAULT_CONFIG)?;
    fs::write(
        target_dir.join("content/posts/hello-world.md"),
        HELLO_POST,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Folio;

    #[test]
    fn test_init_scaffolds_a_loadable_site() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();

        assert!(dir.path().join("folio.yml").exists());
        assert!(dir.path().join("content/posts/hello-world.md").exists());

        let folio = Folio::new(dir.path()).unwrap();
        let repo = crate::content::PostRepository::load(&folio).unwrap();
        assert_eq!(repo.len(), 1);
        assert!(repo.get_by_slug("hello-world").is_some());
    }

    #[test]
    fn test_init_refuses_an_existing_site() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();
        assert!(init_site(dir.path()).is_err());
    }
}
