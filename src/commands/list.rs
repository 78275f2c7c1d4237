//! List site content

use anyhow::Result;

use crate::content::PostRepository;
use crate::Folio;

/// List site content by type
pub fn run(folio: &Folio, content_type: &str) -> Result<()> {
    let repo = PostRepository::load(folio)?;

    match content_type {
        "post" | "posts" => {
            println!("Posts ({}):", repo.len());
            for post in repo.posts() {
                println!(
                    "  {} - {} [{}]{}",
                    post.date.format("%Y-%m-%d"),
                    post.title,
                    post.slug,
                    if post.featured { " *" } else { "" }
                );
            }
        }
        "featured" => {
            let featured = repo.featured();
            println!("Featured posts ({}):", featured.len());
            for post in featured {
                println!(
                    "  {} - {} [{}]",
                    post.date.format("%Y-%m-%d"),
                    post.title,
                    post.slug
                );
            }
        }
        "tag" | "tags" => {
            let tags = repo.all_tags();
            println!("Tags ({}):", tags.len());
            for tag in tags {
                println!("  {} ({})", tag, repo.with_tag(&tag).len());
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, featured, tag",
                content_type
            );
        }
    }

    Ok(())
}
