//! CLI entry point for folio

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "A headless markdown content engine for a personal portfolio and blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Mark the post as featured
        #[arg(long)]
        featured: bool,
    },

    /// Generate the content bundle
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,

        /// Regenerate everything, ignoring the cache
        #[arg(short, long)]
        force: bool,
    },

    /// List site content
    List {
        /// Type of content to list (post, featured, tag)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Clean the public folder and cache
    Clean,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            folio::commands::init::init_site(&target_dir)?;
            println!("Initialized empty folio site in {:?}", target_dir);
        }

        Commands::New { title, featured } => {
            let folio = folio::Folio::new(&base_dir)?;
            tracing::info!("Creating new post: {}", title);
            folio.new_post(&title, featured)?;
        }

        Commands::Generate { watch, force } => {
            let folio = folio::Folio::new(&base_dir)?;
            tracing::info!("Generating content bundle...");

            folio::commands::generate::run_with_options(&folio, force)?;
            println!("Generated successfully!");

            if watch {
                tracing::info!("Watching for file changes...");
                folio::commands::generate::watch(&folio)?;
            }
        }

        Commands::List { r#type } => {
            let folio = folio::Folio::new(&base_dir)?;
            folio::commands::list::run(&folio, &r#type)?;
        }

        Commands::Clean => {
            let folio = folio::Folio::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            folio.clean()?;
            println!("Cleaned successfully!");
        }
    }

    Ok(())
}
