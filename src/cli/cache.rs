//! The `cache` command

use crate::cli::commands::CacheCmd;
use crate::executor::image::ImageCache;
use crate::utils::paths::default_cache_dir;
use crate::Result;
use std::path::PathBuf;

/// Run a `cache` subcommand.
pub fn run(action: &CacheCmd, cache_dir: Option<PathBuf>) -> Result<()> {
    let cache = ImageCache::new(match cache_dir {
        Some(dir) => dir,
        None => default_cache_dir()?,
    });

    match action {
        CacheCmd::List => {
            let entries = cache.entries()?;
            if entries.is_empty() {
                println!("No cached images in {}", cache.dir().display());
            }
            for entry in entries {
                println!("{:>8} MiB  {}", entry.size / (1024 * 1024), entry.path.display());
            }
        }
        CacheCmd::Clean => {
            let removed = cache.clear()?;
            println!("Removed {} cached image(s) from {}", removed, cache.dir().display());
        }
    }
    Ok(())
}
