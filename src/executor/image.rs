//! Flat image cache keyed by source URL

use crate::utils::paths::{image_file_name, url_key};
use crate::utils::system::CommandRunner;
use crate::Result;
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A cached image on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub path: PathBuf,
    pub size: u64,
}

/// Downloaded images, one directory per source URL hash.
#[derive(Debug, Clone)]
pub struct ImageCache {
    dir: PathBuf,
}

impl ImageCache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the image for `url` lives (or will live).
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(url_key(url)).join(image_file_name(url))
    }

    /// Return the cached image for `url`, downloading it first if absent.
    pub fn fetch(&self, runner: &mut dyn CommandRunner, url: &str) -> Result<PathBuf> {
        let path = self.path_for(url);
        if path.is_file() {
            info!("Using cached image {}", path.display());
            return Ok(path);
        }
        let parent = path.parent().unwrap_or(&self.dir);
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
        if let Err(e) = download(runner, url, &path) {
            // only succeeds when the bucket is empty
            let _ = fs::remove_dir(parent);
            return Err(e);
        }
        Ok(path)
    }

    /// Drop the cached copy of `url`, if any.
    pub fn evict(&self, url: &str) -> Result<()> {
        let entry_dir = self.dir.join(url_key(url));
        if entry_dir.exists() {
            fs::remove_dir_all(&entry_dir)?;
            info!("Removed cached image for {}", url);
        }
        Ok(())
    }

    /// All cached images.
    pub fn entries(&self) -> Result<Vec<CacheEntry>> {
        let mut entries = Vec::new();
        if !self.dir.is_dir() {
            return Ok(entries);
        }
        for bucket in fs::read_dir(&self.dir)?.flatten() {
            let hidden = bucket.file_name().to_string_lossy().starts_with('.');
            if hidden || !bucket.path().is_dir() {
                continue;
            }
            for file in fs::read_dir(bucket.path())?.flatten() {
                let meta = file.metadata()?;
                if meta.is_file() && !is_partial(&file.path()) {
                    entries.push(CacheEntry {
                        path: file.path(),
                        size: meta.len(),
                    });
                }
            }
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    /// Remove every cached image bucket. Hidden entries such as the work
    /// directories of running builds are left alone. Returns the number of
    /// images removed.
    pub fn clear(&self) -> Result<usize> {
        let count = self.entries()?.len();
        if !self.dir.is_dir() {
            return Ok(count);
        }
        for bucket in fs::read_dir(&self.dir)?.flatten() {
            let hidden = bucket.file_name().to_string_lossy().starts_with('.');
            if !hidden && bucket.path().is_dir() {
                fs::remove_dir_all(bucket.path())
                    .with_context(|| format!("failed to remove {}", bucket.path().display()))?;
            }
        }
        Ok(count)
    }
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

fn is_partial(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "part")
}

/// Download `url` to `dest` with wget. The file only appears at `dest` once complete.
pub fn download(runner: &mut dyn CommandRunner, url: &str, dest: &Path) -> Result<()> {
    let partial = partial_path(dest);
    info!("Downloading {}", url);
    let args = [
        "--quiet".into(),
        "--show-progress".into(),
        "--output-document".into(),
        partial.to_string_lossy().into_owned(),
        url.to_string(),
    ];
    if let Err(e) = runner.run("wget", &args) {
        let _ = fs::remove_file(&partial);
        return Err(e);
    }
    fs::rename(&partial, dest)
        .with_context(|| format!("failed to move download into {}", dest.display()))?;
    debug!("saved {}", dest.display());
    Ok(())
}
