//! Path utility functions

use anyhow::anyhow;
use crate::Result;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use url::Url;

/// Proxmox's own template cache; used as the parent of our cache when present.
pub const PVE_CACHE_ROOT: &str = "/var/lib/vz/template/cache";

/// Get the default image cache directory
pub fn default_cache_dir() -> Result<PathBuf> {
    let pve_root = Path::new(PVE_CACHE_ROOT);
    if pve_root.is_dir() {
        return Ok(pve_root.join("pve-template"));
    }
    Ok(dirs::cache_dir()
        .ok_or_else(|| anyhow!("no cache directory found"))?
        .join("pve-template"))
}

/// Cache key for a source URL (hex SHA-256)
pub fn url_key(url: &str) -> String {
    hex::encode(Sha256::digest(url.as_bytes()))
}

/// File name of the image a URL points at, falling back to `image`
pub fn image_file_name(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|name| !name.is_empty() && name != "." && name != "..")
        .unwrap_or_else(|| "image".to_string())
}
