use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::info;

use crate::config::Config;

/// Disk-backed object store for listing images. Objects live flat under the
/// storage root and are served from `public_base_url`, so a public URL maps
/// back to an object name by stripping that prefix.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
    public_base_url: String,
}

impl Storage {
    pub fn new(config: &Arc<Config>) -> Storage {
        Storage {
            root: PathBuf::from(&config.storage_root),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn upload(&self, object_name: &str, bytes: &[u8]) -> Result<()> {
        let target = self.object_path(object_name)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating storage dir {:?}", parent))?;
        }

        // Write to a temp name first so a crashed upload never leaves a
        // half-written object behind the public URL.
        let tmp = target.with_extension("tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .with_context(|| format!("writing object {:?}", object_name))?;
        tokio::fs::rename(&tmp, &target)
            .await
            .with_context(|| format!("publishing object {:?}", object_name))?;

        info!("Stored object {} ({} bytes)", object_name, bytes.len());
        Ok(())
    }

    pub async fn delete(&self, object_name: &str) -> Result<()> {
        let target = self.object_path(object_name)?;
        tokio::fs::remove_file(&target)
            .await
            .with_context(|| format!("deleting object {:?}", object_name))?;
        Ok(())
    }

    pub fn public_url(&self, object_name: &str) -> String {
        format!("{}/{}", self.public_base_url, object_name)
    }

    /// Inverse of public_url, for cascading a listing delete to its stored
    /// objects. None when the URL is not ours (e.g. an external image link).
    pub fn object_name_from_url(&self, url: &str) -> Option<String> {
        let rest = url.strip_prefix(&self.public_base_url)?;
        let name = rest.trim_start_matches('/');
        if name.is_empty() {
            return None;
        }
        Some(name.to_string())
    }

    fn object_path(&self, object_name: &str) -> Result<PathBuf> {
        let relative = Path::new(object_name);
        if relative.components().any(|c| {
            !matches!(c, std::path::Component::Normal(_))
        }) {
            bail!("invalid object name {:?}", object_name);
        }
        Ok(self.root.join(relative))
    }
}
