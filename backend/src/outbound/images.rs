//! Filesystem-backed listing image storage.
//!
//! Images land under `<root>/<listing id>/<uuid>.<ext>` and are addressed as
//! `<public base url>/<listing id>/<uuid>.<ext>`. Serving the directory is
//! left to whatever fronts the configured base URL.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{ImageStore, ImageStoreError, ImageUpload};

/// Stores images as plain files below a root directory.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    root: PathBuf,
    base_url: String,
}

impl FsImageStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            root: root.into(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Map a public URL back to a path under the root, rejecting URLs from
    /// elsewhere and any attempt to climb out of the root.
    fn resolve(&self, url: &str) -> Result<PathBuf, ImageStoreError> {
        let foreign = || ImageStoreError::foreign_url(url);
        let relative = url
            .strip_prefix(&self.base_url)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|rest| !rest.is_empty())
            .ok_or_else(foreign)?;
        let relative = Path::new(relative);
        if relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_)))
        {
            return Err(foreign());
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn store(&self, upload: &ImageUpload) -> Result<String, ImageStoreError> {
        let listing_dir = upload.listing_id.to_string();
        let file_name = format!("{}.{}", Uuid::new_v4(), upload.extension);
        let dir = self.root.join(&listing_dir);
        fs::create_dir_all(&dir)
            .await
            .map_err(|error| ImageStoreError::unavailable(format!("{}: {error}", dir.display())))?;
        let path = dir.join(&file_name);
        fs::write(&path, &upload.bytes)
            .await
            .map_err(|error| ImageStoreError::storage(format!("{}: {error}", path.display())))?;
        debug!(path = %path.display(), bytes = upload.bytes.len(), "stored listing image");
        Ok(format!("{}/{listing_dir}/{file_name}", self.base_url))
    }

    async fn delete(&self, url: &str) -> Result<(), ImageStoreError> {
        let path = self.resolve(url)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "image already absent");
                Ok(())
            }
            Err(error) => Err(ImageStoreError::storage(format!(
                "{}: {error}",
                path.display()
            ))),
        }
    }
}
