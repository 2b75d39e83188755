//! Photo-album resolution.
//!
//! A photo-album post is resolved in two steps: the manifest API is asked for
//! the post's image URLs, then every image is downloaded into an
//! [`ImageStore`] through the bounded download pool.

use serde::Deserialize;
use url::Url;

use crate::error::{LinkSanitizerError, Result};
use crate::outcome::CachedImage;
use crate::storage::ImageStore;
use crate::worker;

/// Manifest API used when none is configured.
pub const DEFAULT_MANIFEST_ENDPOINT: &str = "https://tikwm.com/api/";
/// Images downloaded at the same time, per album.
pub const DEFAULT_MAX_CONCURRENT_DOWNLOADS: usize = 10;

/// Body returned by the manifest API.
#[derive(Debug, Deserialize)]
pub struct ManifestResponse {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub data: Option<ManifestData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ManifestData {
    #[serde(default)]
    pub images: Vec<String>,
}

impl ManifestResponse {
    /// Turn a decoded response into the list of image URLs.
    ///
    /// Unparsable entries are skipped; an empty result is an error.
    pub fn into_images(self) -> Result<Vec<Url>> {
        if self.code != 0 {
            return Err(LinkSanitizerError::Manifest {
                code: self.code,
                msg: self.msg,
            });
        }
        let images: Vec<Url> = self
            .data
            .unwrap_or_default()
            .images
            .iter()
            .filter_map(|raw| Url::parse(raw).ok())
            .collect();
        if images.is_empty() {
            return Err(LinkSanitizerError::EmptyManifest);
        }
        Ok(images)
    }
}

/// Resolves photo-album posts into cached images.
#[derive(Debug, Clone)]
pub struct PhotoAlbumResolver<S> {
    client: reqwest::Client,
    endpoint: Url,
    store: S,
    max_in_flight: usize,
}

impl<S: ImageStore> PhotoAlbumResolver<S> {
    /// Create a resolver. `max_in_flight` bounds concurrent image downloads.
    pub fn new(client: reqwest::Client, endpoint: Url, store: S, max_in_flight: usize) -> Self {
        Self {
            client,
            endpoint,
            store,
            max_in_flight,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch the image list for `post`, highest quality requested.
    pub async fn fetch_manifest(&self, post: &Url) -> Result<Vec<Url>> {
        let response = self
            .client
            .get(self.endpoint.as_str())
            .query(&[("url", post.as_str()), ("hd", "1"), ("cursor", "0")])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LinkSanitizerError::Status {
                url: self.endpoint.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await?;
        let manifest: ManifestResponse = serde_json::from_slice(&body)?;
        manifest.into_images()
    }

    /// Resolve `post` into cached images, in manifest order.
    ///
    /// Succeeds if at least one image was stored. Failed images are left out;
    /// if none succeeded the error of the first failed image is returned.
    pub async fn resolve(&self, post: &Url) -> Result<Vec<CachedImage>> {
        let sources = self.fetch_manifest(post).await?;
        tracing::debug!(post = %post, images = sources.len(), "Resolving photo album");
        worker::download_all(&self.client, &self.store, &sources, self.max_in_flight).await
    }
}
