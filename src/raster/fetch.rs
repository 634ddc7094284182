use anyhow::Context;

use crate::foundation::error::{CharmloomError, CharmloomResult};

/// Source of encoded image bytes for the rasterizer.
///
/// Passed explicitly into [`crate::raster::compose::rasterize`] so the
/// rasterizer has no coupling to any global image source, and tests can
/// substitute an in-memory fake.
#[async_trait::async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Fetch the encoded bytes behind `image_ref`.
    async fn fetch(&self, image_ref: &str) -> CharmloomResult<Vec<u8>>;
}

/// [`ImageFetcher`] backed by HTTP GET requests.
#[derive(Clone, Debug)]
pub struct HttpImageFetcher {
    http: reqwest::Client,
}

impl Default for HttpImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpImageFetcher {
    /// Construct with a fresh HTTP client.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Construct over an existing client (shared connection pool).
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait::async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, image_ref: &str) -> CharmloomResult<Vec<u8>> {
        let resp = self
            .http
            .get(image_ref)
            .send()
            .await
            .with_context(|| format!("fetch image '{image_ref}'"))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CharmloomError::transport(format!(
                "image fetch '{image_ref}' returned status {}",
                status.as_u16()
            )));
        }

        let bytes = resp
            .bytes()
            .await
            .with_context(|| format!("read image body '{image_ref}'"))?;
        Ok(bytes.to_vec())
    }
}
