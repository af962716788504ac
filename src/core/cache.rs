//! Rendered-page cache with path revalidation
//!
//! Views render into a [`PageCache`] keyed by request path. A mutation calls
//! [`PathRevalidator::revalidate_path`] to mark a path stale; the next request
//! for it renders fresh output and caches that instead.

use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use tokio::sync::RwLock;

/// Marks cached renderings of a path stale
#[async_trait]
pub trait PathRevalidator: Send + Sync {
    async fn revalidate_path(&self, path: &str);
}

#[derive(Debug, Default)]
struct CacheInner {
    pages: HashMap<String, String>,
    revalidations: HashMap<String, u64>,
}

impl CacheInner {
    fn generation(&self, path: &str) -> u64 {
        self.revalidations.get(path).copied().unwrap_or(0)
    }
}

/// In-process cache of rendered bodies, keyed by path
#[derive(Debug, Default)]
pub struct PageCache {
    inner: RwLock<CacheInner>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached body for `path`, if it is still fresh
    pub async fn get(&self, path: &str) -> Option<String> {
        self.inner.read().await.pages.get(path).cloned()
    }

    pub async fn put(&self, path: impl Into<String>, body: impl Into<String>) {
        self.inner
            .write()
            .await
            .pages
            .insert(path.into(), body.into());
    }

    /// Serve `path` from cache, rendering and storing it on a miss
    ///
    /// Render failures are returned as-is and nothing is cached. A body whose
    /// render overlapped a revalidation of `path` is returned but not cached.
    pub async fn get_or_render<F, Fut, E>(&self, path: &str, render: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        let generation = {
            let inner = self.inner.read().await;
            if let Some(body) = inner.pages.get(path) {
                tracing::debug!(path, "page cache hit");
                return Ok(body.clone());
            }
            inner.generation(path)
        };

        let body = render().await?;

        let mut inner = self.inner.write().await;
        if inner.generation(path) == generation {
            inner.pages.insert(path.to_string(), body.clone());
        } else {
            tracing::debug!(path, "render overlapped a revalidation, not cached");
        }
        Ok(body)
    }

    /// How many times `path` has been revalidated since startup
    pub async fn revalidation_count(&self, path: &str) -> u64 {
        self.inner.read().await.generation(path)
    }
}

#[async_trait]
impl PathRevalidator for PageCache {
    async fn revalidate_path(&self, path: &str) {
        let mut inner = self.inner.write().await;
        inner.pages.remove(path);
        *inner.revalidations.entry(path.to_string()).or_insert(0) += 1;
        tracing::debug!(path, "page cache revalidated");
    }
}
