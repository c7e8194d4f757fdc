//! Time-boxed cache for global-timeline pages.
//!
//! Entries are refreshed on the first read after expiry, never invalidated
//! on write — a post published within the TTL window may take up to one TTL
//! to appear on the home timeline. That staleness is accepted behavior.

use std::{
  collections::HashMap,
  time::{Duration, Instant},
};

use quill_core::feed::PostPage;
use tokio::sync::RwLock;

pub struct TimelineCache {
  ttl:   Duration,
  pages: RwLock<HashMap<u32, (Instant, PostPage)>>,
}

impl TimelineCache {
  /// A zero TTL disables caching entirely.
  pub fn new(ttl: Duration) -> Self {
    Self {
      ttl,
      pages: RwLock::new(HashMap::new()),
    }
  }

  /// A still-fresh cached page, if one exists.
  pub async fn get(&self, page: u32) -> Option<PostPage> {
    if self.ttl.is_zero() {
      return None;
    }
    let pages = self.pages.read().await;
    pages
      .get(&page)
      .filter(|(fetched_at, _)| fetched_at.elapsed() < self.ttl)
      .map(|(_, cached)| cached.clone())
  }

  pub async fn put(&self, page_no: u32, page: PostPage) {
    if self.ttl.is_zero() {
      return;
    }
    self
      .pages
      .write()
      .await
      .insert(page_no, (Instant::now(), page));
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use quill_core::feed::{PageRequest, PostPage};

  fn page() -> PostPage { PostPage::empty(PageRequest::first(10)) }

  #[tokio::test]
  async fn zero_ttl_disables_the_cache() {
    let cache = TimelineCache::new(Duration::ZERO);
    cache.put(1, page()).await;
    assert!(cache.get(1).await.is_none());
  }

  #[tokio::test]
  async fn fresh_entries_are_served() {
    let cache = TimelineCache::new(Duration::from_secs(60));
    assert!(cache.get(1).await.is_none());
    cache.put(1, page()).await;
    assert!(cache.get(1).await.is_some());
    // Other pages are cached independently.
    assert!(cache.get(2).await.is_none());
  }
}
