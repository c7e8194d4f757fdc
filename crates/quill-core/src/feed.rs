//! Feed composition — ordered, paginated views of posts.
//!
//! A feed is selected by a [`FeedScope`] and sliced by a [`PageRequest`].
//! Ordering is always newest-first by creation timestamp, with the author's
//! username as the tie-break. Reads are pure; composition is executed by the
//! store so the slicing happens in SQL rather than in memory.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::post::Post;

/// Default number of posts per feed page. Consumed as configuration by the
/// presentation boundary, which may override it.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Which posts a feed contains. Slugs and usernames are resolved to ids by
/// the caller before a scope is built, so an unknown slug can 404 before
/// any feed query runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedScope {
  /// Every post in the system — the home timeline.
  Global,
  /// Posts in one group.
  Group(Uuid),
  /// Posts by one author — their profile page.
  Author(Uuid),
  /// Posts by every author the given user follows. An empty follow set
  /// yields an empty page, not an error.
  FollowedBy(Uuid),
}

// ─── Page request ────────────────────────────────────────────────────────────

/// A 1-based page selector with a fixed page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  pub page:     u32,
  pub per_page: u32,
}

impl PageRequest {
  pub fn new(page: u32, per_page: u32) -> Self {
    Self {
      page: page.max(1),
      per_page,
    }
  }

  pub fn first(per_page: u32) -> Self { Self::new(1, per_page) }

  /// Parse a raw `?page=` query value. Absent, non-numeric, or zero values
  /// all fall back to page 1.
  pub fn from_param(raw: Option<&str>, per_page: u32) -> Self {
    let page = raw.and_then(|s| s.trim().parse::<u32>().ok()).unwrap_or(1);
    Self::new(page, per_page)
  }

  pub fn limit(&self) -> u64 { u64::from(self.per_page) }

  pub fn offset(&self) -> u64 {
    u64::from(self.page - 1) * u64::from(self.per_page)
  }
}

// ─── Page result ─────────────────────────────────────────────────────────────

/// One page of a feed plus the pager metadata needed to render page links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPage {
  pub posts:    Vec<Post>,
  /// Total matching posts across all pages.
  pub total:    u64,
  pub page:     u32,
  pub per_page: u32,
}

impl PostPage {
  /// A valid, empty page — what a request beyond the last page returns.
  pub fn empty(request: PageRequest) -> Self {
    Self {
      posts:    Vec::new(),
      total:    0,
      page:     request.page,
      per_page: request.per_page,
    }
  }

  /// Number of pages needed to show `total` posts; at least 1 so pager UI
  /// always has a current page to highlight.
  pub fn total_pages(&self) -> u32 {
    if self.total == 0 || self.per_page == 0 {
      return 1;
    }
    (self.total.div_ceil(u64::from(self.per_page))).min(u64::from(u32::MAX))
      as u32
  }

  pub fn has_next(&self) -> bool { u64::from(self.page) < u64::from(self.total_pages()) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn page_param_defaults_to_one() {
    assert_eq!(PageRequest::from_param(None, 10).page, 1);
    assert_eq!(PageRequest::from_param(Some("two"), 10).page, 1);
    assert_eq!(PageRequest::from_param(Some(""), 10).page, 1);
    assert_eq!(PageRequest::from_param(Some("0"), 10).page, 1);
    assert_eq!(PageRequest::from_param(Some("3"), 10).page, 3);
  }

  #[test]
  fn offsets_are_one_based() {
    assert_eq!(PageRequest::new(1, 10).offset(), 0);
    assert_eq!(PageRequest::new(2, 10).offset(), 10);
    assert_eq!(PageRequest::new(3, 7).offset(), 14);
  }

  #[test]
  fn total_pages_rounds_up() {
    let page = PostPage {
      posts:    Vec::new(),
      total:    13,
      page:     1,
      per_page: 10,
    };
    assert_eq!(page.total_pages(), 2);
    assert!(page.has_next());
  }

  #[test]
  fn empty_feed_still_has_one_page() {
    let page = PostPage::empty(PageRequest::first(10));
    assert_eq!(page.total_pages(), 1);
    assert!(!page.has_next());
  }
}
