//! Integration tests for `SqliteStore` against an in-memory database.

use quill_core::{
  feed::{FeedScope, PageRequest},
  follow, mutation,
  mutation::{CommentPolicy, EditOutcome},
  group::NewGroup,
  post::PostDraft,
  store::BlogStore,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn group(slug: &str) -> NewGroup {
  NewGroup {
    title:       format!("The {slug} group"),
    slug:        slug.to_owned(),
    description: String::new(),
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_user() {
  let s = store().await;

  let user = s.add_user("alice").await.unwrap();
  assert_eq!(user.username, "alice");

  let by_id = s.get_user(user.user_id).await.unwrap().unwrap();
  assert_eq!(by_id.username, "alice");

  let by_name = s.get_user_by_username("alice").await.unwrap().unwrap();
  assert_eq!(by_name.user_id, user.user_id);
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
  let s = store().await;
  s.add_user("alice").await.unwrap();

  let err = s.add_user("alice").await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(quill_core::Error::UsernameTaken(_))
  ));
}

#[tokio::test]
async fn users_list_by_username_ascending() {
  let s = store().await;
  s.add_user("zed").await.unwrap();
  s.add_user("abe").await.unwrap();

  let users = s.list_users().await.unwrap();
  let names: Vec<_> = users.iter().map(|u| u.username.as_str()).collect();
  assert_eq!(names, ["abe", "zed"]);
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  assert!(s.get_user(Uuid::new_v4()).await.unwrap().is_none());
  assert!(s.get_user_by_username("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn deleting_a_user_cascades_their_content_and_edges() {
  let s = store().await;
  let author = s.add_user("author").await.unwrap();
  let fan = s.add_user("fan").await.unwrap();

  let post = s
    .insert_post(author.user_id, PostDraft::new("doomed"))
    .await
    .unwrap();
  s.insert_comment(post.post_id, fan.user_id, "nice").await.unwrap();
  s.insert_follow_edge(fan.user_id, author.user_id).await.unwrap();

  assert!(s.delete_user(author.user_id).await.unwrap());

  assert!(s.get_post(post.post_id).await.unwrap().is_none());
  assert!(s.comments_for_post(post.post_id).await.unwrap().is_empty());
  assert!(!s.is_following(fan.user_id, author.user_id).await.unwrap());
}

// ─── Groups ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn groups_list_by_title_ascending() {
  let s = store().await;
  s.add_group(NewGroup {
    title:       "Zeta".into(),
    slug:        "zeta".into(),
    description: String::new(),
  })
  .await
  .unwrap();
  s.add_group(NewGroup {
    title:       "Alpha".into(),
    slug:        "alpha".into(),
    description: String::new(),
  })
  .await
  .unwrap();

  let groups = s.list_groups().await.unwrap();
  let titles: Vec<_> = groups.iter().map(|g| g.title.as_str()).collect();
  assert_eq!(titles, ["Alpha", "Zeta"]);
}

#[tokio::test]
async fn duplicate_slug_is_rejected() {
  let s = store().await;
  s.add_group(group("rust")).await.unwrap();

  let err = s.add_group(group("rust")).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(quill_core::Error::SlugTaken(_))
  ));
}

#[tokio::test]
async fn deleting_a_group_keeps_its_posts_ungrouped() {
  let s = store().await;
  let author = s.add_user("author").await.unwrap();
  let g = s.add_group(group("rust")).await.unwrap();

  let mut draft = PostDraft::new("still here");
  draft.group_id = Some(g.group_id);
  let post = s.insert_post(author.user_id, draft).await.unwrap();

  assert!(s.delete_group(g.group_id).await.unwrap());

  let survived = s.get_post(post.post_id).await.unwrap().unwrap();
  assert_eq!(survived.text, "still here");
  assert_eq!(survived.group_id, None);
}

// ─── Posts ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_post_preserves_author_and_timestamp() {
  let s = store().await;
  let author = s.add_user("author").await.unwrap();
  let post = s
    .insert_post(author.user_id, PostDraft::new("first"))
    .await
    .unwrap();

  let updated = s
    .update_post(post.post_id, PostDraft::new("second"))
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated.text, "second");
  assert_eq!(updated.author_id, post.author_id);
  assert_eq!(updated.created_at, post.created_at);
}

#[tokio::test]
async fn update_missing_post_returns_none() {
  let s = store().await;
  let result = s
    .update_post(Uuid::new_v4(), PostDraft::new("nope"))
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn post_naming_an_unknown_group_is_group_not_found() {
  let s = store().await;
  let author = s.add_user("author").await.unwrap();

  let mut draft = PostDraft::new("orphan");
  draft.group_id = Some(Uuid::new_v4());
  let err = s.insert_post(author.user_id, draft).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(quill_core::Error::GroupNotFound(_))
  ));

  // Moving an existing post into an unknown group fails the same way.
  let post = s
    .insert_post(author.user_id, PostDraft::new("grounded"))
    .await
    .unwrap();
  let mut draft = PostDraft::new("moved");
  draft.group_id = Some(Uuid::new_v4());
  let err = s.update_post(post.post_id, draft).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(quill_core::Error::GroupNotFound(_))
  ));
}

#[tokio::test]
async fn deleting_a_post_cascades_its_comments() {
  let s = store().await;
  let author = s.add_user("author").await.unwrap();
  let post = s
    .insert_post(author.user_id, PostDraft::new("gone soon"))
    .await
    .unwrap();
  s.insert_comment(post.post_id, author.user_id, "rip")
    .await
    .unwrap();

  assert!(s.delete_post(post.post_id).await.unwrap());
  assert!(s.comments_for_post(post.post_id).await.unwrap().is_empty());
}

// ─── Feeds & pagination ──────────────────────────────────────────────────────

#[tokio::test]
async fn group_feed_paginates_13_posts_into_10_3_0() {
  let s = store().await;
  let author = s.add_user("author").await.unwrap();
  let g = s.add_group(group("busy")).await.unwrap();

  for i in 0..13 {
    let mut draft = PostDraft::new(format!("post {i}"));
    draft.group_id = Some(g.group_id);
    s.insert_post(author.user_id, draft).await.unwrap();
  }

  let scope = FeedScope::Group(g.group_id);

  let page1 = s.list_posts(scope, PageRequest::new(1, 10)).await.unwrap();
  assert_eq!(page1.posts.len(), 10);
  assert_eq!(page1.total, 13);
  assert_eq!(page1.total_pages(), 2);

  let page2 = s.list_posts(scope, PageRequest::new(2, 10)).await.unwrap();
  assert_eq!(page2.posts.len(), 3);

  let page3 = s.list_posts(scope, PageRequest::new(3, 10)).await.unwrap();
  assert!(page3.posts.is_empty());
  assert_eq!(page3.total, 13);
}

#[tokio::test]
async fn global_feed_is_newest_first() {
  let s = store().await;
  let author = s.add_user("author").await.unwrap();

  let oldest = s
    .insert_post(author.user_id, PostDraft::new("oldest"))
    .await
    .unwrap();
  let newest = s
    .insert_post(author.user_id, PostDraft::new("newest"))
    .await
    .unwrap();

  let page = s
    .list_posts(FeedScope::Global, PageRequest::first(10))
    .await
    .unwrap();
  assert_eq!(page.posts.len(), 2);
  assert_eq!(page.posts[0].post_id, newest.post_id);
  assert_eq!(page.posts[1].post_id, oldest.post_id);
}

#[tokio::test]
async fn equal_timestamps_tie_break_on_username_ascending() {
  let s = store().await;
  let zed = s.add_user("zed").await.unwrap();
  let abe = s.add_user("abe").await.unwrap();

  let at = chrono::Utc::now();
  s.insert_post_at(zed.user_id, "by zed", at).await.unwrap();
  s.insert_post_at(abe.user_id, "by abe", at).await.unwrap();

  let page = s
    .list_posts(FeedScope::Global, PageRequest::first(10))
    .await
    .unwrap();
  let texts: Vec<_> = page.posts.iter().map(|p| p.text.as_str()).collect();
  assert_eq!(texts, ["by abe", "by zed"]);
}

#[tokio::test]
async fn author_feed_only_contains_their_posts() {
  let s = store().await;
  let alice = s.add_user("alice").await.unwrap();
  let bob = s.add_user("bob").await.unwrap();

  s.insert_post(alice.user_id, PostDraft::new("by alice"))
    .await
    .unwrap();
  s.insert_post(bob.user_id, PostDraft::new("by bob"))
    .await
    .unwrap();

  let page = s
    .list_posts(FeedScope::Author(alice.user_id), PageRequest::first(10))
    .await
    .unwrap();
  assert_eq!(page.total, 1);
  assert_eq!(page.posts[0].text, "by alice");
}

#[tokio::test]
async fn personalized_feed_contains_only_followed_authors() {
  let s = store().await;
  let reader = s.add_user("reader").await.unwrap();
  let loner = s.add_user("loner").await.unwrap();
  let x = s.add_user("author-x").await.unwrap();
  let y = s.add_user("author-y").await.unwrap();

  follow::follow(&s, reader.user_id, x.user_id).await.unwrap();

  let p = s.insert_post(x.user_id, PostDraft::new("P")).await.unwrap();
  s.insert_post(y.user_id, PostDraft::new("Q")).await.unwrap();

  let feed = s
    .list_posts(FeedScope::FollowedBy(reader.user_id), PageRequest::first(10))
    .await
    .unwrap();
  assert_eq!(feed.total, 1);
  assert_eq!(feed.posts[0].post_id, p.post_id);

  // Following nobody yields an empty page, not an error.
  let empty = s
    .list_posts(FeedScope::FollowedBy(loner.user_id), PageRequest::first(10))
    .await
    .unwrap();
  assert!(empty.posts.is_empty());
  assert_eq!(empty.total, 0);
}

// ─── Follow graph ────────────────────────────────────────────────────────────

#[tokio::test]
async fn follow_twice_leaves_exactly_one_edge() {
  let s = store().await;
  let user = s.add_user("user").await.unwrap();
  let author = s.add_user("author").await.unwrap();

  assert!(follow::follow(&s, user.user_id, author.user_id).await.unwrap());
  assert!(!follow::follow(&s, user.user_id, author.user_id).await.unwrap());

  let following = s.list_following(user.user_id).await.unwrap();
  assert_eq!(following.len(), 1);
  assert_eq!(following[0].user_id, author.user_id);

  let removed = follow::unfollow(&s, user.user_id, "author").await.unwrap();
  assert_eq!(removed, 1);
  assert!(s.list_following(user.user_id).await.unwrap().is_empty());

  // Redundant unfollow is a no-op.
  let removed = follow::unfollow(&s, user.user_id, "author").await.unwrap();
  assert_eq!(removed, 0);
}

#[tokio::test]
async fn self_follow_never_creates_an_edge() {
  let s = store().await;
  let user = s.add_user("narcissus").await.unwrap();

  assert!(!follow::follow(&s, user.user_id, user.user_id).await.unwrap());
  assert!(s.list_following(user.user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn unfollow_unknown_username_is_a_no_op() {
  let s = store().await;
  let user = s.add_user("user").await.unwrap();

  let removed = follow::unfollow(&s, user.user_id, "nobody").await.unwrap();
  assert_eq!(removed, 0);
}

// ─── Mutation handlers ───────────────────────────────────────────────────────

#[tokio::test]
async fn create_post_rejects_empty_text() {
  let s = store().await;
  let author = s.add_user("author").await.unwrap();

  let err = mutation::create_post(&s, author.user_id, PostDraft::new("   "))
    .await
    .unwrap_err();
  assert!(matches!(err, quill_core::Error::EmptyText { field: "text" }));
}

#[tokio::test]
async fn edit_by_non_author_changes_nothing() {
  let s = store().await;
  let alice = s.add_user("alice").await.unwrap();
  let bob = s.add_user("bob").await.unwrap();
  let g = s.add_group(group("rust")).await.unwrap();

  let mut draft = PostDraft::new("original");
  draft.group_id = Some(g.group_id);
  let post = mutation::create_post(&s, alice.user_id, draft).await.unwrap();

  let outcome =
    mutation::edit_post(&s, bob.user_id, post.post_id, PostDraft::new("hijacked"))
      .await
      .unwrap();
  assert!(matches!(outcome, EditOutcome::NotAuthor(_)));
  assert_eq!(outcome.post().text, "original");

  let stored = s.get_post(post.post_id).await.unwrap().unwrap();
  assert_eq!(stored.text, "original");
  assert_eq!(stored.group_id, Some(g.group_id));
  assert_eq!(stored.created_at, post.created_at);
}

#[tokio::test]
async fn edit_by_author_updates_in_place() {
  let s = store().await;
  let alice = s.add_user("alice").await.unwrap();
  let post = mutation::create_post(&s, alice.user_id, PostDraft::new("v1"))
    .await
    .unwrap();

  let outcome =
    mutation::edit_post(&s, alice.user_id, post.post_id, PostDraft::new("v2"))
      .await
      .unwrap();
  let updated = match outcome {
    EditOutcome::Updated(p) => p,
    EditOutcome::NotAuthor(_) => panic!("author edit was rejected"),
  };
  assert_eq!(updated.text, "v2");
  assert_eq!(updated.created_at, post.created_at);
}

#[tokio::test]
async fn edit_missing_post_is_not_found() {
  let s = store().await;
  let alice = s.add_user("alice").await.unwrap();

  let err =
    mutation::edit_post(&s, alice.user_id, Uuid::new_v4(), PostDraft::new("x"))
      .await
      .unwrap_err();
  assert!(matches!(err, quill_core::Error::PostNotFound(_)));
}

#[tokio::test]
async fn delete_by_non_author_changes_nothing() {
  let s = store().await;
  let alice = s.add_user("alice").await.unwrap();
  let bob = s.add_user("bob").await.unwrap();
  let post = mutation::create_post(&s, alice.user_id, PostDraft::new("keep"))
    .await
    .unwrap();

  let outcome = mutation::delete_post(&s, bob.user_id, post.post_id)
    .await
    .unwrap();
  assert!(matches!(outcome, EditOutcome::NotAuthor(_)));
  assert!(s.get_post(post.post_id).await.unwrap().is_some());
}

#[tokio::test]
async fn comment_on_missing_post_is_not_found() {
  let s = store().await;
  let alice = s.add_user("alice").await.unwrap();

  let err = mutation::create_comment(
    &s,
    alice.user_id,
    Uuid::new_v4(),
    "hello",
    &CommentPolicy::disabled(),
  )
  .await
  .unwrap_err();
  assert!(matches!(err, quill_core::Error::PostNotFound(_)));
}

#[tokio::test]
async fn comments_come_back_newest_first() {
  let s = store().await;
  let alice = s.add_user("alice").await.unwrap();
  let post = mutation::create_post(&s, alice.user_id, PostDraft::new("p"))
    .await
    .unwrap();

  let policy = CommentPolicy::disabled();
  mutation::create_comment(&s, alice.user_id, post.post_id, "first", &policy)
    .await
    .unwrap();
  mutation::create_comment(&s, alice.user_id, post.post_id, "second", &policy)
    .await
    .unwrap();

  let comments = s.comments_for_post(post.post_id).await.unwrap();
  assert_eq!(comments.len(), 2);
  assert_eq!(comments[0].text, "second");
  assert_eq!(comments[1].text, "first");
}

#[tokio::test]
async fn denylisted_comment_is_never_persisted() {
  let s = store().await;
  let alice = s.add_user("alice").await.unwrap();
  let post = mutation::create_post(&s, alice.user_id, PostDraft::new("p"))
    .await
    .unwrap();

  let policy = CommentPolicy::new(["spam".to_owned()]);
  let err =
    mutation::create_comment(&s, alice.user_id, post.post_id, "pure SPAM", &policy)
      .await
      .unwrap_err();
  assert!(matches!(err, quill_core::Error::ForbiddenWord(_)));
  assert!(s.comments_for_post(post.post_id).await.unwrap().is_empty());
}
