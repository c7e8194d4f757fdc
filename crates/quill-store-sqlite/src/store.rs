//! [`SqliteStore`] — the SQLite implementation of [`BlogStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use quill_core::{
  comment::Comment,
  feed::{FeedScope, PageRequest, PostPage},
  group::{Group, NewGroup},
  post::{Post, PostDraft},
  store::BlogStore,
  user::User,
};

use crate::{
  Error, Result,
  encode::{RawComment, RawGroup, RawPost, RawUser, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Quill blog store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All
/// statements run on the connection's dedicated thread, so each operation
/// executes as one unit of work; multi-statement mutations are wrapped in
/// a transaction inside a single `call`.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// `true` for SQLite constraint failures (UNIQUE, FK). Used to translate
/// username/slug collisions into domain errors.
fn is_constraint_violation(e: &tokio_rusqlite::Error) -> bool {
  matches!(
    e,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(err, _))
      if err.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a post with a caller-chosen timestamp. Test-only:
  /// [`BlogStore::insert_post`] assigns `Utc::now()`, so colliding
  /// `created_at` values are unreachable through the trait.
  #[cfg(test)]
  pub(crate) async fn insert_post_at(
    &self,
    author_id: Uuid,
    text: &str,
    created_at: chrono::DateTime<Utc>,
  ) -> Result<Post> {
    let post = Post {
      post_id:    Uuid::new_v4(),
      author_id,
      group_id:   None,
      text:       text.to_owned(),
      image:      None,
      created_at,
    };

    let id_str     = encode_uuid(post.post_id);
    let author_str = encode_uuid(author_id);
    let body       = post.text.clone();
    let at_str     = encode_dt(created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO posts (post_id, author_id, text, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, author_str, body, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(post)
  }

  /// Run a DELETE keyed on a single UUID; returns whether a row went away.
  async fn delete_by_id(&self, sql: &'static str, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let changed = self
      .conn
      .call(move |conn| Ok(conn.execute(sql, rusqlite::params![id_str])?))
      .await?;
    Ok(changed > 0)
  }
}

// ─── BlogStore impl ──────────────────────────────────────────────────────────

impl BlogStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, username: &str) -> Result<User> {
    let user = User {
      user_id:    Uuid::new_v4(),
      username:   username.to_owned(),
      created_at: Utc::now(),
    };

    let id_str   = encode_uuid(user.user_id);
    let name     = user.username.clone();
    let at_str   = encode_dt(user.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, username, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, name, at_str],
        )?;
        Ok(())
      })
      .await;

    match inserted {
      Ok(()) => Ok(user),
      Err(e) if is_constraint_violation(&e) => Err(Error::Core(
        quill_core::Error::UsernameTaken(username.to_owned()),
      )),
      Err(e) => Err(e.into()),
    }
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT user_id, username, created_at FROM users WHERE user_id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok(RawUser {
                user_id:    row.get(0)?,
                username:   row.get(1)?,
                created_at: row.get(2)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
    let name = username.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT user_id, username, created_at FROM users WHERE username = ?1",
            rusqlite::params![name],
            |row| {
              Ok(RawUser {
                user_id:    row.get(0)?,
                username:   row.get(1)?,
                created_at: row.get(2)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT user_id, username, created_at FROM users ORDER BY username ASC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawUser {
              user_id:    row.get(0)?,
              username:   row.get(1)?,
              created_at: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn delete_user(&self, id: Uuid) -> Result<bool> {
    // Posts, comments, and follow edges go with the user via FK cascades.
    self
      .delete_by_id("DELETE FROM users WHERE user_id = ?1", id)
      .await
  }

  // ── Groups ────────────────────────────────────────────────────────────────

  async fn add_group(&self, input: NewGroup) -> Result<Group> {
    let group = Group {
      group_id:    Uuid::new_v4(),
      title:       input.title,
      slug:        input.slug,
      description: input.description,
    };

    let id_str = encode_uuid(group.group_id);
    let title  = group.title.clone();
    let slug   = group.slug.clone();
    let desc   = group.description.clone();

    let inserted = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO groups (group_id, title, slug, description)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, title, slug, desc],
        )?;
        Ok(())
      })
      .await;

    match inserted {
      Ok(()) => Ok(group),
      Err(e) if is_constraint_violation(&e) => {
        Err(Error::Core(quill_core::Error::SlugTaken(group.slug)))
      }
      Err(e) => Err(e.into()),
    }
  }

  async fn get_group_by_slug(&self, slug: &str) -> Result<Option<Group>> {
    let slug = slug.to_owned();

    let raw: Option<RawGroup> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT group_id, title, slug, description FROM groups WHERE slug = ?1",
            rusqlite::params![slug],
            |row| {
              Ok(RawGroup {
                group_id:    row.get(0)?,
                title:       row.get(1)?,
                slug:        row.get(2)?,
                description: row.get(3)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawGroup::into_group).transpose()
  }

  async fn list_groups(&self) -> Result<Vec<Group>> {
    let raws: Vec<RawGroup> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT group_id, title, slug, description FROM groups ORDER BY title ASC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawGroup {
              group_id:    row.get(0)?,
              title:       row.get(1)?,
              slug:        row.get(2)?,
              description: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawGroup::into_group).collect()
  }

  async fn delete_group(&self, id: Uuid) -> Result<bool> {
    // ON DELETE SET NULL clears the group reference on surviving posts.
    self
      .delete_by_id("DELETE FROM groups WHERE group_id = ?1", id)
      .await
  }

  // ── Posts ─────────────────────────────────────────────────────────────────

  async fn insert_post(&self, author_id: Uuid, draft: PostDraft) -> Result<Post> {
    let post = Post {
      post_id:    Uuid::new_v4(),
      author_id,
      group_id:   draft.group_id,
      text:       draft.text,
      image:      draft.image,
      created_at: Utc::now(),
    };

    let id_str     = encode_uuid(post.post_id);
    let author_str = encode_uuid(post.author_id);
    let group_str  = post.group_id.map(encode_uuid);
    let text       = post.text.clone();
    let image      = post.image.clone();
    let at_str     = encode_dt(post.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO posts (post_id, author_id, group_id, text, image, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, author_str, group_str, text, image, at_str],
        )?;
        Ok(())
      })
      .await;

    match (inserted, post.group_id) {
      (Ok(()), _) => Ok(post),
      // The author is resolved upstream, so a tripped FK names the group.
      (Err(e), Some(gid)) if is_constraint_violation(&e) => Err(Error::Core(
        quill_core::Error::GroupNotFound(encode_uuid(gid)),
      )),
      (Err(e), _) => Err(e.into()),
    }
  }

  async fn get_post(&self, id: Uuid) -> Result<Option<Post>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPost> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT post_id, author_id, group_id, text, image, created_at
             FROM posts WHERE post_id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok(RawPost {
                post_id:    row.get(0)?,
                author_id:  row.get(1)?,
                group_id:   row.get(2)?,
                text:       row.get(3)?,
                image:      row.get(4)?,
                created_at: row.get(5)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPost::into_post).transpose()
  }

  async fn update_post(&self, id: Uuid, draft: PostDraft) -> Result<Option<Post>> {
    let id_str    = encode_uuid(id);
    let group_id  = draft.group_id;
    let group_str = draft.group_id.map(encode_uuid);
    let text      = draft.text;
    let image     = draft.image;

    // author_id and created_at are deliberately absent from the SET list.
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE posts SET text = ?2, group_id = ?3, image = ?4 WHERE post_id = ?1",
          rusqlite::params![id_str, text, group_str, image],
        )?)
      })
      .await;

    let changed = match (changed, group_id) {
      (Ok(n), _) => n,
      // group_id is the only FK in the SET list.
      (Err(e), Some(gid)) if is_constraint_violation(&e) => {
        return Err(Error::Core(quill_core::Error::GroupNotFound(
          encode_uuid(gid),
        )));
      }
      (Err(e), _) => return Err(e.into()),
    };

    if changed == 0 {
      return Ok(None);
    }
    self.get_post(id).await
  }

  async fn delete_post(&self, id: Uuid) -> Result<bool> {
    // ON DELETE CASCADE removes the post's comments with it.
    self
      .delete_by_id("DELETE FROM posts WHERE post_id = ?1", id)
      .await
  }

  async fn list_posts(&self, scope: FeedScope, page: PageRequest) -> Result<PostPage> {
    // The scope parameter (if any) always binds as ?1; limit and offset are
    // validated integers and interpolated directly.
    let (filter, scope_param): (&'static str, Option<String>) = match scope {
      FeedScope::Global => ("", None),
      FeedScope::Group(id) => {
        ("WHERE p.group_id = ?1", Some(encode_uuid(id)))
      }
      FeedScope::Author(id) => {
        ("WHERE p.author_id = ?1", Some(encode_uuid(id)))
      }
      FeedScope::FollowedBy(id) => (
        "WHERE p.author_id IN (SELECT author_id FROM follows WHERE user_id = ?1)",
        Some(encode_uuid(id)),
      ),
    };

    let count_sql = format!("SELECT COUNT(*) FROM posts p {filter}");
    let page_sql  = format!(
      "SELECT p.post_id, p.author_id, p.group_id, p.text, p.image, p.created_at
       FROM posts p
       JOIN users u ON u.user_id = p.author_id
       {filter}
       ORDER BY p.created_at DESC, u.username ASC
       LIMIT {limit} OFFSET {offset}",
      limit = page.limit(),
      offset = page.offset(),
    );

    let (total, raws): (i64, Vec<RawPost>) = self
      .conn
      .call(move |conn| {
        let total: i64 = conn.query_row(
          &count_sql,
          rusqlite::params_from_iter(scope_param.iter()),
          |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(&page_sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(scope_param.iter()), |row| {
            Ok(RawPost {
              post_id:    row.get(0)?,
              author_id:  row.get(1)?,
              group_id:   row.get(2)?,
              text:       row.get(3)?,
              image:      row.get(4)?,
              created_at: row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((total, rows))
      })
      .await?;

    let posts = raws
      .into_iter()
      .map(RawPost::into_post)
      .collect::<Result<Vec<_>>>()?;

    Ok(PostPage {
      posts,
      total: total.max(0) as u64,
      page: page.page,
      per_page: page.per_page,
    })
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  async fn insert_comment(
    &self,
    post_id: Uuid,
    author_id: Uuid,
    text: &str,
  ) -> Result<Comment> {
    let comment = Comment {
      comment_id: Uuid::new_v4(),
      post_id:    Some(post_id),
      author_id,
      text:       text.to_owned(),
      created_at: Utc::now(),
    };

    let id_str     = encode_uuid(comment.comment_id);
    let post_str   = encode_uuid(post_id);
    let author_str = encode_uuid(author_id);
    let body       = comment.text.clone();
    let at_str     = encode_dt(comment.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO comments (comment_id, post_id, author_id, text, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, post_str, author_str, body, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(comment)
  }

  async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
    let post_str = encode_uuid(post_id);

    let raws: Vec<RawComment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT comment_id, post_id, author_id, text, created_at
           FROM comments WHERE post_id = ?1
           ORDER BY created_at DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![post_str], |row| {
            Ok(RawComment {
              comment_id: row.get(0)?,
              post_id:    row.get(1)?,
              author_id:  row.get(2)?,
              text:       row.get(3)?,
              created_at: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawComment::into_comment).collect()
  }

  // ── Follow edges ──────────────────────────────────────────────────────────

  async fn insert_follow_edge(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
    let user_str   = encode_uuid(user_id);
    let author_str = encode_uuid(author_id);

    // OR IGNORE + the UNIQUE constraint makes duplicate creation — racing
    // or sequential — converge to exactly one edge.
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT OR IGNORE INTO follows (user_id, author_id) VALUES (?1, ?2)",
          rusqlite::params![user_str, author_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn delete_follow_edges(&self, user_id: Uuid, author_id: Uuid) -> Result<u64> {
    let user_str   = encode_uuid(user_id);
    let author_str = encode_uuid(author_id);

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM follows WHERE user_id = ?1 AND author_id = ?2",
          rusqlite::params![user_str, author_str],
        )?)
      })
      .await?;

    Ok(removed as u64)
  }

  async fn is_following(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
    let user_str   = encode_uuid(user_id);
    let author_str = encode_uuid(author_id);

    let found: bool = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM follows WHERE user_id = ?1 AND author_id = ?2",
              rusqlite::params![user_str, author_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;

    Ok(found)
  }

  async fn list_following(&self, user_id: Uuid) -> Result<Vec<User>> {
    let user_str = encode_uuid(user_id);

    let raws: Vec<RawUser> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT u.user_id, u.username, u.created_at
           FROM follows f
           JOIN users u ON u.user_id = f.author_id
           WHERE f.user_id = ?1
           ORDER BY u.username ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], |row| {
            Ok(RawUser {
              user_id:    row.get(0)?,
              username:   row.get(1)?,
              created_at: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }
}
