//! Post persistence over an explicit SQLite connection handle.

use chrono::{SubsecRound, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::PostError;
use crate::models::{BlogPost, PostDraft, PostPatch};

pub struct PostRepository<'c> {
    conn: &'c Connection,
}

impl<'c> PostRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        PostRepository { conn }
    }

    /// Bulk-creates posts inside a single transaction.
    pub fn insert_many(&self, drafts: Vec<PostDraft>) -> Result<Vec<BlogPost>, PostError> {
        let tx = self.conn.unchecked_transaction()?;
        let mut created = Vec::with_capacity(drafts.len());
        for draft in drafts {
            created.push(insert(&tx, draft)?);
        }
        tx.commit()?;
        tracing::debug!(count = created.len(), "inserted posts");
        Ok(created)
    }

    pub fn list(&self) -> Result<Vec<BlogPost>, PostError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM posts ORDER BY created DESC, id", BlogPost::COLUMNS))?;
        let posts = stmt
            .query_map([], BlogPost::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(posts)
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<BlogPost>, PostError> {
        let post = self
            .conn
            .query_row(
                &format!("SELECT {} FROM posts WHERE id = ?1", BlogPost::COLUMNS),
                [id],
                BlogPost::from_row,
            )
            .optional()?;
        Ok(post)
    }

    pub fn create(&self, draft: PostDraft) -> Result<BlogPost, PostError> {
        let post = insert(self.conn, draft)?;
        tracing::info!(post_id = %post.id, "created post");
        Ok(post)
    }

    /// Applies only the fields present in `patch`.
    pub fn update_by_id(&self, id: &str, patch: &PostPatch) -> Result<(), PostError> {
        let changed = self.conn.execute(
            "UPDATE posts SET title = COALESCE(?1, title), content = COALESCE(?2, content) WHERE id = ?3",
            params![patch.title, patch.content, id],
        )?;
        if changed == 0 {
            return Err(PostError::not_found(id));
        }
        tracing::info!(post_id = %id, "updated post");
        Ok(())
    }

    pub fn delete_by_id(&self, id: &str) -> Result<(), PostError> {
        let deleted = self.conn.execute("DELETE FROM posts WHERE id = ?1", [id])?;
        if deleted == 0 {
            return Err(PostError::not_found(id));
        }
        tracing::info!(post_id = %id, "deleted post");
        Ok(())
    }

    pub fn count(&self) -> Result<usize, PostError> {
        let n: i64 = self.conn.query_row("SELECT COUNT(*) FROM posts", [], |r| r.get(0))?;
        Ok(usize::try_from(n).unwrap_or_default())
    }

    /// Removes every post. Returns the number of rows dropped.
    pub fn delete_all(&self) -> Result<usize, PostError> {
        let n = self.conn.execute("DELETE FROM posts", [])?;
        tracing::debug!(count = n, "cleared posts");
        Ok(n)
    }
}

/// `created` is kept at millisecond precision, the precision the API renders.
fn insert(conn: &Connection, draft: PostDraft) -> Result<BlogPost, PostError> {
    let post = BlogPost {
        id: uuid::Uuid::new_v4().to_string(),
        title: draft.title,
        author: draft.author,
        content: draft.content,
        created: draft.created.unwrap_or_else(Utc::now).trunc_subsecs(3),
    };
    conn.execute(
        "INSERT INTO posts (id, title, author_first_name, author_last_name, content, created) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![post.id, post.title, post.author.first_name, post.author.last_name, post.content, post.created],
    )?;
    Ok(post)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::Author;
    use chrono::{Duration, TimeZone};

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        db::initialize(&conn).unwrap();
        conn
    }

    fn draft(title: &str) -> PostDraft {
        PostDraft {
            title: title.to_string(),
            author: Author::new("Jane", "Doe"),
            content: format!("{} body", title),
            created: None,
        }
    }

    #[test]
    fn test_create_and_find() {
        let conn = conn();
        let repo = PostRepository::new(&conn);
        let created = repo.create(draft("First")).unwrap();
        assert!(!created.id.is_empty());

        let found = repo.find_by_id(&created.id).unwrap().unwrap();
        assert_eq!(found, created);
    }

    #[test]
    fn test_find_missing_is_none() {
        let conn = conn();
        let repo = PostRepository::new(&conn);
        assert!(repo.find_by_id("nope").unwrap().is_none());
    }

    #[test]
    fn test_client_created_is_kept() {
        let conn = conn();
        let repo = PostRepository::new(&conn);
        let ts = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        let post = repo.create(PostDraft { created: Some(ts), ..draft("Dated") }).unwrap();
        assert_eq!(repo.find_by_id(&post.id).unwrap().unwrap().created, ts);
    }

    #[test]
    fn test_created_truncated_to_millis() {
        let conn = conn();
        let repo = PostRepository::new(&conn);
        let ts = Utc.with_ymd_and_hms(2021, 6, 15, 8, 30, 0).unwrap() + Duration::nanoseconds(123_456_789);
        let post = repo.create(PostDraft { created: Some(ts), ..draft("Precise") }).unwrap();

        let expected = Utc.with_ymd_and_hms(2021, 6, 15, 8, 30, 0).unwrap() + Duration::milliseconds(123);
        assert_eq!(post.created, expected);
        assert_eq!(repo.find_by_id(&post.id).unwrap().unwrap().created, expected);
    }

    #[test]
    fn test_insert_many_assigns_unique_ids() {
        let conn = conn();
        let repo = PostRepository::new(&conn);
        let posts = repo.insert_many(vec![draft("a"), draft("b"), draft("c")]).unwrap();
        assert_eq!(posts.len(), 3);
        assert_ne!(posts[0].id, posts[1].id);
        assert_ne!(posts[1].id, posts[2].id);
        assert_eq!(repo.count().unwrap(), 3);
    }

    #[test]
    fn test_list_newest_first() {
        let conn = conn();
        let repo = PostRepository::new(&conn);
        let now = Utc::now();
        repo.insert_many(vec![
            PostDraft { created: Some(now - Duration::days(2)), ..draft("old") },
            PostDraft { created: Some(now), ..draft("new") },
        ])
        .unwrap();
        let titles: Vec<_> = repo.list().unwrap().into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["new", "old"]);
    }

    #[test]
    fn test_partial_update() {
        let conn = conn();
        let repo = PostRepository::new(&conn);
        let post = repo.create(draft("Before")).unwrap();

        let patch = PostPatch { title: Some("After".to_string()), content: None };
        repo.update_by_id(&post.id, &patch).unwrap();
        let updated = repo.find_by_id(&post.id).unwrap().unwrap();
        assert_eq!(updated.title, "After");
        assert_eq!(updated.content, post.content);
        assert_eq!(updated.author, post.author);
        assert_eq!(updated.created, post.created);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let conn = conn();
        let repo = PostRepository::new(&conn);
        let err = repo.update_by_id("ghost", &PostPatch::default()).unwrap_err();
        assert!(matches!(err, PostError::NotFound(_)));
    }

    #[test]
    fn test_delete_twice() {
        let conn = conn();
        let repo = PostRepository::new(&conn);
        let post = repo.create(draft("Gone")).unwrap();
        repo.delete_by_id(&post.id).unwrap();
        assert!(repo.find_by_id(&post.id).unwrap().is_none());
        assert!(matches!(repo.delete_by_id(&post.id), Err(PostError::NotFound(_))));
    }

    #[test]
    fn test_delete_all() {
        let conn = conn();
        let repo = PostRepository::new(&conn);
        repo.insert_many(vec![draft("a"), draft("b")]).unwrap();
        assert_eq!(repo.delete_all().unwrap(), 2);
        assert_eq!(repo.count().unwrap(), 0);
    }
}
