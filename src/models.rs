use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PostError;

// ─── Stored record ───

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub first_name: String,
    pub last_name: String,
}

impl Author {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Author { first_name: first_name.into(), last_name: last_name.into() }
    }

    /// `"<first> <last>"`, the form the API exposes.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub author: Author,
    pub content: String,
    pub created: DateTime<Utc>,
}

impl BlogPost {
    pub const COLUMNS: &'static str = "id, title, author_first_name, author_last_name, content, created";

    /// Maps a row selected with [`BlogPost::COLUMNS`].
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(BlogPost {
            id: row.get(0)?,
            title: row.get(1)?,
            author: Author { first_name: row.get(2)?, last_name: row.get(3)? },
            content: row.get(4)?,
            created: row.get(5)?,
        })
    }
}

/// A post before the store has assigned it an id.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDraft {
    pub title: String,
    pub author: Author,
    pub content: String,
    pub created: Option<DateTime<Utc>>,
}

/// Fields a PUT may change. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

// ─── Response DTO ───

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub author: String,
    pub content: String,
    pub created: String,
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl From<&BlogPost> for PostResponse {
    fn from(post: &BlogPost) -> Self {
        PostResponse {
            id: post.id.clone(),
            title: post.title.clone(),
            author: post.author.display_name(),
            content: post.content.clone(),
            created: format_timestamp(&post.created),
        }
    }
}

impl From<BlogPost> for PostResponse {
    fn from(post: BlogPost) -> Self {
        let author = post.author.display_name();
        let created = format_timestamp(&post.created);
        PostResponse { id: post.id, title: post.title, author, content: post.content, created }
    }
}

// ─── Request bodies ───

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorReq {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Every field is optional at the serde level so that a missing one comes
/// back as a 400 naming it, not as a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct CreatePostReq {
    pub title: Option<String>,
    pub author: Option<AuthorReq>,
    pub content: Option<String>,
    pub created: Option<DateTime<Utc>>,
}

impl CreatePostReq {
    pub fn into_draft(self) -> Result<PostDraft, PostError> {
        let mut missing = Vec::new();
        if self.title.is_none() {
            missing.push("title");
        }
        let (first_name, last_name) = match self.author {
            Some(a) => (a.first_name, a.last_name),
            None => (None, None),
        };
        if first_name.is_none() {
            missing.push("author.firstName");
        }
        if last_name.is_none() {
            missing.push("author.lastName");
        }
        if self.content.is_none() {
            missing.push("content");
        }

        match (self.title, first_name, last_name, self.content) {
            (Some(title), Some(first_name), Some(last_name), Some(content)) => Ok(PostDraft {
                title,
                author: Author { first_name, last_name },
                content,
                created: self.created,
            }),
            _ => Err(PostError::Validation(format!("Missing required fields: {}", missing.join(", ")))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostReq {
    pub id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

impl UpdatePostReq {
    /// Checks the body id against the path id and extracts the patch.
    pub fn into_patch(self, path_id: &str) -> Result<PostPatch, PostError> {
        match self.id.as_deref() {
            None => Err(PostError::Validation("Request body must include an id".to_string())),
            Some(body_id) if body_id != path_id => Err(PostError::Validation(format!(
                "Path id ({}) and body id ({}) must match",
                path_id, body_id
            ))),
            Some(_) => Ok(PostPatch { title: self.title, content: self.content }),
        }
    }
}
