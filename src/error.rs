use rocket::http::Status;
use rocket::serde::json::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PostError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Store(#[from] rusqlite::Error),
}

impl PostError {
    pub fn not_found(id: &str) -> Self {
        PostError::NotFound(format!("Post {} not found", id))
    }

    pub fn status(&self) -> Status {
        match self {
            PostError::Validation(_) => Status::BadRequest,
            PostError::NotFound(_) => Status::NotFound,
            PostError::Store(_) => Status::InternalServerError,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            PostError::Validation(_) => "VALIDATION_ERROR",
            PostError::NotFound(_) => "NOT_FOUND",
            PostError::Store(_) => "DB_ERROR",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn new(msg: &str, code: &str) -> Self {
        ApiError { error: msg.to_string(), code: code.to_string() }
    }
}

pub type ApiResult<T> = Result<T, (Status, Json<ApiError>)>;

impl From<PostError> for (Status, Json<ApiError>) {
    fn from(e: PostError) -> Self {
        if let PostError::Store(inner) = &e {
            tracing::error!(error = %inner, "store operation failed");
        }
        (e.status(), Json(ApiError::new(&e.to_string(), e.code())))
    }
}
