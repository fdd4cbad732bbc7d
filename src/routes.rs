use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;

use crate::error::{ApiError, ApiResult, PostError};
use crate::models::{CreatePostReq, PostResponse, UpdatePostReq};
use crate::repository::PostRepository;
use crate::{DbPool, DbPoolExt};

// ─── Routes ───

#[get("/health")]
pub fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok", "version": env!("CARGO_PKG_VERSION")}))
}

#[get("/posts")]
pub fn list_posts(db: &State<DbPool>) -> ApiResult<Json<Vec<PostResponse>>> {
    let conn = db.conn();
    let posts = PostRepository::new(&conn).list()?;
    tracing::debug!(count = posts.len(), "listing posts");
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

#[get("/posts/<id>")]
pub fn get_post(id: &str, db: &State<DbPool>) -> ApiResult<Json<PostResponse>> {
    let conn = db.conn();
    match PostRepository::new(&conn).find_by_id(id)? {
        Some(post) => Ok(Json(post.into())),
        None => Err(PostError::not_found(id).into()),
    }
}

#[post("/posts", format = "json", data = "<req>")]
pub fn create_post(req: Json<CreatePostReq>, db: &State<DbPool>) -> ApiResult<(Status, Json<PostResponse>)> {
    let draft = req.into_inner().into_draft()?;
    let conn = db.conn();
    let post = PostRepository::new(&conn).create(draft)?;
    Ok((Status::Created, Json(post.into())))
}

#[put("/posts/<id>", format = "json", data = "<req>")]
pub fn update_post(id: &str, req: Json<UpdatePostReq>, db: &State<DbPool>) -> ApiResult<Status> {
    let patch = req.into_inner().into_patch(id)?;
    let conn = db.conn();
    PostRepository::new(&conn).update_by_id(id, &patch)?;
    Ok(Status::NoContent)
}

#[delete("/posts/<id>")]
pub fn delete_post(id: &str, db: &State<DbPool>) -> ApiResult<Status> {
    let conn = db.conn();
    PostRepository::new(&conn).delete_by_id(id)?;
    Ok(Status::NoContent)
}

// ─── Catchers ───

#[catch(400)]
pub fn bad_request() -> Json<ApiError> {
    Json(ApiError::new("Bad request", "BAD_REQUEST"))
}

#[catch(404)]
pub fn not_found() -> Json<ApiError> {
    Json(ApiError::new("Not found", "NOT_FOUND"))
}

#[catch(422)]
pub fn unprocessable_entity() -> Json<ApiError> {
    Json(ApiError::new("Request body has the wrong shape", "UNPROCESSABLE_ENTITY"))
}

#[catch(500)]
pub fn internal_error() -> Json<ApiError> {
    Json(ApiError::new("Internal server error", "INTERNAL_ERROR"))
}
