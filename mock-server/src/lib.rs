use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Every post created through the mock belongs to this user.
pub const MOCK_USER_ID: i64 = 1;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub user_id: i64,
    pub title: String,
    pub body: String,
    pub created_at: String,
}

/// Body of both create and update requests. Any server-owned fields the
/// client sends are ignored.
#[derive(Deserialize)]
pub struct PostInput {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResult {
    pub success: bool,
}

/// Posts in insertion order.
pub type Db = Arc<RwLock<Vec<Post>>>;

pub fn app() -> Router {
    app_with(Db::default())
}

/// Router over an existing store, so tests can seed or inspect it.
pub fn app_with(db: Db) -> Router {
    Router::new()
        .route("/posts", get(list_posts))
        .route("/post", post(create_post))
        .route("/post/{id}", put(update_post).delete(delete_post))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_posts(State(db): State<Db>) -> Json<Vec<Post>> {
    Json(db.read().await.clone())
}

async fn create_post(
    State(db): State<Db>,
    Json(input): Json<PostInput>,
) -> Result<(StatusCode, Json<Post>), StatusCode> {
    if input.title.is_empty() || input.body.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let post = Post {
        id: Uuid::new_v4().to_string(),
        user_id: MOCK_USER_ID,
        title: input.title,
        body: input.body,
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    db.write().await.push(post.clone());
    tracing::info!(id = %post.id, "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

async fn update_post(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<PostInput>,
) -> Result<Json<Post>, StatusCode> {
    let mut posts = db.write().await;
    let post = posts
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    post.title = input.title;
    post.body = input.body;
    tracing::info!(id = %post.id, "post updated");
    Ok(Json(post.clone()))
}

async fn delete_post(State(db): State<Db>, Path(id): Path<String>) -> Json<DeleteResult> {
    let mut posts = db.write().await;
    let before = posts.len();
    posts.retain(|p| p.id != id);
    let success = posts.len() < before;
    tracing::info!(%id, success, "post delete requested");
    Json(DeleteResult { success })
}
