//! Plain-text rendering of posts for the terminal.

use anyhow::{anyhow, Result};
use posts_core::{ApiError, Post};

pub fn render_list(posts: &[Post]) -> String {
    if posts.is_empty() {
        return "no posts\n".to_string();
    }
    posts
        .iter()
        .map(|post| format!("{}\t{}\n", post.id.as_deref().unwrap_or("-"), post.title))
        .collect()
}

/// Full view of one post. Only server-confirmed posts can be shown, so a
/// missing `id` or `createdAt` is an error rather than a blank field.
pub fn render_detail(post: &Post) -> Result<String, ApiError> {
    let id = post.require_id()?;
    let created_at = post.require_created_at()?;
    let mut out = format!("id:      {id}\ncreated: {created_at}\n");
    if let Some(user_id) = post.user_id {
        out.push_str(&format!("user:    {user_id}\n"));
    }
    out.push_str(&format!("title:   {}\n\n{}\n", post.title, post.body));
    Ok(out)
}

pub fn find<'a>(posts: &'a [Post], id: &str) -> Result<&'a Post> {
    posts
        .iter()
        .find(|p| p.id.as_deref() == Some(id))
        .ok_or_else(|| anyhow!("no post with id `{id}`"))
}
