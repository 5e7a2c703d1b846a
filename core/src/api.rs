//! Stateless HTTP request builder and response parser for the posts API.
//!
//! # Design
//! `PostApi` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! `PostClient` glues the two together through a `Transport`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{DeleteResult, Post, UpdatePost};

/// Synchronous, stateless request builder for the posts API.
#[derive(Debug, Clone)]
pub struct PostApi {
    base_url: String,
}

impl PostApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_posts(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/posts", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Fails with `InvalidPost` for an empty title or body.
    pub fn build_create_post(&self, post: &Post) -> Result<HttpRequest, ApiError> {
        post.validate_new()?;
        let body = Post::draft(post.title.as_str(), post.body.as_str());
        json_request(HttpMethod::Post, format!("{}/post", self.base_url), &body)
    }

    pub fn build_update_post(&self, id: &str, input: &UpdatePost) -> Result<HttpRequest, ApiError> {
        json_request(HttpMethod::Put, self.post_url(id), input)
    }

    pub fn build_delete_post(&self, id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: self.post_url(id),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_posts(&self, response: HttpResponse) -> Result<Vec<Post>, ApiError> {
        decode(response)
    }

    pub fn parse_create_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        decode(response)
    }

    pub fn parse_update_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        decode(response)
    }

    pub fn parse_delete_post(&self, response: HttpResponse) -> Result<DeleteResult, ApiError> {
        decode(response)
    }

    fn post_url(&self, id: &str) -> String {
        format!("{}/post/{}", self.base_url, urlencoding::encode(id))
    }
}

fn json_request<T: Serialize>(
    method: HttpMethod,
    path: String,
    input: &T,
) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
    Ok(HttpRequest {
        method,
        path,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
