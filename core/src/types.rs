//! Domain DTOs for the posts API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates.
//!
//! Server-assigned fields (`id`, `userId`, `createdAt`) are optional because a
//! post built locally has none of them until the server confirms it. They are
//! omitted from the JSON when absent.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// A single post as exchanged with the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Post {
    /// A post that has not been persisted yet.
    pub fn draft(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    /// Reject posts the create endpoint must never see.
    pub fn validate_new(&self) -> Result<(), ApiError> {
        if self.title.is_empty() {
            return Err(ApiError::InvalidPost("title must not be empty"));
        }
        if self.body.is_empty() {
            return Err(ApiError::InvalidPost("body must not be empty"));
        }
        Ok(())
    }

    /// The server-assigned id, required before a post can be edited or deleted.
    pub fn require_id(&self) -> Result<&str, ApiError> {
        self.id.as_deref().ok_or(ApiError::MissingField("id"))
    }

    /// The server-assigned creation timestamp, required for display.
    pub fn require_created_at(&self) -> Result<&str, ApiError> {
        self.created_at
            .as_deref()
            .ok_or(ApiError::MissingField("createdAt"))
    }
}

/// Request payload for updating an existing post. Both fields are always sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdatePost {
    pub title: String,
    pub body: String,
}

/// Response payload of the delete endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteResult {
    pub success: bool,
}
