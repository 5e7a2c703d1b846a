//! API client core for the posts service.
//!
//! # Overview
//! `PostApi` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network (host-does-IO pattern). `PostClient` pairs it
//! with a `Transport` and keeps the last known list of posts, published to
//! observers through a `tokio::sync::watch` channel.
//!
//! # Design
//! - `PostApi` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `PostClient` is the only owner of mutable state. The cached list is a
//!   copy of what the server last said, never a source of truth.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use api::PostApi;
pub use client::PostClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{DeleteResult, Post, UpdatePost};
