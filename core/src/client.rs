//! Stateful posts client: the cached post list plus the four remote operations.
//!
//! # Design
//! `PostClient` owns the last known server state as a `Vec<Post>` inside a
//! `tokio::sync::watch` channel. Observers call `subscribe` and are woken
//! whenever a successful operation changes the list. Every write goes through
//! the channel's sender, which serializes them, so concurrent operations never
//! interleave inside a mutation; the last one to complete wins.
//!
//! Each operation builds a request with `PostApi`, runs the blocking
//! `Transport` on tokio's blocking pool, and parses the response. Only
//! `add_post` reports failures to the caller. `fetch_posts`, `update_post` and
//! `delete_post` log the failure and leave the list untouched.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::api::PostApi;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{DeleteResult, Post, UpdatePost};

pub struct PostClient<T: Transport = UreqTransport> {
    api: PostApi,
    transport: Arc<T>,
    posts: watch::Sender<Vec<Post>>,
}

impl PostClient<UreqTransport> {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(PostApi::new(&config.base_url), UreqTransport::new())
    }
}

impl<T: Transport> PostClient<T> {
    pub fn new(api: PostApi, transport: T) -> Self {
        let (posts, _) = watch::channel(Vec::new());
        Self {
            api,
            transport: Arc::new(transport),
            posts,
        }
    }

    /// Start a client from an already known list, e.g. a previous session's.
    pub fn with_posts(api: PostApi, transport: T, posts: Vec<Post>) -> Self {
        let client = Self::new(api, transport);
        client.posts.send_replace(posts);
        client
    }

    pub fn api(&self) -> &PostApi {
        &self.api
    }

    /// Observe the published list. The receiver sees the current value
    /// immediately and is marked changed after each successful mutation.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Post>> {
        self.posts.subscribe()
    }

    /// Snapshot of the cached list.
    pub fn posts(&self) -> Vec<Post> {
        self.posts.borrow().clone()
    }

    /// Replace the cached list with the server's. Failures are logged only.
    pub async fn fetch_posts(&self) {
        match self.try_fetch().await {
            Ok(posts) => {
                debug!(count = posts.len(), "fetched posts");
                self.posts.send_replace(posts);
            }
            Err(error) => warn!(%error, "fetching posts failed"),
        }
    }

    /// Create a post on the server and return the persisted copy.
    ///
    /// The created post is not added to the cached list; it shows up on the
    /// next `fetch_posts`. Empty titles or bodies are rejected before any
    /// request is made.
    pub async fn add_post(&self, post: &Post) -> Result<Post, ApiError> {
        let request = self.api.build_create_post(post)?;
        let response = self.execute(request).await?;
        let created = self.api.parse_create_post(response)?;
        debug!(id = created.id.as_deref(), "created post");
        Ok(created)
    }

    /// Send a new title and body, then replace the cached entry whose id
    /// matches the server's echo. Failures are logged only.
    pub async fn update_post(&self, id: &str, title: &str, body: &str) {
        if id.is_empty() {
            warn!("refusing to update a post without an id");
            return;
        }
        let input = UpdatePost {
            title: title.to_string(),
            body: body.to_string(),
        };
        let updated = match self.try_update(id, &input).await {
            Ok(updated) => updated,
            Err(error) => {
                warn!(id, %error, "updating post failed");
                return;
            }
        };

        let replaced = self.posts.send_if_modified(|posts| {
            let Some(echo_id) = updated.id.as_deref() else {
                return false;
            };
            match posts.iter_mut().find(|p| p.id.as_deref() == Some(echo_id)) {
                Some(entry) => {
                    *entry = updated.clone();
                    true
                }
                None => false,
            }
        });
        if replaced {
            debug!(id, "updated post");
        } else {
            debug!(id, echo_id = updated.id.as_deref(), "updated post is not cached, dropping");
        }
    }

    /// Delete a post and drop it from the cached list once the server
    /// confirms with `success: true`. Failures are logged only.
    pub async fn delete_post(&self, id: &str) {
        if id.is_empty() {
            warn!("refusing to delete a post without an id");
            return;
        }
        match self.try_delete(id).await {
            Ok(outcome) if outcome.success => {
                let removed = self.posts.send_if_modified(|posts| {
                    match posts.iter().position(|p| p.id.as_deref() == Some(id)) {
                        Some(index) => {
                            posts.remove(index);
                            true
                        }
                        None => false,
                    }
                });
                debug!(id, removed, "deleted post");
            }
            Ok(_) => warn!(id, "server declined to delete post"),
            Err(error) => warn!(id, %error, "deleting post failed"),
        }
    }

    async fn try_fetch(&self) -> Result<Vec<Post>, ApiError> {
        let response = self.execute(self.api.build_list_posts()).await?;
        self.api.parse_list_posts(response)
    }

    async fn try_update(&self, id: &str, input: &UpdatePost) -> Result<Post, ApiError> {
        let request = self.api.build_update_post(id, input)?;
        let response = self.execute(request).await?;
        self.api.parse_update_post(response)
    }

    async fn try_delete(&self, id: &str) -> Result<DeleteResult, ApiError> {
        let response = self.execute(self.api.build_delete_post(id)).await?;
        self.api.parse_delete_post(response)
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, path = %request.path, "sending request");
        let transport = Arc::clone(&self.transport);
        tokio::task::spawn_blocking(move || transport.execute(request))
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::http::HttpMethod;

    /// Replays canned responses in order and records every request.
    #[derive(Default)]
    struct Scripted {
        responses: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
        requests: Arc<Mutex<Vec<HttpRequest>>>,
    }

    impl Scripted {
        fn reply(self, status: u16, body: &str) -> Self {
            self.responses.lock().unwrap().push_back(Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            }));
            self
        }

        fn fail(self, error: ApiError) -> Self {
            self.responses.lock().unwrap().push_back(Err(error));
            self
        }
    }

    impl Transport for Scripted {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted response left")
        }
    }

    fn post(id: &str, title: &str, body: &str) -> Post {
        Post {
            id: Some(id.to_string()),
            ..Post::draft(title, body)
        }
    }

    fn client(transport: Scripted, posts: Vec<Post>) -> (PostClient<Scripted>, Arc<Mutex<Vec<HttpRequest>>>) {
        let requests = Arc::clone(&transport.requests);
        let client = PostClient::with_posts(PostApi::new("http://api.test"), transport, posts);
        (client, requests)
    }

    #[tokio::test]
    async fn fetch_replaces_whole_list_in_server_order() {
        let transport = Scripted::default().reply(
            200,
            r#"[{"id":"3","title":"C","body":"c"},{"id":"1","title":"A","body":"a"}]"#,
        );
        let (client, _) = client(transport, vec![post("9", "old", "old")]);
        let mut rx = client.subscribe();
        rx.borrow_and_update();

        client.fetch_posts().await;

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), vec![post("3", "C", "c"), post("1", "A", "a")]);
    }

    #[tokio::test]
    async fn fetch_failure_keeps_list_and_does_not_notify() {
        let transport = Scripted::default()
            .reply(200, "not json")
            .fail(ApiError::Transport("connection refused".to_string()))
            .reply(500, "boom");
        let (client, _) = client(transport, vec![post("1", "A", "a")]);
        let mut rx = client.subscribe();
        rx.borrow_and_update();

        client.fetch_posts().await;
        client.fetch_posts().await;
        client.fetch_posts().await;

        assert!(!rx.has_changed().unwrap());
        assert_eq!(client.posts(), vec![post("1", "A", "a")]);
    }

    #[tokio::test]
    async fn update_replaces_matching_entry() {
        let transport = Scripted::default().reply(200, r#"{"id":"1","title":"B","body":"b"}"#);
        let (client, requests) = client(transport, vec![post("1", "A", "a")]);

        client.update_post("1", "B", "b").await;

        assert_eq!(client.posts(), vec![post("1", "B", "b")]);
        let requests = requests.lock().unwrap();
        assert_eq!(requests[0].method, HttpMethod::Put);
        assert_eq!(requests[0].path, "http://api.test/post/1");
        let sent: serde_json::Value =
            serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, serde_json::json!({"title": "B", "body": "b"}));
    }

    #[tokio::test]
    async fn update_takes_server_supplied_fields() {
        let transport = Scripted::default().reply(
            200,
            r#"{"id":"1","userId":4,"title":"B","body":"b","createdAt":"2024-01-01T00:00:00Z"}"#,
        );
        let (client, _) = client(transport, vec![post("1", "A", "a"), post("2", "X", "x")]);

        client.update_post("1", "B", "b").await;

        let posts = client.posts();
        assert_eq!(posts[0].user_id, Some(4));
        assert_eq!(posts[0].created_at.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(posts[1], post("2", "X", "x"));
    }

    #[tokio::test]
    async fn update_echo_for_unknown_id_is_dropped() {
        let transport = Scripted::default().reply(200, r#"{"id":"7","title":"B","body":"b"}"#);
        let (client, _) = client(transport, vec![post("1", "A", "a")]);
        let mut rx = client.subscribe();
        rx.borrow_and_update();

        client.update_post("1", "B", "b").await;

        assert!(!rx.has_changed().unwrap());
        assert_eq!(client.posts(), vec![post("1", "A", "a")]);
    }

    #[tokio::test]
    async fn update_failure_keeps_list() {
        let transport = Scripted::default().reply(404, "");
        let (client, _) = client(transport, vec![post("1", "A", "a")]);

        client.update_post("1", "B", "b").await;

        assert_eq!(client.posts(), vec![post("1", "A", "a")]);
    }

    #[tokio::test]
    async fn update_transport_and_decode_failures_keep_list() {
        let transport = Scripted::default()
            .fail(ApiError::Transport("connection reset".to_string()))
            .reply(200, "garbage");
        let (client, requests) = client(transport, vec![post("1", "A", "a")]);
        let mut rx = client.subscribe();
        rx.borrow_and_update();

        client.update_post("1", "B", "b").await;
        client.update_post("1", "B", "b").await;

        assert_eq!(requests.lock().unwrap().len(), 2);
        assert!(!rx.has_changed().unwrap());
        assert_eq!(client.posts(), vec![post("1", "A", "a")]);
    }

    #[tokio::test]
    async fn delete_transport_failure_keeps_list() {
        let transport =
            Scripted::default().fail(ApiError::Transport("connection refused".to_string()));
        let (client, requests) = client(transport, vec![post("1", "A", "a"), post("2", "B", "b")]);
        let mut rx = client.subscribe();
        rx.borrow_and_update();

        client.delete_post("2").await;

        assert_eq!(requests.lock().unwrap().len(), 1);
        assert!(!rx.has_changed().unwrap());
        assert_eq!(client.posts(), vec![post("1", "A", "a"), post("2", "B", "b")]);
    }

    #[tokio::test]
    async fn delete_confirmed_removes_only_that_entry() {
        let transport = Scripted::default().reply(200, r#"{"success":true}"#);
        let (client, requests) = client(transport, vec![post("1", "A", "a"), post("2", "B", "b")]);

        client.delete_post("2").await;

        assert_eq!(client.posts(), vec![post("1", "A", "a")]);
        let requests = requests.lock().unwrap();
        assert_eq!(requests[0].method, HttpMethod::Delete);
        assert_eq!(requests[0].path, format!("{}/post/2", client.api().base_url()));
    }

    #[tokio::test]
    async fn delete_declined_keeps_list() {
        let transport = Scripted::default().reply(200, r#"{"success":false}"#);
        let (client, _) = client(transport, vec![post("1", "A", "a"), post("2", "B", "b")]);

        client.delete_post("2").await;

        assert_eq!(client.posts().len(), 2);
    }

    #[tokio::test]
    async fn delete_decode_failure_keeps_list() {
        let transport = Scripted::default().reply(200, r#"{"deleted":true}"#);
        let (client, _) = client(transport, vec![post("1", "A", "a")]);

        client.delete_post("1").await;

        assert_eq!(client.posts(), vec![post("1", "A", "a")]);
    }

    #[tokio::test]
    async fn add_returns_created_post_without_touching_list() {
        let transport = Scripted::default()
            .reply(201, r#"{"id":"5","userId":1,"title":"T","body":"B","createdAt":"now"}"#);
        let (client, _) = client(transport, vec![post("1", "A", "a")]);
        let mut rx = client.subscribe();
        rx.borrow_and_update();

        let created = client.add_post(&Post::draft("T", "B")).await.unwrap();

        assert_eq!(created.id.as_deref(), Some("5"));
        // The created post only appears after the next fetch.
        assert!(!rx.has_changed().unwrap());
        assert_eq!(client.posts(), vec![post("1", "A", "a")]);
    }

    #[tokio::test]
    async fn add_surfaces_http_errors() {
        let transport = Scripted::default().reply(500, "internal error");
        let (client, _) = client(transport, vec![post("1", "A", "a")]);

        let err = client.add_post(&Post::draft("T", "B")).await.unwrap_err();

        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
        assert_eq!(client.posts(), vec![post("1", "A", "a")]);
    }

    #[tokio::test]
    async fn add_rejects_empty_fields_without_a_request() {
        let (client, requests) = client(Scripted::default(), Vec::new());

        let err = client.add_post(&Post::draft("", "B")).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidPost(_)));
        let err = client.add_post(&Post::draft("T", "")).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidPost(_)));

        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_ids_never_reach_the_network() {
        let (client, requests) = client(Scripted::default(), vec![post("1", "A", "a")]);

        client.update_post("", "B", "b").await;
        client.delete_post("").await;

        assert!(requests.lock().unwrap().is_empty());
        assert_eq!(client.posts(), vec![post("1", "A", "a")]);
    }
}
