//! A stand-in for the API server, for tests of the pages and of the front ends.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use sekai_api::{
    ApiClient, ApiError, DeleteFileRequest, MemoryTokenStore, RpcRequest, Transport, UploadRequest,
};
use serde_json::Value;

use crate::{
    pages::PageContext,
    route::{Navigator, Route},
};

/// A [`Transport`] that answers from a script and records every request.
///
/// Replies are queued per method name (e.g. `"GetArtists"`); a method with nothing queued
/// answers `{}`, which decodes to the empty response of every call.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<&'static str, VecDeque<Result<Value, ApiError>>>>,
    calls: Mutex<Vec<RpcRequest>>,
    uploads: Mutex<Vec<UploadRequest>>,
    deletions: Mutex<Vec<DeleteFileRequest>>,
    fail_deletions: bool,
    latency: Option<Duration>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply for `method`.
    #[must_use]
    pub fn reply(self, method: &'static str, body: Value) -> Self {
        self.push(method, Ok(body));
        self
    }

    /// Queue a failure for `method`.
    #[must_use]
    pub fn fail(self, method: &'static str, error: ApiError) -> Self {
        self.push(method, Err(error));
        self
    }

    /// Make every file deletion fail.
    #[must_use]
    pub const fn failing_deletions(mut self) -> Self {
        self.fail_deletions = true;
        self
    }

    /// Delay every unary call by `latency`.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queue a reply on a transport that is already in use.
    pub fn push(&self, method: &'static str, reply: Result<Value, ApiError>) {
        lock(&self.replies).entry(method).or_default().push_back(reply);
    }

    /// Every unary call made so far.
    #[must_use]
    pub fn calls(&self) -> Vec<RpcRequest> {
        lock(&self.calls).clone()
    }

    /// Method names of the calls made so far, in order.
    #[must_use]
    pub fn methods(&self) -> Vec<&'static str> {
        lock(&self.calls)
            .iter()
            .map(|call| call.procedure.method)
            .collect()
    }

    /// Request bodies of the calls made to `method`.
    #[must_use]
    pub fn bodies(&self, method: &str) -> Vec<Value> {
        lock(&self.calls)
            .iter()
            .filter(|call| call.procedure.method == method)
            .map(|call| call.body.clone())
            .collect()
    }

    #[must_use]
    pub fn uploads(&self) -> Vec<UploadRequest> {
        lock(&self.uploads).clone()
    }

    #[must_use]
    pub fn deletions(&self) -> Vec<DeleteFileRequest> {
        lock(&self.deletions).clone()
    }
}

impl Transport for MockTransport {
    async fn unary(&self, request: RpcRequest) -> Result<Value, ApiError> {
        let method = request.procedure.method;
        lock(&self.calls).push(request);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        lock(&self.replies)
            .get_mut(method)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(Value::Object(serde_json::Map::new())))
    }

    async fn upload(&self, request: UploadRequest) -> Result<String, ApiError> {
        let url = format!("http://localhost:8080/image?id={}", request.file_name);
        lock(&self.uploads).push(request);
        Ok(url)
    }

    async fn delete_file(&self, request: DeleteFileRequest) -> Result<(), ApiError> {
        lock(&self.deletions).push(request);
        if self.fail_deletions {
            return Err(ApiError::status(
                sekai_api::Code::Unavailable,
                "storage unavailable",
            ));
        }
        Ok(())
    }
}

/// A page context over `transport`, with an in-memory session and no redirect delay.
///
/// The auth failure hook of the client navigates to [`Route::Login`], as in the real front ends.
#[must_use]
pub fn context(transport: MockTransport, token: Option<&str>) -> PageContext<MockTransport> {
    let session = Arc::new(token.map_or_else(MemoryTokenStore::new, MemoryTokenStore::with_token));
    let navigator = Navigator::new(Route::Top);
    let api = ApiClient::new(transport, session).with_auth_failure_hook(navigator.auth_failure_hook());
    PageContext::new(api, navigator, Duration::ZERO)
}
