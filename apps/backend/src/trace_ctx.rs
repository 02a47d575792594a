//! Task-local trace id for the request being handled.
//!
//! `RequestTrace` scopes the id around each request so problem+json bodies
//! and the `x-trace-id` header agree. Only the web boundary reads it; the
//! domain and services never do.

use tokio::task_local;

const UNKNOWN: &str = "unknown";

task_local! {
    static TRACE_ID: String;
}

/// The current request's trace id, or `"unknown"` outside a request scope
/// (websocket frames, the janitor, startup).
pub fn trace_id() -> String {
    current().unwrap_or_else(|| UNKNOWN.to_string())
}

pub fn current() -> Option<String> {
    TRACE_ID.try_with(Clone::clone).ok()
}

/// Run `future` with `trace_id` as the task's trace id.
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}
