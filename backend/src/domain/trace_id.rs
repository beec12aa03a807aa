//! Trace identifier that ties a request's log lines, error payloads and
//! `trace-id` response header together.
//!
//! The [`Trace`](crate::middleware::Trace) middleware mints one per request
//! and runs the handler inside [`TraceId::scope`]. Domain errors pick it up
//! through [`TraceId::current`]. Work spawned off the request task, such as
//! analytics delivery, loses task-local state, so it is wrapped with
//! [`TraceId::bind_current`] before being handed to `tokio::spawn`.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use futures_util::future::Either;
use tokio::task_local;
use uuid::Uuid;

/// Response header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static TRACE_ID: TraceId;
}

/// Per-request correlation identifier.
///
/// # Examples
/// ```
/// use devevent::TraceId;
///
/// async fn handler() {
///     if let Some(id) = TraceId::current() {
///         tracing::info!(trace_id = %id, "handling request");
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Mint a fresh identifier for an incoming request.
    #[must_use]
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The identifier of the request being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` as the current identifier.
    ///
    /// # Examples
    /// ```
    /// use devevent::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
    /// let trace_id: TraceId = "00000000-0000-0000-0000-000000000000"
    ///     .parse()
    ///     .expect("valid UUID");
    /// let observed = TraceId::scope(trace_id, async { TraceId::current() }).await;
    /// assert_eq!(observed, Some(trace_id));
    /// # });
    /// ```
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }

    /// Carry the current identifier, if any, into a future that will run on
    /// another task.
    pub fn bind_current<Fut>(fut: Fut) -> impl Future<Output = Fut::Output>
    where
        Fut: Future,
    {
        match Self::current() {
            Some(trace_id) => Either::Left(TRACE_ID.scope(trace_id, fut)),
            None => Either::Right(fut),
        }
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn current_reflects_scope() {
        let expected = TraceId::generate();
        let observed = TraceId::scope(expected, async { TraceId::current() }).await;
        assert_eq!(observed, Some(expected));
    }

    #[tokio::test]
    async fn current_is_none_outside_a_request() {
        assert!(TraceId::current().is_none());
    }

    #[tokio::test]
    async fn spawned_work_keeps_the_request_id_when_bound() {
        let expected = TraceId::generate();
        let (bound, unbound) = TraceId::scope(expected, async {
            let bound = tokio::spawn(TraceId::bind_current(async { TraceId::current() }));
            let unbound = tokio::spawn(async { TraceId::current() });
            (bound.await, unbound.await)
        })
        .await;

        assert_eq!(bound.expect("task joins"), Some(expected));
        assert_eq!(unbound.expect("task joins"), None);
    }

    #[tokio::test]
    async fn bind_current_is_transparent_without_a_request() {
        let observed = TraceId::bind_current(async { TraceId::current() }).await;
        assert!(observed.is_none());
    }

    #[test]
    fn parses_hyphenated_uuid() {
        let trace_id: TraceId = "00000000-0000-0000-0000-000000000000"
            .parse()
            .expect("parse uuid");
        assert_eq!(trace_id.to_string(), Uuid::nil().to_string());
    }
}
