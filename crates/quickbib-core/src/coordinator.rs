//! Runs lookups off the interactive context and reports each outcome once.
//!
//! Every `submit` spawns one worker task on the coordinator's runtime. The
//! worker calls the resolver exactly once, classifies the outcome, sends a
//! single [`LookupCompletion`] and exits. Workers are tracked by the
//! coordinator until they finish; there is no cancellation and no timeout
//! here (the resolver owns its timeouts).

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::FutureExt;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::task::TaskTracker;

use crate::resolver::Resolver;
use crate::{LookupCompletion, LookupRequest, LookupResult};

/// Resolve `request` inline. Never fails: errors and panics become `Errored`.
pub async fn lookup(resolver: &dyn Resolver, request: &LookupRequest) -> LookupResult {
    // The call itself goes inside the caught future: a resolver may panic
    // while building its future, before the first poll.
    let outcome = AssertUnwindSafe(async { resolver.resolve(&request.identifier).await })
        .catch_unwind()
        .await;
    match outcome {
        Ok(outcome) => LookupResult::from_outcome(outcome),
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(resolver = resolver.name(), %message, "resolver panicked");
            LookupResult::Errored { message }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "resolver panicked".to_string()
    }
}

fn outcome_label(result: &LookupResult) -> &'static str {
    match result {
        LookupResult::Found { .. } => "found",
        LookupResult::NotFound => "not_found",
        LookupResult::Errored { .. } => "errored",
    }
}

/// Accepts lookup requests and delivers one [`LookupCompletion`] per request
/// on the channel given at construction.
pub struct FetchCoordinator {
    resolver: Arc<dyn Resolver>,
    tx: mpsc::UnboundedSender<LookupCompletion>,
    tracker: TaskTracker,
    handle: Handle,
    next_id: AtomicU64,
}

impl FetchCoordinator {
    /// Create a coordinator spawning onto the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime, like `tokio::spawn`.
    pub fn new(resolver: Arc<dyn Resolver>, tx: mpsc::UnboundedSender<LookupCompletion>) -> Self {
        Self::with_handle(resolver, tx, Handle::current())
    }

    /// Create a coordinator spawning onto `handle`, for callers that live
    /// outside the runtime (e.g. a blocking UI thread).
    pub fn with_handle(
        resolver: Arc<dyn Resolver>,
        tx: mpsc::UnboundedSender<LookupCompletion>,
        handle: Handle,
    ) -> Self {
        Self {
            resolver,
            tx,
            tracker: TaskTracker::new(),
            handle,
            next_id: AtomicU64::new(1),
        }
    }

    /// Start resolving `request` in the background and return its id.
    ///
    /// The matching completion arrives on the channel later. Concurrent
    /// submissions each report independently, in completion order.
    pub fn submit(&self, request: LookupRequest) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let resolver = Arc::clone(&self.resolver);
        let tx = self.tx.clone();

        tracing::debug!(id, identifier = %request.identifier, "lookup submitted");

        self.tracker.spawn_on(
            async move {
                let result = lookup(resolver.as_ref(), &request).await;
                tracing::info!(
                    id,
                    identifier = %request.identifier,
                    outcome = outcome_label(&result),
                    "lookup finished"
                );
                if tx
                    .send(LookupCompletion {
                        id,
                        request,
                        result,
                    })
                    .is_err()
                {
                    tracing::debug!(id, "receiver gone, dropping lookup result");
                }
            },
            &self.handle,
        );

        id
    }

    /// Number of workers that have not yet delivered their result.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Wait for every outstanding worker to deliver its result.
    pub async fn shutdown(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}
