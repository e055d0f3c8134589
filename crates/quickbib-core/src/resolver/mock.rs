//! Mock resolver for testing.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{ResolveError, ResolveFuture, Resolver};

/// A configurable mock response for [`MockResolver`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Return this record text.
    Record(String),
    /// Return empty text ("nothing found").
    Empty,
    /// Fail with this message.
    Error(String),
    /// Panic inside the resolve future.
    Panic(String),
}

/// A hand-rolled mock implementing [`Resolver`] for tests.
///
/// Supports:
/// - A fixed response (used for every call), **or**
/// - A sequence of responses (one per call, repeating the last if exhausted).
/// - Optional per-call latency.
/// - Call counting and the identifiers seen, in call order.
pub struct MockResolver {
    /// Pending responses, stored reversed so `pop()` yields the next one.
    responses: Mutex<Vec<MockResponse>>,
    fallback: MockResponse,
    delay: Option<Duration>,
    call_count: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl MockResolver {
    /// Create a mock that always returns `response`.
    pub fn new(response: MockResponse) -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            fallback: response,
            delay: None,
            call_count: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that returns responses in order, repeating the last one.
    pub fn with_sequence(mut responses: Vec<MockResponse>) -> Self {
        assert!(
            !responses.is_empty(),
            "sequence must have at least one response"
        );
        let fallback = responses[responses.len() - 1].clone();
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
            fallback,
            delay: None,
            call_count: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Set simulated network latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// How many times `resolve()` has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Identifiers passed to `resolve()`, in call order.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }

    fn next_response(&self) -> MockResponse {
        match self.responses.lock() {
            Ok(mut seq) => seq.pop().unwrap_or_else(|| self.fallback.clone()),
            Err(_) => self.fallback.clone(),
        }
    }
}

impl Resolver for MockResolver {
    fn name(&self) -> &str {
        "mock"
    }

    fn resolve<'a>(&'a self, identifier: &'a str) -> ResolveFuture<'a> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(identifier.to_string());
        }
        let response = self.next_response();
        let delay = self.delay;

        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }

            match response {
                MockResponse::Record(text) => Ok(text),
                MockResponse::Empty => Ok(String::new()),
                MockResponse::Error(msg) => Err(ResolveError::Other(msg)),
                MockResponse::Panic(msg) => panic!("{}", msg),
            }
        })
    }
}
