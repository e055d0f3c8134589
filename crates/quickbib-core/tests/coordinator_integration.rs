//! Integration tests for the [`FetchCoordinator`].
//!
//! All lookups go through mock resolvers, so no HTTP requests are made.

use std::sync::Arc;
use std::time::Duration;

use quickbib_core::resolver::mock::{MockResolver, MockResponse};
use quickbib_core::resolver::{ResolveError, ResolveFuture, Resolver};
use quickbib_core::{
    FetchCoordinator, LookupCompletion, LookupRequest, LookupResult, ResultSink, StatusKind,
};
use tokio::sync::mpsc;

/// Sleeps for the number of milliseconds given as the identifier, then echoes it.
struct SleepyResolver;

impl Resolver for SleepyResolver {
    fn name(&self) -> &str {
        "sleepy"
    }

    fn resolve<'a>(&'a self, identifier: &'a str) -> ResolveFuture<'a> {
        Box::pin(async move {
            let ms: u64 = identifier
                .parse()
                .map_err(|_| ResolveError::Other(format!("bad delay {identifier}")))?;
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Ok(format!("@misc{{delay{ms},}}"))
        })
    }
}

/// Validates the identifier before building its future, panicking on bad input.
struct EagerPanicResolver;

impl Resolver for EagerPanicResolver {
    fn name(&self) -> &str {
        "eager"
    }

    fn resolve<'a>(&'a self, identifier: &'a str) -> ResolveFuture<'a> {
        let n: u32 = identifier.parse().expect("numeric identifier");
        Box::pin(async move { Ok(format!("@misc{{n{n},}}")) })
    }
}

async fn recv(rx: &mut mpsc::UnboundedReceiver<LookupCompletion>) -> LookupCompletion {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("completion within 5s")
        .expect("channel open")
}

#[tokio::test]
async fn each_submit_reports_exactly_once() {
    let resolver = Arc::new(MockResolver::new(MockResponse::Record(
        "@article{x,}".into(),
    )));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let coordinator = FetchCoordinator::new(resolver.clone(), tx);

    let id = coordinator.submit(LookupRequest::new("10.1000/x"));
    let completion = recv(&mut rx).await;
    assert_eq!(completion.id, id);
    assert_eq!(
        completion.result,
        LookupResult::Found {
            bibtex: "@article{x,}".into()
        }
    );

    coordinator.shutdown().await;
    drop(coordinator);
    assert!(rx.recv().await.is_none(), "no second completion");
    assert_eq!(resolver.call_count(), 1);
}

#[tokio::test]
async fn concurrent_submits_both_report() {
    let resolver = Arc::new(
        MockResolver::with_sequence(vec![
            MockResponse::Record("@misc{a,}".into()),
            MockResponse::Record("@misc{b,}".into()),
        ])
        .with_delay(Duration::from_millis(20)),
    );
    let (tx, mut rx) = mpsc::unbounded_channel();
    let coordinator = FetchCoordinator::new(resolver.clone(), tx);

    let first = coordinator.submit(LookupRequest::new("a"));
    let second = coordinator.submit(LookupRequest::new("b"));
    assert!(coordinator.in_flight() <= 2);

    let mut ids = vec![recv(&mut rx).await.id, recv(&mut rx).await.id];
    ids.sort();
    assert_eq!(ids, vec![first, second]);
    assert_eq!(resolver.call_count(), 2);
}

#[tokio::test]
async fn completions_arrive_in_completion_order() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let coordinator = FetchCoordinator::new(Arc::new(SleepyResolver), tx);

    let slow = coordinator.submit(LookupRequest::new("300"));
    let fast = coordinator.submit(LookupRequest::new("0"));

    let a = recv(&mut rx).await;
    let b = recv(&mut rx).await;
    assert_eq!(a.id, fast);
    assert_eq!(b.id, slow);

    // The display ends up showing whichever completed last.
    let mut sink = ResultSink::new();
    sink.on_result(a.result);
    sink.on_result(b.result);
    assert_eq!(sink.citation(), "@misc{delay300,}");
}

#[tokio::test]
async fn empty_record_is_not_found() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let coordinator = FetchCoordinator::new(Arc::new(MockResolver::new(MockResponse::Empty)), tx);

    coordinator.submit(LookupRequest::new("10.1000/unknown"));
    let completion = recv(&mut rx).await;
    assert_eq!(completion.result, LookupResult::NotFound);

    let mut sink = ResultSink::new();
    sink.on_result(completion.result);
    assert_eq!(sink.status_kind(), StatusKind::NotFound);
}

#[tokio::test]
async fn resolver_error_is_reported_with_message() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let coordinator = FetchCoordinator::new(
        Arc::new(MockResolver::new(MockResponse::Error("timeout".into()))),
        tx,
    );

    coordinator.submit(LookupRequest::new("10.1000/slow"));
    let completion = recv(&mut rx).await;
    assert_eq!(
        completion.result,
        LookupResult::Errored {
            message: "timeout".into()
        }
    );
}

#[tokio::test]
async fn panicking_resolver_still_reports() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let coordinator = FetchCoordinator::new(
        Arc::new(MockResolver::new(MockResponse::Panic("kaboom".into()))),
        tx,
    );

    coordinator.submit(LookupRequest::new("10.1000/x"));
    let completion = recv(&mut rx).await;
    assert!(matches!(
        completion.result,
        LookupResult::Errored { ref message } if message.contains("kaboom")
    ));
}

#[tokio::test]
async fn panic_before_first_poll_still_reports() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let coordinator = FetchCoordinator::new(Arc::new(EagerPanicResolver), tx);

    let id = coordinator.submit(LookupRequest::new("not-a-number"));
    let completion = recv(&mut rx).await;
    assert_eq!(completion.id, id);
    assert!(matches!(
        completion.result,
        LookupResult::Errored { ref message } if message.contains("numeric identifier")
    ));

    // The coordinator keeps serving after the panic.
    coordinator.submit(LookupRequest::new("7"));
    assert_eq!(
        recv(&mut rx).await.result,
        LookupResult::Found {
            bibtex: "@misc{n7,}".into()
        }
    );
}

#[tokio::test]
async fn inline_lookup_catches_panic_before_first_poll() {
    let result = quickbib_core::lookup(&EagerPanicResolver, &LookupRequest::new("x")).await;
    assert!(matches!(result, LookupResult::Errored { .. }));
}

#[tokio::test]
async fn dropped_receiver_does_not_crash_worker() {
    let (tx, rx) = mpsc::unbounded_channel();
    let resolver = Arc::new(
        MockResolver::new(MockResponse::Record("@misc{x,}".into()))
            .with_delay(Duration::from_millis(10)),
    );
    let coordinator = FetchCoordinator::new(resolver.clone(), tx);

    coordinator.submit(LookupRequest::new("10.1000/x"));
    drop(rx);
    coordinator.shutdown().await;

    assert_eq!(resolver.call_count(), 1);
    assert_eq!(coordinator.in_flight(), 0);
}

#[test]
fn coordinator_works_from_outside_the_runtime() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let coordinator = FetchCoordinator::with_handle(
        Arc::new(MockResolver::new(MockResponse::Record("@misc{x,}".into()))),
        tx,
        runtime.handle().clone(),
    );

    let id = coordinator.submit(LookupRequest::new("10.1000/x"));
    let completion = rx.blocking_recv().expect("completion");
    assert_eq!(completion.id, id);
    assert!(completion.result.is_found());
}
