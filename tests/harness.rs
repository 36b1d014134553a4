//! Harness behavior against live local servers.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use blockbench::app::{self, AppState, Settings};
use blockbench::harness::{Caller, Endpoint, HarnessError};
use blockbench::{Json, Request, Response, Router, Status};
use serde_json::json;

use common::{Captured, Event, TestServer, harness_config, refused_base_url};

async fn ok(_req: Request) -> Response {
    Response::text("ok")
}

async fn slow_ok(_req: Request) -> Response {
    tokio::time::sleep(Duration::from_millis(50)).await;
    Response::text("ok")
}

fn endpoint(s: &str) -> Endpoint {
    s.parse().unwrap()
}

// ── Bounded Concurrent Caller ────────────────────────────────────────────────

#[tokio::test]
async fn always_succeeding_endpoint_counts_every_call() {
    let server = TestServer::start(Router::new().get("/ok", ok)).await;

    for (n, c) in [(0, 1), (1, 1), (7, 3), (10, 10), (4, 16)] {
        let caller = Caller::new(&harness_config(&server.url(""), n, c)).unwrap();
        let result = caller.run(&endpoint("ok")).await;
        assert_eq!(result.requests_sent(), n);
        assert_eq!(result.requests_succeeded(), n, "N={n} C={c}");
        assert_eq!(result.failures().total(), 0);
    }

    server.stop().await;
}

#[tokio::test]
async fn refused_connections_are_counted_not_raised() {
    let caller = Caller::new(&harness_config(&refused_base_url().await, 4, 2)).unwrap();
    let result = caller.run(&endpoint("sync-slow")).await;

    assert_eq!(result.requests_sent(), 4);
    assert_eq!(result.requests_succeeded(), 0);
    assert_eq!(result.failures().connect, 4);
    assert_eq!(result.summary_line(), "sync-slow: 0/4 succeeded");
}

#[tokio::test]
async fn non_success_status_is_a_failure() {
    let server = TestServer::start(
        Router::new().get("/flaky", |_req: Request| async { Status::ServiceUnavailable }),
    )
    .await;

    let caller = Caller::new(&harness_config(&server.url(""), 3, 3)).unwrap();
    let result = caller.run(&endpoint("flaky")).await;
    assert_eq!(result.requests_succeeded(), 0);
    assert_eq!(result.failures().status, 3);

    let result = caller.run(&endpoint("missing")).await;
    assert_eq!(result.failures().status, 3);

    server.stop().await;
}

#[tokio::test]
async fn timeouts_are_counted() {
    let server = TestServer::start(Router::new().get("/hang", |_req: Request| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Response::text("late")
    }))
    .await;

    let mut config = harness_config(&server.url(""), 2, 2);
    config.timeout_secs = 0.2;
    let result = Caller::new(&config).unwrap().run(&endpoint("hang")).await;
    assert_eq!(result.requests_succeeded(), 0);
    assert_eq!(result.failures().timeouts, 2);
}

#[tokio::test]
async fn in_flight_calls_never_exceed_the_ceiling() {
    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let entered = Arc::new(AtomicUsize::new(0));

    let router = {
        let (active, peak, entered) = (active.clone(), peak.clone(), entered.clone());
        Router::new().get("/instrumented", move |_req: Request| {
            let (active, peak, entered) = (active.clone(), peak.clone(), entered.clone());
            async move {
                entered.fetch_add(1, Ordering::SeqCst);
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(40)).await;
                active.fetch_sub(1, Ordering::SeqCst);
                Response::text("ok")
            }
        })
    };
    let server = TestServer::start(router).await;

    let caller = Caller::new(&harness_config(&server.url(""), 12, 3)).unwrap();
    let result = caller.run(&endpoint("instrumented")).await;

    assert_eq!(result.requests_succeeded(), 12);
    assert_eq!(entered.load(Ordering::SeqCst), 12);
    let peak = peak.load(Ordering::SeqCst);
    assert!(peak <= 3, "peak in-flight {peak} exceeded C=3");
    assert!(peak >= 2, "calls should overlap, peak was {peak}");

    server.stop().await;
}

// ── Progress indicator ───────────────────────────────────────────────────────

#[tokio::test]
async fn spinner_is_gone_once_the_batch_returns() {
    let server = TestServer::start(Router::new().get("/slow", slow_ok)).await;
    let captured = Captured::default();
    let caller = Caller::new(&harness_config(&server.url(""), 3, 1)).unwrap();
    let comparator = captured.comparator(caller);

    let result = comparator.run_batch(&endpoint("slow")).await;
    assert_eq!(result.requests_succeeded(), 3);

    let settled = captured.events();
    assert!(settled.iter().any(|e| is_frame(e, "Running slow")), "{settled:?}");
    assert_eq!(captured.spinner_line(), "", "{settled:?}");

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(captured.events(), settled, "spinner kept drawing");

    server.stop().await;
}

// ── Batch comparator ─────────────────────────────────────────────────────────

fn position(events: &[Event], pred: impl Fn(&Event) -> bool) -> usize {
    events.iter().position(pred).unwrap_or_else(|| panic!("no matching event in {events:?}"))
}

fn is_frame(e: &Event, label: &str) -> bool {
    matches!(e, Event::Frame(f) if f.contains(label))
}

#[tokio::test]
async fn batches_run_in_order_and_never_overlap() {
    let server = TestServer::start(Router::new().get("/a", slow_ok).get("/b", slow_ok)).await;
    let captured = Captured::default();
    let caller = Caller::new(&harness_config(&server.url(""), 2, 2)).unwrap();
    let comparator = captured.comparator(caller);

    let results = comparator.compare(&["a", "b"]).await.unwrap();
    let names: Vec<_> = results.iter().map(|r| r.endpoint_name()).collect();
    assert_eq!(names, ["a", "b"]);

    let events = captured.events();
    let last_a_frame = events.iter().rposition(|e| is_frame(e, "Running a")).unwrap();
    let a_report = position(&events, |e| matches!(e, Event::Report { text, .. } if text.contains("a: 2/2 succeeded")));
    let first_b_frame = position(&events, |e| is_frame(e, "Running b"));

    assert!(events[last_a_frame..a_report].contains(&Event::Clear), "{events:?}");
    assert!(a_report < first_b_frame);
    match &events[a_report] {
        Event::Report { spinner_line, .. } => assert_eq!(spinner_line, "", "report drawn over the spinner"),
        other => panic!("unexpected {other:?}"),
    }
    assert!(captured.stdout().contains("b: 2/2 succeeded\nb took "));

    server.stop().await;
}

#[tokio::test]
async fn quiet_report_is_pure_json() {
    let server = TestServer::start(Router::new().get("/ok", slow_ok)).await;
    let captured = Captured::default();
    let caller = Caller::new(&harness_config(&server.url(""), 2, 2)).unwrap();
    let comparator = captured.comparator(caller).quiet(true);

    let results = comparator.compare(&["ok", "ok"]).await.unwrap();
    captured.console().line(&serde_json::to_string_pretty(&results).unwrap()).unwrap();

    let report: Vec<serde_json::Value> = serde_json::from_str(&captured.stdout()).unwrap();
    assert_eq!(report.len(), 2);
    assert_eq!(report[0]["endpoint_name"], "ok");
    assert_eq!(report[0]["requests_succeeded"], 2);
    assert_eq!(report[1]["failures"]["timeouts"], 0);
    assert!(captured.events().iter().any(|e| is_frame(e, "Running ok")), "spinner still ran");

    server.stop().await;
}

#[tokio::test]
async fn malformed_endpoint_aborts_before_any_batch() {
    let hits = Arc::new(AtomicUsize::new(0));
    let router = {
        let hits = hits.clone();
        Router::new().get("/ok", move |_req: Request| {
            hits.fetch_add(1, Ordering::SeqCst);
            async { Response::text("ok") }
        })
    };
    let server = TestServer::start(router).await;
    let captured = Captured::default();
    let comparator = captured.comparator(Caller::new(&harness_config(&server.url(""), 2, 2)).unwrap());

    let err = comparator.compare(&["ok", "http://elsewhere/ok"]).await.unwrap_err();
    assert!(matches!(err, HarnessError::InvalidEndpoint(_)));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert!(captured.events().is_empty());

    let err = comparator.compare::<&str>(&[]).await.unwrap_err();
    assert!(matches!(err, HarnessError::NoEndpoints));

    server.stop().await;
}

// ── Against the demo service ─────────────────────────────────────────────────

fn demo_settings(slow_delay_ms: u64) -> Settings {
    Settings { slow_delay_ms, blocking_workers: 1, ..Settings::default() }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn exclusive_block_serializes_cooperative_block_overlaps() {
    let state = Arc::new(AppState::new(demo_settings(300)).unwrap());
    let server = TestServer::start(app::router(state)).await;

    let caller = Caller::new(&harness_config(&server.url("/api"), 5, 5)).unwrap();
    let comparator = Captured::default().comparator(caller);
    let results = comparator.compare(&["sync-slow", "async-slow"]).await.unwrap();

    let (exclusive, cooperative) = (&results[0], &results[1]);
    assert_eq!(exclusive.requests_succeeded(), 5);
    assert_eq!(cooperative.requests_succeeded(), 5);

    // ≈ N×D versus ≈ D
    assert!(exclusive.elapsed_seconds() >= 1.4, "{}", exclusive.timing_line());
    assert!(
        exclusive.elapsed_seconds() > 1.5 * cooperative.elapsed_seconds(),
        "{} vs {}",
        exclusive.timing_line(),
        cooperative.timing_line(),
    );

    server.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn passthroughs_succeed_against_a_healthy_upstream() {
    let upstream = TestServer::start(
        Router::new().get("/delay/2", |_req: Request| async { Json(json!({ "ok": true })) }),
    )
    .await;

    let settings = Settings { upstream_url: upstream.url("/delay/2"), ..demo_settings(10) };
    let server = TestServer::start(app::router(Arc::new(AppState::new(settings).unwrap()))).await;

    let captured = Captured::default();
    let caller = Caller::new(&harness_config(&server.url("/api"), 5, 5)).unwrap();
    let comparator = captured.comparator(caller);
    let results = comparator.compare(&["sync-http", "async-http"]).await.unwrap();

    assert!(results.iter().all(|r| r.requests_succeeded() == 5));
    let out = captured.stdout();
    assert!(out.contains("sync-http: 5/5 succeeded"));
    assert!(out.contains("async-http: 5/5 succeeded"));

    server.stop().await;
    upstream.stop().await;
}
