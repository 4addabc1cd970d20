//! End-to-end launches against a local axum collector.

use axum::{body::Bytes, extract::State, http::StatusCode, routing::post, Router};
use event_dispatch::{DispatchSettings, RetryPolicy};
use event_generator::{EventName, EventRecord, SchemaKind, SchemaOptions};
use launcher_engine::{Coordinator, IncompleteRun, LaunchConfig, TerminationMode};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Default)]
struct Collector {
    received: AtomicU64,
    client_ids: Mutex<HashSet<String>>,
    event_names: Mutex<HashSet<EventName>>,
    /// Reject every n-th request with 500
    reject_every: Option<u64>,
}

async fn collect(State(state): State<Arc<Collector>>, body: Bytes) -> StatusCode {
    let n = state.received.fetch_add(1, Ordering::SeqCst) + 1;
    let Ok(event) = serde_json::from_slice::<EventRecord>(&body) else {
        return StatusCode::BAD_REQUEST;
    };
    state.client_ids.lock().unwrap().insert(event.client_id);
    state.event_names.lock().unwrap().insert(event.event_name);

    match state.reject_every {
        Some(k) if n % k == 0 => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::OK,
    }
}

async fn start_collector(reject_every: Option<u64>) -> anyhow::Result<(String, Arc<Collector>)> {
    let state = Arc::new(Collector {
        reject_every,
        ..Default::default()
    });
    let app = Router::new()
        .route("/api/analytics/collect", post(collect))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give server time to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    Ok((format!("http://{addr}/api/analytics/collect"), state))
}

fn base_config(url: &str) -> LaunchConfig {
    LaunchConfig::new(url)
        .with_workers(3)
        .with_batch_size(20)
        .with_concurrency(2)
        .with_seed(2024)
        .with_report_timeout(Some(Duration::from_secs(60)))
}

#[tokio::test(flavor = "multi_thread")]
async fn test_count_mode_delivers_exact_total() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .try_init();

    let (url, collector) = start_collector(None).await.unwrap();
    let config = base_config(&url)
        .with_termination(TerminationMode::Count { total: 301 })
        .with_schema(
            SchemaKind::ShoppingMall,
            SchemaOptions {
                client_pool_size: 10,
                client_reuse_probability: None,
            },
        );

    let report = Coordinator::new(config).unwrap().run().await.unwrap();

    // 301 / 3 floors to 100 per worker
    assert!(report.is_complete());
    assert_eq!(report.total_sent, 300);
    assert_eq!(report.total_ok, 300);
    assert_eq!(report.total_fail, 0);
    assert_eq!(collector.received.load(Ordering::SeqCst), 300);
    assert!(report.workers.iter().all(|w| w.sent == 100));

    // 70% of ids come from three pools of 10
    let unique = collector.client_ids.lock().unwrap().len();
    assert!(unique < 200, "expected reuse, got {unique} unique ids");
    assert!(collector.event_names.lock().unwrap().len() > 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_failures_are_counted() {
    let (url, collector) = start_collector(Some(4)).await.unwrap();
    let config = base_config(&url)
        .with_termination(TerminationMode::Count { total: 120 })
        .with_dispatch(DispatchSettings {
            retry: RetryPolicy::none(),
            ..Default::default()
        });

    let report = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(report.total_ok + report.total_fail, 120);
    assert_eq!(report.total_fail, 30);
    assert_eq!(collector.received.load(Ordering::SeqCst), 120);
    assert_eq!(report.success_rate, Some(0.75));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_duration_mode_runs_for_duration() {
    let (url, collector) = start_collector(None).await.unwrap();
    let config = base_config(&url)
        .with_workers(2)
        .with_termination(TerminationMode::Duration(Duration::from_millis(300)));

    let report = Coordinator::new(config).unwrap().run().await.unwrap();

    assert!(report.is_complete());
    assert!(report.wall_clock_duration_secs >= 0.3);
    for worker in &report.workers {
        assert!(worker.sent > 0);
        assert_eq!(worker.sent % 40, 0);
        assert!(worker.duration_ms >= 300);
    }
    assert_eq!(
        collector.received.load(Ordering::SeqCst),
        report.total_ok + report.total_fail
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fire_and_forget_auto_click() {
    let (url, collector) = start_collector(None).await.unwrap();
    let config = base_config(&url)
        .with_termination(TerminationMode::Count { total: 150 })
        .with_schema(SchemaKind::AutoClick, SchemaOptions::default())
        .with_track_outcomes(false);

    let report = Coordinator::new(config).unwrap().run().await.unwrap();

    assert!(!report.tracked);
    assert_eq!(report.total_sent, 150);
    assert_eq!(report.total_ok, 0);
    assert_eq!(report.success_rate, None);
    // in-flight sends are drained before workers report
    assert_eq!(collector.received.load(Ordering::SeqCst), 150);
    assert_eq!(
        *collector.event_names.lock().unwrap(),
        HashSet::from([EventName::AutoClick])
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_endpoint_counts_failures() {
    // Nothing listens on the discard port.
    let config = LaunchConfig::new("http://127.0.0.1:9/collect")
        .with_workers(2)
        .with_batch_size(5)
        .with_concurrency(1)
        .with_termination(TerminationMode::Count { total: 10 })
        .with_dispatch(DispatchSettings {
            retry: RetryPolicy {
                backoff: Duration::from_millis(1),
                ..RetryPolicy::default()
            },
            ..Default::default()
        });

    let report = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(report.total_ok, 0);
    assert_eq!(report.total_fail, 10);
    assert_eq!(report.success_rate, Some(0.0));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_transport_reports_missing_workers() {
    let config = base_config("http://127.0.0.1:9/collect")
        .with_termination(TerminationMode::Count { total: 30 });

    let err = Coordinator::new(config)
        .unwrap()
        .run_with(|worker_id, config: &LaunchConfig| -> anyhow::Result<event_dispatch::HttpTransport> {
            anyhow::bail!("worker {worker_id} refused to start for {}", config.endpoint)
        })
        .await
        .unwrap_err();

    let incomplete = err.downcast_ref::<IncompleteRun>().unwrap();
    assert_eq!(incomplete.missing, vec![1, 2, 3]);
    assert_eq!(incomplete.report.reported_workers, 0);
}
