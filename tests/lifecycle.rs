//! End-to-end lifecycle tests
//!
//! Exercises the manager through its public surface only: add streams, let
//! workers run against in-memory sources, query snapshots, stop streams.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use streamlens::analysis::{ResultFields, StepRegistry};
use streamlens::source::{Frame, MemorySource};
use streamlens::{AddStreamRequest, Error, ManagerConfig, StreamManager, StreamStatus};

const FAST: Duration = Duration::from_millis(2);

fn request(id: &str, path: &str, models: Vec<&str>) -> AddStreamRequest {
    AddStreamRequest {
        stream_id: Some(id.to_string()),
        path: Some(path.to_string()),
        models: Some(models.into_iter().map(String::from).collect()),
    }
}

/// Deterministic stand-in for the defect model: every frame with an odd
/// index is a defect.
fn test_registry() -> StepRegistry {
    let mut steps = StepRegistry::new();
    steps.register_with_alert(
        "defect_analysis",
        |f: &Frame| {
            let defects = if f.index % 2 == 1 { 1 } else { 0 };
            let mut fields = ResultFields::new();
            fields.insert("defects".to_string(), json!(defects));
            fields.insert("frame".to_string(), json!(f.index));
            Ok(fields)
        },
        |stream_id: &str, fields: &ResultFields| {
            let defects = fields.get("defects").and_then(|v| v.as_i64()).unwrap_or(0);
            (defects > 0).then(|| format!("Defect detected in {}!", stream_id))
        },
    );
    steps
}

fn manager(source: MemorySource) -> StreamManager {
    StreamManager::new(
        ManagerConfig::default().pacing(FAST),
        Arc::new(source),
        Arc::new(test_registry()),
    )
}

/// Poll until `predicate` holds or the deadline passes.
async fn wait_for<F, Fut>(mut predicate: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        if predicate().await {
            return;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not reached in time"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

#[tokio::test]
async fn three_frame_stream_runs_to_completion() {
    let manager = manager(MemorySource::new().with_frames("cam1", 3));

    manager
        .add_stream(request("cam1", "cam1", vec!["defect_analysis"]))
        .await
        .unwrap();
    manager.join_stream("cam1").await;

    let streams = manager.list_streams().await;
    assert_eq!(streams["cam1"].status, StreamStatus::Stopped);
    assert_eq!(streams["cam1"].path, "cam1");
    assert_eq!(streams["cam1"].steps, vec!["defect_analysis"]);

    // The last published record, not an accumulation of all three
    let results = manager.list_results().await;
    assert_eq!(results["cam1"]["defect_analysis"]["frame"], json!(2));
    assert_eq!(results["cam1"]["defect_analysis"]["defects"], json!(0));

    // No further publishes after exhaustion
    let stats = manager.stream_stats("cam1").await.unwrap();
    assert_eq!(stats.frames_processed, 3);
    tokio::time::sleep(FAST * 5).await;
    let stats = manager.stream_stats("cam1").await.unwrap();
    assert_eq!(stats.frames_processed, 3);
}

#[tokio::test]
async fn results_appear_promptly_for_live_stream() {
    let manager = manager(MemorySource::new().with_endless("cam1"));

    manager
        .add_stream(request("cam1", "cam1", vec!["defect_analysis"]))
        .await
        .unwrap();

    let m = &manager;
    wait_for(|| async move { m.list_results().await.contains_key("cam1") }).await;

    let results = manager.list_results().await;
    assert!(!results["cam1"]["defect_analysis"].is_empty());

    manager.stop_stream("cam1").await.unwrap();
    manager.join_stream("cam1").await;
}

#[tokio::test]
async fn alerts_name_the_stream() {
    // Two frames: index 1 is a defect, so the final iteration alerts
    let manager = manager(MemorySource::new().with_frames("cam1", 2));

    manager
        .add_stream(request("cam1", "cam1", vec!["defect_analysis"]))
        .await
        .unwrap();
    manager.join_stream("cam1").await;

    let alerts = manager.list_alerts().await;
    assert_eq!(alerts["cam1"], vec!["Defect detected in cam1!".to_string()]);
}

#[tokio::test]
async fn stopping_one_stream_leaves_others_alone() {
    let source = MemorySource::new().with_endless("a").with_endless("b");
    let manager = manager(source);

    manager
        .add_stream(request("a", "a", vec!["defect_analysis"]))
        .await
        .unwrap();
    manager
        .add_stream(request("b", "b", vec!["defect_analysis"]))
        .await
        .unwrap();

    let m = &manager;
    wait_for(|| async move {
        let results = m.list_results().await;
        results.contains_key("a") && results.contains_key("b")
    })
    .await;

    manager.stop_stream("a").await.unwrap();
    manager.join_stream("a").await;

    let streams = manager.list_streams().await;
    assert_eq!(streams["a"].status, StreamStatus::Stopped);
    assert_eq!(streams["b"].status, StreamStatus::Running);

    // B keeps publishing after A stopped
    let before = manager.stream_stats("b").await.unwrap().frames_processed;
    wait_for(|| async move {
        m.stream_stats("b").await.unwrap().frames_processed > before
    })
    .await;

    manager.stop_stream("b").await.unwrap();
    manager.join_stream("b").await;
}

#[tokio::test]
async fn concurrent_adds_of_same_id_admit_one() {
    let manager = Arc::new(manager(MemorySource::new().with_endless("cam1")));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let manager = Arc::clone(&manager);
        handles.push(tokio::spawn(async move {
            manager
                .add_stream(request("cam1", "cam1", vec!["defect_analysis"]))
                .await
                .is_ok()
        }));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);

    let streams = manager.list_streams().await;
    assert_eq!(streams.len(), 1);

    manager.stop_stream("cam1").await.unwrap();
    manager.join_stream("cam1").await;
}

#[tokio::test]
async fn query_shapes_serialize_to_the_contract() {
    let manager = manager(MemorySource::new().with_frames("cam1", 1));

    manager
        .add_stream(request("cam1", "clip.mp4", vec!["defect_analysis"]))
        .await
        .unwrap();
    manager.join_stream("cam1").await;

    let streams = serde_json::to_value(manager.list_streams().await).unwrap();
    assert_eq!(
        streams["cam1"],
        json!({
            "path": "clip.mp4",
            "models": ["defect_analysis"],
            "status": "stopped",
        })
    );

    let results = serde_json::to_value(manager.list_results().await).unwrap();
    assert_eq!(results["cam1"]["defect_analysis"]["defects"], json!(0));
}

#[tokio::test]
async fn errors_carry_contract_messages() {
    let manager = manager(MemorySource::new());

    let err = manager.add_stream(AddStreamRequest::default()).await.unwrap_err();
    assert_eq!(err.to_string(), "Missing required keys");

    let err = manager.stop_stream("ghost").await.unwrap_err();
    assert_eq!(err.to_string(), "Stream not found: ghost");

    manager
        .add_stream(request("cam1", "nowhere", vec![]))
        .await
        .unwrap();
    let err = manager
        .add_stream(request("cam1", "nowhere", vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(_)));
    assert_eq!(err.to_string(), "Stream ID already exists: cam1");

    manager.join_stream("cam1").await;
}
