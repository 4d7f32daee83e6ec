//! Stream monitor walkthrough
//!
//! Run with: cargo run --example monitor
//!
//! Creates two streams over in-memory sources, lets their workers publish a
//! few iterations, queries the snapshots, stops one stream explicitly, and
//! lets the other exhaust naturally.
//!
//! Set RUST_LOG=streamlens=debug to watch every iteration publish.

use std::sync::Arc;
use std::time::Duration;

use streamlens::analysis::StepRegistry;
use streamlens::source::MemorySource;
use streamlens::{AddStreamRequest, ManagerConfig, StreamManager};

fn add_request(id: &str, path: &str, models: &[&str]) -> AddStreamRequest {
    AddStreamRequest {
        stream_id: Some(id.to_string()),
        path: Some(path.to_string()),
        models: Some(models.iter().map(|s| s.to_string()).collect()),
    }
}

#[tokio::main]
async fn main() -> streamlens::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "streamlens=info".into()),
        )
        .init();

    let source = Arc::new(
        MemorySource::new()
            .with_endless("rtsp://cam1")
            .with_frames("clip.mp4", 5),
    );
    let steps = Arc::new(StepRegistry::with_builtins());
    let config = ManagerConfig::default().pacing(Duration::from_millis(500));
    let manager = StreamManager::new(config, source, steps);

    let ack = manager
        .add_stream(add_request(
            "cam1",
            "rtsp://cam1",
            &["asset_detection", "defect_analysis"],
        ))
        .await?;
    println!("{}: {}", ack.id, ack.message);

    let ack = manager
        .add_stream(add_request("clip", "clip.mp4", &["asset_detection"]))
        .await?;
    println!("{}: {}", ack.id, ack.message);

    // Watch a few iterations land
    for _ in 0..4 {
        tokio::time::sleep(Duration::from_secs(1)).await;

        println!(
            "streams: {}",
            serde_json::to_string_pretty(&manager.list_streams().await).unwrap()
        );
        println!(
            "results: {}",
            serde_json::to_string_pretty(&manager.list_results().await).unwrap()
        );
        println!(
            "alerts:  {}",
            serde_json::to_string_pretty(&manager.list_alerts().await).unwrap()
        );
    }

    // Explicit stop for the endless camera; the clip exhausts on its own
    let ack = manager.stop_stream("cam1").await?;
    println!("{}", ack.message);

    manager.join_stream("cam1").await;
    manager.join_stream("clip").await;

    for (id, descriptor) in manager.list_streams().await {
        let stats = manager.stream_stats(&id).await.unwrap();
        println!(
            "{}: status={} frames={} alerts={}",
            id, descriptor.status, stats.frames_processed, stats.alerts_emitted
        );
    }

    Ok(())
}
