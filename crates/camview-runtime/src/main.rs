//! # CamView Runtime
//!
//! Single-process deployment wiring:
//!
//! 1. Initialize structured logging.
//! 2. Seed the camera store (in-memory here; a DB-backed adapter in
//!    production fills the same port).
//! 3. Get the shared broker and attach the streaming gateway to every
//!    registered type.
//! 4. Run a demo publisher emitting random direction and angle facts, then
//!    shut the broker down cleanly.
//!
//! Frames that would go to connected streaming clients are printed to
//! stdout through a line-oriented sink.

use camera_mapper::{CameraMapper, InMemoryCameraStore};
use rand::seq::SliceRandom;
use rand::Rng;
use sensor_bus::{shared, shutdown_shared, ANGLE_TYPE, DIRECTION_TYPE};
use shared_types::{AngleRange, CameraInfo, CameraRecord, CameraStatus, Payload};
use std::sync::Arc;
use stream_gateway::{SinkError, StreamGateway, UpdateSink};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Line-oriented sink printing frames to stdout.
struct StdoutSink;

impl UpdateSink for StdoutSink {
    fn send(&self, frame: &str) -> Result<(), SinkError> {
        println!("{frame}");
        Ok(())
    }
}

fn seed_store() -> InMemoryCameraStore {
    let store = InMemoryCameraStore::new();
    store.set_cameras(vec![
        CameraRecord {
            info: CameraInfo {
                id: "cam-front".into(),
                name: "Front gate".into(),
                url: "rtsp://cams.local/front".into(),
                status: CameraStatus::Online,
                directions: vec!["forward".into(), "stationary".into()],
            },
            enabled: true,
        },
        CameraRecord {
            info: CameraInfo {
                id: "cam-rear".into(),
                name: "Rear yard".into(),
                url: "rtsp://cams.local/rear".into(),
                status: CameraStatus::Online,
                directions: vec!["backward".into()],
            },
            enabled: true,
        },
        CameraRecord {
            info: CameraInfo {
                id: "cam-side".into(),
                name: "Side alley".into(),
                url: "rtsp://cams.local/side".into(),
                status: CameraStatus::Offline,
                directions: vec!["turn_left".into(), "turn_right".into()],
            },
            enabled: true,
        },
    ]);
    store.set_angle_ranges(vec![
        AngleRange {
            id: "front-arc".into(),
            start: -45.0,
            end: 45.0,
            camera_ids: vec!["cam-front".into()],
        },
        AngleRange {
            id: "rear-arc".into(),
            start: 135.0,
            end: 225.0,
            camera_ids: vec!["cam-rear".into()],
        },
    ]);
    store
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("logging already initialized");
    }

    info!("CamView runtime starting");

    let mapper = Arc::new(CameraMapper::new(Arc::new(seed_store())));
    let gateway = StreamGateway::new(mapper, Arc::new(StdoutSink));

    let broker = shared();
    let attachment = match gateway.attach(&broker) {
        Ok(attachment) => attachment,
        Err(error) => {
            tracing::error!(%error, "Gateway attach failed");
            return;
        }
    };
    info!(
        subscriptions = attachment.subscriptions.len(),
        "Gateway attached"
    );

    // Simulated client connect: full mapping snapshot first.
    if let Err(error) = gateway.send_snapshot() {
        tracing::error!(%error, "Snapshot send failed");
    }

    // Demo publisher: a motion processor would sit here.
    let mut rng = rand::thread_rng();
    let commands = ["forward", "backward", "turn_left", "turn_right", "stationary"];
    for _ in 0..10 {
        if rng.gen_bool(0.5) {
            let command = commands.choose(&mut rng).unwrap_or(&"stationary");
            let mut data = Payload::new();
            data.insert("command".into(), serde_json::json!(command));
            data.insert("intensity".into(), serde_json::json!(rng.gen_range(0.0..1.0)));
            broker.publish(DIRECTION_TYPE, data);
        } else {
            let mut data = Payload::new();
            data.insert(
                "angle".into(),
                serde_json::json!(rng.gen_range(-180.0..360.0)),
            );
            broker.publish(ANGLE_TYPE, data);
        }
    }

    let stats = broker.get_stats();
    info!(
        published = stats.messages_published,
        failed = stats.messages_failed,
        subscribers = stats.subscribers_count,
        "Demo publisher done"
    );

    gateway.detach(&broker, &attachment);
    shutdown_shared();
    info!("CamView runtime stopped");
}
