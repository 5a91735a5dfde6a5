use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use eframe::egui;
use tracing::{error, info};

use jset_engine::CpuEngine;

/// Build the engine on a worker thread. The receiver yields it exactly
/// once; the UI polls it every frame until it arrives.
pub(crate) fn spawn_engine_loader(ctx: egui::Context, smoothing: f32) -> mpsc::Receiver<CpuEngine> {
    let (tx, rx) = mpsc::channel();
    let spawned = thread::Builder::new()
        .name("engine-loader".into())
        .spawn(move || {
            let start = Instant::now();
            let engine = CpuEngine::new().with_smoothing(smoothing);
            info!(elapsed = ?start.elapsed(), smoothing = ?engine.smoothing(), "Engine built");
            if tx.send(engine).is_ok() {
                ctx.request_repaint();
            }
        });
    if let Err(e) = spawned {
        error!("Failed to spawn engine loader thread: {e}");
    }
    rx
}
