//! Channel-driven detection worker.
//!
//! The host pushes frames into a channel at capture rate; the worker always
//! classifies the newest frame and drops the backlog, so a slow consumer
//! never builds up latency. Results go out on a second channel with
//! `try_send`, a full receiver loses updates rather than stalling the loop.

use std::thread;

use crossbeam_channel::{Receiver, Sender};

use crate::{
    detector::Detector,
    types::{DetectionUpdate, Frame},
};

/// Spawn the detection worker. The backend is loaded on the worker thread;
/// a load failure ends the worker after logging, per-frame failures are
/// absorbed by the detector itself. The worker exits when the frame channel
/// disconnects.
pub fn start_detection_worker(
    detector: Detector,
    frame_rx: Receiver<Frame>,
    update_tx: Sender<DetectionUpdate>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        if let Err(err) = detector.initialize() {
            log::error!("stopping detection worker: {err}");
            return;
        }
        run_worker_loop(&detector, &frame_rx, &update_tx);
    })
}

fn run_worker_loop(
    detector: &Detector,
    frame_rx: &Receiver<Frame>,
    update_tx: &Sender<DetectionUpdate>,
) {
    while let Some(frame) = recv_latest_frame(frame_rx) {
        let symbol = detector.detect_and_classify(&frame);
        let phrase = detector.check_for_phrases();
        let update = DetectionUpdate {
            symbol,
            phrase,
            timestamp: frame.timestamp,
        };
        let _ = update_tx.try_send(update);
    }
}

fn recv_latest_frame(frame_rx: &Receiver<Frame>) -> Option<Frame> {
    let mut frame = frame_rx.recv().ok()?;
    while let Ok(newer) = frame_rx.try_recv() {
        frame = newer;
    }
    Some(frame)
}
