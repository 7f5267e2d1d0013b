//! Offline demo: replays a scripted landmark sequence that fingerspells
//! H-E-L-L-O through the full detection pipeline and prints what the host
//! would display. Run with `RUST_LOG=debug` to watch the pipeline decide.

use std::{
    thread,
    time::{Duration, Instant},
};

use anyhow::{Result, anyhow};
use crossbeam_channel::bounded;

use fingerspell::{
    Detector, Frame, HandLandmarks, NUM_LANDMARKS, ReplayProvider, Symbol, landmarks,
    start_detection_worker,
};

const FRAME_DELAY: Duration = Duration::from_millis(40);

fn main() -> Result<()> {
    env_logger::init();

    let script = spell_hello();
    let frame_count = script.len();
    let detector = Detector::with_defaults(ReplayProvider::new(script));

    let (frame_tx, frame_rx) = bounded(1);
    let (update_tx, update_rx) = bounded(64);
    let worker = start_detection_worker(detector.clone(), frame_rx, update_tx);

    // Pace the replay like a camera would; the worker always classifies the
    // newest frame it can see.
    for _ in 0..frame_count {
        if frame_tx.send(blank_frame()).is_err() {
            // Worker already gone; its exit reason has been logged.
            break;
        }
        thread::sleep(FRAME_DELAY);
    }
    drop(frame_tx);
    worker
        .join()
        .map_err(|_| anyhow!("detection worker panicked"))?;

    let mut last: Option<Symbol> = None;
    for update in update_rx.try_iter() {
        if update.symbol != last {
            if let Some(symbol) = update.symbol {
                println!("sign: {symbol}");
            }
            last = update.symbol;
        }
        if let Some(phrase) = update.phrase {
            println!("phrase: {phrase}");
        }
    }
    println!("sentence: {}", detector.current_sentence());

    Ok(())
}

fn blank_frame() -> Frame {
    Frame {
        rgba: Vec::new(),
        width: 640,
        height: 480,
        timestamp: Instant::now(),
    }
}

/// The scripted sequence. The hand leaves the frame between letters, the
/// way a signer's transition frames read to a tracker, so each letter lands
/// in the gesture buffer exactly once.
fn spell_hello() -> Vec<Option<HandLandmarks>> {
    vec![
        Some(letter_h()),
        None,
        Some(letter_e()),
        None,
        Some(letter_l()),
        None,
        Some(letter_l()),
        None,
        Some(letter_o()),
    ]
}

/// Scaffold shared by every pose: wrist at the bottom center, knuckle row
/// above it, all four fingers curled toward the palm, thumb resting.
fn hand_scaffold() -> [[f32; 3]; NUM_LANDMARKS] {
    let mut points = [[0.0f32; 3]; NUM_LANDMARKS];
    points[landmarks::WRIST] = [0.5, 0.8, 0.0];
    points[landmarks::THUMB_CMC] = [0.46, 0.76, 0.0];
    points[landmarks::THUMB_MCP] = [0.45, 0.75, 0.0];
    points[landmarks::THUMB_IP] = [0.45, 0.74, 0.0];
    points[landmarks::THUMB_TIP] = [0.45, 0.73, 0.0];
    for (finger, mcp, tip) in [
        (landmarks::INDEX_MCP, 0.45, [0.47, 0.70]),
        (landmarks::MIDDLE_MCP, 0.50, [0.50, 0.70]),
        (landmarks::RING_MCP, 0.55, [0.55, 0.70]),
        (landmarks::PINKY_MCP, 0.60, [0.60, 0.68]),
    ] {
        points[finger] = [mcp, 0.6, 0.0];
        points[finger + 1] = [mcp, 0.65, 0.0];
        points[finger + 2] = [tip[0], tip[1] - 0.02, 0.0];
        points[finger + 3] = [tip[0], tip[1], 0.0];
    }
    points
}

fn raise_finger(points: &mut [[f32; 3]; NUM_LANDMARKS], mcp: usize) {
    let x = points[mcp][0];
    points[mcp + 1] = [x, 0.54, 0.0];
    points[mcp + 2] = [x, 0.48, 0.0];
    points[mcp + 3] = [x, 0.42, 0.0];
}

/// Index and middle extended side by side, thumb loosely tucked.
fn letter_h() -> HandLandmarks {
    let mut points = hand_scaffold();
    raise_finger(&mut points, landmarks::INDEX_MCP);
    raise_finger(&mut points, landmarks::MIDDLE_MCP);
    points[landmarks::THUMB_TIP] = [0.43, 0.70, 0.0];
    HandLandmarks::from_points(&points).expect("scripted pose is always 21 points")
}

/// A plain fist with the thumb folded across the fingers.
fn letter_e() -> HandLandmarks {
    HandLandmarks::from_points(&hand_scaffold()).expect("scripted pose is always 21 points")
}

/// Index raised with the thumb flat out to the side.
fn letter_l() -> HandLandmarks {
    let mut points = hand_scaffold();
    raise_finger(&mut points, landmarks::INDEX_MCP);
    points[landmarks::THUMB_TIP] = [0.34, 0.75, 0.0];
    HandLandmarks::from_points(&points).expect("scripted pose is always 21 points")
}

/// Fingertips curved into a ring that the thumb closes.
fn letter_o() -> HandLandmarks {
    let mut points = hand_scaffold();
    points[landmarks::INDEX_TIP] = [0.44, 0.50, 0.0];
    points[landmarks::MIDDLE_TIP] = [0.47, 0.52, 0.0];
    points[landmarks::RING_TIP] = [0.52, 0.55, 0.0];
    points[landmarks::PINKY_TIP] = [0.56, 0.56, 0.0];
    points[landmarks::THUMB_TIP] = [0.43, 0.52, 0.0];
    HandLandmarks::from_points(&points).expect("scripted pose is always 21 points")
}
