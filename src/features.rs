//! Geometric feature extraction from one frame's hand landmarks.
//!
//! Every extension measurement is normalized by the wrist-to-middle-knuckle
//! distance, so the thresholds below are invariant to how large the hand
//! appears in the frame. Distances are planar (x, y); depth only feeds the
//! wrist-rotation flag.

use thiserror::Error;

use crate::landmarks::{self, HandLandmarks};

/// Reference distances below this are corrupt input, not a small hand.
const MIN_HAND_SPAN: f32 = 1e-6;

const EXTENDED_THRESHOLD: f32 = 0.6;
const THUMB_ACTIVE_THRESHOLD: f32 = 0.5;
const THUMB_OFFSET: f32 = 0.1;
const CLOSED_TIP_DISTANCE: f32 = 0.2;
const INDEX_MIDDLE_CLOSE: f32 = 0.06;
const THUMB_INDEX_CLOSE: f32 = 0.05;
const ADJACENT_TIPS_CLOSE: f32 = 0.07;
const CURVE_SPREAD: f32 = 0.05;
const WRIST_ROTATION_DEPTH: f32 = 0.05;
const L_SHAPE_THUMB_FLATNESS: f32 = 0.05;

/// Landmark set whose normalizing reference distance collapsed to zero.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
#[error("degenerate hand landmarks: wrist-to-knuckle reference is {reference}")]
pub struct DegenerateHand {
    pub reference: f32,
}

/// Derived per-frame descriptors of a single hand. Computed fresh every
/// frame and never mutated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandFeatureSet {
    pub index_extension: f32,
    pub middle_extension: f32,
    pub ring_extension: f32,
    pub pinky_extension: f32,
    pub thumb_extension: f32,
    /// Mean of the four non-thumb extension ratios.
    pub finger_extension: f32,
    pub is_index_extended: bool,
    pub is_middle_extended: bool,
    pub is_ring_extended: bool,
    pub is_pinky_extended: bool,
    pub is_thumb_up: bool,
    pub is_thumb_sideways: bool,
    pub index_middle_close: bool,
    pub is_thumb_index_close: bool,
    /// All three gaps between adjacent non-thumb fingertips are small.
    pub fingers_close: bool,
    /// At least three non-thumb fingertips sit near the wrist.
    pub are_fingers_closed: bool,
    pub are_all_fingers_extended: bool,
    /// Fingertip height variance, scaled into [0, 1].
    pub hand_curvature: f32,
    pub is_curved_hand: bool,
    pub is_wrist_rotated: bool,
    pub is_l_shape: bool,
}

/// Derive the feature set for one hand. Pure and deterministic; fails only
/// when the normalizing reference distance is degenerate.
pub fn extract_features(hand: &HandLandmarks) -> Result<HandFeatureSet, DegenerateHand> {
    let wrist = hand.point(landmarks::WRIST);
    let middle_mcp = hand.point(landmarks::MIDDLE_MCP);

    let hand_span = planar_distance(wrist, middle_mcp);
    if hand_span <= MIN_HAND_SPAN {
        return Err(DegenerateHand {
            reference: hand_span,
        });
    }

    let thumb_tip = hand.point(landmarks::THUMB_TIP);
    let index_tip = hand.point(landmarks::INDEX_TIP);
    let middle_tip = hand.point(landmarks::MIDDLE_TIP);
    let ring_tip = hand.point(landmarks::RING_TIP);
    let pinky_tip = hand.point(landmarks::PINKY_TIP);

    let extension = |base: usize, tip: usize| {
        planar_distance(hand.point(base), hand.point(tip)) / hand_span
    };
    let index_extension = extension(landmarks::INDEX_MCP, landmarks::INDEX_TIP);
    let middle_extension = extension(landmarks::MIDDLE_MCP, landmarks::MIDDLE_TIP);
    let ring_extension = extension(landmarks::RING_MCP, landmarks::RING_TIP);
    let pinky_extension = extension(landmarks::PINKY_MCP, landmarks::PINKY_TIP);
    let thumb_extension = extension(landmarks::THUMB_CMC, landmarks::THUMB_TIP);

    let is_index_extended = index_extension > EXTENDED_THRESHOLD;
    let is_middle_extended = middle_extension > EXTENDED_THRESHOLD;
    let is_ring_extended = ring_extension > EXTENDED_THRESHOLD;
    let is_pinky_extended = pinky_extension > EXTENDED_THRESHOLD;

    // Screen coordinates: smaller y is higher in the frame.
    let is_thumb_up =
        wrist[1] - thumb_tip[1] > THUMB_OFFSET && thumb_extension > THUMB_ACTIVE_THRESHOLD;
    let is_thumb_sideways =
        (thumb_tip[0] - wrist[0]).abs() > THUMB_OFFSET && thumb_extension > THUMB_ACTIVE_THRESHOLD;

    let index_middle_distance = planar_distance(index_tip, middle_tip);
    let middle_ring_distance = planar_distance(middle_tip, ring_tip);
    let ring_pinky_distance = planar_distance(ring_tip, pinky_tip);
    let index_middle_close = index_middle_distance < INDEX_MIDDLE_CLOSE;
    let is_thumb_index_close = planar_distance(thumb_tip, index_tip) < THUMB_INDEX_CLOSE;
    let fingers_close = index_middle_distance < ADJACENT_TIPS_CLOSE
        && middle_ring_distance < ADJACENT_TIPS_CLOSE
        && ring_pinky_distance < ADJACENT_TIPS_CLOSE;

    let non_thumb_tips = [index_tip, middle_tip, ring_tip, pinky_tip];
    let closed_count = non_thumb_tips
        .iter()
        .filter(|tip| planar_distance(**tip, wrist) < CLOSED_TIP_DISTANCE)
        .count();
    let are_fingers_closed = closed_count >= 3;
    let are_all_fingers_extended =
        is_index_extended && is_middle_extended && is_ring_extended && is_pinky_extended;

    let hand_curvature = tip_height_variance(&non_thumb_tips);
    let is_curved_hand = curved_hand(hand, &non_thumb_tips);

    let is_wrist_rotated = (wrist[2] - middle_mcp[2]).abs() > WRIST_ROTATION_DEPTH;

    let thumb_cmc = hand.point(landmarks::THUMB_CMC);
    let is_l_shape = (thumb_tip[1] - thumb_cmc[1]).abs() < L_SHAPE_THUMB_FLATNESS
        && wrist[1] - index_tip[1] > THUMB_OFFSET;

    Ok(HandFeatureSet {
        index_extension,
        middle_extension,
        ring_extension,
        pinky_extension,
        thumb_extension,
        finger_extension: (index_extension + middle_extension + ring_extension + pinky_extension)
            / 4.0,
        is_index_extended,
        is_middle_extended,
        is_ring_extended,
        is_pinky_extended,
        is_thumb_up,
        is_thumb_sideways,
        index_middle_close,
        is_thumb_index_close,
        fingers_close,
        are_fingers_closed,
        are_all_fingers_extended,
        hand_curvature,
        is_curved_hand,
        is_wrist_rotated,
        is_l_shape,
    })
}

fn planar_distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
}

/// Variance of the four fingertip heights, scaled by 100 and clamped so a
/// fully flat hand reads 0 and a strongly staggered one saturates at 1.
fn tip_height_variance(tips: &[[f32; 3]; 4]) -> f32 {
    let mean = tips.iter().map(|tip| tip[1]).sum::<f32>() / 4.0;
    let variance = tips.iter().map(|tip| (tip[1] - mean).powi(2)).sum::<f32>() / 4.0;
    (variance * 100.0).min(1.0)
}

/// A curved hand has every fingertip above the knuckle row with a visible
/// vertical stagger between index and pinky tips.
fn curved_hand(hand: &HandLandmarks, tips: &[[f32; 3]; 4]) -> bool {
    let knuckle_mean = [
        landmarks::INDEX_MCP,
        landmarks::MIDDLE_MCP,
        landmarks::RING_MCP,
        landmarks::PINKY_MCP,
    ]
    .iter()
    .map(|&idx| hand.point(idx)[1])
    .sum::<f32>()
        / 4.0;

    tips.iter().all(|tip| tip[1] < knuckle_mean) && (tips[0][1] - tips[3][1]).abs() > CURVE_SPREAD
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::NUM_LANDMARKS;

    // A neutral open hand: wrist at the bottom center, knuckle row above it,
    // straight fingers pointing up, thumb resting near the palm.
    fn base_points() -> [[f32; 3]; NUM_LANDMARKS] {
        let mut points = [[0.0f32; 3]; NUM_LANDMARKS];
        points[landmarks::WRIST] = [0.5, 0.8, 0.0];
        points[landmarks::THUMB_CMC] = [0.46, 0.76, 0.0];
        points[landmarks::THUMB_MCP] = [0.45, 0.74, 0.0];
        points[landmarks::THUMB_IP] = [0.44, 0.72, 0.0];
        points[landmarks::THUMB_TIP] = [0.44, 0.70, 0.0];
        for (finger, mcp) in [
            (landmarks::INDEX_MCP, 0.45),
            (landmarks::MIDDLE_MCP, 0.50),
            (landmarks::RING_MCP, 0.55),
            (landmarks::PINKY_MCP, 0.60),
        ] {
            points[finger] = [mcp, 0.6, 0.0];
            points[finger + 1] = [mcp, 0.54, 0.0];
            points[finger + 2] = [mcp, 0.48, 0.0];
            points[finger + 3] = [mcp, 0.42, 0.0];
        }
        points
    }

    fn hand_from(points: [[f32; 3]; NUM_LANDMARKS]) -> HandLandmarks {
        HandLandmarks::from_points(&points).unwrap()
    }

    fn curl_finger(points: &mut [[f32; 3]; NUM_LANDMARKS], mcp: usize, toward: [f32; 2]) {
        points[mcp + 1] = [points[mcp][0], points[mcp][1] + 0.05, 0.0];
        points[mcp + 2] = [toward[0], toward[1] - 0.02, 0.0];
        points[mcp + 3] = [toward[0], toward[1], 0.0];
    }

    fn fist_points() -> [[f32; 3]; NUM_LANDMARKS] {
        let mut points = base_points();
        curl_finger(&mut points, landmarks::INDEX_MCP, [0.47, 0.70]);
        curl_finger(&mut points, landmarks::MIDDLE_MCP, [0.50, 0.70]);
        curl_finger(&mut points, landmarks::RING_MCP, [0.55, 0.70]);
        curl_finger(&mut points, landmarks::PINKY_MCP, [0.60, 0.68]);
        // Thumb folded across the curled fingers.
        points[landmarks::THUMB_TIP] = [0.45, 0.73, 0.0];
        points
    }

    #[test]
    fn extraction_is_deterministic() {
        let hand = hand_from(base_points());
        let first = extract_features(&hand).unwrap();
        let second = extract_features(&hand).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn degenerate_reference_is_rejected() {
        let mut points = base_points();
        points[landmarks::MIDDLE_MCP] = points[landmarks::WRIST];
        let err = extract_features(&hand_from(points)).unwrap_err();
        assert!(err.reference <= MIN_HAND_SPAN);
    }

    #[test]
    fn open_hand_reads_extended_and_not_closed() {
        let features = extract_features(&hand_from(base_points())).unwrap();
        assert!(features.is_index_extended);
        assert!(features.is_middle_extended);
        assert!(features.is_ring_extended);
        assert!(features.is_pinky_extended);
        assert!(features.are_all_fingers_extended);
        assert!(!features.are_fingers_closed);
    }

    #[test]
    fn fist_reads_closed_and_not_extended() {
        let features = extract_features(&hand_from(fist_points())).unwrap();
        assert!(features.are_fingers_closed);
        assert!(!features.is_index_extended);
        assert!(!features.is_middle_extended);
        assert!(!features.are_all_fingers_extended);
        assert!(!features.is_thumb_up);
    }

    #[test]
    fn raised_thumb_sets_thumb_up() {
        let mut points = fist_points();
        points[landmarks::THUMB_TIP] = [0.46, 0.62, 0.0];
        let features = extract_features(&hand_from(points)).unwrap();
        assert!(features.is_thumb_up);
        assert!(features.thumb_extension > THUMB_ACTIVE_THRESHOLD);
    }

    #[test]
    fn lateral_thumb_sets_thumb_sideways() {
        let mut points = fist_points();
        points[landmarks::THUMB_TIP] = [0.34, 0.75, 0.0];
        let features = extract_features(&hand_from(points)).unwrap();
        assert!(features.is_thumb_sideways);
        assert!(!features.is_thumb_up);
    }

    #[test]
    fn staggered_tips_above_knuckles_read_curved() {
        let mut points = base_points();
        points[landmarks::INDEX_TIP] = [0.44, 0.50, 0.0];
        points[landmarks::MIDDLE_TIP] = [0.47, 0.52, 0.0];
        points[landmarks::RING_TIP] = [0.52, 0.55, 0.0];
        points[landmarks::PINKY_TIP] = [0.56, 0.56, 0.0];
        let features = extract_features(&hand_from(points)).unwrap();
        assert!(features.is_curved_hand);
        assert!(features.hand_curvature > 0.0);
    }

    #[test]
    fn flat_tip_row_is_not_curved() {
        let features = extract_features(&hand_from(base_points())).unwrap();
        assert!(!features.is_curved_hand);
        assert!(features.hand_curvature < 1e-3);
    }

    #[test]
    fn depth_offset_sets_wrist_rotated() {
        let mut points = base_points();
        points[landmarks::MIDDLE_MCP][2] = 0.08;
        let features = extract_features(&hand_from(points)).unwrap();
        assert!(features.is_wrist_rotated);
        assert!(!extract_features(&hand_from(base_points())).unwrap().is_wrist_rotated);
    }

    #[test]
    fn horizontal_thumb_with_raised_index_reads_l_shape() {
        let mut points = fist_points();
        points[landmarks::THUMB_TIP] = [0.34, 0.75, 0.0];
        points[landmarks::INDEX_PIP] = [0.45, 0.54, 0.0];
        points[landmarks::INDEX_DIP] = [0.45, 0.48, 0.0];
        points[landmarks::INDEX_TIP] = [0.45, 0.42, 0.0];
        let features = extract_features(&hand_from(points)).unwrap();
        assert!(features.is_l_shape);
        assert!(features.is_index_extended);
    }
}
