//! Rule-based symbol scoring over a [`HandFeatureSet`].
//!
//! Each letter is one `(predicate, scorer)` pair in a fixed registration
//! order. Every rule whose predicate holds contributes a candidate; the
//! highest confidence wins and exact ties go to the earliest-registered
//! rule. Adding a symbol is a new table entry, not a new branch.

use crate::{
    features::HandFeatureSet,
    types::{GestureCandidate, Symbol},
};

type Predicate = fn(&HandFeatureSet) -> bool;
type Scorer = fn(&HandFeatureSet) -> f32;

struct Rule {
    symbol: Symbol,
    applies: Predicate,
    score: Scorer,
}

pub struct GestureClassifier {
    rules: Vec<Rule>,
}

impl GestureClassifier {
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// Score the frame's features against every registered rule and pick the
    /// best candidate. `None` means no rule matched this frame; resolving
    /// that is the stability filter's job, not ours.
    pub fn classify(&self, features: &HandFeatureSet) -> Option<GestureCandidate> {
        let mut best: Option<GestureCandidate> = None;
        for rule in &self.rules {
            if !(rule.applies)(features) {
                continue;
            }
            let confidence = (rule.score)(features).clamp(0.0, 1.0);
            let beats_best = best
                .map(|current| confidence > current.confidence)
                .unwrap_or(true);
            if beats_best {
                best = Some(GestureCandidate {
                    symbol: rule.symbol,
                    confidence,
                });
            }
        }
        best
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn default_rules() -> Vec<Rule> {
    vec![
        // A: fist with the thumb raised along the side.
        Rule {
            symbol: Symbol::A,
            applies: |f| f.is_thumb_up && f.are_fingers_closed && !f.is_pinky_extended,
            score: |f| 0.8 * f.thumb_extension,
        },
        // B: flat hand, fingers extended upward and held together.
        Rule {
            symbol: Symbol::B,
            applies: |f| f.are_all_fingers_extended && f.fingers_close,
            score: |f| 0.8 * f.finger_extension,
        },
        // C: the whole hand curved into an open arc.
        Rule {
            symbol: Symbol::C,
            applies: |f| f.is_curved_hand && !f.are_all_fingers_extended,
            score: |f| 0.8 * f.hand_curvature,
        },
        // D: index up, remaining fingers curled.
        Rule {
            symbol: Symbol::D,
            applies: |f| {
                f.is_index_extended
                    && !f.is_middle_extended
                    && !f.is_ring_extended
                    && !f.is_pinky_extended
            },
            score: |f| 0.8 * f.index_extension,
        },
        // E: fingers curled down with the thumb tucked.
        Rule {
            symbol: Symbol::E,
            applies: |f| f.are_fingers_closed && !f.is_thumb_up,
            score: |_| 0.7,
        },
        // F: thumb and index touching, the other three raised.
        Rule {
            symbol: Symbol::F,
            applies: |f| {
                f.is_thumb_index_close
                    && f.is_middle_extended
                    && f.is_ring_extended
                    && f.is_pinky_extended
            },
            score: |_| 0.75,
        },
        // G: index pointing sideways with a lateral thumb.
        Rule {
            symbol: Symbol::G,
            applies: |f| f.is_index_extended && !f.is_middle_extended && f.is_thumb_sideways,
            score: |f| 0.7 * f.index_extension,
        },
        // H: index and middle extended together, side by side.
        Rule {
            symbol: Symbol::H,
            applies: |f| {
                f.is_index_extended
                    && f.is_middle_extended
                    && !f.is_ring_extended
                    && !f.is_pinky_extended
                    && f.index_middle_close
            },
            score: |_| 0.75,
        },
        // I: pinky alone.
        Rule {
            symbol: Symbol::I,
            applies: |f| {
                f.is_pinky_extended
                    && !f.is_index_extended
                    && !f.is_middle_extended
                    && !f.is_ring_extended
            },
            score: |f| 0.8 * f.pinky_extension,
        },
        // J: the I handshape mid-trace, read here as pinky plus a rotated
        // wrist since the motion itself is not visible in a single frame.
        Rule {
            symbol: Symbol::J,
            applies: |f| {
                f.is_pinky_extended
                    && !f.is_index_extended
                    && !f.is_middle_extended
                    && !f.is_ring_extended
                    && f.is_wrist_rotated
            },
            score: |_| 0.65,
        },
        // K: index and middle spread into a V.
        Rule {
            symbol: Symbol::K,
            applies: |f| {
                f.is_index_extended
                    && f.is_middle_extended
                    && !f.is_ring_extended
                    && !f.is_pinky_extended
                    && !f.index_middle_close
            },
            score: |_| 0.7,
        },
        // L: thumb and index at a right angle.
        Rule {
            symbol: Symbol::L,
            applies: |f| {
                f.is_index_extended
                    && !f.is_middle_extended
                    && !f.is_ring_extended
                    && !f.is_pinky_extended
                    && f.is_thumb_sideways
                    && f.is_l_shape
            },
            score: |_| 0.8,
        },
        // M: fist with the thumb fully buried under the fingers.
        Rule {
            symbol: Symbol::M,
            applies: |f| f.are_fingers_closed && !f.is_thumb_up && f.thumb_extension < 0.35,
            score: |_| 0.6,
        },
        // N: fist with the thumb partially tucked, shallower than M.
        Rule {
            symbol: Symbol::N,
            applies: |f| {
                f.are_fingers_closed
                    && !f.is_thumb_up
                    && f.thumb_extension >= 0.35
                    && f.thumb_extension < 0.5
            },
            score: |_| 0.6,
        },
        // O: fingertips curved around to meet the thumb in a ring.
        Rule {
            symbol: Symbol::O,
            applies: |f| f.is_curved_hand && f.is_thumb_index_close,
            score: |_| 0.75,
        },
        // P: the K handshape tipped downward.
        Rule {
            symbol: Symbol::P,
            applies: |f| {
                f.is_index_extended
                    && f.is_middle_extended
                    && !f.is_ring_extended
                    && !f.is_pinky_extended
                    && !f.index_middle_close
                    && f.is_wrist_rotated
            },
            score: |_| 0.72,
        },
        // Q: the G handshape tipped downward.
        Rule {
            symbol: Symbol::Q,
            applies: |f| {
                f.is_index_extended
                    && !f.is_middle_extended
                    && f.is_thumb_sideways
                    && f.is_wrist_rotated
            },
            score: |f| 0.75 * f.index_extension,
        },
        // R: index and middle crossed tightly, thumb pressed to the index.
        Rule {
            symbol: Symbol::R,
            applies: |f| {
                f.is_index_extended
                    && f.is_middle_extended
                    && !f.is_ring_extended
                    && !f.is_pinky_extended
                    && f.index_middle_close
                    && f.is_thumb_index_close
            },
            score: |_| 0.78,
        },
        // S: fist with the thumb locked across the front.
        Rule {
            symbol: Symbol::S,
            applies: |f| f.are_fingers_closed && f.is_thumb_sideways && !f.is_thumb_up,
            score: |_| 0.7,
        },
        // T: fist with the thumb tip wedged against the index.
        Rule {
            symbol: Symbol::T,
            applies: |f| f.are_fingers_closed && f.is_thumb_index_close,
            score: |_| 0.65,
        },
        // U: index and middle together with the thumb buried; reads as U
        // rather than H when the thumb is fully folded away.
        Rule {
            symbol: Symbol::U,
            applies: |f| {
                f.is_index_extended
                    && f.is_middle_extended
                    && !f.is_ring_extended
                    && !f.is_pinky_extended
                    && f.index_middle_close
                    && f.thumb_extension < 0.3
            },
            score: |_| 0.78,
        },
        // V: spread index and middle with a neutral thumb.
        Rule {
            symbol: Symbol::V,
            applies: |f| {
                f.is_index_extended
                    && f.is_middle_extended
                    && !f.is_ring_extended
                    && !f.is_pinky_extended
                    && !f.index_middle_close
                    && !f.is_thumb_sideways
            },
            score: |f| 0.55 + 0.25 * ((f.index_extension + f.middle_extension) / 2.0),
        },
        // W: index, middle and ring up, pinky folded.
        Rule {
            symbol: Symbol::W,
            applies: |f| {
                f.is_index_extended
                    && f.is_middle_extended
                    && f.is_ring_extended
                    && !f.is_pinky_extended
            },
            score: |_| 0.75,
        },
        // X: index hooked halfway, nothing else raised.
        Rule {
            symbol: Symbol::X,
            applies: |f| {
                !f.is_index_extended
                    && f.index_extension >= 0.35
                    && !f.is_middle_extended
                    && !f.is_ring_extended
                    && !f.is_pinky_extended
                    && !f.is_thumb_sideways
            },
            score: |_| 0.6,
        },
        // Y: thumb and pinky flared out, middle fingers folded.
        Rule {
            symbol: Symbol::Y,
            applies: |f| {
                f.is_pinky_extended
                    && f.is_thumb_sideways
                    && !f.is_index_extended
                    && !f.is_middle_extended
                    && !f.is_ring_extended
            },
            score: |_| 0.8,
        },
        // Z: the pointing index caught mid-zigzag, wrist turned.
        Rule {
            symbol: Symbol::Z,
            applies: |f| {
                f.is_index_extended
                    && !f.is_middle_extended
                    && !f.is_ring_extended
                    && !f.is_pinky_extended
                    && f.is_wrist_rotated
            },
            score: |_| 0.65,
        },
        // Space and Delete carry no static handshape rule; hosts trigger
        // them through their own input affordances.
    ]
}
