//! Fingerspelling recognition core.
//!
//! Turns a stream of per-frame hand landmarks into stabilized alphabet
//! symbols and phrase matches. The host supplies frames and a
//! [`LandmarkProvider`] backend; the crate supplies geometric feature
//! extraction, rule-based scoring, temporal stability filtering, and
//! phrase-sequence matching behind the [`Detector`] facade.

pub mod classifier;
pub mod detector;
pub mod features;
pub mod landmarks;
pub mod phrases;
pub mod pipeline;
pub mod replay;
pub mod stability;
pub mod types;

// Re-exports for convenience
pub use classifier::GestureClassifier;
pub use detector::{Detector, DetectorConfig, DetectorError, DetectorStatus};
pub use features::{DegenerateHand, HandFeatureSet, extract_features};
pub use landmarks::{HandLandmarks, LandmarkProvider, NUM_LANDMARKS};
pub use phrases::{PhraseDictionary, PhraseMatcher};
pub use pipeline::start_detection_worker;
pub use replay::ReplayProvider;
pub use stability::{BufferEntry, StabilityFilter};
pub use types::{DetectionUpdate, Frame, GestureCandidate, Symbol};
