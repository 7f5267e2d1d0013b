//! The detection facade: owns the landmark backend handle and every piece of
//! mutable per-session state, and sequences the per-frame pipeline.
//!
//! Frame processing is serialized behind one lock because the stability
//! filter's transitions depend on frame order. Backend initialization is the
//! only slow operation and runs outside that lock; concurrent `initialize`
//! calls share a single in-flight load and all observe its outcome.

use std::{
    sync::{Arc, Condvar, Mutex},
    time::{Duration, Instant},
};

use thiserror::Error;

use crate::{
    classifier::GestureClassifier,
    features::extract_features,
    landmarks::LandmarkProvider,
    phrases::{PHRASE_WINDOW, PhraseDictionary, PhraseMatcher},
    stability::StabilityFilter,
    types::{Frame, Symbol},
};

/// Tunable knobs for a [`Detector`]. Hosts usually only touch the
/// dictionary.
#[derive(Clone, Debug)]
pub struct DetectorConfig {
    /// Minimum confidence a candidate must exceed to become the stable
    /// output. Must lie in (0, 1].
    pub confidence_threshold: f32,
    /// Bound on the recent-gesture buffer.
    pub buffer_capacity: usize,
    /// Age past which buffer entries are purged once the hand is lost.
    pub stale_horizon: Duration,
    /// Minimum interval between two phrase emissions.
    pub phrase_cooldown: Duration,
    pub dictionary: PhraseDictionary,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.65,
            buffer_capacity: 10,
            stale_horizon: Duration::from_millis(2000),
            phrase_cooldown: Duration::from_millis(3000),
            dictionary: PhraseDictionary::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetectorStatus {
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DetectorError {
    #[error("landmark backend failed to load: {message}")]
    Init { message: String },
}

struct InitState {
    status: DetectorStatus,
    error: Option<String>,
}

struct PipelineState {
    classifier: GestureClassifier,
    filter: StabilityFilter,
    matcher: PhraseMatcher,
}

struct DetectorInner {
    provider: Mutex<Box<dyn LandmarkProvider>>,
    init: Mutex<InitState>,
    init_changed: Condvar,
    pipeline: Mutex<PipelineState>,
}

/// Cheaply cloneable handle to one detection session. All clones share the
/// same backend, buffer, and timers.
#[derive(Clone)]
pub struct Detector {
    inner: Arc<DetectorInner>,
}

impl Detector {
    pub fn new<P: LandmarkProvider>(provider: P, config: DetectorConfig) -> Self {
        let DetectorConfig {
            confidence_threshold,
            buffer_capacity,
            stale_horizon,
            phrase_cooldown,
            dictionary,
        } = config;
        Self {
            inner: Arc::new(DetectorInner {
                provider: Mutex::new(Box::new(provider)),
                init: Mutex::new(InitState {
                    status: DetectorStatus::Idle,
                    error: None,
                }),
                init_changed: Condvar::new(),
                pipeline: Mutex::new(PipelineState {
                    classifier: GestureClassifier::new(),
                    filter: StabilityFilter::new(
                        confidence_threshold,
                        buffer_capacity,
                        stale_horizon,
                    ),
                    matcher: PhraseMatcher::new(dictionary, phrase_cooldown),
                }),
            }),
        }
    }

    pub fn with_defaults<P: LandmarkProvider>(provider: P) -> Self {
        Self::new(provider, DetectorConfig::default())
    }

    /// Load the landmark backend. Idempotent: already ready returns
    /// immediately, an in-flight load is joined rather than duplicated, and
    /// a failed attempt clears the way for a retry.
    pub fn initialize(&self) -> Result<(), DetectorError> {
        let mut init = self.inner.init.lock().unwrap();
        match init.status {
            DetectorStatus::Ready => return Ok(()),
            DetectorStatus::Loading => {
                // Another caller is loading; adopt its outcome.
                while init.status == DetectorStatus::Loading {
                    init = self.inner.init_changed.wait(init).unwrap();
                }
                return match init.status {
                    DetectorStatus::Ready => Ok(()),
                    _ => Err(DetectorError::Init {
                        message: init
                            .error
                            .clone()
                            .unwrap_or_else(|| "initialization failed".to_string()),
                    }),
                };
            }
            DetectorStatus::Idle | DetectorStatus::Failed => {
                init.status = DetectorStatus::Loading;
                init.error = None;
            }
        }
        drop(init);

        // The actual load runs without any state lock held, so per-frame
        // callers keep getting their early not-ready return meanwhile.
        let result = {
            let mut provider = self.inner.provider.lock().unwrap();
            provider.load()
        };

        let mut init = self.inner.init.lock().unwrap();
        let outcome = match result {
            Ok(()) => {
                log::info!("landmark backend ready");
                init.status = DetectorStatus::Ready;
                Ok(())
            }
            Err(err) => {
                let message = format!("{err:#}");
                log::error!("landmark backend failed to load: {message}");
                init.status = DetectorStatus::Failed;
                init.error = Some(message.clone());
                Err(DetectorError::Init { message })
            }
        };
        self.inner.init_changed.notify_all();
        outcome
    }

    pub fn status(&self) -> DetectorStatus {
        self.inner.init.lock().unwrap().status
    }

    /// Run one frame through the pipeline and return the stabilized symbol.
    ///
    /// Never panics the host's frame loop: before the backend is ready this
    /// returns `None` without touching state, and provider errors or
    /// unusable landmarks degrade to the lost-hand path.
    pub fn detect_and_classify(&self, frame: &Frame) -> Option<Symbol> {
        if self.status() != DetectorStatus::Ready {
            return None;
        }

        let now = Instant::now();
        let mut pipeline = self.inner.pipeline.lock().unwrap();

        let landmarks = {
            let mut provider = self.inner.provider.lock().unwrap();
            match provider.detect(frame) {
                Ok(landmarks) => landmarks,
                Err(err) => {
                    log::warn!("landmark detection failed: {err:?}");
                    None
                }
            }
        };

        let features = landmarks.and_then(|hand| match extract_features(&hand) {
            Ok(features) => Some(features),
            Err(err) => {
                log::debug!("dropping frame: {err}");
                None
            }
        });

        match features {
            Some(features) => {
                let candidate = pipeline.classifier.classify(&features);
                pipeline.filter.update(candidate, true, now)
            }
            None => pipeline.filter.update(None, false, now),
        }
    }

    /// Look for a phrase in the recent gesture buffer. Rate-limited; see
    /// [`PhraseMatcher`].
    pub fn check_for_phrases(&self) -> Option<String> {
        if self.status() != DetectorStatus::Ready {
            return None;
        }
        let now = Instant::now();
        let mut pipeline = self.inner.pipeline.lock().unwrap();
        let PipelineState {
            filter, matcher, ..
        } = &mut *pipeline;
        matcher.check(filter.recent_symbols(PHRASE_WINDOW), now)
    }

    /// Emitted phrases joined into one displayable line.
    pub fn current_sentence(&self) -> String {
        self.inner.pipeline.lock().unwrap().matcher.current_sentence()
    }

    pub fn recent_phrases(&self) -> Vec<String> {
        self.inner
            .pipeline
            .lock()
            .unwrap()
            .matcher
            .recent_phrases()
            .map(str::to_string)
            .collect()
    }

    pub fn last_stable_symbol(&self) -> Option<Symbol> {
        self.inner.pipeline.lock().unwrap().filter.last_stable()
    }
}
