//! Doorplate number labelling engine.
//!
//! Given a pair of candidate crops per video frame - a small normalized crop
//! and a larger raw crop - the engine decides whether the frame is noise or
//! shows a multi-digit doorplate, extracts the digit string, and smooths the
//! answer over a sliding window of recent reads.
//!
//! # Module Structure
//!
//! - `config`: file + env layered configuration
//! - `frame`: validated RGB crop container
//! - `detect`: opaque model traits, detection boxes, label assembly, backends
//! - `stabilize`: bounded-window majority vote over accepted labels
//! - `engine`: the per-frame three-state decision pipeline
//! - `debug_dump`: flag-gated crop persistence for offline inspection

pub mod config;
pub mod debug_dump;
pub mod detect;
pub mod engine;
pub mod frame;
pub mod stabilize;

pub use config::{DebugImageSettings, LabellerConfig, ModelSettings};
pub use debug_dump::DebugImageSink;
pub use detect::{label_from_boxes, DetectionBox, NoiseClassifier, SequenceDetector};
pub use engine::{LabellingEngine, Prediction, RawLabel};
pub use frame::Frame;
pub use stabilize::LabelStabilizer;
