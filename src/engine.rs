//! Per-frame decision orchestration.
//!
//! One call in, one of three outcomes out:
//!
//! - the noise gate fires: `Noise`, history untouched;
//! - the detector finds nothing usable: `NoReading`, history untouched;
//! - a well-formed label: recorded into the stabilizer, fresh majority out.

use std::fmt;

use anyhow::Result;

use crate::config::LabellerConfig;
use crate::debug_dump::DebugImageSink;
use crate::detect::{label_from_boxes, NoiseClassifier, SequenceDetector};
use crate::frame::Frame;
use crate::stabilize::LabelStabilizer;

/// Raw per-frame outcome before smoothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawLabel {
    /// The noise gate rejected the crop.
    Noise,
    /// The detector found nothing usable.
    NoReading,
    /// A well-formed doorplate label.
    Label(String),
}

impl RawLabel {
    /// Wire rendering: sentinel strings for the two non-label outcomes.
    pub fn as_str(&self) -> &str {
        match self {
            RawLabel::Noise => "Noise",
            RawLabel::NoReading => "NaN",
            RawLabel::Label(s) => s,
        }
    }
}

impl fmt::Display for RawLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One engine decision: the raw outcome, the smoothed label, and whether a
/// label was accepted this frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prediction {
    pub raw: RawLabel,
    pub stabilized: String,
    pub labelled: bool,
}

/// Composes the noise gate, the digit detector and the stabilizer into one
/// decision per frame pair.
///
/// The engine exclusively owns its stabilizer and the two model backends;
/// parallelizing across tracked subjects means one engine per subject.
pub struct LabellingEngine {
    classifier: Box<dyn NoiseClassifier>,
    detector: Box<dyn SequenceDetector>,
    stabilizer: LabelStabilizer,
    debug_sink: DebugImageSink,
}

impl LabellingEngine {
    pub fn new(
        mut classifier: Box<dyn NoiseClassifier>,
        mut detector: Box<dyn SequenceDetector>,
        cfg: &LabellerConfig,
    ) -> Result<Self> {
        let debug_sink = DebugImageSink::new(&cfg.debug_images)?;
        classifier.warm_up()?;
        detector.warm_up()?;
        log::info!(
            "labelling engine ready (classifier={}, detector={}, history_capacity={})",
            classifier.name(),
            detector.name(),
            cfg.history_capacity
        );
        Ok(Self {
            classifier,
            detector,
            stabilizer: LabelStabilizer::new(cfg.history_capacity),
            debug_sink,
        })
    }

    /// Decide one frame pair: `crop` is the small normalized crop for the
    /// noise gate, `context` the larger raw crop for digit detection.
    pub fn predict(&mut self, crop: &Frame, context: &Frame) -> Result<Prediction> {
        let is_noise = self.classifier.predict(crop)?;

        // Dump failures must not cost us the frame decision.
        if let Err(e) = self.debug_sink.record(crop, is_noise) {
            log::warn!("debug image dump failed: {e:#}");
        }

        if is_noise {
            return Ok(Prediction {
                raw: RawLabel::Noise,
                stabilized: self.stabilizer.stabilized().to_string(),
                labelled: false,
            });
        }

        let label = self
            .detector
            .predict(context)?
            .and_then(label_from_boxes);
        match label {
            None => Ok(Prediction {
                raw: RawLabel::NoReading,
                stabilized: self.stabilizer.stabilized().to_string(),
                labelled: false,
            }),
            Some(raw) => {
                let stabilized = self.stabilizer.record_and_get_majority(&raw);
                Ok(Prediction {
                    raw: RawLabel::Label(raw),
                    stabilized,
                    labelled: true,
                })
            }
        }
    }

    /// Current smoothed label without running a frame.
    pub fn stabilized_label(&self) -> &str {
        self.stabilizer.stabilized()
    }

    /// Forget the label history and the cached smoothed label. The host
    /// pipeline calls this when the tracked subject changes.
    pub fn clear_most_frequent_label(&mut self) {
        self.stabilizer.reset();
    }

    /// Lifecycle hook for the host pipeline; backends hold no resources
    /// needing explicit release today.
    pub fn close(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::backends::{ScriptedNoiseClassifier, ScriptedSequenceDetector};
    use crate::detect::DetectionBox;

    fn frame() -> Frame {
        Frame::filled(100, 8, 8).unwrap()
    }

    fn plate(classes: &[u32]) -> Option<Vec<DetectionBox>> {
        Some(
            classes
                .iter()
                .enumerate()
                .map(|(i, &class_id)| DetectionBox::at_x(i as f32 * 10.0, class_id, 0.9))
                .collect(),
        )
    }

    fn engine(
        verdicts: Vec<bool>,
        responses: Vec<Option<Vec<DetectionBox>>>,
    ) -> LabellingEngine {
        let cfg = LabellerConfig::default();
        LabellingEngine::new(
            Box::new(ScriptedNoiseClassifier::new(verdicts)),
            Box::new(ScriptedSequenceDetector::new(responses)),
            &cfg,
        )
        .unwrap()
    }

    #[test]
    fn noise_short_circuits_without_touching_history() {
        let mut engine = engine(vec![false, true], vec![plate(&[1, 2, 3])]);

        let first = engine.predict(&frame(), &frame()).unwrap();
        assert_eq!(first.raw, RawLabel::Label("123".to_string()));
        assert_eq!(first.stabilized, "123");
        assert!(first.labelled);

        let second = engine.predict(&frame(), &frame()).unwrap();
        assert_eq!(second.raw, RawLabel::Noise);
        assert_eq!(second.raw.as_str(), "Noise");
        assert_eq!(second.stabilized, "123");
        assert!(!second.labelled);
    }

    #[test]
    fn unusable_detection_reports_nan() {
        let mut engine = engine(vec![false, false], vec![None, plate(&[1, 2])]);

        let first = engine.predict(&frame(), &frame()).unwrap();
        assert_eq!(first.raw, RawLabel::NoReading);
        assert_eq!(first.raw.as_str(), "NaN");
        assert_eq!(first.stabilized, "");
        assert!(!first.labelled);

        // Two boxes cannot form a label either.
        let second = engine.predict(&frame(), &frame()).unwrap();
        assert_eq!(second.raw, RawLabel::NoReading);
        assert!(!second.labelled);
    }

    #[test]
    fn labelled_frames_feed_the_stabilizer() {
        let mut engine = engine(
            vec![false; 3],
            vec![plate(&[1, 2, 3]), plate(&[1, 2, 3]), plate(&[4, 5, 6])],
        );

        for expected in ["123", "123", "123"] {
            let prediction = engine.predict(&frame(), &frame()).unwrap();
            assert!(prediction.labelled);
            assert_eq!(prediction.stabilized, expected);
        }
        assert_eq!(engine.stabilized_label(), "123");
    }

    #[test]
    fn clear_resets_the_smoothed_label() {
        let mut engine = engine(
            vec![false, false],
            vec![plate(&[1, 2, 3]), plate(&[4, 5, 6])],
        );

        engine.predict(&frame(), &frame()).unwrap();
        assert_eq!(engine.stabilized_label(), "123");

        engine.clear_most_frequent_label();
        assert_eq!(engine.stabilized_label(), "");

        let next = engine.predict(&frame(), &frame()).unwrap();
        assert_eq!(next.stabilized, "456");
    }

    #[test]
    fn four_digit_plates_render_with_separator() {
        let mut engine = engine(vec![false], vec![plate(&[7, 1, 9, 10])]);
        let prediction = engine.predict(&frame(), &frame()).unwrap();
        assert_eq!(prediction.raw, RawLabel::Label("719-0".to_string()));
        assert_eq!(prediction.stabilized, "719-0");
    }
}
