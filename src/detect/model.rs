use anyhow::Result;

use crate::frame::Frame;

use super::result::DetectionBox;

/// Noise gate over candidate crops.
///
/// Implementations are externally trained classifiers invoked through this
/// single call; the engine treats them as opaque. `predict` answers "is this
/// crop noise?" - true short-circuits the frame before digit detection runs.
pub trait NoiseClassifier: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Returns true when the crop does not contain a doorplate.
    fn predict(&mut self, crop: &Frame) -> Result<bool>;

    /// Optional warm-up hook.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Digit sequence detector over the larger raw crop.
///
/// Returns the detected digit boxes in no particular order, or `None` when
/// nothing usable was found. Ordering and label assembly are the engine's
/// concern, not the backend's.
pub trait SequenceDetector: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Run detection on a crop. `None` means no usable detections.
    fn predict(&mut self, crop: &Frame) -> Result<Option<Vec<DetectionBox>>>;

    /// Optional warm-up hook.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}
